//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.
//!
//! Boolean-valued flags (`delivered`, `team`, `ontime`, `damaged`,
//! `brokedown`) are stored as 0/1 integers; row conversions translate them
//! to `bool` at the persistence boundary.

diesel::table! {
    /// User accounts with hashed credentials.
    users (id) {
        /// Primary key.
        id -> Int4,
        /// Unique login name.
        username -> Text,
        /// Salted bcrypt hash; plaintext never reaches storage.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Destination facilities registered by users.
    distribution_centers (id) {
        /// Primary key.
        id -> Int4,
        /// Display name; unique together with `address`.
        name -> Text,
        /// Street address; unique together with `name`.
        address -> Text,
        /// City component of the facility location.
        city -> Text,
        /// State component of the facility location.
        state -> Text,
        /// Postal code.
        zip -> Text,
        /// Contact phone number.
        phone -> Text,
        /// Owning user.
        user_id -> Int4,
    }
}

diesel::table! {
    /// Trucking vendors registered by users.
    carriers (id) {
        /// Primary key.
        id -> Int4,
        /// Display name; unique together with `address`.
        name -> Text,
        /// Street address; unique together with `name`.
        address -> Text,
        /// City component of the vendor location.
        city -> Text,
        /// State component of the vendor location.
        state -> Text,
        /// Postal code.
        zip -> Text,
        /// Contact phone number.
        phone -> Text,
        /// Owning user.
        user_id -> Int4,
    }
}

diesel::table! {
    /// Shipment headers.
    loads (id) {
        /// Primary key.
        id -> Int4,
        /// Purchase-order number.
        po -> Text,
        /// Display name for the shipment.
        name -> Text,
        /// Pickup city.
        pickup_city -> Text,
        /// Pickup state.
        pickup_state -> Text,
        /// Delivery due date, when scheduled.
        due_date -> Nullable<Date>,
        /// Scheduled day of week, when known.
        day_of_week -> Nullable<Text>,
        /// Trailer temperature setting.
        temperature -> Int4,
        /// Driver-team flag (0/1).
        team -> Int4,
        /// Computed ground distance; zero until a lookup succeeds.
        miles -> Int4,
        /// Delivered flag (0/1).
        delivered -> Int4,
        /// Owning user.
        user_id -> Int4,
        /// Referenced carrier.
        carrier_id -> Int4,
        /// Referenced distribution center.
        distribution_center_id -> Int4,
    }
}

diesel::table! {
    /// Delivery-outcome rows, one per load.
    load_data (id) {
        /// Primary key.
        id -> Int4,
        /// Paired load; unique.
        load_id -> Int4,
        /// Owning user (same as the load's).
        user_id -> Int4,
        /// On-time flag (0/1).
        ontime -> Int4,
        /// Damage flag (0/1).
        damaged -> Int4,
        /// Breakdown flag (0/1).
        brokedown -> Int4,
        /// Total cost for the load.
        cost -> Int4,
        /// Pallet count.
        pallets -> Int4,
        /// Total weight in pounds.
        weight -> Int4,
        /// Mirrors the parent load's delivered flag (0/1).
        delivered -> Int4,
    }
}

diesel::joinable!(loads -> carriers (carrier_id));
diesel::joinable!(loads -> distribution_centers (distribution_center_id));
diesel::joinable!(load_data -> loads (load_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    distribution_centers,
    carriers,
    loads,
    load_data,
);
