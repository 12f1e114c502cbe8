//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain; conversions into domain entities run the
//! domain's own validating constructors.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, Load, LoadData, LoadId,
    Location, Miles, UserId,
};

use super::schema::{carriers, distribution_centers, load_data, loads, users};

fn flag(value: i32) -> bool {
    value != 0
}

fn location_for_row(city: &str, state: &str) -> Result<Location, String> {
    Location::new(city, state).map_err(|err| format!("stored location is invalid: {err}"))
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    #[expect(dead_code, reason = "rows are looked up by username filters")]
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Registry models
// ---------------------------------------------------------------------------

/// Row struct for reading from the carriers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = carriers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarrierRow {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub user_id: i32,
}

impl CarrierRow {
    pub(crate) fn into_domain(self) -> Result<Carrier, String> {
        let location = location_for_row(&self.city, &self.state)?;
        Ok(Carrier {
            id: CarrierId::new(self.id),
            name: self.name,
            address: self.address,
            location,
            zip: self.zip,
            phone: self.phone,
            owner: UserId::new(self.user_id),
        })
    }
}

/// Insertable struct for creating new carrier records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = carriers)]
pub(crate) struct NewCarrierRow<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub zip: &'a str,
    pub phone: &'a str,
    pub user_id: i32,
}

/// Row struct for reading from the distribution_centers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = distribution_centers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DistributionCenterRow {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub user_id: i32,
}

impl DistributionCenterRow {
    pub(crate) fn into_domain(self) -> Result<DistributionCenter, String> {
        let location = location_for_row(&self.city, &self.state)?;
        Ok(DistributionCenter {
            id: DistributionCenterId::new(self.id),
            name: self.name,
            address: self.address,
            location,
            zip: self.zip,
            phone: self.phone,
            owner: UserId::new(self.user_id),
        })
    }
}

/// Insertable struct for creating new distribution-center records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = distribution_centers)]
pub(crate) struct NewDistributionCenterRow<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub zip: &'a str,
    pub phone: &'a str,
    pub user_id: i32,
}

// ---------------------------------------------------------------------------
// Load models
// ---------------------------------------------------------------------------

/// Row struct for reading from the loads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoadRow {
    pub id: i32,
    pub po: String,
    pub name: String,
    pub pickup_city: String,
    pub pickup_state: String,
    pub due_date: Option<NaiveDate>,
    pub day_of_week: Option<String>,
    pub temperature: i32,
    pub team: i32,
    pub miles: i32,
    pub delivered: i32,
    pub user_id: i32,
    pub carrier_id: i32,
    pub distribution_center_id: i32,
}

impl LoadRow {
    pub(crate) fn into_domain(self) -> Result<Load, String> {
        let pickup = location_for_row(&self.pickup_city, &self.pickup_state)?;
        Ok(Load {
            id: LoadId::new(self.id),
            po: self.po,
            name: self.name,
            pickup,
            due_date: self.due_date,
            day_of_week: self.day_of_week,
            temperature: self.temperature,
            team: flag(self.team),
            miles: Miles::new(self.miles),
            delivered: flag(self.delivered),
            owner: UserId::new(self.user_id),
            carrier: CarrierId::new(self.carrier_id),
            distribution_center: DistributionCenterId::new(self.distribution_center_id),
        })
    }
}

/// Insertable struct for creating new load records.
///
/// `miles` is always the lookup result and `delivered` always starts at 0;
/// both are set explicitly rather than leaning on column defaults so the
/// inserted row round-trips without a reread.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loads)]
pub(crate) struct NewLoadRow<'a> {
    pub po: &'a str,
    pub name: &'a str,
    pub pickup_city: &'a str,
    pub pickup_state: &'a str,
    pub due_date: Option<NaiveDate>,
    pub day_of_week: Option<&'a str>,
    pub temperature: i32,
    pub team: i32,
    pub miles: i32,
    pub delivered: i32,
    pub user_id: i32,
    pub carrier_id: i32,
    pub distribution_center_id: i32,
}

/// Row struct for reading from the load_data table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = load_data)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoadDataRow {
    #[expect(dead_code, reason = "rows are addressed by their unique load_id")]
    pub id: i32,
    pub load_id: i32,
    pub user_id: i32,
    pub ontime: i32,
    pub damaged: i32,
    pub brokedown: i32,
    pub cost: i32,
    pub pallets: i32,
    pub weight: i32,
    pub delivered: i32,
}

impl LoadDataRow {
    pub(crate) fn into_domain(self) -> LoadData {
        LoadData {
            load_id: LoadId::new(self.load_id),
            owner: UserId::new(self.user_id),
            ontime: flag(self.ontime),
            damaged: flag(self.damaged),
            brokedown: flag(self.brokedown),
            cost: self.cost,
            pallets: self.pallets,
            weight: self.weight,
            delivered: flag(self.delivered),
        }
    }
}

/// Insertable struct for the all-zero outcome row paired with a new load.
///
/// Outcome fields come from the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = load_data)]
pub(crate) struct NewLoadDataRow {
    pub load_id: i32,
    pub user_id: i32,
}

/// Changeset overwriting the mutable outcome fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = load_data)]
pub(crate) struct LoadOutcomeChangeset {
    pub ontime: i32,
    pub damaged: i32,
    pub brokedown: i32,
    pub cost: i32,
    pub pallets: i32,
    pub weight: i32,
}
