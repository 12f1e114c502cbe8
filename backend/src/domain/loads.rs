//! Load ledger entities: shipment headers and their paired outcome records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::location::{Location, LocationValidationError, Miles};
use super::registry::{CarrierId, DistributionCenterId};
use super::user::UserId;

/// Identifier for a load (shipment) record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct LoadId(i32);

impl LoadId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw database identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for load drafts and outcome drafts.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadValidationError {
    /// PO number was missing or blank once trimmed.
    EmptyPo,
    /// Load name was missing or blank once trimmed.
    EmptyName,
    /// Pickup city/state failed location validation.
    Pickup(LocationValidationError),
    /// A counted outcome value (cost, pallets, weight) was negative.
    NegativeOutcomeValue {
        /// Field name for the offending value.
        field: &'static str,
        /// The rejected value.
        value: i32,
    },
}

impl fmt::Display for LoadValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPo => write!(f, "PO number must not be empty"),
            Self::EmptyName => write!(f, "load name must not be empty"),
            Self::Pickup(err) => err.fmt(f),
            Self::NegativeOutcomeValue { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl std::error::Error for LoadValidationError {}

impl From<LocationValidationError> for LoadValidationError {
    fn from(value: LocationValidationError) -> Self {
        Self::Pickup(value)
    }
}

/// Validated input for creating a load.
///
/// Mileage is not part of the draft: it is resolved by the load service via
/// the mileage port before anything is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDraft {
    po: String,
    name: String,
    pickup: Location,
    due_date: Option<NaiveDate>,
    day_of_week: Option<String>,
    temperature: i32,
    team: bool,
    carrier: CarrierId,
    distribution_center: DistributionCenterId,
}

impl LoadDraft {
    /// Validate and construct a draft from already type-coerced form values.
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the shipment form; values arrive individually coerced"
    )]
    pub fn new(
        po: &str,
        name: &str,
        pickup_city: &str,
        pickup_state: &str,
        due_date: Option<NaiveDate>,
        day_of_week: Option<&str>,
        temperature: i32,
        team: bool,
        carrier: CarrierId,
        distribution_center: DistributionCenterId,
    ) -> Result<Self, LoadValidationError> {
        let po = po.trim();
        if po.is_empty() {
            return Err(LoadValidationError::EmptyPo);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(LoadValidationError::EmptyName);
        }
        let pickup = Location::new(pickup_city, pickup_state)?;
        Ok(Self {
            po: po.to_owned(),
            name: name.to_owned(),
            pickup,
            due_date,
            day_of_week: day_of_week.map(|day| day.trim().to_owned()),
            temperature,
            team,
            carrier,
            distribution_center,
        })
    }

    /// Purchase-order number.
    pub fn po(&self) -> &str {
        self.po.as_str()
    }

    /// Display name for the shipment.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Pickup city/state.
    pub fn pickup(&self) -> &Location {
        &self.pickup
    }

    /// Delivery due date, when scheduled.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Scheduled day of week, when known.
    pub fn day_of_week(&self) -> Option<&str> {
        self.day_of_week.as_deref()
    }

    /// Trailer temperature setting.
    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    /// Whether a driver team is required.
    pub fn team(&self) -> bool {
        self.team
    }

    /// Referenced carrier.
    pub fn carrier(&self) -> CarrierId {
        self.carrier
    }

    /// Referenced distribution center.
    pub fn distribution_center(&self) -> DistributionCenterId {
        self.distribution_center
    }
}

/// A load (shipment header) owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    /// Stable identifier.
    pub id: LoadId,
    /// Purchase-order number.
    pub po: String,
    /// Display name for the shipment.
    pub name: String,
    /// Pickup city/state.
    pub pickup: Location,
    /// Delivery due date, when scheduled.
    pub due_date: Option<NaiveDate>,
    /// Scheduled day of week, when known.
    pub day_of_week: Option<String>,
    /// Trailer temperature setting.
    pub temperature: i32,
    /// Whether a driver team is required.
    pub team: bool,
    /// Computed ground distance; zero until a lookup succeeds.
    pub miles: Miles,
    /// Whether the load has been delivered.
    pub delivered: bool,
    /// Owning user.
    pub owner: UserId,
    /// Referenced carrier.
    pub carrier: CarrierId,
    /// Referenced distribution center.
    pub distribution_center: DistributionCenterId,
}

/// Delivery-outcome record paired one-to-one with a load.
///
/// Created all-zero alongside its load; fields are filled in as the outcome
/// becomes known. `delivered` mirrors the parent load's flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadData {
    /// The load this record belongs to.
    pub load_id: LoadId,
    /// Owning user (same as the load's).
    pub owner: UserId,
    /// Delivered on time.
    pub ontime: bool,
    /// Freight arrived damaged.
    pub damaged: bool,
    /// Truck broke down in transit.
    pub brokedown: bool,
    /// Total cost for the load.
    pub cost: i32,
    /// Pallet count.
    pub pallets: i32,
    /// Total weight in pounds.
    pub weight: i32,
    /// Mirrors the parent load's delivered flag.
    pub delivered: bool,
}

/// Validated input for recording a delivery outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcomeDraft {
    ontime: bool,
    damaged: bool,
    brokedown: bool,
    cost: i32,
    pallets: i32,
    weight: i32,
}

impl LoadOutcomeDraft {
    /// Validate and construct an outcome draft.
    pub fn new(
        ontime: bool,
        damaged: bool,
        brokedown: bool,
        cost: i32,
        pallets: i32,
        weight: i32,
    ) -> Result<Self, LoadValidationError> {
        for (field, value) in [("cost", cost), ("pallets", pallets), ("weight", weight)] {
            if value < 0 {
                return Err(LoadValidationError::NegativeOutcomeValue { field, value });
            }
        }
        Ok(Self {
            ontime,
            damaged,
            brokedown,
            cost,
            pallets,
            weight,
        })
    }

    /// Delivered on time.
    pub fn ontime(&self) -> bool {
        self.ontime
    }

    /// Freight arrived damaged.
    pub fn damaged(&self) -> bool {
        self.damaged
    }

    /// Truck broke down in transit.
    pub fn brokedown(&self) -> bool {
        self.brokedown
    }

    /// Total cost for the load.
    pub fn cost(&self) -> i32 {
        self.cost
    }

    /// Pallet count.
    pub fn pallets(&self) -> i32 {
        self.pallets
    }

    /// Total weight in pounds.
    pub fn weight(&self) -> i32 {
        self.weight
    }
}
