//! Geographic value types shared by loads, registries, and the mileage port.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation errors for [`Location`] and [`Miles`].
#[derive(Debug, Clone, PartialEq)]
pub enum LocationValidationError {
    /// City was missing or blank once trimmed.
    EmptyCity,
    /// State was missing or blank once trimmed.
    EmptyState,
    /// A computed distance was negative or not a finite number.
    UnusableDistance {
        /// The raw value returned by the lookup.
        value: f64,
    },
}

impl fmt::Display for LocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCity => write!(f, "city must not be empty"),
            Self::EmptyState => write!(f, "state must not be empty"),
            Self::UnusableDistance { value } => {
                write!(f, "distance must be a finite non-negative number, got {value}")
            }
        }
    }
}

impl std::error::Error for LocationValidationError {}

/// A city/state pair used as a routing endpoint.
///
/// ## Invariants
/// - Both components are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    city: String,
    state: String,
}

impl Location {
    /// Validate and construct a [`Location`].
    pub fn new(city: &str, state: &str) -> Result<Self, LocationValidationError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LocationValidationError::EmptyCity);
        }
        let state = state.trim();
        if state.is_empty() {
            return Err(LocationValidationError::EmptyState);
        }
        Ok(Self {
            city: city.to_owned(),
            state: state.to_owned(),
        })
    }

    /// City component.
    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    /// State component.
    pub fn state(&self) -> &str {
        self.state.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

/// Ground distance in whole miles, as stored on a load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Miles(i32);

impl Miles {
    /// Zero distance, the placeholder until a lookup succeeds.
    pub const ZERO: Self = Self(0);

    /// Wrap an already-validated whole-mile value.
    pub const fn new(miles: i32) -> Self {
        Self(miles)
    }

    /// Round a raw lookup result to whole miles, rejecting unusable values.
    ///
    /// The directions API reports fractional miles; loads store whole miles.
    pub fn from_lookup(distance: f64) -> Result<Self, LocationValidationError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(LocationValidationError::UnusableDistance { value: distance });
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "finite non-negative check above bounds the rounded value"
        )]
        let miles = distance.round() as i32;
        Ok(Self(miles))
    }

    /// Raw whole-mile value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Miles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
