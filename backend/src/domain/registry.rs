//! Reference-data registries: carriers and distribution centers.
//!
//! Both registries share the same record shape and the same uniqueness
//! policy on (name, address); they differ only in which loads reference them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::location::{Location, LocationValidationError};
use super::user::UserId;

/// Identifier for a registered carrier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct CarrierId(i32);

impl CarrierId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw database identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a registered distribution center.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct DistributionCenterId(i32);

impl DistributionCenterId {
    /// Wrap a raw database identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw database identifier.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for DistributionCenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for registry drafts.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Street address was missing or blank once trimmed.
    EmptyAddress,
    /// City or state failed location validation.
    Location(LocationValidationError),
}

impl fmt::Display for RegistryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyAddress => write!(f, "address must not be empty"),
            Self::Location(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for RegistryValidationError {}

impl From<LocationValidationError> for RegistryValidationError {
    fn from(value: LocationValidationError) -> Self {
        Self::Location(value)
    }
}

/// Validated input for creating a registry record.
///
/// ## Invariants
/// - `name` and `address` are trimmed and non-empty; together they are the
///   system-wide uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDraft {
    name: String,
    address: String,
    location: Location,
    zip: String,
    phone: String,
}

impl RegistryDraft {
    /// Validate and construct a draft from already type-coerced form values.
    pub fn new(
        name: &str,
        address: &str,
        city: &str,
        state: &str,
        zip: &str,
        phone: &str,
    ) -> Result<Self, RegistryValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryValidationError::EmptyName);
        }
        let address = address.trim();
        if address.is_empty() {
            return Err(RegistryValidationError::EmptyAddress);
        }
        let location = Location::new(city, state)?;
        Ok(Self {
            name: name.to_owned(),
            address: address.to_owned(),
            location,
            zip: zip.trim().to_owned(),
            phone: phone.trim().to_owned(),
        })
    }

    /// Display name, half of the uniqueness key.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Street address, the other half of the uniqueness key.
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    /// City/state pair.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Postal code.
    pub fn zip(&self) -> &str {
        self.zip.as_str()
    }

    /// Contact phone number.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }
}

/// A registered carrier owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    /// Stable identifier.
    pub id: CarrierId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City/state pair.
    pub location: Location,
    /// Postal code.
    pub zip: String,
    /// Contact phone number.
    pub phone: String,
    /// Owning user.
    pub owner: UserId,
}

/// A registered distribution center owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCenter {
    /// Stable identifier.
    pub id: DistributionCenterId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City/state pair.
    pub location: Location,
    /// Postal code.
    pub zip: String,
    /// Contact phone number.
    pub phone: String,
    /// Owning user.
    pub owner: UserId,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "12 Dock Rd", RegistryValidationError::EmptyName)]
    #[case("Acme Freight", "  ", RegistryValidationError::EmptyAddress)]
    fn blank_key_components_are_rejected(
        #[case] name: &str,
        #[case] address: &str,
        #[case] expected: RegistryValidationError,
    ) {
        let err = RegistryDraft::new(name, address, "Austin", "TX", "78701", "555-0100")
            .expect_err("invalid draft must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn blank_city_maps_to_location_error() {
        let err = RegistryDraft::new("Acme", "12 Dock Rd", " ", "TX", "78701", "555-0100")
            .expect_err("blank city must fail");
        assert!(matches!(err, RegistryValidationError::Location(_)));
    }

    #[test]
    fn draft_fields_are_trimmed() {
        let draft =
            RegistryDraft::new(" Acme ", " 12 Dock Rd ", " Austin ", " TX ", " 78701 ", " 555 ")
                .expect("valid draft");
        assert_eq!(draft.name(), "Acme");
        assert_eq!(draft.address(), "12 Dock Rd");
        assert_eq!(draft.location().city(), "Austin");
        assert_eq!(draft.zip(), "78701");
        assert_eq!(draft.phone(), "555");
    }
}
