//! Domain ports and supporting types for the hexagonal boundary.

mod freight_repository;
mod identity_service;
mod mileage_source;
mod registry_repository;
mod user_repository;

pub use freight_repository::{
    FixtureFreightStore, FreightPersistenceError, LoadOutcomeRepository, LoadRepository,
};
#[cfg(test)]
pub use freight_repository::{MockLoadOutcomeRepository, MockLoadRepository};
#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use identity_service::IdentityService;
#[cfg(test)]
pub use mileage_source::MockMileageSource;
pub use mileage_source::{FixtureMileageSource, MileageSource, MileageSourceError};
#[cfg(test)]
pub use registry_repository::{MockCarrierRepository, MockDistributionCenterRepository};
pub use registry_repository::{
    CarrierRepository, DistributionCenterRepository, FixtureCarrierRepository,
    FixtureDistributionCenterRepository, RegistryPersistenceError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, StoredCredentials, UserPersistenceError, UserRepository,
};
