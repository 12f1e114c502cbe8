//! Domain model, services, and ports for the freight ledger.

mod auth;
mod error;
mod identity;
mod kpi;
mod load_service;
mod loads;
mod location;
pub mod ports;
mod registry;
mod registry_service;
mod user;

pub use auth::{CredentialValidationError, Credentials};
pub use error::{DomainError, ErrorCode};
pub use identity::PasswordIdentityService;
pub use kpi::{KpiReport, KpiService};
pub use load_service::LoadService;
pub use loads::{Load, LoadData, LoadDraft, LoadId, LoadOutcomeDraft, LoadValidationError};
pub use location::{Location, LocationValidationError, Miles};
pub use registry::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, RegistryDraft,
    RegistryValidationError,
};
pub use registry_service::RegistryService;
pub use user::{UserId, UserValidationError, Username, USERNAME_MAX};
