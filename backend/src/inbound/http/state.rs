//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports, and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureCarrierRepository, FixtureDistributionCenterRepository, FixtureFreightStore,
    FixtureMileageSource, FixtureUserRepository, IdentityService, MileageSource,
};
use crate::domain::{
    KpiService, LoadService, PasswordIdentityService, RegistryService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Signup and login use-cases.
    pub identity: Arc<dyn IdentityService>,
    /// Carrier and distribution-center use-cases.
    pub registries: RegistryService,
    /// Load lifecycle and outcome use-cases.
    pub loads: LoadService,
    /// KPI aggregation use-case.
    pub kpi: KpiService,
}

impl HttpState {
    /// State backed entirely by in-memory fixtures.
    ///
    /// Used by tests and database-less development runs; data does not
    /// survive a restart.
    pub fn fixtures() -> Self {
        Self::fixtures_with_mileage(Arc::new(FixtureMileageSource::default()))
    }

    /// Fixture-backed state with an explicit mileage source.
    pub fn fixtures_with_mileage(mileage: Arc<dyn MileageSource>) -> Self {
        let users = Arc::new(FixtureUserRepository::default());
        let carriers = Arc::new(FixtureCarrierRepository::default());
        let centers = Arc::new(FixtureDistributionCenterRepository::default());
        let freight = Arc::new(FixtureFreightStore::default());

        Self {
            identity: Arc::new(PasswordIdentityService::new(users)),
            registries: RegistryService::new(carriers, centers.clone()),
            loads: LoadService::new(freight.clone(), freight.clone(), centers, mileage),
            kpi: KpiService::new(freight),
        }
    }
}
