//! Use-case service for the carrier and distribution-center registries.

use std::sync::Arc;

use tracing::warn;

use super::error::DomainError;
use super::ports::{
    CarrierRepository, DistributionCenterRepository, RegistryPersistenceError,
};
use super::registry::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, RegistryDraft,
};
use super::user::UserId;

/// Surfaced when the (name, address) pair collides with an existing record,
/// typically one registered by another user.
const DUPLICATE_MESSAGE: &str = "already added by another user";

fn map_registry_error(error: RegistryPersistenceError) -> DomainError {
    match error {
        RegistryPersistenceError::DuplicateEntry => DomainError::conflict(DUPLICATE_MESSAGE),
        RegistryPersistenceError::Connection { message } => {
            warn!(%message, "registry unavailable");
            DomainError::service_unavailable("storage is temporarily unavailable, try again")
        }
        RegistryPersistenceError::Query { message } => DomainError::internal(message),
    }
}

/// Registry use-cases over the two repository ports.
#[derive(Clone)]
pub struct RegistryService {
    carriers: Arc<dyn CarrierRepository>,
    centers: Arc<dyn DistributionCenterRepository>,
}

impl RegistryService {
    /// Create a service over the given repositories.
    pub fn new(
        carriers: Arc<dyn CarrierRepository>,
        centers: Arc<dyn DistributionCenterRepository>,
    ) -> Self {
        Self { carriers, centers }
    }

    /// Register a carrier for `owner`.
    pub async fn create_carrier(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<Carrier, DomainError> {
        self.carriers
            .insert(owner, draft)
            .await
            .map_err(map_registry_error)
    }

    /// All carriers owned by `owner`.
    pub async fn list_carriers(&self, owner: UserId) -> Result<Vec<Carrier>, DomainError> {
        self.carriers
            .list_by_owner(owner)
            .await
            .map_err(map_registry_error)
    }

    /// Fetch one carrier or fail with NotFound.
    pub async fn carrier(&self, owner: UserId, id: CarrierId) -> Result<Carrier, DomainError> {
        self.carriers
            .find_by_id(owner, id)
            .await
            .map_err(map_registry_error)?
            .ok_or_else(|| DomainError::not_found(format!("carrier {id} not found")))
    }

    /// Register a distribution center for `owner`.
    pub async fn create_distribution_center(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<DistributionCenter, DomainError> {
        self.centers
            .insert(owner, draft)
            .await
            .map_err(map_registry_error)
    }

    /// All distribution centers owned by `owner`.
    pub async fn list_distribution_centers(
        &self,
        owner: UserId,
    ) -> Result<Vec<DistributionCenter>, DomainError> {
        self.centers
            .list_by_owner(owner)
            .await
            .map_err(map_registry_error)
    }

    /// Fetch one distribution center or fail with NotFound.
    pub async fn distribution_center(
        &self,
        owner: UserId,
        id: DistributionCenterId,
    ) -> Result<DistributionCenter, DomainError> {
        self.centers
            .find_by_id(owner, id)
            .await
            .map_err(map_registry_error)?
            .ok_or_else(|| DomainError::not_found(format!("distribution center {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{
        FixtureCarrierRepository, FixtureDistributionCenterRepository, MockCarrierRepository,
    };
    use rstest::rstest;

    fn fixture_service() -> RegistryService {
        RegistryService::new(
            Arc::new(FixtureCarrierRepository::default()),
            Arc::new(FixtureDistributionCenterRepository::default()),
        )
    }

    fn draft(name: &str, address: &str) -> RegistryDraft {
        RegistryDraft::new(name, address, "Austin", "TX", "78701", "555-0100")
            .expect("valid draft")
    }

    #[tokio::test]
    async fn duplicate_center_reports_the_domain_message() {
        let service = fixture_service();
        service
            .create_distribution_center(UserId::new(1), &draft("North DC", "1 North Rd"))
            .await
            .expect("first create succeeds");

        let err = service
            .create_distribution_center(UserId::new(2), &draft("North DC", "1 North Rd"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), DUPLICATE_MESSAGE);

        service
            .create_distribution_center(UserId::new(2), &draft("South DC", "2 South Rd"))
            .await
            .expect("unique pair succeeds");
    }

    #[rstest]
    #[case(
        RegistryPersistenceError::connection("refused"),
        ErrorCode::ServiceUnavailable
    )]
    #[case(RegistryPersistenceError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn non_duplicate_failures_stay_generic(
        #[case] failure: RegistryPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut carriers = MockCarrierRepository::new();
        let returned = failure.clone();
        carriers
            .expect_insert()
            .returning(move |_, _| Err(returned.clone()));
        let service = RegistryService::new(
            Arc::new(carriers),
            Arc::new(FixtureDistributionCenterRepository::default()),
        );

        let err = service
            .create_carrier(UserId::new(1), &draft("Acme", "12 Dock Rd"))
            .await
            .expect_err("failure must surface");
        assert_eq!(err.code(), expected);
        assert_ne!(err.message(), DUPLICATE_MESSAGE);
    }

    #[tokio::test]
    async fn missing_carrier_is_not_found() {
        let service = fixture_service();
        let err = service
            .carrier(UserId::new(1), CarrierId::new(42))
            .await
            .expect_err("missing carrier must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
