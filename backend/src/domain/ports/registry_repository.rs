//! Ports for the carrier and distribution-center registries.
//!
//! The two registries share one record shape and one uniqueness policy, so
//! they share an error type; they stay separate traits because loads
//! reference them independently.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::registry::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, RegistryDraft,
};
use crate::domain::user::UserId;

/// Persistence errors raised by registry adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryPersistenceError {
    /// The (name, address) pair already exists somewhere in the system.
    #[error("a record with this name and address already exists")]
    DuplicateEntry,
    /// Repository connection could not be established.
    #[error("registry connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("registry query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl RegistryPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for carrier persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierRepository: Send + Sync {
    /// Insert a carrier scoped to `owner`; the (name, address) unique
    /// constraint surfaces as [`RegistryPersistenceError::DuplicateEntry`].
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<Carrier, RegistryPersistenceError>;

    /// All carriers owned by `owner`, ordered by id for stable display.
    async fn list_by_owner(&self, owner: UserId)
        -> Result<Vec<Carrier>, RegistryPersistenceError>;

    /// Fetch one carrier, scoped to `owner`.
    async fn find_by_id(
        &self,
        owner: UserId,
        id: CarrierId,
    ) -> Result<Option<Carrier>, RegistryPersistenceError>;
}

/// Port for distribution-center persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistributionCenterRepository: Send + Sync {
    /// Insert a distribution center scoped to `owner`; the (name, address)
    /// unique constraint surfaces as
    /// [`RegistryPersistenceError::DuplicateEntry`].
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<DistributionCenter, RegistryPersistenceError>;

    /// All distribution centers owned by `owner`, ordered by id.
    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<DistributionCenter>, RegistryPersistenceError>;

    /// Fetch one distribution center, scoped to `owner`.
    async fn find_by_id(
        &self,
        owner: UserId,
        id: DistributionCenterId,
    ) -> Result<Option<DistributionCenter>, RegistryPersistenceError>;
}

/// In-memory carrier registry for tests and database-less development runs.
#[derive(Debug, Default)]
pub struct FixtureCarrierRepository {
    records: Mutex<Vec<Carrier>>,
}

#[async_trait]
impl CarrierRepository for FixtureCarrierRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<Carrier, RegistryPersistenceError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        if records
            .iter()
            .any(|record| record.name == draft.name() && record.address == draft.address())
        {
            return Err(RegistryPersistenceError::DuplicateEntry);
        }
        let carrier = Carrier {
            id: CarrierId::new(i32::try_from(records.len()).unwrap_or(i32::MAX).saturating_add(1)),
            name: draft.name().to_owned(),
            address: draft.address().to_owned(),
            location: draft.location().clone(),
            zip: draft.zip().to_owned(),
            phone: draft.phone().to_owned(),
            owner,
        };
        records.push(carrier.clone());
        Ok(carrier)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Carrier>, RegistryPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        Ok(records
            .iter()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        id: CarrierId,
    ) -> Result<Option<Carrier>, RegistryPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        Ok(records
            .iter()
            .find(|record| record.owner == owner && record.id == id)
            .cloned())
    }
}

/// In-memory distribution-center registry for tests and database-less runs.
#[derive(Debug, Default)]
pub struct FixtureDistributionCenterRepository {
    records: Mutex<Vec<DistributionCenter>>,
}

#[async_trait]
impl DistributionCenterRepository for FixtureDistributionCenterRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<DistributionCenter, RegistryPersistenceError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        if records
            .iter()
            .any(|record| record.name == draft.name() && record.address == draft.address())
        {
            return Err(RegistryPersistenceError::DuplicateEntry);
        }
        let center = DistributionCenter {
            id: DistributionCenterId::new(i32::try_from(records.len()).unwrap_or(i32::MAX).saturating_add(1)),
            name: draft.name().to_owned(),
            address: draft.address().to_owned(),
            location: draft.location().clone(),
            zip: draft.zip().to_owned(),
            phone: draft.phone().to_owned(),
            owner,
        };
        records.push(center.clone());
        Ok(center)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<DistributionCenter>, RegistryPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        Ok(records
            .iter()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        id: DistributionCenterId,
    ) -> Result<Option<DistributionCenter>, RegistryPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| RegistryPersistenceError::query("fixture store poisoned"))?;
        Ok(records
            .iter()
            .find(|record| record.owner == owner && record.id == id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn draft(name: &str, address: &str) -> RegistryDraft {
        RegistryDraft::new(name, address, "Austin", "TX", "78701", "555-0100")
            .expect("valid draft")
    }

    #[tokio::test]
    async fn duplicate_pair_is_rejected_across_owners() {
        let repository = FixtureCarrierRepository::default();
        repository
            .insert(UserId::new(1), &draft("Acme", "12 Dock Rd"))
            .await
            .expect("first insert succeeds");

        let err = repository
            .insert(UserId::new(2), &draft("Acme", "12 Dock Rd"))
            .await
            .expect_err("same pair under another owner must fail");
        assert_eq!(err, RegistryPersistenceError::DuplicateEntry);

        repository
            .insert(UserId::new(2), &draft("Acme", "99 Port Ave"))
            .await
            .expect("unique pair succeeds");
    }

    #[tokio::test]
    async fn listing_is_scoped_to_owner() {
        let repository = FixtureDistributionCenterRepository::default();
        repository
            .insert(UserId::new(1), &draft("North DC", "1 North Rd"))
            .await
            .expect("insert succeeds");
        repository
            .insert(UserId::new(2), &draft("South DC", "2 South Rd"))
            .await
            .expect("insert succeeds");

        let mine = repository
            .list_by_owner(UserId::new(1))
            .await
            .expect("list succeeds");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "North DC");
    }
}
