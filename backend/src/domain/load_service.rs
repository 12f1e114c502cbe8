//! Use-case service for the load ledger and outcome tracker.
//!
//! Owns the one orchestration rule with ordering constraints: mileage is
//! resolved through the injected source before anything is persisted, so a
//! failed lookup can never leave a load with a made-up distance.

use std::sync::Arc;

use tracing::warn;

use super::error::DomainError;
use super::loads::{Load, LoadData, LoadDraft, LoadId, LoadOutcomeDraft};
use super::location::{Location, Miles};
use super::ports::{
    DistributionCenterRepository, FreightPersistenceError, LoadOutcomeRepository, LoadRepository,
    MileageSource, MileageSourceError, RegistryPersistenceError,
};
use super::registry::{CarrierId, DistributionCenterId};
use super::user::UserId;

fn map_freight_error(error: FreightPersistenceError) -> DomainError {
    match error {
        FreightPersistenceError::LoadMissing { load_id } => {
            DomainError::not_found(format!("load {load_id} not found"))
        }
        FreightPersistenceError::Connection { message } => {
            warn!(%message, "freight store unavailable");
            DomainError::service_unavailable("storage is temporarily unavailable, try again")
        }
        FreightPersistenceError::Query { message } => DomainError::internal(message),
    }
}

fn map_center_lookup_error(error: RegistryPersistenceError) -> DomainError {
    match error {
        RegistryPersistenceError::DuplicateEntry => {
            DomainError::internal("unexpected duplicate signal from a read")
        }
        RegistryPersistenceError::Connection { message } => {
            warn!(%message, "registry unavailable");
            DomainError::service_unavailable("storage is temporarily unavailable, try again")
        }
        RegistryPersistenceError::Query { message } => DomainError::internal(message),
    }
}

fn map_mileage_error(error: MileageSourceError) -> DomainError {
    warn!(%error, "mileage lookup failed");
    DomainError::service_unavailable("mileage lookup is unavailable, try again later")
}

/// Load-lifecycle use-cases over the freight ports.
#[derive(Clone)]
pub struct LoadService {
    loads: Arc<dyn LoadRepository>,
    outcomes: Arc<dyn LoadOutcomeRepository>,
    centers: Arc<dyn DistributionCenterRepository>,
    mileage: Arc<dyn MileageSource>,
}

impl LoadService {
    /// Create a service over the given ports.
    pub fn new(
        loads: Arc<dyn LoadRepository>,
        outcomes: Arc<dyn LoadOutcomeRepository>,
        centers: Arc<dyn DistributionCenterRepository>,
        mileage: Arc<dyn MileageSource>,
    ) -> Self {
        Self {
            loads,
            outcomes,
            centers,
            mileage,
        }
    }

    async fn resolve_miles(
        &self,
        owner: UserId,
        pickup: &Location,
        center: DistributionCenterId,
    ) -> Result<Miles, DomainError> {
        let center = self
            .centers
            .find_by_id(owner, center)
            .await
            .map_err(map_center_lookup_error)?
            .ok_or_else(|| {
                DomainError::not_found(format!("distribution center {center} not found"))
            })?;

        self.mileage
            .distance(pickup, &center.location)
            .await
            .map_err(map_mileage_error)
    }

    /// Create a load and its all-zero outcome row.
    ///
    /// Mileage resolution happens first; when it fails, nothing is persisted
    /// and the caller gets a recoverable failure.
    pub async fn create_load(
        &self,
        owner: UserId,
        draft: &LoadDraft,
    ) -> Result<Load, DomainError> {
        let miles = self
            .resolve_miles(owner, draft.pickup(), draft.distribution_center())
            .await?;

        self.loads
            .create_with_outcome(owner, draft, miles)
            .await
            .map_err(map_freight_error)
    }

    /// Undelivered loads owned by `owner`.
    pub async fn list_active(&self, owner: UserId) -> Result<Vec<Load>, DomainError> {
        self.loads
            .list_active_by_owner(owner)
            .await
            .map_err(map_freight_error)
    }

    /// Delivered loads owned by `owner`.
    pub async fn list_delivered(&self, owner: UserId) -> Result<Vec<Load>, DomainError> {
        self.loads
            .list_delivered_by_owner(owner)
            .await
            .map_err(map_freight_error)
    }

    /// Fetch one load or fail with NotFound.
    pub async fn load(&self, owner: UserId, load_id: LoadId) -> Result<Load, DomainError> {
        self.loads
            .find_by_id(owner, load_id)
            .await
            .map_err(map_freight_error)?
            .ok_or_else(|| DomainError::not_found(format!("load {load_id} not found")))
    }

    /// Loads referencing the given carrier.
    pub async fn loads_for_carrier(
        &self,
        owner: UserId,
        carrier: CarrierId,
    ) -> Result<Vec<Load>, DomainError> {
        self.loads
            .list_by_carrier(owner, carrier)
            .await
            .map_err(map_freight_error)
    }

    /// Loads referencing the given distribution center.
    pub async fn loads_for_distribution_center(
        &self,
        owner: UserId,
        center: DistributionCenterId,
    ) -> Result<Vec<Load>, DomainError> {
        self.loads
            .list_by_distribution_center(owner, center)
            .await
            .map_err(map_freight_error)
    }

    /// Re-resolve mileage after a pickup-location edit and persist the new
    /// city/state/miles.
    pub async fn update_pickup_location(
        &self,
        owner: UserId,
        load_id: LoadId,
        pickup: &Location,
    ) -> Result<Load, DomainError> {
        let load = self.load(owner, load_id).await?;
        let miles = self
            .resolve_miles(owner, pickup, load.distribution_center)
            .await?;

        self.loads
            .update_pickup(owner, load_id, pickup.city(), pickup.state(), miles)
            .await
            .map_err(map_freight_error)
    }

    /// Flip the delivered flag on the load and its outcome row together.
    pub async fn mark_delivered(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<(), DomainError> {
        self.loads
            .mark_delivered(owner, load_id)
            .await
            .map_err(map_freight_error)
    }

    /// Overwrite the outcome fields of the row paired with `load_id`.
    pub async fn record_outcome(
        &self,
        owner: UserId,
        load_id: LoadId,
        outcome: &LoadOutcomeDraft,
    ) -> Result<(), DomainError> {
        self.outcomes
            .record(owner, load_id, outcome)
            .await
            .map_err(map_freight_error)
    }

    /// Fetch the outcome row paired with `load_id`, when present.
    pub async fn outcome(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<LoadData>, DomainError> {
        self.outcomes
            .find_by_load(owner, load_id)
            .await
            .map_err(map_freight_error)
    }
}
