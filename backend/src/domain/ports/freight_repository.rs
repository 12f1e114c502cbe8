//! Ports for the load ledger and its paired outcome tracker.
//!
//! Both traits operate on the same load/outcome row pair, so they share an
//! error type and (in tests) a fixture store. Adapters must keep the paired
//! writes atomic: creation inserts both rows in one transaction, and marking
//! delivered flips both flags in one transaction.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::loads::{Load, LoadData, LoadDraft, LoadId, LoadOutcomeDraft};
use crate::domain::location::Miles;
use crate::domain::registry::{CarrierId, DistributionCenterId};
use crate::domain::user::UserId;

/// Persistence errors raised by load and outcome adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FreightPersistenceError {
    /// The referenced load does not exist under the given owner.
    #[error("load {load_id} not found")]
    LoadMissing {
        /// The id that failed to resolve.
        load_id: LoadId,
    },
    /// Repository connection could not be established.
    #[error("freight store connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("freight store query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl FreightPersistenceError {
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

/// Port for load-header persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadRepository: Send + Sync {
    /// Insert the load and its all-zero outcome row as one transaction.
    async fn create_with_outcome(
        &self,
        owner: UserId,
        draft: &LoadDraft,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError>;

    /// Undelivered loads owned by `owner`, ordered by id.
    async fn list_active_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError>;

    /// Delivered loads owned by `owner`, ordered by id.
    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError>;

    /// Fetch one load, scoped to `owner`.
    async fn find_by_id(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<Load>, FreightPersistenceError>;

    /// Loads referencing the given carrier, scoped to `owner`.
    async fn list_by_carrier(
        &self,
        owner: UserId,
        carrier: CarrierId,
    ) -> Result<Vec<Load>, FreightPersistenceError>;

    /// Loads referencing the given distribution center, scoped to `owner`.
    async fn list_by_distribution_center(
        &self,
        owner: UserId,
        center: DistributionCenterId,
    ) -> Result<Vec<Load>, FreightPersistenceError>;

    /// Persist a re-resolved pickup location and mileage.
    async fn update_pickup(
        &self,
        owner: UserId,
        load_id: LoadId,
        pickup_city: &str,
        pickup_state: &str,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError>;

    /// Set `delivered = 1` on the load and its outcome row in one
    /// transaction; on failure neither flag changes.
    async fn mark_delivered(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<(), FreightPersistenceError>;
}

/// Port for delivery-outcome persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadOutcomeRepository: Send + Sync {
    /// Overwrite the mutable outcome fields of the row paired with
    /// `load_id`. The row always pre-exists; this is a pure update.
    async fn record(
        &self,
        owner: UserId,
        load_id: LoadId,
        outcome: &LoadOutcomeDraft,
    ) -> Result<(), FreightPersistenceError>;

    /// Fetch the outcome row paired with `load_id`, scoped to `owner`.
    async fn find_by_load(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<LoadData>, FreightPersistenceError>;

    /// Outcome rows for `owner` where `delivered = 1`; the KPI input set.
    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<LoadData>, FreightPersistenceError>;
}

#[derive(Debug, Default)]
struct FixtureFreightState {
    loads: Vec<Load>,
    outcomes: Vec<LoadData>,
}

/// In-memory load/outcome store for tests and database-less development runs.
///
/// Implements both freight ports over one mutex-guarded state so the paired
/// mutations behave atomically, mirroring the transactional adapters.
#[derive(Debug, Default)]
pub struct FixtureFreightStore {
    state: Mutex<FixtureFreightState>,
}

impl FixtureFreightStore {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, FixtureFreightState>, FreightPersistenceError> {
        self.state
            .lock()
            .map_err(|_| FreightPersistenceError::query("fixture store poisoned"))
    }
}

#[async_trait]
impl LoadRepository for FixtureFreightStore {
    async fn create_with_outcome(
        &self,
        owner: UserId,
        draft: &LoadDraft,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError> {
        let mut state = self.lock()?;
        let id = LoadId::new(i32::try_from(state.loads.len()).unwrap_or(i32::MAX).saturating_add(1));
        let load = Load {
            id,
            po: draft.po().to_owned(),
            name: draft.name().to_owned(),
            pickup: draft.pickup().clone(),
            due_date: draft.due_date(),
            day_of_week: draft.day_of_week().map(str::to_owned),
            temperature: draft.temperature(),
            team: draft.team(),
            miles,
            delivered: false,
            owner,
            carrier: draft.carrier(),
            distribution_center: draft.distribution_center(),
        };
        state.loads.push(load.clone());
        state.outcomes.push(LoadData {
            load_id: id,
            owner,
            ontime: false,
            damaged: false,
            brokedown: false,
            cost: 0,
            pallets: 0,
            weight: 0,
            delivered: false,
        });
        Ok(load)
    }

    async fn list_active_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .loads
            .iter()
            .filter(|load| load.owner == owner && !load.delivered)
            .cloned()
            .collect())
    }

    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .loads
            .iter()
            .filter(|load| load.owner == owner && load.delivered)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<Load>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .loads
            .iter()
            .find(|load| load.owner == owner && load.id == load_id)
            .cloned())
    }

    async fn list_by_carrier(
        &self,
        owner: UserId,
        carrier: CarrierId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .loads
            .iter()
            .filter(|load| load.owner == owner && load.carrier == carrier)
            .cloned()
            .collect())
    }

    async fn list_by_distribution_center(
        &self,
        owner: UserId,
        center: DistributionCenterId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .loads
            .iter()
            .filter(|load| load.owner == owner && load.distribution_center == center)
            .cloned()
            .collect())
    }

    async fn update_pickup(
        &self,
        owner: UserId,
        load_id: LoadId,
        pickup_city: &str,
        pickup_state: &str,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError> {
        use crate::domain::location::Location;

        let mut state = self.lock()?;
        let load = state
            .loads
            .iter_mut()
            .find(|load| load.owner == owner && load.id == load_id)
            .ok_or(FreightPersistenceError::LoadMissing { load_id })?;
        load.pickup = Location::new(pickup_city, pickup_state)
            .map_err(|err| FreightPersistenceError::query(err.to_string()))?;
        load.miles = miles;
        Ok(load.clone())
    }

    async fn mark_delivered(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<(), FreightPersistenceError> {
        let mut state = self.lock()?;
        let Some(load) = state
            .loads
            .iter_mut()
            .find(|load| load.owner == owner && load.id == load_id)
        else {
            return Err(FreightPersistenceError::LoadMissing { load_id });
        };
        load.delivered = true;
        let Some(outcome) = state
            .outcomes
            .iter_mut()
            .find(|outcome| outcome.owner == owner && outcome.load_id == load_id)
        else {
            return Err(FreightPersistenceError::query("outcome row missing"));
        };
        outcome.delivered = true;
        Ok(())
    }
}

#[async_trait]
impl LoadOutcomeRepository for FixtureFreightStore {
    async fn record(
        &self,
        owner: UserId,
        load_id: LoadId,
        outcome: &LoadOutcomeDraft,
    ) -> Result<(), FreightPersistenceError> {
        let mut state = self.lock()?;
        let row = state
            .outcomes
            .iter_mut()
            .find(|row| row.owner == owner && row.load_id == load_id)
            .ok_or(FreightPersistenceError::LoadMissing { load_id })?;
        row.ontime = outcome.ontime();
        row.damaged = outcome.damaged();
        row.brokedown = outcome.brokedown();
        row.cost = outcome.cost();
        row.pallets = outcome.pallets();
        row.weight = outcome.weight();
        Ok(())
    }

    async fn find_by_load(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<LoadData>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .outcomes
            .iter()
            .find(|row| row.owner == owner && row.load_id == load_id)
            .copied())
    }

    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<LoadData>, FreightPersistenceError> {
        let state = self.lock()?;
        Ok(state
            .outcomes
            .iter()
            .filter(|row| row.owner == owner && row.delivered)
            .copied()
            .collect())
    }
}
