//! PostgreSQL-backed registry repositories using Diesel.
//!
//! The carrier and distribution-center adapters are deliberately symmetric:
//! same row shape, same uniqueness handling, different tables.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    CarrierRepository, DistributionCenterRepository, RegistryPersistenceError,
};
use crate::domain::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, RegistryDraft, UserId,
};

use super::error_classification::{map_diesel_error, map_pool_error};
use super::models::{
    CarrierRow, DistributionCenterRow, NewCarrierRow, NewDistributionCenterRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{carriers, distribution_centers};

fn map_pool(error: PoolError) -> RegistryPersistenceError {
    map_pool_error(error, RegistryPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> RegistryPersistenceError {
    map_diesel_error(
        error,
        || RegistryPersistenceError::DuplicateEntry,
        RegistryPersistenceError::query,
        RegistryPersistenceError::connection,
    )
}

fn map_row_error(message: String) -> RegistryPersistenceError {
    RegistryPersistenceError::query(message)
}

/// Diesel-backed implementation of the carrier repository port.
#[derive(Clone)]
pub struct DieselCarrierRepository {
    pool: DbPool,
}

impl DieselCarrierRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarrierRepository for DieselCarrierRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<Carrier, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewCarrierRow {
            name: draft.name(),
            address: draft.address(),
            city: draft.location().city(),
            state: draft.location().state(),
            zip: draft.zip(),
            phone: draft.phone(),
            user_id: owner.get(),
        };

        let row = diesel::insert_into(carriers::table)
            .values(&new_row)
            .returning(CarrierRow::as_returning())
            .get_result::<CarrierRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        row.into_domain().map_err(map_row_error)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Carrier>, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = carriers::table
            .filter(carriers::user_id.eq(owner.get()))
            .order(carriers::id.asc())
            .select(CarrierRow::as_select())
            .load::<CarrierRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(map_row_error))
            .collect()
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        id: CarrierId,
    ) -> Result<Option<Carrier>, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = carriers::table
            .filter(carriers::user_id.eq(owner.get()))
            .filter(carriers::id.eq(id.get()))
            .select(CarrierRow::as_select())
            .first::<CarrierRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| row.into_domain().map_err(map_row_error))
            .transpose()
    }
}

/// Diesel-backed implementation of the distribution-center repository port.
#[derive(Clone)]
pub struct DieselDistributionCenterRepository {
    pool: DbPool,
}

impl DieselDistributionCenterRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributionCenterRepository for DieselDistributionCenterRepository {
    async fn insert(
        &self,
        owner: UserId,
        draft: &RegistryDraft,
    ) -> Result<DistributionCenter, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewDistributionCenterRow {
            name: draft.name(),
            address: draft.address(),
            city: draft.location().city(),
            state: draft.location().state(),
            zip: draft.zip(),
            phone: draft.phone(),
            user_id: owner.get(),
        };

        let row = diesel::insert_into(distribution_centers::table)
            .values(&new_row)
            .returning(DistributionCenterRow::as_returning())
            .get_result::<DistributionCenterRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        row.into_domain().map_err(map_row_error)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<DistributionCenter>, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = distribution_centers::table
            .filter(distribution_centers::user_id.eq(owner.get()))
            .order(distribution_centers::id.asc())
            .select(DistributionCenterRow::as_select())
            .load::<DistributionCenterRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(map_row_error))
            .collect()
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        id: DistributionCenterId,
    ) -> Result<Option<DistributionCenter>, RegistryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = distribution_centers::table
            .filter(distribution_centers::user_id.eq(owner.get()))
            .filter(distribution_centers::id.eq(id.get()))
            .select(DistributionCenterRow::as_select())
            .first::<DistributionCenterRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| row.into_domain().map_err(map_row_error))
            .transpose()
    }
}
