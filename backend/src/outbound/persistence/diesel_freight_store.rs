//! PostgreSQL-backed load ledger and outcome tracker using Diesel.
//!
//! One adapter implements both freight ports because the paired writes span
//! both tables: load creation inserts the header and its all-zero outcome row
//! in one transaction, and marking delivered flips both flags in one
//! transaction. A failure anywhere inside either transaction rolls the whole
//! pair back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{FreightPersistenceError, LoadOutcomeRepository, LoadRepository};
use crate::domain::{
    CarrierId, DistributionCenterId, Load, LoadData, LoadDraft, LoadId, LoadOutcomeDraft, Miles,
    UserId,
};

use super::error_classification::{map_diesel_error, map_pool_error};
use super::models::{LoadDataRow, LoadOutcomeChangeset, LoadRow, NewLoadDataRow, NewLoadRow};
use super::pool::{DbPool, PoolError};
use super::schema::{load_data, loads};

/// Diesel-backed implementation of the load and outcome ports.
#[derive(Clone)]
pub struct DieselFreightStore {
    pool: DbPool,
}

impl DieselFreightStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> FreightPersistenceError {
    map_pool_error(error, FreightPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> FreightPersistenceError {
    map_diesel_error(
        error,
        // The freight tables carry no uniqueness the domain can collide
        // with; a unique violation here is a data bug, not a user conflict.
        || FreightPersistenceError::query("unexpected unique violation"),
        FreightPersistenceError::query,
        FreightPersistenceError::connection,
    )
}

fn map_row_error(message: String) -> FreightPersistenceError {
    FreightPersistenceError::query(message)
}

/// Error type threaded through multi-statement transactions so row-count
/// checks can abort (and roll back) with a domain-meaningful failure.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Missing(LoadId),
    OrphanedLoad(LoadId),
}

impl From<diesel::result::Error> for TxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_tx_error(error: TxError) -> FreightPersistenceError {
    match error {
        TxError::Diesel(error) => map_diesel(error),
        TxError::Missing(load_id) => FreightPersistenceError::LoadMissing { load_id },
        TxError::OrphanedLoad(load_id) => FreightPersistenceError::query(format!(
            "load {load_id} has no outcome row; pair invariant broken"
        )),
    }
}

#[async_trait]
impl LoadRepository for DieselFreightStore {
    async fn create_with_outcome(
        &self,
        owner: UserId,
        draft: &LoadDraft,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewLoadRow {
            po: draft.po(),
            name: draft.name(),
            pickup_city: draft.pickup().city(),
            pickup_state: draft.pickup().state(),
            due_date: draft.due_date(),
            day_of_week: draft.day_of_week(),
            temperature: draft.temperature(),
            team: i32::from(draft.team()),
            miles: miles.get(),
            delivered: 0,
            user_id: owner.get(),
            carrier_id: draft.carrier().get(),
            distribution_center_id: draft.distribution_center().get(),
        };

        let row = conn
            .transaction::<LoadRow, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(loads::table)
                        .values(&new_row)
                        .returning(LoadRow::as_returning())
                        .get_result::<LoadRow>(conn)
                        .await?;

                    diesel::insert_into(load_data::table)
                        .values(&NewLoadDataRow {
                            load_id: row.id,
                            user_id: row.user_id,
                        })
                        .execute(conn)
                        .await?;

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel)?;

        row.into_domain().map_err(map_row_error)
    }

    async fn list_active_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = loads::table
            .filter(loads::user_id.eq(owner.get()))
            .filter(loads::delivered.eq(0))
            .order(loads::id.asc())
            .select(LoadRow::as_select())
            .load::<LoadRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_loads(rows)
    }

    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = loads::table
            .filter(loads::user_id.eq(owner.get()))
            .filter(loads::delivered.eq(1))
            .order(loads::id.asc())
            .select(LoadRow::as_select())
            .load::<LoadRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_loads(rows)
    }

    async fn find_by_id(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<Load>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = loads::table
            .filter(loads::user_id.eq(owner.get()))
            .filter(loads::id.eq(load_id.get()))
            .select(LoadRow::as_select())
            .first::<LoadRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(|row| row.into_domain().map_err(map_row_error))
            .transpose()
    }

    async fn list_by_carrier(
        &self,
        owner: UserId,
        carrier: CarrierId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = loads::table
            .filter(loads::user_id.eq(owner.get()))
            .filter(loads::carrier_id.eq(carrier.get()))
            .order(loads::id.asc())
            .select(LoadRow::as_select())
            .load::<LoadRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_loads(rows)
    }

    async fn list_by_distribution_center(
        &self,
        owner: UserId,
        center: DistributionCenterId,
    ) -> Result<Vec<Load>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = loads::table
            .filter(loads::user_id.eq(owner.get()))
            .filter(loads::distribution_center_id.eq(center.get()))
            .order(loads::id.asc())
            .select(LoadRow::as_select())
            .load::<LoadRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows_to_loads(rows)
    }

    async fn update_pickup(
        &self,
        owner: UserId,
        load_id: LoadId,
        pickup_city: &str,
        pickup_state: &str,
        miles: Miles,
    ) -> Result<Load, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = diesel::update(
            loads::table
                .filter(loads::user_id.eq(owner.get()))
                .filter(loads::id.eq(load_id.get())),
        )
        .set((
            loads::pickup_city.eq(pickup_city),
            loads::pickup_state.eq(pickup_state),
            loads::miles.eq(miles.get()),
        ))
        .returning(LoadRow::as_returning())
        .get_result::<LoadRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel)?
        .ok_or(FreightPersistenceError::LoadMissing { load_id })?;

        row.into_domain().map_err(map_row_error)
    }

    async fn mark_delivered(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<(), FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let owner_id = owner.get();
        let id = load_id.get();

        conn.transaction::<(), TxError, _>(|conn| {
            async move {
                let headers = diesel::update(
                    loads::table
                        .filter(loads::user_id.eq(owner_id))
                        .filter(loads::id.eq(id)),
                )
                .set(loads::delivered.eq(1))
                .execute(conn)
                .await?;
                if headers == 0 {
                    return Err(TxError::Missing(load_id));
                }

                let outcomes = diesel::update(
                    load_data::table
                        .filter(load_data::user_id.eq(owner_id))
                        .filter(load_data::load_id.eq(id)),
                )
                .set(load_data::delivered.eq(1))
                .execute(conn)
                .await?;
                if outcomes == 0 {
                    return Err(TxError::OrphanedLoad(load_id));
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}

fn rows_to_loads(rows: Vec<LoadRow>) -> Result<Vec<Load>, FreightPersistenceError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(map_row_error))
        .collect()
}

#[async_trait]
impl LoadOutcomeRepository for DieselFreightStore {
    async fn record(
        &self,
        owner: UserId,
        load_id: LoadId,
        outcome: &LoadOutcomeDraft,
    ) -> Result<(), FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let changeset = LoadOutcomeChangeset {
            ontime: i32::from(outcome.ontime()),
            damaged: i32::from(outcome.damaged()),
            brokedown: i32::from(outcome.brokedown()),
            cost: outcome.cost(),
            pallets: outcome.pallets(),
            weight: outcome.weight(),
        };

        let updated = diesel::update(
            load_data::table
                .filter(load_data::user_id.eq(owner.get()))
                .filter(load_data::load_id.eq(load_id.get())),
        )
        .set(&changeset)
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        if updated == 0 {
            return Err(FreightPersistenceError::LoadMissing { load_id });
        }
        Ok(())
    }

    async fn find_by_load(
        &self,
        owner: UserId,
        load_id: LoadId,
    ) -> Result<Option<LoadData>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = load_data::table
            .filter(load_data::user_id.eq(owner.get()))
            .filter(load_data::load_id.eq(load_id.get()))
            .select(LoadDataRow::as_select())
            .first::<LoadDataRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        Ok(row.map(LoadDataRow::into_domain))
    }

    async fn list_delivered_by_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<LoadData>, FreightPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows = load_data::table
            .filter(load_data::user_id.eq(owner.get()))
            .filter(load_data::delivered.eq(1))
            .order(load_data::load_id.asc())
            .select(LoadDataRow::as_select())
            .load::<LoadDataRow>(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(rows.into_iter().map(LoadDataRow::into_domain).collect())
    }
}
