//! Diesel persistence adapters for the domain ports.

mod diesel_freight_store;
mod diesel_registry_repositories;
mod diesel_user_repository;
mod error_classification;
mod models;
mod pool;
pub mod schema;

pub use diesel_freight_store::DieselFreightStore;
pub use diesel_registry_repositories::{
    DieselCarrierRepository, DieselDistributionCenterRepository,
};
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

/// Migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure applying migrations at startup.
#[derive(Debug, thiserror::Error)]
#[error("migration failure: {message}")]
pub struct MigrationError {
    /// Underlying failure description.
    pub message: String,
}

/// Apply pending migrations over a short-lived synchronous connection.
///
/// Runs before the async pool is built, so startup either observes the full
/// schema or fails loudly.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = diesel::PgConnection::establish(database_url).map_err(|err| MigrationError {
        message: format!("could not connect for migrations: {err}"),
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;

    if !applied.is_empty() {
        info!(count = applied.len(), "applied database migrations");
    }
    Ok(())
}
