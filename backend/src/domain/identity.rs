//! Password-backed identity service.
//!
//! Registration hashes with bcrypt before anything reaches the repository;
//! authentication verifies against the stored hash. Login failure is uniform:
//! a missing user burns a bcrypt verification against a fixed dummy hash so
//! the caller observes the same outcome and comparable timing either way.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::auth::Credentials;
use super::error::DomainError;
use super::ports::{IdentityService, UserPersistenceError, UserRepository};
use super::user::UserId;

/// bcrypt hash consumed when the username does not resolve.
const DUMMY_HASH: &str = "$2b$12$2kV1jcuzAbSXJffRGPl9m.T7nLjjoQFjVTIQvYbQNnShG0SZFtRMK";

const LOGIN_FAILED: &str = "invalid username or password";

/// Canonical [`IdentityService`] implementation over a user repository.
#[derive(Clone)]
pub struct PasswordIdentityService {
    users: Arc<dyn UserRepository>,
    cost: u32,
}

impl PasswordIdentityService {
    /// Create a service with the default bcrypt work factor.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self::with_cost(users, bcrypt::DEFAULT_COST)
    }

    /// Create a service with an explicit bcrypt work factor.
    ///
    /// Tests use a low factor to stay fast; production keeps the default.
    pub fn with_cost(users: Arc<dyn UserRepository>, cost: u32) -> Self {
        Self { users, cost }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> DomainError {
    match error {
        UserPersistenceError::DuplicateUsername => {
            DomainError::conflict("username is already taken")
        }
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user repository unavailable");
            DomainError::service_unavailable("storage is temporarily unavailable, try again")
        }
        UserPersistenceError::Query { message } => DomainError::internal(message),
    }
}

#[async_trait]
impl IdentityService for PasswordIdentityService {
    async fn register(&self, credentials: &Credentials) -> Result<UserId, DomainError> {
        let password_hash = bcrypt::hash(credentials.password(), self.cost)
            .map_err(|err| DomainError::internal(format!("password hashing failed: {err}")))?;

        self.users
            .insert(credentials.username(), &password_hash)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<UserId, DomainError> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;

        match stored {
            Some(stored) => {
                let matched = bcrypt::verify(credentials.password(), &stored.password_hash)
                    .unwrap_or_else(|err| {
                        warn!(%err, "stored password hash failed to verify");
                        false
                    });
                if matched {
                    Ok(stored.user_id)
                } else {
                    Err(DomainError::unauthorized(LOGIN_FAILED))
                }
            }
            None => {
                // Burn a verification so unknown users cost the same as
                // known users with a wrong password.
                let _ = bcrypt::verify(credentials.password(), DUMMY_HASH);
                Err(DomainError::unauthorized(LOGIN_FAILED))
            }
        }
    }
}
