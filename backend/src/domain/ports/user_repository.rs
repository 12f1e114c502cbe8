//! Port abstraction for user-credential persistence adapters.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::{UserId, Username};

/// Persistence errors raised by user repository adapters.
///
/// `DuplicateUsername` is a structured classification of the database's
/// unique-violation signal; adapters must never detect duplicates by
/// inspecting error message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// The username is already registered.
    #[error("username is already registered")]
    DuplicateUsername,
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl UserPersistenceError {
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

/// Stored credential material for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Owning user id.
    pub user_id: UserId,
    /// Salted one-way hash of the password.
    pub password_hash: String,
}

/// Port for creating users and looking up credential material.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; the unique constraint on `username` surfaces as
    /// [`UserPersistenceError::DuplicateUsername`].
    async fn insert(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, UserPersistenceError>;

    /// Fetch stored credentials by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}

/// In-memory repository for tests and database-less development runs.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    records: Mutex<Vec<(Username, StoredCredentials)>>,
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<UserId, UserPersistenceError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| UserPersistenceError::query("fixture store poisoned"))?;
        if records.iter().any(|(stored, _)| stored == username) {
            return Err(UserPersistenceError::DuplicateUsername);
        }
        let user_id = UserId::new(i32::try_from(records.len()).unwrap_or(i32::MAX).saturating_add(1));
        records.push((
            username.clone(),
            StoredCredentials {
                user_id,
                password_hash: password_hash.to_owned(),
            },
        ));
        Ok(user_id)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| UserPersistenceError::query("fixture store poisoned"))?;
        Ok(records
            .iter()
            .find(|(stored, _)| stored == username)
            .map(|(_, credentials)| credentials.clone()))
    }
}
