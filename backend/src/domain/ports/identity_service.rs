//! Driving port for signup and login use-cases.
//!
//! Inbound adapters call this to establish identity without knowing the
//! backing infrastructure, which keeps handler tests deterministic: they can
//! substitute a test double instead of wiring persistence and hashing.

use async_trait::async_trait;

use crate::domain::auth::Credentials;
use crate::domain::error::DomainError;
use crate::domain::user::UserId;

/// Domain use-case port for identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an account and return the new user id; a taken username is a
    /// Conflict.
    async fn register(&self, credentials: &Credentials) -> Result<UserId, DomainError>;

    /// Validate credentials and return the authenticated user id.
    ///
    /// Failure is uniform: the caller cannot tell an unknown username from a
    /// wrong password.
    async fn authenticate(&self, credentials: &Credentials) -> Result<UserId, DomainError>;
}
