//! Port for the third-party mileage (directions) lookup.

use async_trait::async_trait;

use crate::domain::location::{Location, Miles};

/// Failures raised by mileage source adapters.
///
/// Lookup failures are recoverable by design: a load is never persisted with
/// a mileage the source did not vouch for, and the caller reports a retryable
/// failure instead of crashing the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MileageSourceError {
    /// The request exceeded the configured deadline.
    #[error("mileage lookup timed out: {message}")]
    Timeout {
        /// Transport-level failure description.
        message: String,
    },
    /// Network-level failure or unexpected HTTP status.
    #[error("mileage lookup transport failure: {message}")]
    Transport {
        /// Transport-level failure description.
        message: String,
    },
    /// The API rejected the configured credentials.
    #[error("mileage lookup rejected credentials: {message}")]
    Denied {
        /// Transport-level failure description.
        message: String,
    },
    /// The response decoded to something unusable.
    #[error("mileage lookup returned unusable data: {message}")]
    Decode {
        /// Decoder-level failure description.
        message: String,
    },
}

impl MileageSourceError {
    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a credentials-rejected error with the given message.
    pub fn denied(message: impl Into<String>) -> Self {
        Self::Denied {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port for resolving ground distance between two city/state pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MileageSource: Send + Sync {
    /// Distance in whole miles from `origin` to `destination`.
    async fn distance(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Miles, MileageSourceError>;
}

/// Fixed-distance source for tests and database-less development runs.
#[derive(Debug, Clone, Copy)]
pub struct FixtureMileageSource {
    miles: Miles,
}

impl FixtureMileageSource {
    /// Source that reports the given distance for every route.
    pub const fn returning(miles: Miles) -> Self {
        Self { miles }
    }
}

impl Default for FixtureMileageSource {
    fn default() -> Self {
        Self::returning(Miles::ZERO)
    }
}

#[async_trait]
impl MileageSource for FixtureMileageSource {
    async fn distance(
        &self,
        _origin: &Location,
        _destination: &Location,
    ) -> Result<Miles, MileageSourceError> {
        Ok(self.miles)
    }
}
