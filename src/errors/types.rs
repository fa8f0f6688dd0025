//! Error type definitions for the sysdash application
//!
//! Every failure is isolated to the tick or request that produced it: a
//! sampling failure skips one tick, a persistence failure is logged without
//! blocking delivery, a delivery failure cancels only its own session, and a
//! query failure surfaces as an error response to the caller. There are no
//! retries and no cross-session effects.

use thiserror::Error;

/// Top-level application error type
///
/// Used at the bootstrap seams where any of the domain errors may surface.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Host metrics query failures
    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// Durable log failures
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Viewer push failures
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// On-demand query path failures
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Host metrics query failed.
///
/// Always retryable on the next tick; never fatal to the process. The
/// session loop logs it and skips the tick, the on-demand path maps it to an
/// error response.
#[derive(Error, Debug)]
pub enum SamplingError {
    /// The host enumerated no storage volumes to sample
    #[error("Primary volume unavailable: no storage volumes enumerated")]
    PrimaryVolumeUnavailable,

    /// The host query returned unusable data
    #[error("Host query failed: {message}")]
    HostQuery { message: String },
}

/// Durable write or read of the sample log failed.
///
/// Surfaces to the caller that issued it and must not propagate past the
/// session-loop tick that triggered the append.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database-level failures
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store rejected the operation
    #[error("Store failed: {message}")]
    StoreFailed { message: String },
}

/// Push to a closed or broken viewer connection.
///
/// Triggers immediate cancellation of the session task that observed it.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The viewer connection is gone
    #[error("Connection closed")]
    ConnectionClosed,

    /// The push itself failed
    #[error("Send failed: {message}")]
    SendFailed { message: String },
}

/// On-demand HTTP path failure, surfaced as a `500` response.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The shared sampler failed to produce a sample
    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    /// The sample log could not be read
    #[error("Log store failed: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SamplingError {
    /// Create a host query error
    pub fn host_query<S: Into<String>>(message: S) -> Self {
        Self::HostQuery {
            message: message.into(),
        }
    }
}

impl PersistenceError {
    /// Create a store failure error
    pub fn store_failed<S: Into<String>>(message: S) -> Self {
        Self::StoreFailed {
            message: message.into(),
        }
    }
}

impl DeliveryError {
    /// Create a send failure error
    pub fn send_failed<S: Into<String>>(message: S) -> Self {
        Self::SendFailed {
            message: message.into(),
        }
    }
}
