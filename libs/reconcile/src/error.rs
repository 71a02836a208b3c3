//! Error taxonomy for reconciliation.

use std::time::Duration;

use thiserror::Error;

use tidepool_id::IdError;
use tidepool_remote::ApiError;

/// A declared configuration violated one or more invariants.
///
/// Violations accumulate so a single pass reports everything that is
/// wrong, not just the first finding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid node pool configuration: {}", .violations.join("; "))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }
}

/// Errors surfaced by reconciliation operations.
///
/// Every failure carries the identity and phase it happened in. Only
/// [`Timeout`](ReconcileError::Timeout) and
/// [`Remote`](ReconcileError::Remote) are worth retrying; the rest are
/// terminal until the caller changes something.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Pre-flight or post-merge invariant failure; never retried.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    Identity(#[from] IdError),

    /// A target that was expected to exist was not found.
    #[error("{resource} was not found")]
    NotFound { resource: String },

    /// A pool with the same identity already exists remotely.
    #[error("node pool {id} already exists and must be imported to be managed")]
    AlreadyExists { id: String },

    /// The parent cluster cannot host additional scale-set pools.
    #[error("cluster {cluster} must have a scale-set backed default pool to attach node pools")]
    IncompatibleParent { cluster: String },

    /// A remote response lacked data required to continue safely.
    #[error("remote state for {id} is missing {field}")]
    MissingRemoteState { id: String, field: &'static str },

    /// The operation exceeded its time budget waiting on the remote.
    #[error("timed out waiting for {operation} of {id} after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        id: String,
        elapsed: Duration,
    },

    /// A remote call failed.
    #[error("{operation} of {id} failed: {source}")]
    Remote {
        operation: &'static str,
        id: String,
        #[source]
        source: ApiError,
    },
}

impl ReconcileError {
    /// Wraps a remote failure with the operation and identity it hit.
    pub fn remote(
        operation: &'static str,
        id: impl std::fmt::Display,
        source: ApiError,
    ) -> Self {
        ReconcileError::Remote {
            operation,
            id: id.to_string(),
            source,
        }
    }

    /// Returns true if retrying the same operation later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReconcileError::Timeout { .. } | ReconcileError::Remote { .. }
        )
    }
}
