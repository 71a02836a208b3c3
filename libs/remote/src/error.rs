//! Error types for the remote control-plane surface.

use thiserror::Error;

/// Errors produced by remote control-plane calls.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// The requested resource does not exist remotely.
    #[error("{resource} was not found")]
    NotFound { resource: String },

    /// The transport failed before a usable response was produced.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote accepted the call but the operation itself failed.
    #[error("remote operation failed: {code}: {message}")]
    Operation { code: String, message: String },
}

impl ApiError {
    /// Shorthand for a [`ApiError::NotFound`] on the given resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    /// Returns true if the error means the target resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
