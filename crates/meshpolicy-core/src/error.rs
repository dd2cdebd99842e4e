//! Shared error type across meshpolicy crates.

use thiserror::Error;

use crate::policy::RouteConflict;

/// Stable error codes (surfaced in logs, metrics labels, and HTTP bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Same route match registered with two different backend sets.
    RouteConflict,
    /// Canonical content hash could not be computed.
    HashFailure,
    /// Invalid controller configuration.
    InvalidConfig,
    /// A discovery source failed to produce a batch.
    DiscoveryFailed,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in metrics labels and JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::RouteConflict => "ROUTE_CONFLICT",
            ErrorCode::HashFailure => "HASH_FAILURE",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::DiscoveryFailed => "DISCOVERY_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MeshPolicyError>;

/// Unified error type used by core and controller.
#[derive(Debug, Error)]
pub enum MeshPolicyError {
    #[error("route conflict: {0}")]
    RouteConflict(RouteConflict),
    #[error("content hash failed: {0}")]
    Hash(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("discovery source {source_name} failed: {reason}")]
    Discovery { source_name: String, reason: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl MeshPolicyError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshPolicyError::RouteConflict(_) => ErrorCode::RouteConflict,
            MeshPolicyError::Hash(_) => ErrorCode::HashFailure,
            MeshPolicyError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            MeshPolicyError::Discovery { .. } => ErrorCode::DiscoveryFailed,
            MeshPolicyError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<RouteConflict> for MeshPolicyError {
    fn from(conflict: RouteConflict) -> Self {
        MeshPolicyError::RouteConflict(conflict)
    }
}
