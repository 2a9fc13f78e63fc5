//! Error types for memberfind.
//!
//! Resolution results such as "not found" or "ambiguous" are not errors; they
//! are reported as [`crate::Outcome`] variants. The types here cover what can
//! actually go wrong: the directory failing, a bad configuration, or a
//! blocking wait that never completes.

use thiserror::Error;

/// Errors reported by a [`crate::gateway::DirectoryGateway`].
///
/// The resolver never translates these into outcomes and never retries them.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The directory could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    /// The caller is not allowed to read the directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The directory asked the caller to slow down.
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested wait before retrying.
        retry_after_ms: u64,
    },

    /// Any other backend failure.
    #[error("Directory backend error: {0}")]
    Backend(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("Failed to parse configuration: {message}")]
    Parse {
        message: String,
    },

    #[error("Failed to read configuration file '{path}': {message}")]
    Io {
        path: String,
        message: String,
    },
}

/// Top-level error type for memberfind.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Resolution timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },

    #[error("Resolution task ended without producing a result")]
    Disconnected,
}

impl FinderError {
    /// Returns true if this error came from the directory gateway.
    #[must_use]
    pub const fn is_gateway(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => matches!(
                e,
                GatewayError::Unavailable(_) | GatewayError::RateLimited { .. }
            ),
            Self::Config(_) => false,
            Self::Timeout { .. } => true,
            Self::Disconnected => false,
        }
    }
}

/// Result type alias for memberfind operations.
pub type FinderResult<T> = Result<T, FinderError>;
