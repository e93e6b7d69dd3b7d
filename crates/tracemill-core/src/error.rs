//! Error handling for TraceMill
//!
//! Provides the error types shared across the workspace:
//! - Parameter errors (configuration / programming errors upstream)
//! - Geometry errors (boolean or offset failures)
//! - Fingerprint errors (cache key serialization)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Parameter error type
///
/// Signals a configuration or programming error upstream, never a data error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// No default machining parameters exist for this task kind
    #[error("Unknown task kind: {0}")]
    UnknownTaskKind(String),

    /// A parameter value is invalid
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A parameter value is out of the valid range
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        /// The parameter name.
        name: String,
        /// The offending value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl ParameterError {
    /// Shorthand for [`ParameterError::InvalidValue`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for TraceMill core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Parameter error
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Geometry error
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Serialization error while computing a fingerprint
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from any message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Create a geometry error from any message
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry(message.into())
    }
}

/// Result type for TraceMill core operations
pub type Result<T> = std::result::Result<T, Error>;
