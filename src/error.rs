//! Error types for cultivar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for cultivar operations.
///
/// Covers model-lifecycle failures (prediction before initialization,
/// artifact persistence) and the numeric failure modes of fitting
/// (dimension mismatches, degenerate systems).
///
/// # Examples
///
/// ```
/// use cultivar::error::CultivarError;
///
/// let err = CultivarError::ModelNotReady {
///     operation: "predict".to_string(),
/// };
/// assert!(err.to_string().contains("Model not ready"));
/// ```
#[derive(Debug)]
pub enum CultivarError {
    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Prediction requested before a trained model store exists.
    ModelNotReady {
        /// Operation that was attempted
        operation: String,
    },

    /// I/O error (artifact file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Artifact serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CultivarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CultivarError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            CultivarError::ModelNotReady { operation } => {
                write!(
                    f,
                    "Model not ready: {operation} requested before initialization"
                )
            }
            CultivarError::Io(e) => write!(f, "I/O error: {e}"),
            CultivarError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            CultivarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CultivarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CultivarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CultivarError {
    fn from(err: std::io::Error) -> Self {
        CultivarError::Io(err)
    }
}

impl From<&str> for CultivarError {
    fn from(msg: &str) -> Self {
        CultivarError::Other(msg.to_string())
    }
}

impl From<String> for CultivarError {
    fn from(msg: String) -> Self {
        CultivarError::Other(msg)
    }
}

impl CultivarError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create a model-not-ready error for the named operation
    #[must_use]
    pub fn model_not_ready(operation: &str) -> Self {
        Self::ModelNotReady {
            operation: operation.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CultivarError>;
