//! Error types for accessor views.

use thiserror::Error;

/// Main error type for accessor operations.
///
/// Random access is strict and reports [`Error::OutOfRange`]; bulk transfers
/// clamp to the rows that fit and never report it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unsupported encoding, normalization or layout combination
    #[error("Invalid accessor configuration: {0}")]
    Configuration(String),

    /// Attempt to store a NaN or infinite value
    #[error("Cannot encode non-finite value {value}")]
    InvalidValue { value: f32 },

    /// Structural mutation of a fixed-length or read-only view
    #[error("{operation} is not supported by {view}")]
    UnsupportedOperation {
        operation: &'static str,
        view: &'static str,
    },

    /// Element index out of bounds
    #[error("Index {index} out of bounds (count: {count})")]
    OutOfRange { index: usize, count: usize },

    /// Component index out of bounds
    #[error("Component {component} out of bounds (dimensions: {dimensions})")]
    ComponentOutOfRange { component: usize, dimensions: usize },

    /// Item has the wrong number of components
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl Error {
    /// Create a configuration error from a string.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an unsupported operation error.
    pub fn unsupported(operation: &'static str, view: &'static str) -> Self {
        Self::UnsupportedOperation { operation, view }
    }
}

/// Result type alias for accessor operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::OutOfRange { index: 5, count: 3 };
        assert!(e.to_string().contains("5"));
        assert!(e.to_string().contains("3"));

        let e = Error::unsupported("insert", "Vector3Array");
        assert_eq!(e.to_string(), "insert is not supported by Vector3Array");

        let e = Error::InvalidValue { value: f32::NAN };
        assert!(e.to_string().contains("NaN"));
    }

    #[test]
    fn test_error_config() {
        let e = Error::config("bad stride");
        assert!(matches!(e, Error::Configuration(ref m) if m == "bad stride"));
    }
}
