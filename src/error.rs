//! Error types for the hypervec library.
//!
//! The computation engine itself treats bad arguments as programmer error and
//! checks them with `debug_assert!` (see the crate-level safety notes); this
//! module covers the genuinely fallible surfaces (constructing a hypervector
//! from untrusted words, and file persistence) using the `thiserror` crate.

use thiserror::Error;

/// The main error type for hypervec operations.
#[derive(Error, Debug)]
pub enum HypervecError {
    /// Dimension is zero or not a multiple of the word size
    #[error("Invalid dimension {0}: must be a positive multiple of 64")]
    InvalidDimension(usize),

    /// Two hypervectors (or a stored one) disagree on dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension encountered
        actual: usize,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error occurred
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// A specialized `Result` type for hypervec operations.
pub type Result<T> = std::result::Result<T, HypervecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HypervecError::InvalidDimension(100);
        assert_eq!(
            err.to_string(),
            "Invalid dimension 100: must be a positive multiple of 64"
        );

        let err = HypervecError::DimensionMismatch {
            expected: 8192,
            actual: 1024,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 8192, got 1024");
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
