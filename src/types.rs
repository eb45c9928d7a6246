//! Types specific to bempp-hydro

use cauchy::{c32, c64};
use serde::{Deserialize, Serialize};

/// Largest number of rows or columns that [crate::assembly::init_matrices] will allocate.
pub const MAX_MATRIX_DIMENSION: usize = 1_000_000;

/// Generic error type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The inputs do not have the expected kind (mesh vs. point array).
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    /// A point array or a matrix has an invalid shape.
    #[error("Dimension error: {0}")]
    Dimension(String),
    /// The physical parameters are not supported by the method.
    #[error("Domain constraint violated: {0}")]
    DomainConstraint(String),
    /// Interpolation was requested before the tabulation was populated.
    #[error("Tabulation cache is not valid")]
    CacheInvalid,
    /// Interpolation was requested outside of the tabulated grid.
    #[error("Point (r={r}, z={z}) outside tabulation range")]
    OutOfRange {
        /// Horizontal coordinate
        r: f64,
        /// Vertical coordinate
        z: f64,
    },
    /// Reading or writing a tabulation failed.
    #[error("Tabulation I/O error: {0}")]
    Io(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Precision used to store kernel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingPointPrecision {
    /// Single precision
    Float32,
    /// Double precision
    #[default]
    Float64,
}

impl FloatingPointPrecision {
    /// Name used in settings and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            FloatingPointPrecision::Float32 => "float32",
            FloatingPointPrecision::Float64 => "float64",
        }
    }

    /// Round a value to this precision.
    ///
    /// Matrices are always stored as `c64`; single precision values are rounded through `c32`.
    #[inline]
    pub fn round(&self, value: c64) -> c64 {
        match self {
            FloatingPointPrecision::Float32 => {
                let v = c32::new(value.re as f32, value.im as f32);
                c64::new(v.re as f64, v.im as f64)
            }
            FloatingPointPrecision::Float64 => value,
        }
    }
}

impl std::fmt::Display for FloatingPointPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = Error::DomainConstraint("test error message".to_string());
        assert_eq!(e.to_string(), "Domain constraint violated: test error message");
        assert_eq!(Error::CacheInvalid.to_string(), "Tabulation cache is not valid");
    }

    #[test]
    fn test_precision_rounding() {
        let x = c64::new(1.0 / 3.0, -2.0 / 3.0);
        assert_eq!(FloatingPointPrecision::Float64.round(x), x);
        let y = FloatingPointPrecision::Float32.round(x);
        assert!(y != x);
        assert!((y - x).norm() < 1e-7);
        assert_eq!(FloatingPointPrecision::default(), FloatingPointPrecision::Float64);
    }
}
