//! Configuration errors shared by both models.

use thiserror::Error;

/// Errors raised while validating run parameters, before any step executes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid lattice dimensions: {nx}x{ny} (both must be positive)")]
    InvalidDimensions { nx: usize, ny: usize },
    #[error("Field is {actual_nx}x{actual_ny} but the configuration expects {nx}x{ny}")]
    DimensionMismatch {
        nx: usize,
        ny: usize,
        actual_nx: usize,
        actual_ny: usize,
    },
    #[error("Parameter '{name}' = {value} is out of range (expected {expected})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("Unknown stabilization mode '{0}' (expected 'add' or 'remove')")]
    UnknownMode(String),
}

impl ConfigError {
    pub(crate) fn out_of_range(name: &'static str, value: impl Into<f64>, expected: &'static str) -> Self {
        Self::OutOfRange {
            name,
            value: value.into(),
            expected,
        }
    }
}
