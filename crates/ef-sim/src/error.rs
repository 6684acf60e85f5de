//! Error types for simulation operations.

use ef_core::EfError;
use thiserror::Error;

/// Errors encountered while configuring or stepping a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Configuration rejected; the simulator keeps its prior parameters.
    #[error("Invalid parameter: {what} (value={value})")]
    InvalidParameter { what: &'static str, value: f64 },

    /// A step would leave the physical domain (temperature <= 0 K or non-finite).
    #[error("Non-physical state at step {step}: {what} (value={value})")]
    InvalidState {
        what: &'static str,
        step: usize,
        value: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<EfError> for SimError {
    fn from(e: EfError) -> Self {
        match e {
            EfError::NonFinite { what, value } | EfError::InvalidArg { what, value } => {
                SimError::InvalidParameter { what, value }
            }
            EfError::Invariant { what } => SimError::Invariant { what },
        }
    }
}
