// src/error.rs
use std::fmt;

/// Error types for path generation
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Observation times that are not a valid schedule
    InvalidSchedule { reason: String },

    /// Invalid configuration of a consumer (experiment driver, payoff model)
    InvalidConfiguration { field: String, reason: String },

    /// Numerical failure, e.g. a covariance matrix with non-finite entries
    NumericalInstability { method: String, reason: String },

    /// Operation not offered by the sampling strategy
    UnsupportedOperation { operation: String, context: String },

    /// Sequential stepping requested beyond the last observation time
    ObservationOutOfRange { index: usize, dimension: usize },
}

impl ProcessError {
    pub fn unsupported(operation: &str, context: &str) -> Self {
        ProcessError::UnsupportedOperation {
            operation: operation.to_string(),
            context: context.to_string(),
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ProcessError::UnsupportedOperation { .. })
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            ProcessError::InvalidSchedule { reason } => {
                write!(f, "Invalid observation schedule: {}", reason)
            }
            ProcessError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            ProcessError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
            ProcessError::UnsupportedOperation { operation, context } => {
                write!(
                    f,
                    "Unsupported operation '{}' in context: {}",
                    operation, context
                )
            }
            ProcessError::ObservationOutOfRange { index, dimension } => {
                write!(
                    f,
                    "Observation index {} has no next observation (schedule has {} steps)",
                    index, dimension
                )
            }
        }
    }
}

impl std::error::Error for ProcessError {}

/// Result type alias for path generation
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Validation utilities
pub mod validation {
    use super::{ProcessError, ProcessResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> ProcessResult<()> {
        if !(value > 0.0) || !value.is_finite() {
            Err(ProcessError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0) and finite".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> ProcessResult<()> {
        if !(value >= 0.0) || !value.is_finite() {
            Err(ProcessError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0) and finite".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> ProcessResult<()> {
        if !(value >= min && value <= max) {
            Err(ProcessError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a probability parameter
    pub fn validate_probability(name: &str, p: f64) -> ProcessResult<()> {
        validate_range(name, p, 0.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> ProcessResult<()> {
        if !value.is_finite() {
            Err(ProcessError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a replication count
    pub fn validate_runs(runs: usize) -> ProcessResult<()> {
        if runs == 0 {
            Err(ProcessError::InvalidConfiguration {
                field: "runs".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
