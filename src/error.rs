//! Simulation error taxonomy
//!
//! Every failure the engine can produce is one of four kinds, surfaced as a
//! distinct, inspectable variant. Nothing is retried internally except the
//! implicit solver's inner Newton loop, which retries locally up to its
//! configured iteration budget before escalating to [`SimulationError::Instability`].
//!
//! A failed call never leaves a partially overwritten output buffer: the
//! steppers assemble their trace internally and the output assembler copies
//! it only after the whole run has succeeded.

use std::fmt;

// =================================================================================================
// Error Type
// =================================================================================================

/// Errors from the voltammetry forward model.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Required parameter missing or outside its validity domain.
    ///
    /// Raised eagerly at call entry, before any stepping begins.
    Configuration {
        /// What was missing or invalid, naming the offending key.
        message: String,
    },

    /// Waveform evaluated outside the valid tabulated-sample range.
    ///
    /// Extrapolation is never performed silently.
    Domain {
        /// Requested evaluation time.
        t: f64,
        /// Last valid time of the tabulated signal.
        t_max: f64,
    },

    /// Numerical instability: an explicit-step coverage left the physical
    /// range, or the implicit iteration failed to converge within its budget.
    Instability {
        /// Mesh index of the offending step.
        step: usize,
        /// Cause, human readable.
        detail: String,
        /// State vector at the point of failure (coverages then current),
        /// for caller-side diagnosis.
        state: Vec<f64>,
    },

    /// Output buffer length disagrees with the mesh length.
    BufferMismatch {
        /// Mesh length the engine was going to write.
        expected: usize,
        /// Length of the buffer the caller supplied.
        actual: usize,
    },
}

impl SimulationError {
    /// Configuration failure for a key the caller did not supply.
    pub fn missing_key(key: &str) -> Self {
        Self::Configuration {
            message: format!("missing required parameter '{}'", key),
        }
    }

    /// Configuration failure for a supplied value outside its domain.
    pub fn invalid_value(key: &str, detail: &str) -> Self {
        Self::Configuration {
            message: format!("parameter '{}' {}", key, detail),
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => {
                write!(f, "configuration error: {}", message)
            }
            Self::Domain { t, t_max } => {
                write!(
                    f,
                    "waveform evaluated at t = {} outside tabulated domain [0, {}]",
                    t, t_max
                )
            }
            Self::Instability { step, detail, .. } => {
                write!(f, "numerical instability at step {}: {}", step, detail)
            }
            Self::BufferMismatch { expected, actual } => {
                write!(
                    f,
                    "output buffer length {} does not match mesh length {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for SimulationError {}

// =================================================================================================
// Tests
// =================================================================================================
