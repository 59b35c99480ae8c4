//! Time-stepping integrators
//!
//! The steppers advance the coupled coverage/current system produced by
//! [`crate::kinetics::SequentialTransfer`] along a [`crate::mesh::TimeMesh`],
//! querying the [`crate::waveform::Waveform`] at each grid point.
//!
//! Two methods are provided, mirroring the explicit/implicit split of the
//! physical problem:
//!
//! - [`ExplicitStepper`]: forward Euler on a uniform mesh. One kinetics
//!   evaluation per step; fails loudly (never clamps) when a coverage
//!   leaves the physical range, the expected outcome in stiff regimes.
//! - [`ImplicitStepper`]: backward Euler on the exponential mesh, with a
//!   bounded Newton iteration per step. Stable where the explicit scheme
//!   is not.
//!
//! Both run to completion synchronously, own their state exclusively for
//! the duration of one call, and assemble the trace internally so a failed
//! call never leaves partial output behind.

mod explicit;
mod implicit;

pub use explicit::ExplicitStepper;
pub use implicit::ImplicitStepper;

use nalgebra::DVector;

use crate::error::SimulationError;
use crate::kinetics::SequentialTransfer;
use crate::mesh::TimeMesh;
use crate::waveform::Waveform;

// =================================================================================================
// Stepper Trait
// =================================================================================================

/// A time-stepping method for the coverage/current system.
///
/// The stepper provides the numerics (HOW to integrate); the kinetics model
/// provides the equations (WHAT to integrate). The same model and mesh can
/// be run through different steppers.
pub trait Stepper {
    /// Integrate over the whole mesh, returning the assembled trace.
    fn run(
        &self,
        model: &SequentialTransfer,
        waveform: &Waveform,
        mesh: &TimeMesh,
    ) -> Result<StepperTrace, SimulationError>;

    /// Name of the method (used in diagnostics).
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Stepper Trace
// =================================================================================================

/// Result of one integration: per-mesh-point times and total current, plus
/// the final state for inspection.
#[derive(Debug, Clone)]
pub struct StepperTrace {
    /// Time at each mesh point.
    pub times: Vec<f64>,
    /// Total current at each mesh point.
    pub current: Vec<f64>,
    /// State vector at the final mesh point (coverages then current).
    pub final_state: DVector<f64>,
}

impl StepperTrace {
    /// Number of recorded points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// =================================================================================================
// Helpers
// =================================================================================================

/// Reject non-finite state components.
///
/// NaN arises from undefined operations, Inf from overflow; both indicate
/// the integration has broken down and must surface as an instability with
/// the offending step attached.
pub(crate) fn validate_state(y: &DVector<f64>, step: usize) -> Result<(), SimulationError> {
    if y.iter().any(|v| !v.is_finite()) {
        return Err(SimulationError::Instability {
            step,
            detail: "state contains NaN or Inf".to_string(),
            state: y.iter().copied().collect(),
        });
    }
    Ok(())
}
