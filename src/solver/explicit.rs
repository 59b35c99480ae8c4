//! Explicit (forward Euler) stepper
//!
//! # Mathematical Background
//!
//! The simplest explicit update for the coverage/current system
//! `dy/dt = f(y, t)`:
//!
//! ```text
//! y_{n+1} = y_n + h_n · f(y_n, t_n)
//! ```
//!
//! One kinetics evaluation per step, O(h) global error, conditionally
//! stable: the step size must resolve both the Butler–Volmer rates and the
//! charging time constant `Ru·Cdl_eff`. When it does not, coverages leave
//! the physical range `[0, 1]`; this is surfaced as an instability with
//! the offending step and state attached, never silently clamped. It is
//! the signal that explicit stepping is inappropriate for the given mesh
//! spacing and kinetics.

use nalgebra::DVector;

use crate::error::SimulationError;
use crate::kinetics::SequentialTransfer;
use crate::mesh::TimeMesh;
use crate::solver::{validate_state, Stepper, StepperTrace};
use crate::waveform::Waveform;

// =================================================================================================
// Explicit Stepper
// =================================================================================================

/// Forward Euler time stepper.
///
/// Intended for the uniform mesh in non-stiff regimes, or when approximate
/// fast trajectories suffice. Stateless across runs; one instance can be
/// reused for any number of simulations.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitStepper {
    /// Tolerance by which a coverage may exceed `[0, 1]` before the step
    /// is declared unstable.
    coverage_tol: f64,
}

impl ExplicitStepper {
    /// Stepper with the default coverage tolerance (1e-6).
    pub fn new() -> Self {
        Self {
            coverage_tol: 1e-6,
        }
    }

    /// Stepper with a caller-chosen coverage tolerance.
    pub fn with_coverage_tol(coverage_tol: f64) -> Self {
        Self { coverage_tol }
    }

    /// Check that every coverage stays within the physical range.
    fn check_coverages(
        &self,
        y: &DVector<f64>,
        n_species: usize,
        step: usize,
    ) -> Result<(), SimulationError> {
        for i in 0..n_species {
            if y[i] < -self.coverage_tol || y[i] > 1.0 + self.coverage_tol {
                return Err(SimulationError::Instability {
                    step,
                    detail: format!(
                        "coverage θ_{} = {} left [0, 1]; explicit stepping is \
                         unstable for this step size and kinetics",
                        i, y[i]
                    ),
                    state: y.iter().copied().collect(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ExplicitStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper for ExplicitStepper {
    fn run(
        &self,
        model: &SequentialTransfer,
        waveform: &Waveform,
        mesh: &TimeMesh,
    ) -> Result<StepperTrace, SimulationError> {
        let n_points = mesh.len();
        let ci = model.current_index();

        // Equilibrium start at t = 0.
        let t0 = mesh.at(0);
        let mut y = model.initial_state(waveform.e(t0)?, waveform.ddt(t0)?);

        let mut times = Vec::with_capacity(n_points);
        let mut current = Vec::with_capacity(n_points);
        times.push(t0);
        current.push(y[ci]);

        for n in 0..n_points - 1 {
            let t = mesh.at(n);
            let h = mesh.at(n + 1) - t;

            let dy = model.rhs(&y, waveform.e(t)?, waveform.ddt(t)?);
            y += dy * h;

            validate_state(&y, n + 1)?;
            self.check_coverages(&y, model.n_species(), n + 1)?;

            times.push(mesh.at(n + 1));
            current.push(y[ci]);
        }

        Ok(StepperTrace {
            times,
            current,
            final_state: y,
        })
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
