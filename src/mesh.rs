//! Time-mesh builder
//!
//! # Mathematical Background
//!
//! The steppers evaluate the coupled coverage/current equations on a fixed
//! grid of time points. Two grading policies are supported:
//!
//! - **Uniform**: `t_n = n·dt` with `dt = T/(points − 1)`. Times are
//!   computed directly from the index, never accumulated, so the final
//!   point is exactly `T` without floating-point drift.
//!
//! - **Exponential**: step sizes start small and grow by a fixed ratio
//!   each step until a cap is reached, then stay uniform:
//!
//!   ```text
//!   w_i = min(ratio^i, cap),   t_n = T · Σ_{i<n} w_i / Σ_i w_i
//!   ```
//!
//!   This concentrates resolution where the potential-driven transients
//!   are sharpest (near the sweep start) while bounding the total step
//!   count for long sweeps. The cumulative weights are rescaled so the
//!   last point lands exactly on `T`, never overshooting.
//!
//! Both policies guarantee a strictly increasing sequence starting at 0
//! and ending exactly at the configured duration.

use crate::error::SimulationError;

// =================================================================================================
// Mesh Specification
// =================================================================================================

/// Grading policy for the time mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshGrading {
    /// Constant spacing.
    Uniform,
    /// Step size grows by `ratio` each step until `cap` times the initial
    /// step, then stays uniform.
    Exponential {
        /// Per-step growth ratio (> 1).
        ratio: f64,
        /// Maximum step size as a multiple of the initial step (≥ 1).
        cap: f64,
    },
}

/// Specification of the simulation time grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSpec {
    /// Total simulation duration.
    pub duration: f64,
    /// Number of time points (≥ 2); the mesh has `points − 1` steps.
    pub points: usize,
    /// Grading policy.
    pub grading: MeshGrading,
}

impl MeshSpec {
    /// Uniform mesh over `[0, duration]`.
    pub fn uniform(duration: f64, points: usize) -> Self {
        Self {
            duration,
            points,
            grading: MeshGrading::Uniform,
        }
    }

    /// Exponentially graded mesh over `[0, duration]`.
    pub fn exponential(duration: f64, points: usize, ratio: f64, cap: f64) -> Self {
        Self {
            duration,
            points,
            grading: MeshGrading::Exponential { ratio, cap },
        }
    }

    /// Validate the specification before building.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.duration > 0.0) {
            return Err(SimulationError::invalid_value("Tfinal", "must be positive"));
        }
        if self.points < 2 {
            return Err(SimulationError::invalid_value(
                "Nt",
                "needs at least two mesh points",
            ));
        }
        if let MeshGrading::Exponential { ratio, cap } = self.grading {
            if !(ratio > 1.0) {
                return Err(SimulationError::invalid_value(
                    "mesh_ratio",
                    "must be greater than 1",
                ));
            }
            if !(cap >= 1.0) {
                return Err(SimulationError::invalid_value(
                    "mesh_cap",
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }

    /// Build the mesh.
    pub fn build(&self) -> Result<TimeMesh, SimulationError> {
        self.validate()?;
        let n = self.points;
        let mut times = Vec::with_capacity(n);

        match self.grading {
            MeshGrading::Uniform => {
                let dt = self.duration / (n - 1) as f64;
                for i in 0..n {
                    times.push(i as f64 * dt);
                }
            }
            MeshGrading::Exponential { ratio, cap } => {
                // Cumulative weights; the growth is applied incrementally so
                // ratio^i never overflows for long meshes.
                let mut weight = 1.0;
                let mut cum = 0.0;
                times.push(0.0);
                for _ in 1..n {
                    cum += weight;
                    times.push(cum);
                    weight = (weight * ratio).min(cap);
                }
                let scale = self.duration / cum;
                for t in times.iter_mut() {
                    *t *= scale;
                }
            }
        }

        // Land exactly on the configured end time.
        times[n - 1] = self.duration;
        Ok(TimeMesh { times })
    }
}

// =================================================================================================
// Time Mesh
// =================================================================================================

/// A built, strictly increasing time grid starting at 0.
#[derive(Debug, Clone)]
pub struct TimeMesh {
    times: Vec<f64>,
}

impl TimeMesh {
    /// All time points.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the mesh holds no points (never produced by `build`).
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time at mesh index `n`.
    pub fn at(&self, n: usize) -> f64 {
        self.times[n]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
