//! volt-rs: Voltammetry Forward-Model Engine
//!
//! Simulates the total current response of surface-confined sequential
//! electron transfers under a swept (optionally sinusoidally perturbed)
//! applied potential, including uncompensated resistance and double-layer
//! charging.
//!
//! # Architecture
//!
//! volt-rs is built on two core principles:
//!
//! 1. **Separation of physics and numerics**
//!    - The kinetics model defines the equations (what to solve)
//!    - The time steppers provide the methods (how to solve)
//!
//! 2. **Eager validation and loud failure**
//!    - Every parameter is checked at entry, before the time loop
//!    - Numerical breakdown surfaces as an inspectable error carrying the
//!      offending step and state, never a silently clamped trace
//!
//! # Quick Start
//!
//! ```rust
//! use volt_rs::prelude::*;
//!
//! # fn main() -> Result<(), SimulationError> {
//! // 1. Describe the experiment through named parameters
//! let mut map = ParameterMap::new();
//! map.set("Estart", -0.5)
//!     .set("Ereverse", 0.5)
//!     .set("omega", 0.0)
//!     .set("phase", 0.0)
//!     .set("dE", 0.0)
//!     .set("Ru", 1.0)
//!     .set("Cdl", 1e-2)
//!     .set("CdlE", 0.0)
//!     .set("CdlE2", 0.0)
//!     .set("CdlE3", 0.0)
//!     .set("gamma", 1.0)
//!     .set("N", 1.0)
//!     .set("k01", 1.0)
//!     .set("alpha1", 0.5)
//!     .set("E01", 0.0)
//!     .set("Tfinal", 2.0)
//!     .set("Nt", 501.0);
//!
//! // 2. Pre-size the output buffers to Nt points
//! let mut current = vec![0.0; 501];
//! let mut times = vec![0.0; 501];
//!
//! // 3. Run the simulation
//! simulate_explicit(&map, &mut current, &mut times)?;
//!
//! assert_eq!(times[500], 2.0);
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks behind the map-driven entry points are public too:
//! construct a [`waveform::Waveform`], a [`mesh::MeshSpec`] and a
//! [`kinetics::SequentialTransfer`] directly and run them through any
//! [`solver::Stepper`].
//!
//! # Modules
//!
//! - [`waveform`]: applied-potential waveform (analytic sweep or tabulated)
//! - [`mesh`]: uniform and exponentially graded time grids
//! - [`kinetics`]: Butler–Volmer sequential-transfer kinetics
//! - [`solver`]: forward-Euler and backward-Euler time steppers
//! - [`output`]: trace assembly into caller-provided buffers
//! - [`config`]: named-parameter boundary and top-level entry points
//! - [`error`]: the failure taxonomy

pub mod config;
pub mod error;
pub mod kinetics;
pub mod mesh;
pub mod output;
pub mod solver;
pub mod waveform;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use volt_rs::prelude::*;
    //! ```
    pub use crate::config::{
        simulate_explicit, simulate_implicit, ParameterMap, PotentialTable, SimulationConfig,
    };
    pub use crate::error::SimulationError;
    pub use crate::kinetics::{KineticsParams, RedoxCouple, SequentialTransfer};
    pub use crate::mesh::{MeshGrading, MeshSpec, TimeMesh};
    pub use crate::output::write_series;
    pub use crate::solver::{ExplicitStepper, ImplicitStepper, Stepper, StepperTrace};
    pub use crate::waveform::Waveform;
}
