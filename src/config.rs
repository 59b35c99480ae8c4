//! Named-parameter boundary
//!
//! The engine is driven through a flat map of named scalar parameters plus
//! an optional tabulated potential, mirroring how a dynamic calling layer
//! hands configuration across an FFI boundary. [`SimulationConfig`] turns
//! the map into validated, strongly-typed pieces (waveform, mesh
//! specification, kinetics) in one eager pass, so every missing or
//! out-of-domain key fails at entry with a [`SimulationError::Configuration`]
//! naming the key, never deep inside the time loop.
//!
//! Two top-level entry points run a whole simulation into caller-provided,
//! pre-sized buffers:
//!
//! - [`simulate_explicit`]: forward Euler on a uniform mesh.
//! - [`simulate_implicit`]: backward Euler on an exponentially graded mesh
//!   (requires the additional `mesh_ratio` / `mesh_cap` keys).
//!
//! Buffer lengths are checked against `Nt` before any stepping starts; a
//! mismatch writes nothing.

use std::collections::HashMap;

use crate::error::SimulationError;
use crate::kinetics::{KineticsParams, RedoxCouple, SequentialTransfer};
use crate::mesh::MeshSpec;
use crate::output::write_series;
use crate::solver::{ExplicitStepper, ImplicitStepper, Stepper};
use crate::waveform::Waveform;

// =================================================================================================
// Parameter Map
// =================================================================================================

/// Uniformly spaced DC potential samples supplied alongside the scalar map.
///
/// When present, the waveform is the tabulated variant and the `Estart` /
/// `Ereverse` keys are not consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialTable {
    /// Ordered DC samples.
    pub samples: Vec<f64>,
    /// Uniform sample spacing.
    pub dt_data: f64,
}

/// Flat named-parameter configuration.
///
/// Scalar keys (all required unless noted):
///
/// | key | meaning |
/// |-----|---------|
/// | `Estart`, `Ereverse` | sweep endpoints (ignored with a potential table) |
/// | `omega`, `phase`, `dE` | sinusoidal perturbation (`omega ≥ 0`, `dE ≥ 0`) |
/// | `Ru`, `Cdl` | uncompensated resistance, double-layer capacitance (> 0) |
/// | `CdlE`, `CdlE2`, `CdlE3` | capacitance potential-dependence coefficients |
/// | `gamma` | surface-coverage scale on the Faradaic current |
/// | `N` | number of sequential transfers (integer ≥ 1) |
/// | `k0{i}`, `E0{i}`, `alpha{i}` | per-couple kinetics, `i = 1..=N` |
/// | `Tfinal`, `Nt` | mesh duration (> 0) and point count (≥ 2) |
/// | `mesh_ratio`, `mesh_cap` | exponential grading (implicit stepper only) |
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    scalars: HashMap<String, f64>,
    potential_table: Option<PotentialTable>,
}

impl ParameterMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scalar parameter, replacing any previous value.
    pub fn set(&mut self, key: &str, value: f64) -> &mut Self {
        self.scalars.insert(key.to_string(), value);
        self
    }

    /// Attach a tabulated DC potential, switching the waveform variant.
    pub fn set_potential_table(&mut self, samples: Vec<f64>, dt_data: f64) -> &mut Self {
        self.potential_table = Some(PotentialTable { samples, dt_data });
        self
    }

    /// Look up a scalar parameter.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.scalars.get(key).copied()
    }

    /// The attached potential table, if any.
    pub fn potential_table(&self) -> Option<&PotentialTable> {
        self.potential_table.as_ref()
    }

    fn require(&self, key: &str) -> Result<f64, SimulationError> {
        self.get(key).ok_or_else(|| SimulationError::missing_key(key))
    }
}

// =================================================================================================
// Validated Configuration
// =================================================================================================

/// Validated, strongly-typed simulation configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Applied-potential waveform.
    pub waveform: Waveform,
    /// Time-grid specification.
    pub mesh: MeshSpec,
    /// Kinetics and cell parameters.
    pub kinetics: KineticsParams,
}

impl SimulationConfig {
    /// Configuration for the explicit stepper (uniform mesh).
    pub fn for_explicit(map: &ParameterMap) -> Result<Self, SimulationError> {
        let (duration, points) = Self::read_mesh_extent(map)?;
        Self::assemble(map, MeshSpec::uniform(duration, points))
    }

    /// Configuration for the implicit stepper (exponential mesh).
    ///
    /// Additionally requires `mesh_ratio` and `mesh_cap`.
    pub fn for_implicit(map: &ParameterMap) -> Result<Self, SimulationError> {
        let (duration, points) = Self::read_mesh_extent(map)?;
        let ratio = map.require("mesh_ratio")?;
        let cap = map.require("mesh_cap")?;
        Self::assemble(map, MeshSpec::exponential(duration, points, ratio, cap))
    }

    /// Number of mesh points the simulation will produce.
    pub fn points(&self) -> usize {
        self.mesh.points
    }

    fn read_mesh_extent(map: &ParameterMap) -> Result<(f64, usize), SimulationError> {
        let duration = map.require("Tfinal")?;
        let nt = map.require("Nt")?;
        if !(nt >= 2.0) || nt.fract() != 0.0 {
            return Err(SimulationError::invalid_value(
                "Nt",
                "must be an integer of at least 2",
            ));
        }
        Ok((duration, nt as usize))
    }

    fn assemble(map: &ParameterMap, mesh: MeshSpec) -> Result<Self, SimulationError> {
        mesh.validate()?;
        let waveform = Self::read_waveform(map, mesh)?;
        let kinetics = Self::read_kinetics(map)?;
        Ok(Self {
            waveform,
            mesh,
            kinetics,
        })
    }

    fn read_waveform(map: &ParameterMap, mesh: MeshSpec) -> Result<Waveform, SimulationError> {
        let de = map.require("dE")?;
        let omega = map.require("omega")?;
        let phase = map.require("phase")?;
        if !(de >= 0.0) {
            return Err(SimulationError::invalid_value("dE", "must be non-negative"));
        }
        if !(omega >= 0.0) {
            return Err(SimulationError::invalid_value(
                "omega",
                "must be non-negative",
            ));
        }
        let dt = mesh.duration / (mesh.points - 1) as f64;

        match map.potential_table() {
            Some(table) => {
                Waveform::tabulated(table.samples.clone(), table.dt_data, de, omega, phase, dt)
            }
            None => {
                let estart = map.require("Estart")?;
                let ereverse = map.require("Ereverse")?;
                Ok(Waveform::sweep(estart, ereverse, de, omega, phase, dt))
            }
        }
    }

    fn read_kinetics(map: &ParameterMap) -> Result<KineticsParams, SimulationError> {
        let n_raw = map.require("N")?;
        if !(n_raw >= 1.0) || n_raw.fract() != 0.0 {
            return Err(SimulationError::invalid_value(
                "N",
                "must be an integer of at least 1",
            ));
        }
        let n = n_raw as usize;

        // Per-couple keys are 1-based: k01, E01, alpha1, ...
        let mut couples = Vec::with_capacity(n);
        for i in 1..=n {
            let k0 = map.require(&format!("k0{}", i))?;
            let alpha = map.require(&format!("alpha{}", i))?;
            let e0 = map.require(&format!("E0{}", i))?;
            couples.push(RedoxCouple::new(k0, alpha, e0));
        }

        let params = KineticsParams {
            couples,
            ru: map.require("Ru")?,
            cdl: map.require("Cdl")?,
            cdl_e: map.require("CdlE")?,
            cdl_e2: map.require("CdlE2")?,
            cdl_e3: map.require("CdlE3")?,
            gamma: map.require("gamma")?,
        };
        params.validate()?;
        Ok(params)
    }
}

// =================================================================================================
// Entry Points
// =================================================================================================

/// Run the forward-Euler simulation described by `map`, writing the total
/// current and the time grid into the caller's pre-sized buffers.
///
/// Both buffers must hold exactly `Nt` elements; the check happens before
/// any stepping, and a failed call writes nothing.
pub fn simulate_explicit(
    map: &ParameterMap,
    current_out: &mut [f64],
    times_out: &mut [f64],
) -> Result<(), SimulationError> {
    let config = SimulationConfig::for_explicit(map)?;
    run_into(&config, &ExplicitStepper::new(), current_out, times_out)
}

/// Run the backward-Euler simulation described by `map`, writing the total
/// current and the time grid into the caller's pre-sized buffers.
///
/// Same buffer contract as [`simulate_explicit`]; additionally requires the
/// `mesh_ratio` and `mesh_cap` keys.
pub fn simulate_implicit(
    map: &ParameterMap,
    current_out: &mut [f64],
    times_out: &mut [f64],
) -> Result<(), SimulationError> {
    let config = SimulationConfig::for_implicit(map)?;
    run_into(&config, &ImplicitStepper::new(), current_out, times_out)
}

fn run_into(
    config: &SimulationConfig,
    stepper: &dyn Stepper,
    current_out: &mut [f64],
    times_out: &mut [f64],
) -> Result<(), SimulationError> {
    // Reject bad buffers before doing any work.
    let expected = config.points();
    for actual in [current_out.len(), times_out.len()] {
        if actual != expected {
            return Err(SimulationError::BufferMismatch { expected, actual });
        }
    }

    let mesh = config.mesh.build()?;
    let model = SequentialTransfer::new(config.kinetics.clone());
    let trace = stepper.run(&model, &config.waveform, &mesh)?;
    write_series(&trace, current_out, times_out)
}

// =================================================================================================
// Tests
// =================================================================================================
