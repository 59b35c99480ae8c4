//! Sequential electron-transfer kinetics model
//!
//! # Mathematical Background
//!
//! ## Butler–Volmer rate laws
//!
//! `N` sequential one-electron transfers link `N + 1` surface species
//! `S_0 … S_N`; transfer `i` oxidises `S_i` into `S_{i+1}`:
//!
//! ```text
//! S_i  ⇌  S_{i+1} + e⁻
//! ```
//!
//! With coverages `θ_i` and the ohmic-corrected potential
//! `Er = E(t) − Ru·I`, the net rate of transfer `i` is
//!
//! ```text
//! r_i = kf_i·θ_i − kb_i·θ_{i+1}
//! kf_i = k0_i·exp((1 − α_i)·η_i)      (oxidation)
//! kb_i = k0_i·exp(−α_i·η_i)           (reduction)
//! η_i  = Er − E0_i                    (overpotential)
//! ```
//!
//! in nondimensional units (`F/(RT) = 1`). Exponent arguments are clamped
//! to ±[`EXP_CLAMP`]: uncontrolled exponentials at large overpotentials are
//! the primary source of numerical blow-up in this model.
//!
//! ## Coverage balance
//!
//! ```text
//! dθ_0/dt = −r_0
//! dθ_j/dt = r_{j−1} − r_j      0 < j < N
//! dθ_N/dt = r_{N−1}
//! ```
//!
//! The rates telescope, so `Σ θ_i` is conserved (tested invariant: the sum
//! stays 1 at every step).
//!
//! ## Total current
//!
//! The Faradaic current sums the transfers, `I_f = γ·Σ r_i`; the
//! non-Faradaic (double-layer charging) part is driven by `dE/dt` through
//! the potential-dependent capacitance
//!
//! ```text
//! Cdl_eff(Er) = Cdl·(1 + CdlE·Er + CdlE2·Er² + CdlE3·Er³)
//! ```
//!
//! and the total current obeys
//!
//! ```text
//! I = Cdl_eff·(dE/dt − Ru·dI/dt) + I_f
//! ```
//!
//! which the model exposes as the ODE
//!
//! ```text
//! dI/dt = (Cdl_eff·dE/dt + I_f − I) / (Ru·Cdl_eff)
//! ```
//!
//! The time constant `Ru·Cdl_eff` is what makes the system stiff when it is
//! small relative to the mesh spacing, the regime the implicit stepper
//! exists for.
//!
//! # State layout
//!
//! The state vector advanced by the steppers is `[θ_0, …, θ_N, I]` of
//! length `N + 2`, with the total current last.

use nalgebra::DVector;

use super::params::KineticsParams;

/// Clamp for Butler–Volmer exponent arguments.
pub const EXP_CLAMP: f64 = 300.0;

/// Floor for the effective capacitance, keeping the charging time constant
/// positive even when the potential-dependence polynomial dips.
const CDL_EFF_MIN: f64 = 1e-12;

// =================================================================================================
// Sequential Transfer Model
// =================================================================================================

/// Kinetics model for a chain of sequential one-electron transfers.
///
/// Holds validated parameters and evaluates the right-hand side of the
/// coupled coverage/current ODE system. The model is solver-agnostic: the
/// explicit stepper consumes `rhs` directly, the implicit stepper builds
/// its backward-Euler residual from it.
#[derive(Debug, Clone)]
pub struct SequentialTransfer {
    params: KineticsParams,
}

impl SequentialTransfer {
    /// Create the model from validated parameters.
    pub fn new(params: KineticsParams) -> Self {
        Self { params }
    }

    /// The parameter set this model evaluates.
    pub fn params(&self) -> &KineticsParams {
        &self.params
    }

    /// Number of chained species, `N + 1`.
    pub fn n_species(&self) -> usize {
        self.params.n_species()
    }

    /// Length of the state vector: coverages plus the total current.
    pub fn dim(&self) -> usize {
        self.n_species() + 1
    }

    /// Index of the total current within the state vector.
    pub fn current_index(&self) -> usize {
        self.n_species()
    }

    // ====== Initial conditions ======

    /// Equilibrium state at the initial applied potential.
    ///
    /// Coverages follow the Nernst ratios `θ_{i+1}/θ_i = exp(E − E0_i)`
    /// implied by the parameters (so every Faradaic rate starts at zero),
    /// normalised to sum to 1. The current starts at the pure charging
    /// value `Cdl_eff·dE/dt`.
    pub fn initial_state(&self, e: f64, dedt: f64) -> DVector<f64> {
        let ns = self.n_species();
        let mut y = DVector::zeros(self.dim());

        let mut weight = 1.0;
        let mut total = 1.0;
        y[0] = 1.0;
        for (i, couple) in self.params.couples.iter().enumerate() {
            let eta = (e - couple.e0).clamp(-EXP_CLAMP, EXP_CLAMP);
            weight *= eta.exp();
            y[i + 1] = weight;
            total += weight;
        }
        for i in 0..ns {
            y[i] /= total;
        }

        y[ns] = self.cdl_eff(e) * dedt;
        y
    }

    // ====== Evaluation ======

    /// Right-hand side of the coverage/current ODE system at the given
    /// waveform value `e = E(t)` and derivative `dedt = dE/dt(t)`.
    pub fn rhs(&self, y: &DVector<f64>, e: f64, dedt: f64) -> DVector<f64> {
        let ns = self.n_species();
        let i_tot = y[ns];
        let er = e - self.params.ru * i_tot;

        let mut dy = DVector::zeros(self.dim());
        let mut i_f = 0.0;
        for (i, couple) in self.params.couples.iter().enumerate() {
            let eta = er - couple.e0;
            let kf = couple.k0 * ((1.0 - couple.alpha) * eta).clamp(-EXP_CLAMP, EXP_CLAMP).exp();
            let kb = couple.k0 * (-couple.alpha * eta).clamp(-EXP_CLAMP, EXP_CLAMP).exp();
            let rate = kf * y[i] - kb * y[i + 1];
            dy[i] -= rate;
            dy[i + 1] += rate;
            i_f += rate;
        }
        i_f *= self.params.gamma;

        let cdl_eff = self.cdl_eff(er);
        dy[ns] = (cdl_eff * dedt + i_f - i_tot) / (self.params.ru * cdl_eff);
        dy
    }

    /// Effective double-layer capacitance at the ohmic-corrected potential.
    fn cdl_eff(&self, er: f64) -> f64 {
        let p = &self.params;
        let poly = 1.0 + p.cdl_e * er + p.cdl_e2 * er * er + p.cdl_e3 * er * er * er;
        (p.cdl * poly).max(CDL_EFF_MIN)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
