//! Applied-potential waveform generator
//!
//! # Mathematical Background
//!
//! The applied potential is a DC sweep with a sinusoidal perturbation on top:
//!
//! ```text
//! E(t) = Edc(t) + dE·sin(ω·t + φ)
//! ```
//!
//! Two DC variants exist, dispatched exhaustively through one sum type:
//!
//! - **Analytic sweep**: a linear ramp at unit scan rate (nondimensional
//!   units) from `Estart` towards `Ereverse`, reversing at
//!   `treverse = |Estart − Ereverse|`:
//!
//!   ```text
//!   Edc(t) = Estart + direction·t                 for t < treverse
//!   Edc(t) = Ereverse − direction·(t − treverse)  for t ≥ treverse
//!   ```
//!
//!   `E(t)` is continuous at `t = treverse`; `dEdc/dt` flips sign exactly
//!   once, there. When `Estart == Ereverse` the direction is 0 and the DC
//!   term is constant (zero sweep rate).
//!
//! - **Tabulated sweep**: uniformly spaced DC samples, linearly
//!   interpolated. Evaluation outside `[0, t_max]` is a domain error, never
//!   a silent extrapolation. Interpolation is exact at the knots.
//!
//! The derivative `dE/dt` adds `ω·dE·cos(ω·t + φ)` to the piecewise-constant
//! (or finite-difference) DC slope; the second derivative only has the
//! perturbation term `−ω²·dE·sin(ω·t + φ)`, the DC ramp contributing zero.

use crate::error::SimulationError;

// =================================================================================================
// Waveform (sum type over the two DC variants)
// =================================================================================================

/// Applied-potential waveform: DC sweep plus sinusoidal perturbation.
///
/// Exactly one DC variant is active per instance. All fields except the
/// perturbation phase are fixed for the lifetime of the waveform; the phase
/// may be updated in place via [`Waveform::set_phase`] when resynchronising
/// repeated calls.
#[derive(Debug, Clone)]
pub enum Waveform {
    /// Linear ramp `Estart → Ereverse → back`, unit scan rate.
    Sweep {
        /// Sweep start potential.
        estart: f64,
        /// Sweep reversal potential.
        ereverse: f64,
        /// Perturbation amplitude.
        de: f64,
        /// Perturbation angular frequency.
        omega: f64,
        /// Perturbation phase (mutable after construction).
        phase: f64,
        /// Nominal sample spacing for index-based evaluation.
        dt: f64,
        /// Time of sweep direction reversal, `|Estart − Ereverse|`.
        treverse: f64,
        /// +1 up-sweep, −1 down-sweep, 0 when `Estart == Ereverse`.
        direction: f64,
    },
    /// Uniformly sampled DC potential, linearly interpolated.
    Tabulated {
        /// Ordered DC samples.
        samples: Vec<f64>,
        /// Uniform sample spacing.
        dt_data: f64,
        /// Perturbation amplitude.
        de: f64,
        /// Perturbation angular frequency.
        omega: f64,
        /// Perturbation phase (mutable after construction).
        phase: f64,
        /// Nominal sample spacing for index-based evaluation.
        dt: f64,
    },
}

impl Waveform {
    /// Create an analytic sweep waveform.
    pub fn sweep(estart: f64, ereverse: f64, de: f64, omega: f64, phase: f64, dt: f64) -> Self {
        // signum(0.0) is +1 in Rust, so spell the zero case out: a sweep
        // with equal endpoints has no ramp at all.
        let direction = if ereverse > estart {
            1.0
        } else if ereverse < estart {
            -1.0
        } else {
            0.0
        };
        Self::Sweep {
            estart,
            ereverse,
            de,
            omega,
            phase,
            dt,
            treverse: (estart - ereverse).abs(),
            direction,
        }
    }

    /// Create a tabulated waveform from uniformly spaced DC samples.
    ///
    /// Fails with a configuration error when fewer than two samples are
    /// given or the spacing is not positive.
    pub fn tabulated(
        samples: Vec<f64>,
        dt_data: f64,
        de: f64,
        omega: f64,
        phase: f64,
        dt: f64,
    ) -> Result<Self, SimulationError> {
        if samples.len() < 2 {
            return Err(SimulationError::invalid_value(
                "Edata",
                "needs at least two samples",
            ));
        }
        if dt_data <= 0.0 {
            return Err(SimulationError::invalid_value(
                "dt_data",
                "must be positive",
            ));
        }
        Ok(Self::Tabulated {
            samples,
            dt_data,
            de,
            omega,
            phase,
            dt,
        })
    }

    // ====== Evaluation ======

    /// Full potential `E(t)`: DC term plus perturbation.
    pub fn e(&self, t: f64) -> Result<f64, SimulationError> {
        Ok(self.dc(t)? + self.de() * (self.omega() * t + self.phase()).sin())
    }

    /// Potential at mesh index `n`, with implicit `t = n·dt`.
    pub fn at_index(&self, n: usize) -> Result<f64, SimulationError> {
        self.e(n as f64 * self.dt())
    }

    /// DC term alone, `Edc(t)`: the baseline sweep value without the
    /// perturbation.
    pub fn dc(&self, t: f64) -> Result<f64, SimulationError> {
        match self {
            Self::Sweep {
                estart,
                ereverse,
                treverse,
                direction,
                ..
            } => {
                if t < *treverse {
                    Ok(estart + direction * t)
                } else {
                    Ok(ereverse - direction * (t - treverse))
                }
            }
            Self::Tabulated {
                samples, dt_data, ..
            } => {
                let (i0, i1, frac) = Self::knot_indices(samples, *dt_data, t)?;
                // (1 − frac)·y0 + frac·y1 is exact at both knots.
                Ok((1.0 - frac) * samples[i0] + frac * samples[i1])
            }
        }
    }

    /// First derivative `dE/dt(t)`: piecewise-constant DC slope plus
    /// `ω·dE·cos(ω·t + φ)`.
    pub fn ddt(&self, t: f64) -> Result<f64, SimulationError> {
        let dc_slope = match self {
            Self::Sweep {
                treverse,
                direction,
                ..
            } => {
                if t > *treverse {
                    -direction
                } else {
                    *direction
                }
            }
            Self::Tabulated {
                samples, dt_data, ..
            } => {
                let (i0, i1, _) = Self::knot_indices(samples, *dt_data, t)?;
                (samples[i1] - samples[i0]) / dt_data
            }
        };
        Ok(dc_slope + self.omega() * self.de() * (self.omega() * t + self.phase()).cos())
    }

    /// Second derivative `d²E/dt²(t)`.
    ///
    /// Only the perturbation contributes; the DC ramp is piecewise linear.
    pub fn ddt2(&self, t: f64) -> f64 {
        -self.omega().powi(2) * self.de() * (self.omega() * t + self.phase()).sin()
    }

    // ====== Mutation ======

    /// Update the perturbation phase in place.
    pub fn set_phase(&mut self, new_phase: f64) {
        match self {
            Self::Sweep { phase, .. } | Self::Tabulated { phase, .. } => *phase = new_phase,
        }
    }

    // ====== Accessors ======

    /// Perturbation amplitude.
    pub fn de(&self) -> f64 {
        match self {
            Self::Sweep { de, .. } | Self::Tabulated { de, .. } => *de,
        }
    }

    /// Perturbation angular frequency.
    pub fn omega(&self) -> f64 {
        match self {
            Self::Sweep { omega, .. } | Self::Tabulated { omega, .. } => *omega,
        }
    }

    /// Perturbation phase.
    pub fn phase(&self) -> f64 {
        match self {
            Self::Sweep { phase, .. } | Self::Tabulated { phase, .. } => *phase,
        }
    }

    /// Nominal sample spacing used by [`Waveform::at_index`].
    pub fn dt(&self) -> f64 {
        match self {
            Self::Sweep { dt, .. } | Self::Tabulated { dt, .. } => *dt,
        }
    }

    /// Time of sweep reversal (analytic variant) or the end of the
    /// tabulated domain.
    pub fn treverse(&self) -> f64 {
        match self {
            Self::Sweep { treverse, .. } => *treverse,
            Self::Tabulated {
                samples, dt_data, ..
            } => (samples.len() - 1) as f64 * dt_data,
        }
    }

    // ====== Internals ======

    /// Map `t` onto the bracketing sample indices and the fractional
    /// position inside that interval.
    ///
    /// `t` exactly at the last sample is in-domain (the final interval is
    /// used with `frac == 1`); anything past it is rejected.
    fn knot_indices(
        samples: &[f64],
        dt_data: f64,
        t: f64,
    ) -> Result<(usize, usize, f64), SimulationError> {
        let last = samples.len() - 1;
        let t_max = last as f64 * dt_data;
        if t < 0.0 || t > t_max {
            return Err(SimulationError::Domain { t, t_max });
        }
        let x = t / dt_data;
        let i0 = (x.floor() as usize).min(last - 1);
        Ok((i0, i0 + 1, x - i0 as f64))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn up_sweep() -> Waveform {
        Waveform::sweep(-0.5, 0.5, 0.0, 0.0, 0.0, 0.01)
    }

    // ====== Analytic sweep ======

    #[test]
    fn sweep_ramps_up_then_back() {
        let w = up_sweep();
        assert!((w.dc(0.0).unwrap() - -0.5).abs() < 1e-14);
        assert!((w.dc(0.5).unwrap() - 0.0).abs() < 1e-14);
        // Reversal at treverse = 1.0, then back down.
        assert!((w.dc(1.0).unwrap() - 0.5).abs() < 1e-14);
        assert!((w.dc(1.5).unwrap() - 0.0).abs() < 1e-14);
        assert!((w.dc(2.0).unwrap() - -0.5).abs() < 1e-14);
    }

    #[test]
    fn sweep_is_continuous_at_reversal() {
        let w = up_sweep();
        let eps = 1e-9;
        let before = w.e(1.0 - eps).unwrap();
        let at = w.e(1.0).unwrap();
        let after = w.e(1.0 + eps).unwrap();
        assert!((at - before).abs() < 1e-8);
        assert!((at - after).abs() < 1e-8);
    }

    #[test]
    fn sweep_slope_flips_sign_once_at_reversal() {
        let w = up_sweep();
        assert_eq!(w.ddt(0.3).unwrap(), 1.0);
        assert_eq!(w.ddt(0.999).unwrap(), 1.0);
        assert_eq!(w.ddt(1.001).unwrap(), -1.0);
        assert_eq!(w.ddt(1.9).unwrap(), -1.0);
    }

    #[test]
    fn downward_sweep_has_negative_direction() {
        let w = Waveform::sweep(0.5, -0.5, 0.0, 0.0, 0.0, 0.01);
        assert_eq!(w.ddt(0.1).unwrap(), -1.0);
        assert!((w.dc(0.4).unwrap() - 0.1).abs() < 1e-14);
    }

    #[test]
    fn equal_endpoints_mean_zero_sweep_rate() {
        let w = Waveform::sweep(0.2, 0.2, 0.0, 0.0, 0.0, 0.01);
        for &t in &[0.0, 0.5, 3.0, 10.0] {
            assert_eq!(w.dc(t).unwrap(), 0.2);
            assert_eq!(w.ddt(t).unwrap(), 0.0);
        }
    }

    #[test]
    fn perturbation_adds_to_dc_and_derivatives() {
        let (de, omega, phase) = (0.08, 9.0, 0.3);
        let w = Waveform::sweep(-0.5, 0.5, de, omega, phase, 0.01);
        let t = 0.37;
        let expected = w.dc(t).unwrap() + de * (omega * t + phase).sin();
        assert!((w.e(t).unwrap() - expected).abs() < 1e-14);

        let expected_ddt = 1.0 + omega * de * (omega * t + phase).cos();
        assert!((w.ddt(t).unwrap() - expected_ddt).abs() < 1e-14);

        let expected_ddt2 = -omega * omega * de * (omega * t + phase).sin();
        assert!((w.ddt2(t) - expected_ddt2).abs() < 1e-14);
    }

    #[test]
    fn at_index_matches_continuous_evaluation() {
        let w = Waveform::sweep(-0.5, 0.5, 0.05, 4.0, 0.0, 0.02);
        for n in [0usize, 1, 17, 50] {
            let t = n as f64 * 0.02;
            assert_eq!(w.at_index(n).unwrap(), w.e(t).unwrap());
        }
    }

    #[test]
    fn set_phase_updates_in_place() {
        let mut w = Waveform::sweep(-0.5, 0.5, 0.1, 5.0, 0.0, 0.01);
        let before = w.e(0.2).unwrap();
        w.set_phase(1.0);
        assert_eq!(w.phase(), 1.0);
        assert!((w.e(0.2).unwrap() - before).abs() > 1e-6);
    }

    // ====== Tabulated sweep ======

    fn table() -> Waveform {
        Waveform::tabulated(vec![0.0, 0.1, 0.4, 0.2], 0.5, 0.0, 0.0, 0.0, 0.01).unwrap()
    }

    #[test]
    fn tabulated_is_exact_at_every_knot() {
        let w = table();
        let samples = [0.0, 0.1, 0.4, 0.2];
        for (i, &y) in samples.iter().enumerate() {
            // No interpolation error at knots: strict equality.
            assert_eq!(w.dc(i as f64 * 0.5).unwrap(), y);
        }
    }

    #[test]
    fn tabulated_interpolates_linearly_between_knots() {
        let w = table();
        // Midpoint of [0.1, 0.4].
        assert!((w.dc(0.75).unwrap() - 0.25).abs() < 1e-14);
        // Quarter point of [0.0, 0.1].
        assert!((w.dc(0.125).unwrap() - 0.025).abs() < 1e-14);
    }

    #[test]
    fn tabulated_slope_is_finite_difference_of_bracketing_samples() {
        let w = table();
        assert!((w.ddt(0.25).unwrap() - (0.1 - 0.0) / 0.5).abs() < 1e-14);
        assert!((w.ddt(0.75).unwrap() - (0.4 - 0.1) / 0.5).abs() < 1e-14);
        // Exactly at the last sample: the final interval's slope.
        assert!((w.ddt(1.5).unwrap() - (0.2 - 0.4) / 0.5).abs() < 1e-14);
    }

    #[test]
    fn tabulated_rejects_out_of_domain_times() {
        let w = table();
        assert!(matches!(
            w.e(1.5001),
            Err(SimulationError::Domain { .. })
        ));
        assert!(matches!(w.e(-0.1), Err(SimulationError::Domain { .. })));
        // The boundary itself is in-domain.
        assert!(w.e(1.5).is_ok());
    }

    #[test]
    fn tabulated_needs_two_samples_and_positive_spacing() {
        assert!(Waveform::tabulated(vec![0.0], 0.5, 0.0, 0.0, 0.0, 0.01).is_err());
        assert!(Waveform::tabulated(vec![0.0, 1.0], 0.0, 0.0, 0.0, 0.0, 0.01).is_err());
    }
}
