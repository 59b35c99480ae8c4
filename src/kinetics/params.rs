//! Kinetics and cell parameters
//!
//! Per-redox-couple kinetics plus the shared cell parameters, all in the
//! nondimensional units the engine works in (unit scan rate, `F/(RT) = 1`).
//! Validation happens once, eagerly, so a bad parameter is a configuration
//! error at entry rather than a blow-up deep inside the time loop.

use crate::error::SimulationError;

// =================================================================================================
// Per-couple parameters
// =================================================================================================

/// One redox couple in the sequential-transfer chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedoxCouple {
    /// Standard rate constant (≥ 0).
    pub k0: f64,
    /// Transfer coefficient, strictly inside (0, 1).
    pub alpha: f64,
    /// Formal potential.
    pub e0: f64,
}

impl RedoxCouple {
    /// Create a couple (validated later through [`KineticsParams::validate`]).
    pub fn new(k0: f64, alpha: f64, e0: f64) -> Self {
        Self { k0, alpha, e0 }
    }

    fn validate(&self, index: usize) -> Result<(), SimulationError> {
        // Config keys are 1-based (k01, alpha1, ...).
        let i = index + 1;
        if !(self.k0 >= 0.0) || !self.k0.is_finite() {
            return Err(SimulationError::invalid_value(
                &format!("k0{}", i),
                "must be finite and non-negative",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SimulationError::invalid_value(
                &format!("alpha{}", i),
                "must lie strictly inside (0, 1)",
            ));
        }
        if !self.e0.is_finite() {
            return Err(SimulationError::invalid_value(
                &format!("E0{}", i),
                "must be finite",
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Full kinetics parameter set
// =================================================================================================

/// Kinetics of the whole cell: the chain of redox couples plus the shared
/// resistance/capacitance parameters.
///
/// The number of couples `N` (≥ 1) fixes the number of chained species at
/// `N + 1`; species `i`'s oxidation feeds species `i + 1`'s reduced form.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticsParams {
    /// Sequential one-electron transfers, in chain order.
    pub couples: Vec<RedoxCouple>,
    /// Uncompensated resistance (> 0).
    pub ru: f64,
    /// Double-layer capacitance (> 0).
    pub cdl: f64,
    /// Linear potential-dependence coefficient of `Cdl`.
    pub cdl_e: f64,
    /// Quadratic potential-dependence coefficient of `Cdl`.
    pub cdl_e2: f64,
    /// Cubic potential-dependence coefficient of `Cdl`.
    pub cdl_e3: f64,
    /// Surface-coverage scale multiplying the Faradaic current.
    pub gamma: f64,
}

impl KineticsParams {
    /// Convenience constructor with potential-independent capacitance.
    pub fn new(couples: Vec<RedoxCouple>, ru: f64, cdl: f64, gamma: f64) -> Self {
        Self {
            couples,
            ru,
            cdl,
            cdl_e: 0.0,
            cdl_e2: 0.0,
            cdl_e3: 0.0,
            gamma,
        }
    }

    /// Number of sequential transfers `N`.
    pub fn n_transfers(&self) -> usize {
        self.couples.len()
    }

    /// Number of chained species, `N + 1`.
    pub fn n_species(&self) -> usize {
        self.couples.len() + 1
    }

    /// Validate every parameter's domain.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.couples.is_empty() {
            return Err(SimulationError::invalid_value(
                "N",
                "needs at least one redox couple",
            ));
        }
        for (i, couple) in self.couples.iter().enumerate() {
            couple.validate(i)?;
        }
        // The total-current ODE has time constant Ru·Cdl; both must be
        // positive for the charging dynamics to be well posed.
        if !(self.ru > 0.0) || !self.ru.is_finite() {
            return Err(SimulationError::invalid_value(
                "Ru",
                "must be finite and positive",
            ));
        }
        if !(self.cdl > 0.0) || !self.cdl.is_finite() {
            return Err(SimulationError::invalid_value(
                "Cdl",
                "must be finite and positive",
            ));
        }
        for (key, value) in [
            ("CdlE", self.cdl_e),
            ("CdlE2", self.cdl_e2),
            ("CdlE3", self.cdl_e3),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() {
                return Err(SimulationError::invalid_value(key, "must be finite"));
            }
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn one_couple() -> Vec<RedoxCouple> {
        vec![RedoxCouple::new(1.0, 0.5, 0.0)]
    }

    #[test]
    fn valid_parameters_pass() {
        let p = KineticsParams::new(one_couple(), 0.1, 1e-3, 1.0);
        assert!(p.validate().is_ok());
        assert_eq!(p.n_transfers(), 1);
        assert_eq!(p.n_species(), 2);
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected() {
        for alpha in [0.0, 1.0, -0.2, 1.5] {
            let p = KineticsParams::new(vec![RedoxCouple::new(1.0, alpha, 0.0)], 0.1, 1e-3, 1.0);
            let err = p.validate().unwrap_err();
            assert!(err.to_string().contains("alpha1"), "got: {}", err);
        }
    }

    #[test]
    fn negative_rate_constant_is_rejected() {
        let p = KineticsParams::new(vec![RedoxCouple::new(-1.0, 0.5, 0.0)], 0.1, 1e-3, 1.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn second_couple_errors_name_their_index() {
        let couples = vec![
            RedoxCouple::new(1.0, 0.5, 0.0),
            RedoxCouple::new(1.0, 2.0, 0.1),
        ];
        let p = KineticsParams::new(couples, 0.1, 1e-3, 1.0);
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("alpha2"), "got: {}", err);
    }

    #[test]
    fn empty_chain_is_rejected() {
        let p = KineticsParams::new(vec![], 0.1, 1e-3, 1.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn nonpositive_ru_or_cdl_is_rejected() {
        let p = KineticsParams::new(one_couple(), 0.0, 1e-3, 1.0);
        assert!(p.validate().is_err());
        let p = KineticsParams::new(one_couple(), 0.1, 0.0, 1.0);
        assert!(p.validate().is_err());
    }
}
