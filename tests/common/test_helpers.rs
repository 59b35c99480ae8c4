//! Helper functions for integration tests

use std::f64::consts::PI;

use volt_rs::prelude::*;

/// A complete single-couple parameter map with mild, Euler-stable values.
///
/// Tests override individual keys to steer the scenario.
pub fn base_map() -> ParameterMap {
    let mut map = ParameterMap::new();
    map.set("Estart", -1.0)
        .set("Ereverse", 1.0)
        .set("omega", 0.0)
        .set("phase", 0.0)
        .set("dE", 0.0)
        .set("Ru", 1.0)
        .set("Cdl", 1e-2)
        .set("CdlE", 0.0)
        .set("CdlE2", 0.0)
        .set("CdlE3", 0.0)
        .set("gamma", 1.0)
        .set("N", 1.0)
        .set("k01", 1.0)
        .set("alpha1", 0.5)
        .set("E01", 0.0)
        .set("Tfinal", 4.0)
        .set("Nt", 4001.0);
    map
}

/// Relative error between a computed and an expected value.
pub fn relative_error(computed: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-300 {
        computed.abs()
    } else {
        ((computed - expected) / expected).abs()
    }
}

/// Index of the largest value in a series.
pub fn index_of_maximum(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

/// Magnitude of the Fourier component of a mean-removed series at `freq`
/// (cycles per unit time), evaluated on the given time grid.
pub fn fourier_amplitude(times: &[f64], values: &[f64], freq: f64) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let mut re = 0.0;
    let mut im = 0.0;
    for (&t, &v) in times.iter().zip(values) {
        let arg = 2.0 * PI * freq * t;
        re += (v - mean) * arg.cos();
        im += (v - mean) * arg.sin();
    }
    (re * re + im * im).sqrt()
}
