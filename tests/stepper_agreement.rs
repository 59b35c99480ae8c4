//! Cross-method and cross-variant consistency tests
//!
//! The two steppers must agree wherever both are valid, the tabulated
//! waveform must reproduce the analytic sweep it was sampled from, and
//! repeated runs must be deterministic.

use volt_rs::prelude::*;

mod common;
use common::base_map;

// =================================================================================================
// Explicit vs implicit agreement
// =================================================================================================

#[test]
fn steppers_agree_on_a_benign_problem() {
    // mesh_cap = 1 saturates the exponential grading immediately, so the
    // implicit stepper runs on exactly the uniform grid the explicit one
    // uses and the traces are comparable point by point.
    let mut map = base_map();
    map.set("k01", 2.0)
        .set("Nt", 8001.0)
        .set("mesh_ratio", 1.01)
        .set("mesh_cap", 1.0);

    let mut explicit_i = vec![0.0; 8001];
    let mut explicit_t = vec![0.0; 8001];
    simulate_explicit(&map, &mut explicit_i, &mut explicit_t).unwrap();

    let mut implicit_i = vec![0.0; 8001];
    let mut implicit_t = vec![0.0; 8001];
    simulate_implicit(&map, &mut implicit_i, &mut implicit_t).unwrap();

    for (a, b) in explicit_t.iter().zip(&implicit_t) {
        assert!((a - b).abs() < 1e-12, "grids differ: {} vs {}", a, b);
    }

    let peak = explicit_i.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let max_diff = explicit_i
        .iter()
        .zip(&implicit_i)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(
        max_diff < 0.02 * peak,
        "methods disagree: max diff {} vs peak {}",
        max_diff,
        peak
    );
}

// =================================================================================================
// Tabulated vs analytic sweep
// =================================================================================================

#[test]
fn tabulated_triangle_reproduces_the_analytic_sweep() {
    let map = base_map();
    let mut analytic_i = vec![0.0; 4001];
    let mut analytic_t = vec![0.0; 4001];
    simulate_explicit(&map, &mut analytic_i, &mut analytic_t).unwrap();

    // Sample the same triangle wave (−1 → 1 → −1 over 4 time units) on a
    // coarser grid; linear interpolation of a piecewise-linear signal is
    // exact between knots.
    let dt_data = 0.05;
    let samples: Vec<f64> = (0..=80)
        .map(|i| {
            let t = i as f64 * dt_data;
            if t <= 2.0 {
                -1.0 + t
            } else {
                1.0 - (t - 2.0)
            }
        })
        .collect();
    let mut tab_map = base_map();
    tab_map.set_potential_table(samples, dt_data);

    let mut tab_i = vec![0.0; 4001];
    let mut tab_t = vec![0.0; 4001];
    simulate_explicit(&tab_map, &mut tab_i, &mut tab_t).unwrap();

    // The finite-difference slope disagrees with the analytic one only in
    // the single interval holding the reversal; the transient it injects
    // decays with the charging time constant.
    let peak = analytic_i.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let max_diff = analytic_i
        .iter()
        .zip(&tab_i)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(
        max_diff < 0.05 * peak,
        "tabulated run diverged: max diff {} vs peak {}",
        max_diff,
        peak
    );
}

// =================================================================================================
// Determinism and phase sensitivity
// =================================================================================================

#[test]
fn repeated_runs_through_the_boundary_are_bit_identical() {
    let mut map = base_map();
    map.set("dE", 0.05)
        .set("omega", 9.0)
        .set("mesh_ratio", 1.03)
        .set("mesh_cap", 10.0);

    let mut a = vec![0.0; 4001];
    let mut b = vec![0.0; 4001];
    let mut t = vec![0.0; 4001];
    simulate_implicit(&map, &mut a, &mut t).unwrap();
    simulate_implicit(&map, &mut b, &mut t).unwrap();
    assert_eq!(a, b);
}

#[test]
fn perturbation_phase_shifts_the_response() {
    let mut map = base_map();
    map.set("dE", 0.05).set("omega", 9.0);

    let mut reference = vec![0.0; 4001];
    let mut shifted = vec![0.0; 4001];
    let mut t = vec![0.0; 4001];
    simulate_explicit(&map, &mut reference, &mut t).unwrap();

    map.set("phase", std::f64::consts::FRAC_PI_2);
    simulate_explicit(&map, &mut shifted, &mut t).unwrap();

    let max_diff = reference
        .iter()
        .zip(&shifted)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(max_diff > 1e-4, "phase change had no effect");
}
