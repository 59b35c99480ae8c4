//! Linear-sweep voltammogram demo
//!
//! Runs a single fast redox couple through a −0.4 → 0.4 → −0.4 sweep with
//! both steppers and prints a coarse table of the current traces.
//!
//! ```bash
//! cargo run --example linear_sweep
//! ```

use volt_rs::prelude::*;

fn main() -> Result<(), SimulationError> {
    let points = 2001;
    let mut map = ParameterMap::new();
    map.set("Estart", -0.4)
        .set("Ereverse", 0.4)
        .set("omega", 0.0)
        .set("phase", 0.0)
        .set("dE", 0.0)
        .set("Ru", 1e-3)
        .set("Cdl", 1e-3)
        .set("CdlE", 0.0)
        .set("CdlE2", 0.0)
        .set("CdlE3", 0.0)
        .set("gamma", 1.0)
        .set("N", 1.0)
        .set("k01", 100.0)
        .set("alpha1", 0.5)
        .set("E01", 0.0)
        .set("Tfinal", 1.6)
        .set("Nt", points as f64)
        .set("mesh_ratio", 1.002)
        .set("mesh_cap", 5.0);

    let mut current = vec![0.0; points];
    let mut times = vec![0.0; points];
    simulate_implicit(&map, &mut current, &mut times)?;

    println!("{:>8}  {:>12}", "t", "I(t)");
    for n in (0..points).step_by(points / 20) {
        println!("{:8.3}  {:12.6}", times[n], current[n]);
    }

    let peak = current
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);
    println!(
        "\noxidation peak: I = {:.6} at t = {:.4} (E0 crossing at t = 0.4)",
        current[peak], times[peak]
    );
    Ok(())
}
