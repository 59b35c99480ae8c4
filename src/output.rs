//! Output assembler
//!
//! Copies a finished [`StepperTrace`] into caller-provided, pre-sized
//! buffers. The engine never resizes caller storage: the fixed-length
//! contract is agreed before simulation starts. A length mismatch is
//! reported before anything is written, so a failed call leaves both
//! buffers untouched.

use crate::error::SimulationError;
use crate::solver::StepperTrace;

/// Write `(t_n, Itot_n)` for every mesh index into the caller's buffers.
///
/// Both buffers must match the trace length exactly; no other side effects.
pub fn write_series(
    trace: &StepperTrace,
    current_out: &mut [f64],
    times_out: &mut [f64],
) -> Result<(), SimulationError> {
    if current_out.len() != trace.len() {
        return Err(SimulationError::BufferMismatch {
            expected: trace.len(),
            actual: current_out.len(),
        });
    }
    if times_out.len() != trace.len() {
        return Err(SimulationError::BufferMismatch {
            expected: trace.len(),
            actual: times_out.len(),
        });
    }
    current_out.copy_from_slice(&trace.current);
    times_out.copy_from_slice(&trace.times);
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    fn trace(n: usize) -> StepperTrace {
        StepperTrace {
            times: (0..n).map(|i| i as f64).collect(),
            current: (0..n).map(|i| i as f64 * 0.5).collect(),
            final_state: DVector::zeros(3),
        }
    }

    #[test]
    fn copies_both_series() {
        let tr = trace(4);
        let mut current = vec![0.0; 4];
        let mut times = vec![0.0; 4];
        write_series(&tr, &mut current, &mut times).unwrap();
        assert_eq!(times, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(current, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn short_buffer_is_rejected_without_writes() {
        let tr = trace(4);
        let mut current = vec![-7.0; 3];
        let mut times = vec![-7.0; 4];
        match write_series(&tr, &mut current, &mut times) {
            Err(SimulationError::BufferMismatch { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }
        // Nothing was touched.
        assert!(current.iter().all(|&v| v == -7.0));
        assert!(times.iter().all(|&v| v == -7.0));
    }

    #[test]
    fn long_buffer_is_rejected_too() {
        let tr = trace(4);
        let mut current = vec![0.0; 5];
        let mut times = vec![0.0; 4];
        assert!(matches!(
            write_series(&tr, &mut current, &mut times),
            Err(SimulationError::BufferMismatch { .. })
        ));
    }
}
