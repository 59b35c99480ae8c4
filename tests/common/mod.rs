//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{base_map, fourier_amplitude, index_of_maximum, relative_error};
