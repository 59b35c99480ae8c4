//! Electron-transfer kinetics
//!
//! This module provides the physics side of the engine:
//!
//! - [`RedoxCouple`] / [`KineticsParams`]: validated per-couple and shared
//!   cell parameters.
//! - [`SequentialTransfer`]: the Butler–Volmer kinetics model for a chain
//!   of `N` sequential one-electron transfers, exposing the ODE right-hand
//!   side consumed by the steppers.
//!
//! The model defines the equations (WHAT to solve); the steppers in
//! [`crate::solver`] provide the numerical methods (HOW to solve them).

mod model;
mod params;

pub use model::SequentialTransfer;
pub use params::{KineticsParams, RedoxCouple};
