//! Radiative-equilibrium temperature profiles for a plane-parallel atmosphere.
//!
//! The crate is a one-dimensional grey two-stream model without scattering. It is organised as
//! a forward pipeline of pure functions:
//!
//! 1. [`grid`]: vertical levels, layer thicknesses and the barometric air density
//! 2. [`profile`]: mixing-ratio shapes for each absorber
//! 3. [`optical_depth`]: per-layer long-wave and short-wave optical depths, optionally with a
//!    cloud layer
//! 4. [`equilibrium`]: the inter-layer exchange matrix and the dense solve for temperature
//!
//! [`model::solve_atmosphere`] runs all four stages from a single parameter set.

pub mod constants;
pub mod equilibrium;
pub mod errors;
pub mod grid;
pub mod model;
pub mod optical_depth;
pub mod parameters;
pub mod profile;
#[cfg(feature = "python")]
pub mod python;

/// Floating point type used throughout the model.
pub type FloatValue = f64;

pub use equilibrium::{temperature_profile, RadiativeEquilibrium};
pub use errors::{AtmError, AtmResult};
pub use grid::{build_grid, VerticalGrid};
pub use model::{solve_atmosphere, EquilibriumProfile};
pub use optical_depth::{optical_depth, OpticalDepthProfile};
