//! Computes upscaled relative permeability tensors of a block of reservoir rock
//!
//! A coupled two-phase (water/oil) pressure-transport simulation is run on the block
//! until an approximate steady state is reached under a prescribed flow direction.
//! The resulting saturation field is then converted into anisotropic effective
//! mobilities and relative permeability tensors.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod grid;
pub mod material;
pub mod prelude;
pub mod upscaling;
