//! Implements the Cartesian block used for upscaling

mod cartesian_grid;
pub use crate::grid::cartesian_grid::*;
