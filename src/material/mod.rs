//! Implements the rock and fluid models

mod mobility;
mod model_cap_pressure;
mod model_rel_perm;
mod reservoir_property;
pub use crate::material::mobility::*;
pub use crate::material::model_cap_pressure::*;
pub use crate::material::model_rel_perm::*;
pub use crate::material::reservoir_property::*;
