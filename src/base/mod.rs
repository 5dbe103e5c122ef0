//! Implements the base structures for an upscaling simulation

mod config;
mod constants;
mod enums;
mod parameters;
mod samples;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::parameters::*;
pub use crate::base::samples::*;
