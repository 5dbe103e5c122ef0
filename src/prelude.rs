//! Makes available common structures needed to run an upscaling
//!
//! You may write `use relperm_upscale::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{BcType, Config, Samples, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::base::{ParamCapPressure, ParamFluids, ParamGrid, ParamOptions, ParamRelPerm, ParamRock, ParamUpscaling};
pub use crate::grid::CartesianGrid;
pub use crate::material::{FixedMobility, MobilityField, ReservoirProperty};
pub use crate::upscaling::{setup_upscaling_conditions, BoundaryConditions, FlowBc, SatBc};
pub use crate::upscaling::{SinglePhaseUpscaler, SteadyStateUpscaler};
