//! Implements the pressure, transport, and upscaling solvers

mod boundary_conditions;
mod diagnostics;
mod flow_solution;
mod in_out_flows;
mod perm_tensor;
mod pressure_solver;
mod single_phase_upscaler;
mod steady_state_upscaler;
mod transport_solver;
mod vtu_writer;
pub use crate::upscaling::boundary_conditions::*;
pub use crate::upscaling::diagnostics::*;
pub use crate::upscaling::flow_solution::*;
pub use crate::upscaling::in_out_flows::*;
pub use crate::upscaling::perm_tensor::*;
pub use crate::upscaling::pressure_solver::*;
pub use crate::upscaling::single_phase_upscaler::*;
pub use crate::upscaling::steady_state_upscaler::*;
pub use crate::upscaling::transport_solver::*;
pub use crate::upscaling::vtu_writer::*;
