use serde::{Deserialize, Serialize};

/// Defines how the boundary faces of the block are conditioned during upscaling
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum BcType {
    /// Dirichlet pressure at both ends of the flow axis and no-flow on the remaining faces
    Fixed,

    /// Dirichlet pressure at both ends of the flow axis and periodic pairing on the remaining axes
    Mixed,

    /// Periodic pairing on all axes with a pressure jump across the flow axis pair
    Periodic,
}

impl BcType {
    /// Indicates whether the faces normal to `axis` are periodic when flowing along `flow_direction`
    pub fn periodic_axis(&self, axis: usize, flow_direction: usize) -> bool {
        match self {
            BcType::Fixed => false,
            BcType::Mixed => axis != flow_direction,
            BcType::Periodic => true,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
