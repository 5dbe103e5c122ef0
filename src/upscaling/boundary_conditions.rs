use crate::base::{BcType, NDIM};
use crate::grid::CartesianGrid;
use crate::StrError;
use std::fmt;

/// Defines a pressure (flow) condition on a boundary face
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowBc {
    /// Prescribed pressure
    Dirichlet(f64),

    /// Prescribed outward flux (zero means no-flow)
    Neumann(f64),

    /// Periodic pairing with another boundary face
    ///
    /// The pressure seen across the face is the partner's cell pressure plus `pressure_jump`.
    Periodic { partner: usize, pressure_jump: f64 },
}

/// Defines a saturation condition on a boundary face
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SatBc {
    /// Prescribed saturation of the incoming fluid
    Dirichlet(f64),

    /// Periodic pairing with another boundary face
    Periodic { partner: usize, saturation_difference: f64 },
}

impl SatBc {
    /// Indicates a periodic condition
    pub fn is_periodic(&self) -> bool {
        matches!(self, SatBc::Periodic { .. })
    }

    /// Indicates a Dirichlet condition
    pub fn is_dirichlet(&self) -> bool {
        matches!(self, SatBc::Dirichlet(..))
    }
}

/// Holds the flow and saturation conditions of every boundary face (indexed by boundary id)
#[derive(Clone, Debug)]
pub struct BoundaryConditions {
    /// Flow conditions
    flow: Vec<FlowBc>,

    /// Saturation conditions
    sat: Vec<SatBc>,
}

impl BoundaryConditions {
    /// Allocates an empty instance (a block without boundary conditions)
    pub fn new() -> Self {
        BoundaryConditions {
            flow: Vec::new(),
            sat: Vec::new(),
        }
    }

    /// Returns the number of conditioned boundary faces
    #[inline]
    pub fn len(&self) -> usize {
        self.flow.len()
    }

    /// Returns the flow condition of a boundary face
    #[inline]
    pub fn flow_cond(&self, bid: usize) -> &FlowBc {
        &self.flow[bid]
    }

    /// Returns the saturation condition of a boundary face
    #[inline]
    pub fn sat_cond(&self, bid: usize) -> &SatBc {
        &self.sat[bid]
    }

    /// Returns the periodic partner of a boundary face, if any
    pub fn periodic_partner(&self, bid: usize) -> Option<usize> {
        match self.sat.get(bid)? {
            SatBc::Periodic { partner, .. } => Some(*partner),
            SatBc::Dirichlet(..) => None,
        }
    }

    /// Indicates whether at least one face has a prescribed pressure
    pub fn has_dirichlet_pressure(&self) -> bool {
        self.flow.iter().any(|bc| matches!(bc, FlowBc::Dirichlet(..)))
    }
}

/// Sets up the boundary conditions for upscaling along a flow direction
///
/// Faces at the two ends of the flow axis get a prescribed pressure (`pressure_drop` at the
/// inlet (min) side and zero at the outlet (max) side) and a prescribed saturation, unless
/// the flow axis is periodic, in which case the pair carries the pressure jump. Faces on
/// the remaining axes are either periodic or no-flow, depending on `bc_type`.
///
/// Every boundary face receives exactly one condition and every periodic face exactly one partner.
pub fn setup_upscaling_conditions(
    grid: &CartesianGrid,
    bc_type: BcType,
    flow_direction: usize,
    pressure_drop: f64,
    boundary_saturation: f64,
) -> Result<BoundaryConditions, StrError> {
    if flow_direction >= NDIM {
        return Err("flow direction must be 0, 1, or 2");
    }
    let nbf = grid.n_boundary_face();
    let mut flow = Vec::with_capacity(nbf);
    let mut sat = Vec::with_capacity(nbf);
    for bid in 0..nbf {
        let side = grid.boundary[bid].side;
        let axis = side / 2;
        let max_side = side % 2 == 1;
        if bc_type.periodic_axis(axis, flow_direction) {
            let partner = match grid.periodic_partner(bid) {
                Some(p) => p,
                None => {
                    eprintln!("ERROR: boundary face with bid = {} (side {}) has no periodic partner", bid, side);
                    return Err("cannot find periodic partner of boundary face");
                }
            };
            if grid.periodic_partner(partner) != Some(bid) {
                eprintln!(
                    "ERROR: periodic pairing of bid = {} and partner bid = {} is not symmetric",
                    bid, partner
                );
                return Err("periodic pairing of boundary faces is not symmetric");
            }
            // pressure decreases along the flow axis
            let pressure_jump = if axis != flow_direction {
                0.0
            } else if max_side {
                -pressure_drop
            } else {
                pressure_drop
            };
            flow.push(FlowBc::Periodic { partner, pressure_jump });
            sat.push(SatBc::Periodic {
                partner,
                saturation_difference: 0.0,
            });
        } else if axis == flow_direction {
            let pressure = if max_side { 0.0 } else { pressure_drop };
            flow.push(FlowBc::Dirichlet(pressure));
            sat.push(SatBc::Dirichlet(boundary_saturation));
        } else {
            flow.push(FlowBc::Neumann(0.0));
            sat.push(SatBc::Dirichlet(boundary_saturation));
        }
    }
    Ok(BoundaryConditions { flow, sat })
}

impl fmt::Display for BoundaryConditions {
    /// Prints a formatted summary of the boundary conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Boundary conditions\n").unwrap();
        write!(f, "===================\n").unwrap();
        for bid in 0..self.flow.len() {
            write!(f, "{} : {:?} {:?}\n", bid, self.flow[bid], self.sat[bid]).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
