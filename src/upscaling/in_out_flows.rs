use super::{BoundaryConditions, FlowSolution, SatBc};
use crate::grid::CartesianGrid;
use crate::material::ReservoirProperty;
use crate::StrError;
use std::collections::HashMap;

/// Holds the boundary flows of one phase as `(in, out)`
///
/// Inflows are negative and outflows are positive (outward-positive fluxes).
pub type PhaseInOut = (f64, f64);

/// Accumulates the boundary outflow and records the fractional flow of periodic outflow faces
///
/// Returns `(water_out, oil_out)` and the fractional flow keyed by boundary id.
fn outflow_pass(
    grid: &CartesianGrid,
    res_prop: &ReservoirProperty,
    bcs: &BoundaryConditions,
    flow: &FlowSolution,
    saturation: &[f64],
) -> (PhaseInOut, HashMap<usize, f64>) {
    let mut water_out = 0.0;
    let mut oil_out = 0.0;
    let mut frac_flow_by_bid = HashMap::new();
    for (bid, bf) in grid.boundary.iter().enumerate() {
        let flux = flow.outflux(grid, bf.cell, bf.face);
        if flux >= 0.0 {
            let frac_flow = res_prop.fractional_flow(bf.cell, saturation[bf.cell]);
            if bcs.sat_cond(bid).is_periodic() {
                frac_flow_by_bid.insert(bid, frac_flow);
            }
            water_out += flux * frac_flow;
            oil_out += flux * (1.0 - frac_flow);
        }
    }
    ((water_out, oil_out), frac_flow_by_bid)
}

/// Accumulates the boundary inflow (negative values)
///
/// Periodic inflow faces take the fractional flow recorded for their partner by the outflow pass.
fn inflow_pass(
    grid: &CartesianGrid,
    res_prop: &ReservoirProperty,
    bcs: &BoundaryConditions,
    flow: &FlowSolution,
    frac_flow_by_bid: &HashMap<usize, f64>,
) -> Result<PhaseInOut, StrError> {
    let mut water_in = 0.0;
    let mut oil_in = 0.0;
    for (bid, bf) in grid.boundary.iter().enumerate() {
        let flux = flow.outflux(grid, bf.cell, bf.face);
        if flux < 0.0 {
            let frac_flow = match bcs.sat_cond(bid) {
                SatBc::Periodic {
                    partner,
                    saturation_difference,
                } => {
                    assert!(*saturation_difference == 0.0);
                    match frac_flow_by_bid.get(partner) {
                        Some(value) => *value,
                        None => {
                            eprintln!(
                                "ERROR: no periodic partner fractional flow for face bid = {} and partner bid = {}",
                                bid, partner
                            );
                            return Err("cannot find periodic partner fractional flow");
                        }
                    }
                }
                SatBc::Dirichlet(s_bc) => res_prop.fractional_flow(bf.cell, *s_bc),
            };
            water_in += flux * frac_flow;
            oil_in += flux * (1.0 - frac_flow);
        }
    }
    Ok((water_in, oil_in))
}

/// Computes the boundary in- and outflows of both phases
///
/// Returns `((water_in, water_out), (oil_in, oil_out))` with negative inflows.
///
/// The outflow faces are visited first so that every periodic inflow face finds the
/// fractional flow leaving through its partner.
pub fn compute_in_out_flows(
    grid: &CartesianGrid,
    res_prop: &ReservoirProperty,
    bcs: &BoundaryConditions,
    flow: &FlowSolution,
    saturation: &[f64],
) -> Result<(PhaseInOut, PhaseInOut), StrError> {
    if saturation.len() != grid.ncell() {
        return Err("saturation must have one value per cell");
    }
    let ((water_out, oil_out), frac_flow_by_bid) = outflow_pass(grid, res_prop, bcs, flow, saturation);
    let (water_in, oil_in) = inflow_pass(grid, res_prop, bcs, flow, &frac_flow_by_bid)?;
    Ok(((water_in, water_out), (oil_in, oil_out)))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
