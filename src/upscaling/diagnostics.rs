use super::FlowSolution;
use crate::base::NDIM;
use crate::grid::CartesianGrid;
use crate::material::ReservoirProperty;

/// Estimates the Darcy velocity of a cell from the fluxes through its faces
///
/// Along each axis, the velocity is the mean of the fluxes through the two opposite faces
/// divided by the face area.
pub fn estimate_cell_velocity(grid: &CartesianGrid, flow: &FlowSolution, cell: usize) -> [f64; NDIM] {
    let faces = grid.cell_faces(cell);
    let mut v = [0.0; NDIM];
    for d in 0..NDIM {
        let (f_minus, f_plus) = (faces[2 * d], faces[2 * d + 1]);
        let out_minus = flow.outflux(grid, cell, f_minus);
        let out_plus = flow.outflux(grid, cell, f_plus);
        v[d] = 0.5 * (out_plus - out_minus) / grid.faces[f_plus].area;
    }
    v
}

/// Estimates the Darcy velocity of all cells
pub fn estimate_cell_velocities(grid: &CartesianGrid, flow: &FlowSolution) -> Vec<[f64; NDIM]> {
    (0..grid.ncell()).map(|c| estimate_cell_velocity(grid, flow, c)).collect()
}

/// Computes the bulk-volume weighted average of the cell velocities
pub fn average_velocity(grid: &CartesianGrid, flow: &FlowSolution) -> [f64; NDIM] {
    let mut sum = [0.0; NDIM];
    for cell in &grid.cells {
        let v = estimate_cell_velocity(grid, flow, cell.index);
        for i in 0..NDIM {
            sum[i] += cell.volume * v[i];
        }
    }
    let total = grid.total_volume();
    [sum[0] / total, sum[1] / total, sum[2] / total]
}

/// Splits the cell velocities into water and oil velocities using the fractional flow
pub fn compute_phase_velocities(
    res_prop: &ReservoirProperty,
    saturation: &[f64],
    cell_velocity: &[[f64; NDIM]],
) -> (Vec<[f64; NDIM]>, Vec<[f64; NDIM]>) {
    let mut water = Vec::with_capacity(cell_velocity.len());
    let mut oil = Vec::with_capacity(cell_velocity.len());
    for (c, v) in cell_velocity.iter().enumerate() {
        let fw = res_prop.fractional_flow(c, saturation[c]);
        water.push([fw * v[0], fw * v[1], fw * v[2]]);
        oil.push([(1.0 - fw) * v[0], (1.0 - fw) * v[1], (1.0 - fw) * v[2]]);
    }
    (water, oil)
}

/// Returns the cell pressures of a flow solution
pub fn cell_pressures(grid: &CartesianGrid, flow: &FlowSolution) -> Vec<f64> {
    (0..grid.ncell()).map(|c| flow.cell_pressure(c)).collect()
}

/// Computes the capillary pressure of all cells
pub fn compute_cap_pressure(res_prop: &ReservoirProperty, saturation: &[f64]) -> Vec<f64> {
    saturation
        .iter()
        .enumerate()
        .map(|(c, s)| res_prop.cap_pressure(c, *s))
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Samples;
    use crate::grid::CartesianGrid;
    use crate::upscaling::FlowSolution;
    use russell_lab::approx_eq;

    #[test]
    fn estimate_cell_velocity_works() {
        let grid = CartesianGrid::new([1, 1, 1], [2.0, 1.0, 1.0]).unwrap();
        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        let faces = grid.cell_faces(0);
        flow.face_flux[faces[0]] = 1.0;
        flow.face_flux[faces[1]] = 3.0;
        flow.face_flux[faces[4]] = -4.0;
        flow.face_flux[faces[5]] = -4.0;
        let v = estimate_cell_velocity(&grid, &flow, 0);
        approx_eq(v[0], 2.0, 1e-15);
        approx_eq(v[1], 0.0, 1e-15);
        approx_eq(v[2], -2.0, 1e-15); // area of z-faces = 2
        let all = estimate_cell_velocities(&grid, &flow);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], v);
    }

    #[test]
    fn average_velocity_works() {
        let grid = Samples::grid_column_x(2);
        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        let f0 = grid.cell_faces(0);
        let f1 = grid.cell_faces(1);
        flow.face_flux[f0[0]] = 1.0;
        flow.face_flux[f0[1]] = 3.0; // shared
        flow.face_flux[f1[1]] = 5.0;
        let v = average_velocity(&grid, &flow);
        approx_eq(v[0], 3.0, 1e-15);
        approx_eq(v[1], 0.0, 1e-15);
    }

    #[test]
    fn phase_fields_work() {
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.2, [1.0; 3]);
        let s = vec![0.25, 1.0];
        let vel = vec![[4.0, 0.0, -8.0], [2.0, 2.0, 2.0]];
        let (water, oil) = compute_phase_velocities(&res_prop, &s, &vel);
        approx_eq(water[0][0], 1.0, 1e-15);
        approx_eq(water[0][2], -2.0, 1e-15);
        approx_eq(oil[0][0], 3.0, 1e-15);
        approx_eq(oil[0][2], -6.0, 1e-15);
        assert_eq!(water[1], [2.0, 2.0, 2.0]);
        assert_eq!(oil[1], [0.0, 0.0, 0.0]);

        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        flow.pressure[0] = 1.5;
        assert_eq!(cell_pressures(&grid, &flow), &[1.5, 0.0]);
        assert_eq!(compute_cap_pressure(&res_prop, &s), &[0.0, 0.0]);
    }
}
