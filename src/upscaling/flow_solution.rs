use crate::grid::CartesianGrid;

/// Holds the result of a pressure solve
#[derive(Clone, Debug)]
pub struct FlowSolution {
    /// Flux through each face along the face normal (from the minus cell to the plus cell)
    pub face_flux: Vec<f64>,

    /// Pressure of each cell
    pub pressure: Vec<f64>,
}

impl FlowSolution {
    /// Allocates a new instance with zero fluxes and pressures
    pub fn new(nface: usize, ncell: usize) -> Self {
        FlowSolution {
            face_flux: vec![0.0; nface],
            pressure: vec![0.0; ncell],
        }
    }

    /// Returns the flux leaving `cell` through `face` (outward-positive)
    #[inline]
    pub fn outflux(&self, grid: &CartesianGrid, cell: usize, face: usize) -> f64 {
        grid.outward_sign(cell, face) * self.face_flux[face]
    }

    /// Returns the pressure of a cell
    #[inline]
    pub fn cell_pressure(&self, cell: usize) -> f64 {
        self.pressure[cell]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FlowSolution;
    use crate::grid::CartesianGrid;

    #[test]
    fn outflux_works() {
        let grid = CartesianGrid::new([2, 1, 1], [1.0, 1.0, 1.0]).unwrap();
        let mut solution = FlowSolution::new(grid.nface(), grid.ncell());
        let shared = grid.cell_faces(0)[1];
        solution.face_flux[shared] = 3.0;
        solution.pressure[1] = 2.0;
        assert_eq!(solution.outflux(&grid, 0, shared), 3.0);
        assert_eq!(solution.outflux(&grid, 1, shared), -3.0);
        assert_eq!(solution.cell_pressure(1), 2.0);
    }
}
