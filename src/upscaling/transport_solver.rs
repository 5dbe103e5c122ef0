use super::{BoundaryConditions, FlowSolution, SatBc};
use crate::base::{Config, NDIM};
use crate::grid::CartesianGrid;
use crate::material::ReservoirProperty;
use crate::StrError;

/// Implements an explicit upwind solver for the transport of the first-phase saturation
///
/// ```text
/// φ V ds/dt = -Σ_f outflux_f · fw(upwind) + q
/// ```
///
/// The upwind value is taken from the cell itself on outflow faces, from the neighbour on
/// interior inflow faces, from the prescribed saturation on Dirichlet inflow faces, and from
/// the partner face's cell on periodic inflow faces. The step is split into sub-steps
/// respecting the CFL condition.
pub struct TransportSolver {
    /// Courant number
    cfl: f64,

    /// Max number of sub-steps of one call to transport_solve
    max_substeps: usize,

    /// Pore volume of each cell (cached by init_obj)
    pore_volume: Vec<f64>,

    /// Max |dfw/ds| over all cells (cached by init_obj)
    max_dfds: f64,

    /// Total number of sub-steps since init_obj
    n_substep_total: usize,
}

impl TransportSolver {
    /// Allocates a new (uninitialized) instance
    pub fn new() -> Self {
        TransportSolver {
            cfl: 0.5,
            max_substeps: 10_000,
            pore_volume: Vec::new(),
            max_dfds: 0.0,
            n_substep_total: 0,
        }
    }

    /// Reads the control parameters from the configuration
    pub fn init(&mut self, config: &Config) {
        self.cfl = config.transport_cfl;
        self.max_substeps = config.transport_max_substeps;
    }

    /// Prepares the solver for a grid, a reservoir property, and a set of boundary conditions
    pub fn init_obj(
        &mut self,
        grid: &CartesianGrid,
        res_prop: &ReservoirProperty,
        bcs: &BoundaryConditions,
    ) -> Result<(), StrError> {
        if res_prop.ncell() != grid.ncell() {
            return Err("reservoir property and grid must have the same number of cells");
        }
        if bcs.len() != grid.n_boundary_face() {
            return Err("boundary conditions must cover all boundary faces");
        }
        self.pore_volume = grid.cells.iter().map(|c| c.volume * res_prop.porosity(c.index)).collect();
        self.max_dfds = (0..grid.ncell()).fold(0.0, |acc, c| f64::max(acc, res_prop.max_frac_flow_derivative(c)));
        self.n_substep_total = 0;
        Ok(())
    }

    /// Returns the total number of sub-steps since init_obj
    pub fn n_substep_total(&self) -> usize {
        self.n_substep_total
    }

    /// Advances the saturation field by `time` using a frozen flow field
    ///
    /// Returns the number of sub-steps.
    pub fn transport_solve(
        &mut self,
        grid: &CartesianGrid,
        res_prop: &ReservoirProperty,
        bcs: &BoundaryConditions,
        saturation: &mut [f64],
        time: f64,
        gravity: [f64; NDIM],
        flow: &FlowSolution,
        injection: &[f64],
    ) -> Result<usize, StrError> {
        let ncell = grid.ncell();
        if self.pore_volume.len() != ncell {
            return Err("transport solver must be initialized first");
        }
        if saturation.len() != ncell || injection.len() != ncell {
            return Err("saturation and injection must have one value per cell");
        }
        if time < 0.0 {
            return Err("transport time step must be ≥ 0.0");
        }
        if gravity.iter().any(|g| *g != 0.0) {
            println!("WARNING: gravity is not handled by the transport solver");
        }
        if time == 0.0 {
            return Ok(0);
        }

        // number of sub-steps
        let mut max_rate = 0.0;
        for c in 0..ncell {
            let out: f64 = grid
                .cell_faces(c)
                .iter()
                .map(|f| f64::max(0.0, flow.outflux(grid, c, *f)))
                .sum();
            max_rate = f64::max(max_rate, out / self.pore_volume[c]);
        }
        let speed = max_rate * self.max_dfds;
        let n_substep = if speed > 0.0 {
            let n = f64::ceil(time * speed / self.cfl);
            if n > self.max_substeps as f64 {
                return Err("transport solver requires too many sub-steps");
            }
            usize::max(1, n as usize)
        } else {
            1
        };
        let dt = time / (n_substep as f64);

        // upwind fractional flow of incoming fluid at each boundary face
        let mut fw_inflow_bc = vec![0.0; grid.n_boundary_face()];
        let mut fw = vec![0.0; ncell];
        let mut rate = vec![0.0; ncell];
        for _ in 0..n_substep {
            for c in 0..ncell {
                fw[c] = res_prop.fractional_flow(c, saturation[c]);
            }
            for (bid, bf) in grid.boundary.iter().enumerate() {
                fw_inflow_bc[bid] = match bcs.sat_cond(bid) {
                    SatBc::Dirichlet(s_bc) => res_prop.fractional_flow(bf.cell, *s_bc),
                    SatBc::Periodic { partner, .. } => fw[grid.boundary[*partner].cell],
                };
            }
            for c in 0..ncell {
                let mut r = injection[c];
                for f in grid.cell_faces(c) {
                    let out = flow.outflux(grid, c, *f);
                    if out >= 0.0 {
                        r -= out * fw[c];
                    } else if let Some(bid) = grid.faces[*f].boundary_id {
                        r -= out * fw_inflow_bc[bid];
                    } else if let Some(nb) = grid.neighbor(c, *f) {
                        r -= out * fw[nb];
                    }
                }
                rate[c] = r;
            }
            for c in 0..ncell {
                let s = saturation[c] + dt * rate[c] / self.pore_volume[c];
                saturation[c] = f64::min(1.0, f64::max(0.0, s));
            }
        }
        self.n_substep_total += n_substep;
        Ok(n_substep)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::TransportSolver;
    use crate::base::{BcType, Config, Samples};
    use crate::upscaling::{setup_upscaling_conditions, FlowSolution};
    use russell_lab::approx_eq;

    #[test]
    fn transport_solve_captures_errors() {
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.5, [1.0; 3]);
        let bcs = setup_upscaling_conditions(&grid, BcType::Fixed, 0, 1.0, 1.0).unwrap();
        let flow = FlowSolution::new(grid.nface(), grid.ncell());
        let mut solver = TransportSolver::new();
        let mut s = vec![0.0; 2];
        let q = vec![0.0; 2];
        assert_eq!(
            solver
                .transport_solve(&grid, &res_prop, &bcs, &mut s, 1.0, [0.0; 3], &flow, &q)
                .err(),
            Some("transport solver must be initialized first")
        );
        solver.init_obj(&grid, &res_prop, &bcs).unwrap();
        assert_eq!(
            solver
                .transport_solve(&grid, &res_prop, &bcs, &mut s, 1.0, [0.0; 3], &flow, &[0.0])
                .err(),
            Some("saturation and injection must have one value per cell")
        );
        assert_eq!(
            solver
                .transport_solve(&grid, &res_prop, &bcs, &mut s, -1.0, [0.0; 3], &flow, &q)
                .err(),
            Some("transport time step must be ≥ 0.0")
        );
    }

    #[test]
    fn transport_solve_limits_substeps() {
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.5, [1.0; 3]);
        let bcs = setup_upscaling_conditions(&grid, BcType::Fixed, 0, 1.0, 1.0).unwrap();
        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        for face in &grid.faces {
            if face.axis == 0 {
                flow.face_flux[face.index] = 1.0;
            }
        }
        let mut config = Config::new();
        config.set_transport_max_substeps(3).unwrap();
        let mut solver = TransportSolver::new();
        solver.init(&config);
        solver.init_obj(&grid, &res_prop, &bcs).unwrap();
        let mut s = vec![0.0; 2];
        let q = vec![0.0; 2];
        // max rate = 1 / 0.5 = 2, dfw/ds = 1, cfl = 0.5 → dt_cfl = 0.25
        let n = solver
            .transport_solve(&grid, &res_prop, &bcs, &mut s, 0.7, [0.0; 3], &flow, &q)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(
            solver
                .transport_solve(&grid, &res_prop, &bcs, &mut s, 1.0, [0.0; 3], &flow, &q)
                .err(),
            Some("transport solver requires too many sub-steps")
        );
        assert_eq!(solver.n_substep_total(), 3);
    }

    #[test]
    fn upwind_transport_works() {
        // unit flux along x, porosity 0.5, linear fractional flow (fw = s)
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.5, [1.0; 3]);
        let bcs = setup_upscaling_conditions(&grid, BcType::Fixed, 0, 1.0, 1.0).unwrap();
        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        for face in &grid.faces {
            if face.axis == 0 {
                flow.face_flux[face.index] = 1.0;
            }
        }
        let mut solver = TransportSolver::new();
        solver.init(&Config::new());
        solver.init_obj(&grid, &res_prop, &bcs).unwrap();
        let mut s = vec![0.0; 2];
        let q = vec![0.0; 2];
        // one sub-step of dt = 0.2: cell 0 receives fw(1) = 1 → s0 = 0.2 · 1 / 0.5 = 0.4
        let n = solver
            .transport_solve(&grid, &res_prop, &bcs, &mut s, 0.2, [0.0; 3], &flow, &q)
            .unwrap();
        assert_eq!(n, 1);
        approx_eq(s[0], 0.4, 1e-15);
        approx_eq(s[1], 0.0, 1e-15);
        // second step: s0 += 0.2 (1 - 0.4) / 0.5, s1 += 0.2 (0.4 - 0) / 0.5
        solver
            .transport_solve(&grid, &res_prop, &bcs, &mut s, 0.2, [0.0; 3], &flow, &q)
            .unwrap();
        approx_eq(s[0], 0.64, 1e-14);
        approx_eq(s[1], 0.16, 1e-14);
        // long runs reach the boundary saturation without overshooting
        solver
            .transport_solve(&grid, &res_prop, &bcs, &mut s, 20.0, [0.0; 3], &flow, &q)
            .unwrap();
        assert!(s.iter().all(|v| *v >= 0.0 && *v <= 1.0));
        approx_eq(s[1], 1.0, 1e-6);
    }

    #[test]
    fn periodic_transport_conserves_water() {
        // periodic column: the water leaving the +x face re-enters through the -x face
        let grid = Samples::grid_column_x(4);
        let res_prop = Samples::property_linear(&grid, 0.2, [1.0; 3]);
        let bcs = setup_upscaling_conditions(&grid, BcType::Periodic, 0, 1.0, 0.0).unwrap();
        let mut flow = FlowSolution::new(grid.nface(), grid.ncell());
        for face in &grid.faces {
            if face.axis == 0 {
                flow.face_flux[face.index] = 0.1;
            }
        }
        let mut solver = TransportSolver::new();
        solver.init(&Config::new());
        solver.init_obj(&grid, &res_prop, &bcs).unwrap();
        let mut s = vec![0.8, 0.4, 0.0, 0.2];
        let q = vec![0.0; 4];
        let before: f64 = s.iter().sum();
        solver
            .transport_solve(&grid, &res_prop, &bcs, &mut s, 3.0, [0.0; 3], &flow, &q)
            .unwrap();
        let after: f64 = s.iter().sum();
        approx_eq(after, before, 1e-14);
    }
}
