use super::{BoundaryConditions, FlowBc, FlowSolution};
use crate::base::NDIM;
use crate::grid::CartesianGrid;
use crate::material::{MobilityField, ReservoirProperty};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{CooMatrix, Genie, LinSolver, Sym};

/// Solves the incompressible pressure equation with a two-point flux approximation
///
/// The mobility-weighted transmissibility between two cells is the harmonic combination of the
/// half-cell conductances `λ K A / (h/2)`. The unknowns are the cell pressures.
pub struct PressureSolver {
    /// Diagonal permeability of each cell (cached at init)
    permeability: Vec<[f64; NDIM]>,

    /// Indicates that the first cell must be pinned because there are no prescribed pressures
    pin_first_cell: bool,

    /// Linear solver kind
    genie: Genie,

    /// Linear solver (allocated at init)
    solver: Option<LinSolver<'static>>,

    /// Latest solution
    solution: FlowSolution,

    /// Number of solves since init
    n_solve: usize,
}

impl PressureSolver {
    /// Allocates a new (uninitialized) instance
    pub fn new() -> Self {
        PressureSolver {
            permeability: Vec::new(),
            pin_first_cell: false,
            genie: Genie::Umfpack,
            solver: None,
            solution: FlowSolution::new(0, 0),
            n_solve: 0,
        }
    }

    /// Prepares the solver for a grid and a set of boundary conditions
    pub fn init(
        &mut self,
        grid: &CartesianGrid,
        res_prop: &ReservoirProperty,
        gravity: [f64; NDIM],
        bcs: &BoundaryConditions,
        genie: Genie,
    ) -> Result<(), StrError> {
        if res_prop.ncell() != grid.ncell() {
            return Err("reservoir property and grid must have the same number of cells");
        }
        if bcs.len() != grid.n_boundary_face() {
            return Err("boundary conditions must cover all boundary faces");
        }
        if gravity.iter().any(|g| *g != 0.0) {
            println!("WARNING: gravity is not handled by the pressure solver");
        }
        self.permeability = (0..grid.ncell()).map(|c| *res_prop.permeability(c)).collect();
        self.pin_first_cell = !bcs.has_dirichlet_pressure();
        self.genie = genie;
        self.solver = Some(LinSolver::new(genie)?);
        self.solution = FlowSolution::new(grid.nface(), grid.ncell());
        self.n_solve = 0;
        Ok(())
    }

    /// Returns the latest solution
    pub fn solution(&self) -> &FlowSolution {
        &self.solution
    }

    /// Returns the number of solves since the last init
    pub fn n_solve(&self) -> usize {
        self.n_solve
    }

    /// Solves the pressure equation for the given mobility and saturation
    ///
    /// # Input
    ///
    /// * `grid` -- the block
    /// * `mobility` -- total mobility (e.g., the reservoir property or a fixed mobility)
    /// * `saturation` -- saturation of each cell
    /// * `bcs` -- the same boundary conditions given to `init`
    /// * `source` -- volumetric source of each cell (positive means injection)
    /// * `tolerance` -- tolerance on the max-norm of the residual (relative to max(1, |b|))
    /// * `verbose` -- verbose mode of the linear solver
    pub fn solve(
        &mut self,
        grid: &CartesianGrid,
        mobility: &dyn MobilityField,
        saturation: &[f64],
        bcs: &BoundaryConditions,
        source: &[f64],
        tolerance: f64,
        verbose: bool,
    ) -> Result<(), StrError> {
        let ncell = grid.ncell();
        if self.permeability.len() != ncell || self.solver.is_none() {
            return Err("pressure solver must be initialized first");
        }
        if saturation.len() != ncell || source.len() != ncell {
            return Err("saturation and source must have one value per cell");
        }

        // half-cell conductances
        let half = |c: usize, axis: usize| -> f64 {
            let area = grid.faces[grid.cells[c].faces[2 * axis]].area;
            let lambda = mobility.total_mobility(c, saturation[c]);
            lambda * self.permeability[c][axis] * area / (0.5 * grid.cell_size[axis])
        };
        let harmonic = |a: f64, b: f64| if a > 0.0 && b > 0.0 { a * b / (a + b) } else { 0.0 };

        // assemble the triplets and the right-hand side
        let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
        let mut rhs = Vector::new(ncell);
        for c in 0..ncell {
            rhs[c] = source[c];
        }
        let mut trans = vec![0.0; grid.nface()];
        for face in &grid.faces {
            let axis = face.axis;
            match (face.cell_minus, face.cell_plus, face.boundary_id) {
                (Some(m), Some(p), _) => {
                    let t = harmonic(half(m, axis), half(p, axis));
                    trans[face.index] = t;
                    triplets.push((m, m, t));
                    triplets.push((p, p, t));
                    triplets.push((m, p, -t));
                    triplets.push((p, m, -t));
                }
                (_, _, Some(bid)) => {
                    let c = grid.boundary[bid].cell;
                    match bcs.flow_cond(bid) {
                        FlowBc::Dirichlet(pb) => {
                            let t = half(c, axis);
                            trans[face.index] = t;
                            triplets.push((c, c, t));
                            rhs[c] += t * pb;
                        }
                        FlowBc::Neumann(q) => {
                            rhs[c] -= q;
                        }
                        FlowBc::Periodic { partner, pressure_jump } => {
                            let cp = grid.boundary[*partner].cell;
                            let t = harmonic(half(c, axis), half(cp, axis));
                            trans[face.index] = t;
                            triplets.push((c, c, t));
                            triplets.push((c, cp, -t));
                            rhs[c] += t * pressure_jump;
                        }
                    }
                }
                _ => return Err("face without cells found in the grid"),
            }
        }
        if self.pin_first_cell {
            // fix the pressure level of blocks without prescribed pressures (p₀ = 0)
            let t_max = trans.iter().fold(0.0, |acc, t| f64::max(acc, *t));
            triplets.push((0, 0, if t_max > 0.0 { t_max } else { 1.0 }));
        }

        // solve the linear system
        let mut kk = CooMatrix::new(ncell, ncell, triplets.len(), Sym::No)?;
        for (i, j, v) in &triplets {
            kk.put(*i, *j, *v)?;
        }
        let mut pp = Vector::new(ncell);
        let solver = self.solver.as_mut().ok_or("pressure solver must be initialized first")?;
        solver.actual.factorize(&mut kk, None)?;
        solver.actual.solve(&mut pp, &rhs, verbose)?;

        // check the residual
        let mut rr = rhs.clone();
        for (i, j, v) in &triplets {
            rr[*i] -= v * pp[*j];
        }
        let max_b = (0..ncell).fold(1.0, |acc, i| f64::max(acc, f64::abs(rhs[i])));
        let max_r = (0..ncell).fold(0.0, |acc, i| f64::max(acc, f64::abs(rr[i])));
        if !(max_r <= tolerance * max_b) {
            return Err("pressure solver did not converge");
        }

        // compute face fluxes along the face normals
        for c in 0..ncell {
            self.solution.pressure[c] = pp[c];
        }
        for face in &grid.faces {
            let t = trans[face.index];
            let flux = match (face.cell_minus, face.cell_plus, face.boundary_id) {
                (Some(m), Some(p), _) => t * (pp[m] - pp[p]),
                (_, _, Some(bid)) => {
                    let c = grid.boundary[bid].cell;
                    let out = match bcs.flow_cond(bid) {
                        FlowBc::Dirichlet(pb) => t * (pp[c] - pb),
                        FlowBc::Neumann(q) => *q,
                        FlowBc::Periodic { partner, pressure_jump } => {
                            let cp = grid.boundary[*partner].cell;
                            t * (pp[c] - pp[cp] - pressure_jump)
                        }
                    };
                    grid.outward_sign(c, face.index) * out
                }
                _ => 0.0,
            };
            self.solution.face_flux[face.index] = flux;
        }
        self.n_solve += 1;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
