use super::{average_velocity, setup_upscaling_conditions, BoundaryConditions, PressureSolver};
use crate::base::{Config, NDIM};
use crate::grid::CartesianGrid;
use crate::material::{FixedMobility, MobilityField, ReservoirProperty};
use crate::StrError;
use russell_lab::Matrix;

/// Defines the pressure drop used to extract effective permeabilities
const UNIT_PRESSURE_DROP: f64 = 1.0;

/// Computes single-phase (effective) permeability tensors of a block
pub struct SinglePhaseUpscaler {
    /// The block
    pub grid: CartesianGrid,

    /// Rock and fluid properties
    pub res_prop: ReservoirProperty,

    /// Configuration (boundary-condition type, tolerances, linear solver)
    pub config: Config,

    /// Boundary conditions of the latest pressure direction
    pub bcond: BoundaryConditions,

    /// Pressure solver
    pub flow_solver: PressureSolver,
}

impl SinglePhaseUpscaler {
    /// Allocates a new instance
    pub fn new(grid: CartesianGrid, res_prop: ReservoirProperty, config: Config) -> Result<Self, StrError> {
        if res_prop.ncell() != grid.ncell() {
            return Err("reservoir property and grid must have the same number of cells");
        }
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate upscaler because config.validate() failed");
        }
        Ok(SinglePhaseUpscaler {
            grid,
            res_prop,
            config,
            bcond: BoundaryConditions::new(),
            flow_solver: PressureSolver::new(),
        })
    }

    /// Computes the effective permeability tensor for a given mobility field
    ///
    /// For each direction `j`, a unit pressure drop is applied along `j` and the average
    /// velocity `v̄` yields the column `K(i,j) = v̄_i · L_j / Δp`.
    pub fn upscale_effective_perm(&mut self, mobility: &dyn MobilityField) -> Result<Matrix, StrError> {
        let ncell = self.grid.ncell();
        let saturation = vec![0.0; ncell];
        let source = vec![0.0; ncell];
        let mut kk = Matrix::new(NDIM, NDIM);
        for j in 0..NDIM {
            self.bcond = setup_upscaling_conditions(&self.grid, self.config.bc_type, j, UNIT_PRESSURE_DROP, 0.0)?;
            self.flow_solver.init(
                &self.grid,
                &self.res_prop,
                self.config.gravity,
                &self.bcond,
                self.config.lin_sol_genie,
            )?;
            self.flow_solver.solve(
                &self.grid,
                mobility,
                &saturation,
                &self.bcond,
                &source,
                self.config.residual_tolerance,
                self.config.linsolver_verbose,
            )?;
            let v = average_velocity(&self.grid, self.flow_solver.solution());
            let length = self.grid.length(j);
            for i in 0..NDIM {
                kk.set(i, j, v[i] * length / UNIT_PRESSURE_DROP);
            }
        }
        Ok(kk)
    }

    /// Computes the single-phase upscaled permeability tensor (unit mobility)
    pub fn upscale_single_phase(&mut self) -> Result<Matrix, StrError> {
        let unit = FixedMobility::uniform(self.grid.ncell(), 1.0)?;
        self.upscale_effective_perm(&unit)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SinglePhaseUpscaler;
    use crate::base::{BcType, Config, Samples};
    use crate::material::FixedMobility;
    use russell_lab::mat_approx_eq;

    #[test]
    fn new_captures_errors() {
        let grid = Samples::grid_column_x(2);
        let other = Samples::grid_column_x(3);
        let res_prop = Samples::property_linear(&other, 0.2, [1.0; 3]);
        assert_eq!(
            SinglePhaseUpscaler::new(grid, res_prop, Config::new()).err(),
            Some("reservoir property and grid must have the same number of cells")
        );
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.2, [1.0; 3]);
        let mut config = Config::new();
        config.transport_cfl = 0.0;
        assert_eq!(
            SinglePhaseUpscaler::new(grid, res_prop, config).err(),
            Some("cannot allocate upscaler because config.validate() failed")
        );
    }

    #[test]
    fn homogeneous_anisotropic_block_works() {
        for bc_type in [BcType::Fixed, BcType::Mixed, BcType::Periodic] {
            let grid = Samples::grid_small_block();
            let res_prop = Samples::property_linear(&grid, 0.2, [1.0, 2.0, 3.0]);
            let mut config = Config::new();
            config.set_bc_type(bc_type);
            let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, config).unwrap();
            let kk = upscaler.upscale_single_phase().unwrap();
            mat_approx_eq(&kk, &[[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 3.0]], 1e-12);
        }
    }

    #[test]
    fn fixed_mobility_scales_the_tensor() {
        let grid = Samples::grid_small_block();
        let res_prop = Samples::property_linear(&grid, 0.2, [1.0, 2.0, 3.0]);
        let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, Config::new()).unwrap();
        let mobility = FixedMobility::uniform(24, 0.25).unwrap();
        let kk = upscaler.upscale_effective_perm(&mobility).unwrap();
        mat_approx_eq(&kk, &[[0.25, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 0.75]], 1e-12);
    }

    #[test]
    fn layered_block_works() {
        // layers stacked along z: arithmetic mean along x and y, harmonic mean along z
        let grid = crate::grid::CartesianGrid::new([2, 2, 2], [1.0, 1.0, 1.0]).unwrap();
        let res_prop = Samples::property_layered(&grid, 0.2, &[[1.0; 3], [4.0; 3]]);
        let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, Config::new()).unwrap();
        let kk = upscaler.upscale_single_phase().unwrap();
        let arithmetic = 2.5;
        let harmonic = 2.0 / (1.0 / 1.0 + 1.0 / 4.0);
        mat_approx_eq(
            &kk,
            &[[arithmetic, 0.0, 0.0], [0.0, arithmetic, 0.0], [0.0, 0.0, harmonic]],
            1e-12,
        );
    }
}
