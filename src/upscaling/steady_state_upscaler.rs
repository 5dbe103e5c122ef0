use super::{compute_cap_pressure, compute_in_out_flows, compute_phase_velocities, estimate_cell_velocities};
use super::{cell_pressures, mobility_from_effective_perm, rel_perm_from_mobility, setup_upscaling_conditions};
use super::{CellField, DiagnosticSink, SinglePhaseUpscaler, TransportSolver, VtuWriter};
use crate::base::{Config, NDIM};
use crate::grid::CartesianGrid;
use crate::material::{FixedMobility, ReservoirProperty};
use crate::StrError;
use russell_lab::Matrix;

/// Computes upscaled relative permeability tensors by running a block to steady state
///
/// A fixed number of transport and pressure steps is performed under boundary-driven flow
/// along one axis. The final saturation yields per-cell phase mobilities whose effective
/// permeabilities are converted into relative permeability tensors:
///
/// ```text
/// λ  = K_eff · K⁻¹
/// kr = λ · μ
/// ```
///
/// where `K` is the single-phase upscaled permeability.
pub struct SteadyStateUpscaler {
    /// Single-phase upscaler (grid, property, configuration, and pressure solver)
    pub single: SinglePhaseUpscaler,

    /// Transport solver
    transport_solver: TransportSolver,

    /// Final saturation of the latest run for each flow direction (empty if none)
    last_saturations: [Vec<f64>; NDIM],

    /// Identifier used in the names of diagnostic files
    run_id: usize,

    /// Receives the diagnostic fields if output_vtk is enabled
    sink: Box<dyn DiagnosticSink>,
}

impl SteadyStateUpscaler {
    /// Allocates a new instance
    ///
    /// The viscosities and densities given in the configuration replace those of `res_prop`.
    pub fn new(grid: CartesianGrid, mut res_prop: ReservoirProperty, config: Config) -> Result<Self, StrError> {
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate upscaler because config.validate() failed");
        }
        let mu1 = config.viscosity1.unwrap_or(res_prop.viscosity_first_phase());
        let mu2 = config.viscosity2.unwrap_or(res_prop.viscosity_second_phase());
        res_prop.set_viscosities(mu1, mu2)?;
        let rho1 = config.density1.unwrap_or(res_prop.density_first_phase());
        let rho2 = config.density2.unwrap_or(res_prop.density_second_phase());
        res_prop.set_densities(rho1, rho2)?;
        let mut transport_solver = TransportSolver::new();
        transport_solver.init(&config);
        let sink = Box::new(VtuWriter::new(&config.out_dir));
        Ok(SteadyStateUpscaler {
            single: SinglePhaseUpscaler::new(grid, res_prop, config)?,
            transport_solver,
            last_saturations: [Vec::new(), Vec::new(), Vec::new()],
            run_id: 0,
            sink,
        })
    }

    /// Returns the grid
    pub fn grid(&self) -> &CartesianGrid {
        &self.single.grid
    }

    /// Returns the reservoir property
    pub fn res_prop(&self) -> &ReservoirProperty {
        &self.single.res_prop
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.single.config
    }

    /// Sets the identifier used in the names of diagnostic files
    pub fn set_run_id(&mut self, run_id: usize) -> &mut Self {
        self.run_id = run_id;
        self
    }

    /// Replaces the receiver of diagnostic fields
    pub fn set_diagnostic_sink(&mut self, sink: Box<dyn DiagnosticSink>) -> &mut Self {
        self.sink = sink;
        self
    }

    /// Computes the single-phase upscaled permeability tensor
    pub fn upscale_single_phase(&mut self) -> Result<Matrix, StrError> {
        self.single.upscale_single_phase()
    }

    /// Runs the block to steady state and computes the upscaled relative permeabilities
    ///
    /// # Input
    ///
    /// * `flow_direction` -- axis of the imposed pressure drop (0, 1, or 2)
    /// * `initial_saturation` -- saturation of each cell at the beginning
    /// * `boundary_saturation` -- saturation of the fluid entering through Dirichlet faces
    /// * `pressure_drop` -- pressure drop along the flow direction
    /// * `upscaled_perm` -- single-phase upscaled permeability tensor (must be invertible)
    ///
    /// # Output
    ///
    /// Returns `(kr_water, kr_oil)`, two 3×3 relative permeability tensors.
    ///
    /// The final saturation is stored (see [SteadyStateUpscaler::last_saturations]) only if
    /// the whole computation succeeds.
    pub fn upscale_steady_state(
        &mut self,
        flow_direction: usize,
        initial_saturation: &[f64],
        boundary_saturation: f64,
        pressure_drop: f64,
        upscaled_perm: &Matrix,
    ) -> Result<(Matrix, Matrix), StrError> {
        let ncell = self.single.grid.ncell();
        if initial_saturation.len() != ncell {
            return Err("initial saturation must have one value per cell");
        }
        let config = self.single.config.clone();
        let source = vec![0.0; ncell];
        let injection = vec![0.0; ncell];
        let mut saturation = initial_saturation.to_vec();

        // boundary conditions
        let bcs = setup_upscaling_conditions(
            &self.single.grid,
            config.bc_type,
            flow_direction,
            pressure_drop,
            boundary_saturation,
        )?;

        // solvers
        self.single.flow_solver.init(
            &self.single.grid,
            &self.single.res_prop,
            config.gravity,
            &bcs,
            config.lin_sol_genie,
        )?;
        self.transport_solver
            .init_obj(&self.single.grid, &self.single.res_prop, &bcs)?;

        // initial flow field
        self.single.flow_solver.solve(
            &self.single.grid,
            &self.single.res_prop,
            &saturation,
            &bcs,
            &source,
            config.residual_tolerance,
            config.linsolver_verbose,
        )?;

        // transport and pressure steps
        if config.verbose {
            print_header(flow_direction);
        }
        for iter in 0..config.simulation_steps {
            let previous = saturation.clone();
            let n_substep = self.transport_solver.transport_solve(
                &self.single.grid,
                &self.single.res_prop,
                &bcs,
                &mut saturation,
                config.stepsize,
                config.gravity,
                self.single.flow_solver.solution(),
                &injection,
            )?;
            self.single.flow_solver.solve(
                &self.single.grid,
                &self.single.res_prop,
                &saturation,
                &bcs,
                &source,
                config.residual_tolerance,
                config.linsolver_verbose,
            )?;
            if config.verbose {
                let ds = previous
                    .iter()
                    .zip(&saturation)
                    .fold(0.0, |acc, (a, b)| f64::max(acc, f64::abs(b - a)));
                println!("{:>8} {:>9} {:>13.6e}", iter, n_substep, ds);
            }
            if config.print_inoutflows {
                let ((w_in, w_out), (o_in, o_out)) = compute_in_out_flows(
                    &self.single.grid,
                    &self.single.res_prop,
                    &bcs,
                    self.single.flow_solver.solution(),
                    &saturation,
                )?;
                println!("Pressure step {}", iter);
                println!("Water flow [in] {:?}  [out] {:?}", w_in, w_out);
                println!("Oil flow   [in] {:?}  [out] {:?}", o_in, o_out);
            }
            if config.output_vtk {
                if let Err(msg) = self.write_diagnostics(flow_direction, iter, &saturation) {
                    println!("WARNING: cannot write diagnostic output: {}", msg);
                }
            }
        }
        if config.verbose {
            println!("{}", "─".repeat(32));
        }

        // phase mobilities and effective permeabilities
        let (mob1, mob2) = self.compute_phase_mobilities(&saturation);
        let eff_kw = self.single.upscale_effective_perm(&FixedMobility::new(mob1)?)?;
        let eff_ko = self.single.upscale_effective_perm(&FixedMobility::new(mob2)?)?;

        // relative permeabilities
        let lambda_w = mobility_from_effective_perm(&eff_kw, upscaled_perm)?;
        let lambda_o = mobility_from_effective_perm(&eff_ko, upscaled_perm)?;
        let kr_w = rel_perm_from_mobility(&lambda_w, self.single.res_prop.viscosity_first_phase())?;
        let kr_o = rel_perm_from_mobility(&lambda_o, self.single.res_prop.viscosity_second_phase())?;

        // done
        self.last_saturations[flow_direction] = saturation;
        Ok((kr_w, kr_o))
    }

    /// Computes the phase mobilities of all cells, floored at `relperm_threshold / μ`
    pub fn compute_phase_mobilities(&self, saturation: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let res_prop = &self.single.res_prop;
        let threshold = self.single.config.relperm_threshold;
        let mob1_threshold = threshold / res_prop.viscosity_first_phase();
        let mob2_threshold = threshold / res_prop.viscosity_second_phase();
        let mut mob1 = Vec::with_capacity(saturation.len());
        let mut mob2 = Vec::with_capacity(saturation.len());
        for (c, s) in saturation.iter().enumerate() {
            mob1.push(f64::max(res_prop.mobility_first_phase(c, *s), mob1_threshold));
            mob2.push(f64::max(res_prop.mobility_second_phase(c, *s), mob2_threshold));
        }
        (mob1, mob2)
    }

    /// Returns the final saturations of the latest run for each flow direction
    ///
    /// An entry is empty if no run has been completed for that direction.
    pub fn last_saturations(&self) -> &[Vec<f64>; NDIM] {
        &self.last_saturations
    }

    /// Returns the pore-volume weighted average of the latest saturation for a flow direction
    ///
    /// ```text
    /// s̄ = Σ(V φ s) / Σ(V φ)
    /// ```
    pub fn last_saturation_upscaled(&self, flow_direction: usize) -> Result<f64, StrError> {
        if flow_direction >= NDIM {
            return Err("flow direction must be 0, 1, or 2");
        }
        let saturation = &self.last_saturations[flow_direction];
        if saturation.is_empty() {
            return Err("no steady-state saturation stored for this flow direction");
        }
        let mut pore_vol = 0.0;
        let mut sat_vol = 0.0;
        for cell in &self.single.grid.cells {
            let v = cell.volume * self.single.res_prop.porosity(cell.index);
            pore_vol += v;
            sat_vol += v * saturation[cell.index];
        }
        Ok(sat_vol / pore_vol)
    }

    /// Sends the diagnostic fields of one step to the sink
    fn write_diagnostics(
        &mut self,
        flow_direction: usize,
        iter: usize,
        saturation: &[f64],
    ) -> Result<(), StrError> {
        let grid = &self.single.grid;
        let res_prop = &self.single.res_prop;
        let flow = self.single.flow_solver.solution();
        let velocity = estimate_cell_velocities(grid, flow);
        let (water, oil) = compute_phase_velocities(res_prop, saturation, &velocity);
        let fields = [
            CellField::vector("velocity", &velocity),
            CellField::vector("phase velocity [water]", &water),
            CellField::vector("phase velocity [oil]", &oil),
            CellField::scalar("saturation", saturation),
            CellField::scalar("pressure", &cell_pressures(grid, flow)),
            CellField::scalar("capillary pressure", &compute_cap_pressure(res_prop, saturation)),
        ];
        let name = format!("output-steadystate-{}-{}-{}", self.run_id, flow_direction, iter);
        self.sink.write_step(grid, &name, &fields)
    }
}

/// Prints the header of the iteration table
fn print_header(flow_direction: usize) {
    println!(
        "\nRELPERM_UPSCALE === STEADY STATE ALONG AXIS {} =========",
        flow_direction
    );
    println!("{}", "─".repeat(32));
    println!("{:>8} {:>9} {:>13}", "iter", "substeps", "max|Δs|");
    println!("{}", "─".repeat(32));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SteadyStateUpscaler;
    use crate::base::{Config, Samples};
    use crate::grid::CartesianGrid;
    use crate::upscaling::{CellField, DiagnosticSink};
    use crate::StrError;
    use russell_lab::{approx_eq, mat_approx_eq};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        names: Rc<RefCell<Vec<String>>>,
    }

    impl DiagnosticSink for Recorder {
        fn write_step(&mut self, grid: &CartesianGrid, name: &str, fields: &[CellField]) -> Result<(), StrError> {
            assert_eq!(fields.len(), 6);
            assert_eq!(fields[3].name, "saturation");
            assert_eq!(fields[3].values.len(), grid.ncell());
            self.names.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    struct Failing;

    impl DiagnosticSink for Failing {
        fn write_step(&mut self, _: &CartesianGrid, _: &str, _: &[CellField]) -> Result<(), StrError> {
            Err("sink is broken")
        }
    }

    #[test]
    fn new_captures_errors() {
        let grid = Samples::grid_single_cell();
        let res_prop = Samples::property_corey(&grid, 1.0, [1.0; 3]);
        let mut config = Config::new();
        config.stepsize = 0.0;
        assert_eq!(
            SteadyStateUpscaler::new(grid, res_prop, config).err(),
            Some("cannot allocate upscaler because config.validate() failed")
        );
    }

    #[test]
    fn new_applies_fluid_overrides() {
        let grid = Samples::grid_single_cell();
        let res_prop = Samples::property_corey(&grid, 1.0, [1.0; 3]);
        let mut config = Config::new();
        config.set_viscosities(Some(2e-3), None).unwrap();
        config.set_densities(None, Some(900.0)).unwrap();
        let upscaler = SteadyStateUpscaler::new(grid, res_prop, config).unwrap();
        assert_eq!(upscaler.res_prop().viscosity_first_phase(), 2e-3);
        assert_eq!(upscaler.res_prop().viscosity_second_phase(), 3e-3);
        assert_eq!(upscaler.res_prop().density_first_phase(), 1000.0);
        assert_eq!(upscaler.res_prop().density_second_phase(), 900.0);
    }

    #[test]
    fn upscale_steady_state_captures_errors() {
        let grid = Samples::grid_single_cell();
        let res_prop = Samples::property_corey(&grid, 1.0, [1.0; 3]);
        let mut config = Config::new();
        config.stepsize = 1e-3;
        let mut upscaler = SteadyStateUpscaler::new(grid, res_prop, config).unwrap();
        let kk = crate::upscaling::diagonal_tensor(&[1.0, 1.0, 1.0]);
        assert_eq!(
            upscaler.upscale_steady_state(0, &[0.0, 0.0], 0.0, 1.0, &kk).err(),
            Some("initial saturation must have one value per cell")
        );
        assert_eq!(
            upscaler.upscale_steady_state(3, &[0.0], 0.0, 1.0, &kk).err(),
            Some("flow direction must be 0, 1, or 2")
        );
        let singular = crate::upscaling::diagonal_tensor(&[1.0, 0.0, 1.0]);
        assert_eq!(
            upscaler.upscale_steady_state(0, &[0.0], 0.0, 1.0, &singular).err(),
            Some("cannot invert singular permeability tensor")
        );
        // nothing is stored after a failure
        assert_eq!(upscaler.last_saturations()[0].len(), 0);
        assert_eq!(
            upscaler.last_saturation_upscaled(0).err(),
            Some("no steady-state saturation stored for this flow direction")
        );
        assert_eq!(
            upscaler.last_saturation_upscaled(3).err(),
            Some("flow direction must be 0, 1, or 2")
        );
    }

    #[test]
    fn phase_mobilities_are_floored() {
        let grid = Samples::grid_column_x(3);
        let res_prop = Samples::property_corey(&grid, 0.3, [1.0; 3]);
        let mut config = Config::new();
        config.set_relperm_threshold(1e-3).unwrap();
        let upscaler = SteadyStateUpscaler::new(grid, res_prop, config).unwrap();
        let (mob1, mob2) = upscaler.compute_phase_mobilities(&[0.0, 0.5, 1.0]);
        let floor1 = 1e-3 / 1e-3;
        let floor2 = 1e-3 / 3e-3;
        for c in 0..3 {
            assert!(mob1[c] >= floor1);
            assert!(mob2[c] >= floor2);
        }
        approx_eq(mob1[0], floor1, 1e-15);
        approx_eq(mob1[1], 0.25 / 1e-3, 1e-10);
        approx_eq(mob2[1], 0.25 / 3e-3, 1e-10);
        approx_eq(mob2[2], floor2, 1e-15);
    }

    #[test]
    fn diagnostics_are_sent_to_the_sink() {
        let grid = Samples::grid_column_x(2);
        let res_prop = Samples::property_linear(&grid, 0.5, [1.0; 3]);
        let mut config = Config::new();
        config.set_output_vtk(true).set_simulation_steps(2);
        config.stepsize = 0.1;
        let mut upscaler = SteadyStateUpscaler::new(grid, res_prop, config).unwrap();
        let names = Rc::new(RefCell::new(Vec::new()));
        upscaler
            .set_run_id(7)
            .set_diagnostic_sink(Box::new(Recorder { names: names.clone() }));
        let kk = upscaler.upscale_single_phase().unwrap();
        upscaler.upscale_steady_state(0, &[0.0, 0.0], 1.0, 1.0, &kk).unwrap();
        assert_eq!(
            *names.borrow(),
            &["output-steadystate-7-0-0", "output-steadystate-7-0-1"]
        );

        // a failing sink does not affect the results
        let (kr_w, kr_o) = upscaler.upscale_steady_state(1, &[0.5, 0.5], 0.5, 1.0, &kk).unwrap();
        upscaler.set_diagnostic_sink(Box::new(Failing));
        let (kr_w_bis, kr_o_bis) = upscaler.upscale_steady_state(1, &[0.5, 0.5], 0.5, 1.0, &kk).unwrap();
        mat_approx_eq(&kr_w, &kr_w_bis, 1e-15);
        mat_approx_eq(&kr_o, &kr_o_bis, 1e-15);
    }
}
