use super::{BcType, ParamOptions, DEFAULT_OUT_DIR, UNIT_DAY};
use crate::StrError;
use russell_sparse::Genie;
use std::fmt;

/// Holds configuration data for the steady-state upscaling
#[derive(Clone, Debug)]
pub struct Config {
    /// Writes VTU files with cell velocities, pressures, and saturations after each iteration
    pub output_vtk: bool,

    /// Prints a summary of the boundary in/out flows after each iteration
    pub print_inoutflows: bool,

    /// Fixed number of pressure/transport iterations
    pub simulation_steps: usize,

    /// Transport step size (in seconds)
    pub stepsize: f64,

    /// Numerator of the mobility floor (relperm_threshold / viscosity)
    pub relperm_threshold: f64,

    /// Overrides the viscosity of the first phase
    pub viscosity1: Option<f64>,

    /// Overrides the viscosity of the second phase
    pub viscosity2: Option<f64>,

    /// Overrides the density of the first phase
    pub density1: Option<f64>,

    /// Overrides the density of the second phase
    pub density2: Option<f64>,

    /// Boundary condition type
    pub bc_type: BcType,

    /// Tolerance on the (max-norm) residual of the pressure system
    pub residual_tolerance: f64,

    /// Verbose mode of the linear solver
    pub linsolver_verbose: bool,

    /// Linear solver of the pressure system
    pub lin_sol_genie: Genie,

    /// Gravity vector (not handled by the solvers yet)
    pub gravity: [f64; 3],

    /// Courant number of the explicit transport sub-steps (0 < cfl ≤ 1)
    pub transport_cfl: f64,

    /// Maximum number of transport sub-steps per step
    pub transport_max_substeps: usize,

    /// Prints iteration data
    pub verbose: bool,

    /// Directory for the VTU files
    pub out_dir: String,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            output_vtk: false,
            print_inoutflows: false,
            simulation_steps: 10,
            stepsize: 0.1 * UNIT_DAY,
            relperm_threshold: 1.0e-4,
            viscosity1: None,
            viscosity2: None,
            density1: None,
            density2: None,
            bc_type: BcType::Mixed,
            residual_tolerance: 1e-8,
            linsolver_verbose: false,
            lin_sol_genie: Genie::Umfpack,
            gravity: [0.0, 0.0, 0.0],
            transport_cfl: 0.5,
            transport_max_substeps: 10_000,
            verbose: false,
            out_dir: DEFAULT_OUT_DIR.to_string(),
        }
    }

    /// Allocates a new instance from the options of an input file
    pub fn from_options(options: &ParamOptions) -> Result<Self, StrError> {
        let mut config = Config::new();
        if let Some(flag) = options.output_vtk {
            config.set_output_vtk(flag);
        }
        if let Some(flag) = options.print_inoutflows {
            config.set_print_inoutflows(flag);
        }
        if let Some(n) = options.simulation_steps {
            config.set_simulation_steps(n);
        }
        if let Some(days) = options.stepsize {
            config.set_stepsize_days(days)?;
        }
        if let Some(value) = options.relperm_threshold {
            config.set_relperm_threshold(value)?;
        }
        if options.viscosity1.is_some() || options.viscosity2.is_some() {
            config.set_viscosities(options.viscosity1, options.viscosity2)?;
        }
        if options.density1.is_some() || options.density2.is_some() {
            config.set_densities(options.density1, options.density2)?;
        }
        if let Some(bc_type) = options.bc_type {
            config.set_bc_type(bc_type);
        }
        if let Some(value) = options.residual_tolerance {
            config.set_residual_tolerance(value)?;
        }
        if let Some(name) = &options.linear_solver {
            config.lin_sol_genie = match name.to_lowercase().as_str() {
                "umfpack" => Genie::Umfpack,
                "klu" => Genie::Klu,
                "mumps" => Genie::Mumps,
                _ => return Err("linear_solver must be umfpack, klu, or mumps"),
            };
        }
        if let Some(value) = options.transport_cfl {
            config.set_transport_cfl(value)?;
        }
        if let Some(n) = options.transport_max_substeps {
            config.set_transport_max_substeps(n)?;
        }
        if let Some(dir) = &options.out_dir {
            config.out_dir = dir.clone();
        }
        Ok(config)
    }

    /// Enables the output of VTU files
    pub fn set_output_vtk(&mut self, flag: bool) -> &mut Self {
        self.output_vtk = flag;
        self
    }

    /// Enables printing the in/out flows
    pub fn set_print_inoutflows(&mut self, flag: bool) -> &mut Self {
        self.print_inoutflows = flag;
        self
    }

    /// Sets the number of pressure/transport iterations
    pub fn set_simulation_steps(&mut self, n: usize) -> &mut Self {
        self.simulation_steps = n;
        self
    }

    /// Sets the transport step size given in days
    pub fn set_stepsize_days(&mut self, days: f64) -> Result<&mut Self, StrError> {
        if days <= 0.0 {
            return Err("stepsize must be > 0.0");
        }
        self.stepsize = days * UNIT_DAY;
        Ok(self)
    }

    /// Sets the relative permeability threshold
    pub fn set_relperm_threshold(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 {
            return Err("relperm_threshold must be ≥ 0.0");
        }
        self.relperm_threshold = value;
        Ok(self)
    }

    /// Overrides the viscosities (None keeps the value of the reservoir property)
    pub fn set_viscosities(&mut self, first: Option<f64>, second: Option<f64>) -> Result<&mut Self, StrError> {
        if first.unwrap_or(1.0) <= 0.0 || second.unwrap_or(1.0) <= 0.0 {
            return Err("viscosities must be > 0.0");
        }
        self.viscosity1 = first;
        self.viscosity2 = second;
        Ok(self)
    }

    /// Overrides the densities (None keeps the value of the reservoir property)
    pub fn set_densities(&mut self, first: Option<f64>, second: Option<f64>) -> Result<&mut Self, StrError> {
        if first.unwrap_or(1.0) <= 0.0 || second.unwrap_or(1.0) <= 0.0 {
            return Err("densities must be > 0.0");
        }
        self.density1 = first;
        self.density2 = second;
        Ok(self)
    }

    /// Sets the boundary condition type
    pub fn set_bc_type(&mut self, bc_type: BcType) -> &mut Self {
        self.bc_type = bc_type;
        self
    }

    /// Sets the tolerance on the residual of the pressure system
    pub fn set_residual_tolerance(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("residual_tolerance must be > 0.0");
        }
        self.residual_tolerance = value;
        Ok(self)
    }

    /// Sets the Courant number of the transport sub-steps
    pub fn set_transport_cfl(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 || value > 1.0 {
            return Err("transport_cfl must satisfy 0.0 < cfl ≤ 1.0");
        }
        self.transport_cfl = value;
        Ok(self)
    }

    /// Sets the maximum number of transport sub-steps
    pub fn set_transport_max_substeps(&mut self, n: usize) -> Result<&mut Self, StrError> {
        if n < 1 {
            return Err("transport_max_substeps must be ≥ 1");
        }
        self.transport_max_substeps = n;
        Ok(self)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.stepsize <= 0.0 {
            return Some(format!("stepsize = {:?} is incorrect; it must be > 0.0", self.stepsize));
        }
        if self.relperm_threshold < 0.0 {
            return Some(format!(
                "relperm_threshold = {:?} is incorrect; it must be ≥ 0.0",
                self.relperm_threshold
            ));
        }
        if self.residual_tolerance <= 0.0 {
            return Some(format!(
                "residual_tolerance = {:?} is incorrect; it must be > 0.0",
                self.residual_tolerance
            ));
        }
        if self.transport_cfl <= 0.0 || self.transport_cfl > 1.0 {
            return Some(format!(
                "transport_cfl = {:?} is incorrect; it must be 0.0 < cfl ≤ 1.0",
                self.transport_cfl
            ));
        }
        if self.transport_max_substeps < 1 {
            return Some(format!(
                "transport_max_substeps = {:?} is incorrect; it must be ≥ 1",
                self.transport_max_substeps
            ));
        }
        for (name, value) in [
            ("viscosity1", self.viscosity1),
            ("viscosity2", self.viscosity2),
            ("density1", self.density1),
            ("density2", self.density2),
        ] {
            if let Some(v) = value {
                if v <= 0.0 {
                    return Some(format!("{} = {:?} is incorrect; it must be > 0.0", name, v));
                }
            }
        }
        None // all good
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n").unwrap();
        write!(f, "==================\n").unwrap();
        write!(f, "output_vtk = {:?}\n", self.output_vtk).unwrap();
        write!(f, "print_inoutflows = {:?}\n", self.print_inoutflows).unwrap();
        write!(f, "simulation_steps = {:?}\n", self.simulation_steps).unwrap();
        write!(f, "stepsize = {:?}\n", self.stepsize).unwrap();
        write!(f, "relperm_threshold = {:?}\n", self.relperm_threshold).unwrap();
        write!(f, "viscosity1 = {:?}\n", self.viscosity1).unwrap();
        write!(f, "viscosity2 = {:?}\n", self.viscosity2).unwrap();
        write!(f, "density1 = {:?}\n", self.density1).unwrap();
        write!(f, "density2 = {:?}\n", self.density2).unwrap();
        write!(f, "bc_type = {:?}\n", self.bc_type).unwrap();
        write!(f, "residual_tolerance = {:?}\n", self.residual_tolerance).unwrap();
        write!(f, "linsolver_verbose = {:?}\n", self.linsolver_verbose).unwrap();
        write!(f, "lin_sol_genie = {:?}\n", self.lin_sol_genie).unwrap();
        write!(f, "gravity = {:?}\n", self.gravity).unwrap();
        write!(f, "transport_cfl = {:?}\n", self.transport_cfl).unwrap();
        write!(f, "transport_max_substeps = {:?}\n", self.transport_max_substeps).unwrap();
        write!(f, "verbose = {:?}\n", self.verbose).unwrap();
        write!(f, "out_dir = {:?}\n", self.out_dir).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
