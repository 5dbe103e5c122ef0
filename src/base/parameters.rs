use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Holds parameters for the two fluid phases (water and oil)
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamFluids {
    /// Viscosity of the first phase (water)
    pub viscosity1: f64,

    /// Viscosity of the second phase (oil)
    pub viscosity2: f64,

    /// Density of the first phase (water)
    pub density1: f64,

    /// Density of the second phase (oil)
    pub density2: f64,
}

/// Holds parameters for relative permeability models
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum ParamRelPerm {
    /// Corey-type power laws of the normalized saturation
    ///
    /// ```text
    /// se  = (s - swr) / (1 - swr - sor)
    /// krw = krw_max · se^nw
    /// kro = kro_max · (1 - se)^no
    /// ```
    Corey {
        /// Residual (connate) water saturation
        swr: f64,

        /// Residual oil saturation
        sor: f64,

        /// Water exponent
        nw: f64,

        /// Oil exponent
        no: f64,

        /// End-point water relative permeability
        krw_max: f64,

        /// End-point oil relative permeability
        kro_max: f64,
    },

    /// Tabulated curves with piecewise-linear interpolation
    Table {
        /// Water saturation values (strictly increasing)
        sw: Vec<f64>,

        /// Water relative permeability at each saturation value
        krw: Vec<f64>,

        /// Oil relative permeability at each saturation value
        kro: Vec<f64>,
    },
}

/// Holds parameters for capillary pressure models
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ParamCapPressure {
    /// No capillary pressure
    Zero,

    /// Brooks-Corey capillary pressure `pc = pc_entry · se^(-1/λ)`
    BrooksCorey {
        /// Entry pressure
        pc_entry: f64,

        /// Pore-size distribution index λ
        lambda: f64,

        /// Residual water saturation
        swr: f64,
    },
}

/// Holds the description of a Cartesian block
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamGrid {
    /// Number of cells along x, y, and z
    pub ndiv: [usize; 3],

    /// Cell sizes along x, y, and z
    pub cell_size: [f64; 3],
}

/// Holds the rock properties of a homogeneous or layered block
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamRock {
    /// Porosity of every cell (a single value means homogeneous)
    pub porosity: Vec<f64>,

    /// Diagonal permeability of every cell (a single value means homogeneous)
    pub permeability: Vec<[f64; 3]>,
}

/// Holds options that override the default configuration
///
/// Missing entries keep the defaults of [crate::base::Config].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ParamOptions {
    pub output_vtk: Option<bool>,
    pub print_inoutflows: Option<bool>,
    pub simulation_steps: Option<usize>,

    /// Transport step size in days
    pub stepsize: Option<f64>,

    pub relperm_threshold: Option<f64>,
    pub viscosity1: Option<f64>,
    pub viscosity2: Option<f64>,
    pub density1: Option<f64>,
    pub density2: Option<f64>,
    pub bc_type: Option<super::BcType>,
    pub residual_tolerance: Option<f64>,

    /// One of "umfpack", "klu", or "mumps"
    pub linear_solver: Option<String>,

    pub transport_cfl: Option<f64>,
    pub transport_max_substeps: Option<usize>,
    pub out_dir: Option<String>,
}

/// Holds one steady-state point to be computed
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamPoint {
    /// Flow direction (0, 1, or 2)
    pub flow_direction: usize,

    /// Initial (uniform) and boundary saturation
    pub saturation: f64,
}

/// Holds all input data of the upscale_relperm tool
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamUpscaling {
    pub grid: ParamGrid,
    pub rock: ParamRock,
    pub fluids: ParamFluids,
    pub rel_perm: ParamRelPerm,

    #[serde(default = "default_cap_pressure")]
    pub cap_pressure: ParamCapPressure,

    /// Pressure drop across the block
    #[serde(default = "default_pressure_drop")]
    pub pressure_drop: f64,

    #[serde(default)]
    pub options: ParamOptions,

    pub points: Vec<ParamPoint>,
}

fn default_cap_pressure() -> ParamCapPressure {
    ParamCapPressure::Zero
}

fn default_pressure_drop() -> f64 {
    1.0
}

impl ParamFluids {
    /// Returns a sample of water/oil parameters
    pub fn sample() -> Self {
        ParamFluids {
            viscosity1: 1.0e-3, // Pa·s
            viscosity2: 3.0e-3, // Pa·s
            density1: 1000.0,   // kg/m³
            density2: 800.0,    // kg/m³
        }
    }
}

impl ParamRelPerm {
    /// Returns a sample of Corey parameters with quadratic curves
    pub fn sample_corey() -> Self {
        ParamRelPerm::Corey {
            swr: 0.0,
            sor: 0.0,
            nw: 2.0,
            no: 2.0,
            krw_max: 1.0,
            kro_max: 1.0,
        }
    }

    /// Returns a sample of Corey parameters with linear curves (krw = s, kro = 1 - s)
    pub fn sample_linear() -> Self {
        ParamRelPerm::Corey {
            swr: 0.0,
            sor: 0.0,
            nw: 1.0,
            no: 1.0,
            krw_max: 1.0,
            kro_max: 1.0,
        }
    }
}

impl ParamUpscaling {
    /// Reads a JSON input file
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<Path> + ?Sized,
    {
        let path = full_path.as_ref();
        let contents = fs::read_to_string(path).map_err(|_| "cannot open input file")?;
        let param = serde_json::from_str(&contents).map_err(|_| "cannot parse JSON input file")?;
        Ok(param)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
