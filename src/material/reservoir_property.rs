use super::{MobilityField, ModelCapPressure, ModelRelPerm};
use crate::base::{ParamCapPressure, ParamFluids, ParamRelPerm, ParamRock, NDIM, N_FRAC_FLOW_SAMPLES};
use crate::StrError;

/// Holds the rock and fluid properties of the block
///
/// The first phase is water and the second phase is oil. Saturation means water saturation.
pub struct ReservoirProperty {
    /// Porosity of each cell
    porosity: Vec<f64>,

    /// Diagonal permeability of each cell
    permeability: Vec<[f64; NDIM]>,

    /// Viscosities (first, second)
    viscosity: [f64; 2],

    /// Densities (first, second)
    density: [f64; 2],

    /// Relative permeability model
    rel_perm: ModelRelPerm,

    /// Capillary pressure model
    cap_pressure: ModelCapPressure,
}

impl ReservoirProperty {
    /// Allocates a new instance
    pub fn new(
        porosity: Vec<f64>,
        permeability: Vec<[f64; NDIM]>,
        fluids: &ParamFluids,
        rel_perm: &ParamRelPerm,
        cap_pressure: &ParamCapPressure,
    ) -> Result<Self, StrError> {
        if porosity.len() != permeability.len() {
            return Err("porosity and permeability must have the same number of cells");
        }
        if porosity.iter().any(|phi| *phi <= 0.0 || *phi > 1.0) {
            return Err("porosity must satisfy 0.0 < φ ≤ 1.0");
        }
        if permeability.iter().flatten().any(|k| *k <= 0.0) {
            return Err("permeability components must be > 0.0");
        }
        let mut res_prop = ReservoirProperty {
            porosity,
            permeability,
            viscosity: [1.0, 1.0],
            density: [1.0, 1.0],
            rel_perm: ModelRelPerm::new(rel_perm)?,
            cap_pressure: ModelCapPressure::new(cap_pressure)?,
        };
        res_prop.set_viscosities(fluids.viscosity1, fluids.viscosity2)?;
        res_prop.set_densities(fluids.density1, fluids.density2)?;
        Ok(res_prop)
    }

    /// Allocates a new instance with the same rock properties in all cells
    pub fn homogeneous(
        ncell: usize,
        porosity: f64,
        permeability: [f64; NDIM],
        fluids: &ParamFluids,
        rel_perm: &ParamRelPerm,
        cap_pressure: &ParamCapPressure,
    ) -> Result<Self, StrError> {
        ReservoirProperty::new(
            vec![porosity; ncell],
            vec![permeability; ncell],
            fluids,
            rel_perm,
            cap_pressure,
        )
    }

    /// Allocates a new instance from input file data
    ///
    /// A single porosity or permeability entry is applied to all cells.
    pub fn from_param(
        ncell: usize,
        rock: &ParamRock,
        fluids: &ParamFluids,
        rel_perm: &ParamRelPerm,
        cap_pressure: &ParamCapPressure,
    ) -> Result<Self, StrError> {
        let porosity = match rock.porosity.len() {
            1 => vec![rock.porosity[0]; ncell],
            n if n == ncell => rock.porosity.clone(),
            _ => return Err("the number of porosity values must be 1 or equal to the number of cells"),
        };
        let permeability = match rock.permeability.len() {
            1 => vec![rock.permeability[0]; ncell],
            n if n == ncell => rock.permeability.clone(),
            _ => return Err("the number of permeability values must be 1 or equal to the number of cells"),
        };
        ReservoirProperty::new(porosity, permeability, fluids, rel_perm, cap_pressure)
    }

    /// Returns the number of cells
    #[inline]
    pub fn ncell(&self) -> usize {
        self.porosity.len()
    }

    /// Returns the porosity of a cell
    #[inline]
    pub fn porosity(&self, cell: usize) -> f64 {
        self.porosity[cell]
    }

    /// Returns the diagonal permeability of a cell
    #[inline]
    pub fn permeability(&self, cell: usize) -> &[f64; NDIM] {
        &self.permeability[cell]
    }

    /// Sets the viscosities of both phases
    pub fn set_viscosities(&mut self, first: f64, second: f64) -> Result<(), StrError> {
        if first <= 0.0 || second <= 0.0 {
            return Err("viscosities must be > 0.0");
        }
        self.viscosity = [first, second];
        Ok(())
    }

    /// Sets the densities of both phases
    pub fn set_densities(&mut self, first: f64, second: f64) -> Result<(), StrError> {
        if first <= 0.0 || second <= 0.0 {
            return Err("densities must be > 0.0");
        }
        self.density = [first, second];
        Ok(())
    }

    #[inline]
    pub fn viscosity_first_phase(&self) -> f64 {
        self.viscosity[0]
    }

    #[inline]
    pub fn viscosity_second_phase(&self) -> f64 {
        self.viscosity[1]
    }

    #[inline]
    pub fn density_first_phase(&self) -> f64 {
        self.density[0]
    }

    #[inline]
    pub fn density_second_phase(&self) -> f64 {
        self.density[1]
    }

    /// Calculates the mobility of the first phase λw = krw(s) / μw
    pub fn mobility_first_phase(&self, _cell: usize, saturation: f64) -> f64 {
        self.rel_perm.krw(saturation) / self.viscosity[0]
    }

    /// Calculates the mobility of the second phase λo = kro(s) / μo
    pub fn mobility_second_phase(&self, _cell: usize, saturation: f64) -> f64 {
        self.rel_perm.kro(saturation) / self.viscosity[1]
    }

    /// Calculates the fractional flow of the first phase fw = λw / (λw + λo)
    ///
    /// Returns zero if both mobilities vanish.
    pub fn fractional_flow(&self, cell: usize, saturation: f64) -> f64 {
        let lw = self.mobility_first_phase(cell, saturation);
        let lo = self.mobility_second_phase(cell, saturation);
        let lt = lw + lo;
        if lt > 0.0 {
            lw / lt
        } else {
            0.0
        }
    }

    /// Calculates the capillary pressure
    pub fn cap_pressure(&self, _cell: usize, saturation: f64) -> f64 {
        self.cap_pressure.pc(saturation)
    }

    /// Estimates max |dfw/ds| in a cell by sampling the fractional flow over [0, 1]
    pub fn max_frac_flow_derivative(&self, cell: usize) -> f64 {
        let ds = 1.0 / (N_FRAC_FLOW_SAMPLES as f64);
        let mut f_prev = self.fractional_flow(cell, 0.0);
        let mut max_df = 0.0;
        for i in 1..(N_FRAC_FLOW_SAMPLES + 1) {
            let f = self.fractional_flow(cell, i as f64 * ds);
            max_df = f64::max(max_df, f64::abs(f - f_prev) / ds);
            f_prev = f;
        }
        max_df
    }
}

impl MobilityField for ReservoirProperty {
    fn total_mobility(&self, cell: usize, saturation: f64) -> f64 {
        self.mobility_first_phase(cell, saturation) + self.mobility_second_phase(cell, saturation)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
