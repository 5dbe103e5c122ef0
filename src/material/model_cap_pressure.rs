use crate::base::ParamCapPressure;
use crate::StrError;

/// Defines the smallest normalized saturation used to evaluate the Brooks-Corey capillary pressure
const SE_MIN: f64 = 1e-6;

/// Implements capillary pressure models
pub struct ModelCapPressure {
    param: ParamCapPressure,
}

impl ModelCapPressure {
    /// Allocates a new instance
    pub fn new(param: &ParamCapPressure) -> Result<Self, StrError> {
        if let ParamCapPressure::BrooksCorey { pc_entry, lambda, swr } = param {
            if *pc_entry < 0.0 {
                return Err("entry pressure of the Brooks-Corey model must be ≥ 0.0");
            }
            if *lambda <= 0.0 {
                return Err("lambda of the Brooks-Corey model must be > 0.0");
            }
            if *swr < 0.0 || *swr >= 1.0 {
                return Err("residual saturation of the Brooks-Corey model must satisfy 0.0 ≤ swr < 1.0");
            }
        }
        Ok(ModelCapPressure { param: *param })
    }

    /// Calculates the capillary pressure
    pub fn pc(&self, s: f64) -> f64 {
        match self.param {
            ParamCapPressure::Zero => 0.0,
            ParamCapPressure::BrooksCorey { pc_entry, lambda, swr } => {
                let se = f64::max(SE_MIN, f64::min(1.0, (s - swr) / (1.0 - swr)));
                pc_entry * f64::powf(se, -1.0 / lambda)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
