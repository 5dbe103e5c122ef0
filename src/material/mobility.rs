use crate::StrError;

/// Defines the capability needed by the pressure solver: a total mobility per cell
pub trait MobilityField {
    /// Returns the total mobility of a cell at the given saturation
    fn total_mobility(&self, cell: usize, saturation: f64) -> f64;
}

/// Holds a fixed (saturation-independent) mobility for each cell
///
/// This adapter exposes per-cell scalars through [MobilityField] so that the
/// single-phase effective permeability extraction can be reused for each phase.
pub struct FixedMobility {
    mobility: Vec<f64>,
}

impl FixedMobility {
    /// Allocates a new instance
    pub fn new(mobility: Vec<f64>) -> Result<Self, StrError> {
        if mobility.iter().any(|m| !(*m >= 0.0) || !m.is_finite()) {
            return Err("fixed mobilities must be finite and ≥ 0.0");
        }
        Ok(FixedMobility { mobility })
    }

    /// Allocates a new instance with the same mobility in all cells
    pub fn uniform(ncell: usize, value: f64) -> Result<Self, StrError> {
        FixedMobility::new(vec![value; ncell])
    }

    /// Returns the mobilities
    pub fn values(&self) -> &[f64] {
        &self.mobility
    }
}

impl MobilityField for FixedMobility {
    fn total_mobility(&self, cell: usize, _saturation: f64) -> f64 {
        self.mobility[cell]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{FixedMobility, MobilityField};

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            FixedMobility::new(vec![1.0, -1.0]).err(),
            Some("fixed mobilities must be finite and ≥ 0.0")
        );
        assert_eq!(
            FixedMobility::new(vec![f64::NAN]).err(),
            Some("fixed mobilities must be finite and ≥ 0.0")
        );
    }

    #[test]
    fn total_mobility_ignores_saturation() {
        let mob = FixedMobility::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(mob.total_mobility(1, 0.0), 2.0);
        assert_eq!(mob.total_mobility(1, 1.0), 2.0);
        assert_eq!(mob.values(), &[1.0, 2.0, 3.0]);
        let uniform = FixedMobility::uniform(4, 0.5).unwrap();
        assert_eq!(uniform.values(), &[0.5, 0.5, 0.5, 0.5]);
    }
}
