use crate::base::ParamRelPerm;
use crate::StrError;

/// Implements relative permeability models for water (krw) and oil (kro)
pub struct ModelRelPerm {
    param: ParamRelPerm,
}

impl ModelRelPerm {
    /// Allocates a new instance
    pub fn new(param: &ParamRelPerm) -> Result<Self, StrError> {
        match param {
            ParamRelPerm::Corey {
                swr,
                sor,
                nw,
                no,
                krw_max,
                kro_max,
            } => {
                if *swr < 0.0 || *sor < 0.0 || swr + sor >= 1.0 {
                    return Err("residual saturations of the Corey model are invalid");
                }
                if *nw <= 0.0 || *no <= 0.0 {
                    return Err("exponents of the Corey model must be > 0.0");
                }
                if *krw_max <= 0.0 || *kro_max <= 0.0 {
                    return Err("end-point relative permeabilities of the Corey model must be > 0.0");
                }
            }
            ParamRelPerm::Table { sw, krw, kro } => {
                if sw.len() < 2 {
                    return Err("relative permeability table must have at least two rows");
                }
                if krw.len() != sw.len() || kro.len() != sw.len() {
                    return Err("relative permeability table columns must have the same length");
                }
                if sw.windows(2).any(|w| w[1] <= w[0]) {
                    return Err("saturations in the relative permeability table must be strictly increasing");
                }
                if krw.iter().chain(kro.iter()).any(|k| *k < 0.0) {
                    return Err("relative permeabilities in the table must be ≥ 0.0");
                }
            }
        }
        Ok(ModelRelPerm { param: param.clone() })
    }

    /// Calculates the water relative permeability
    pub fn krw(&self, s: f64) -> f64 {
        match &self.param {
            ParamRelPerm::Corey { nw, krw_max, .. } => krw_max * f64::powf(self.normalized(s), *nw),
            ParamRelPerm::Table { sw, krw, .. } => interpolate(sw, krw, s),
        }
    }

    /// Calculates the oil relative permeability
    pub fn kro(&self, s: f64) -> f64 {
        match &self.param {
            ParamRelPerm::Corey { no, kro_max, .. } => kro_max * f64::powf(1.0 - self.normalized(s), *no),
            ParamRelPerm::Table { sw, kro, .. } => interpolate(sw, kro, s),
        }
    }

    /// Returns the normalized saturation (Corey only)
    fn normalized(&self, s: f64) -> f64 {
        match &self.param {
            ParamRelPerm::Corey { swr, sor, .. } => f64::max(0.0, f64::min(1.0, (s - swr) / (1.0 - swr - sor))),
            ParamRelPerm::Table { .. } => s,
        }
    }
}

/// Interpolates linearly with constant extrapolation
fn interpolate(xx: &[f64], yy: &[f64], x: f64) -> f64 {
    let n = xx.len();
    if x <= xx[0] {
        return yy[0];
    }
    if x >= xx[n - 1] {
        return yy[n - 1];
    }
    let i = xx.partition_point(|v| *v <= x) - 1;
    let t = (x - xx[i]) / (xx[i + 1] - xx[i]);
    yy[i] + t * (yy[i + 1] - yy[i])
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ModelRelPerm;
    use crate::base::ParamRelPerm;
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let corey = |swr, sor, nw, krw_max| ParamRelPerm::Corey {
            swr,
            sor,
            nw,
            no: 2.0,
            krw_max,
            kro_max: 1.0,
        };
        assert_eq!(
            ModelRelPerm::new(&corey(0.6, 0.4, 2.0, 1.0)).err(),
            Some("residual saturations of the Corey model are invalid")
        );
        assert_eq!(
            ModelRelPerm::new(&corey(0.1, 0.1, 0.0, 1.0)).err(),
            Some("exponents of the Corey model must be > 0.0")
        );
        assert_eq!(
            ModelRelPerm::new(&corey(0.1, 0.1, 2.0, 0.0)).err(),
            Some("end-point relative permeabilities of the Corey model must be > 0.0")
        );
        let table = |sw: Vec<f64>, krw: Vec<f64>| ParamRelPerm::Table {
            kro: vec![0.0; sw.len()],
            sw,
            krw,
        };
        assert_eq!(
            ModelRelPerm::new(&table(vec![0.0], vec![0.0])).err(),
            Some("relative permeability table must have at least two rows")
        );
        assert_eq!(
            ModelRelPerm::new(&ParamRelPerm::Table {
                sw: vec![0.0, 1.0],
                krw: vec![0.0, 1.0],
                kro: vec![1.0],
            })
            .err(),
            Some("relative permeability table columns must have the same length")
        );
        assert_eq!(
            ModelRelPerm::new(&table(vec![0.0, 0.5, 0.5], vec![0.0, 0.1, 0.2])).err(),
            Some("saturations in the relative permeability table must be strictly increasing")
        );
        assert_eq!(
            ModelRelPerm::new(&table(vec![0.0, 1.0], vec![0.0, -1.0])).err(),
            Some("relative permeabilities in the table must be ≥ 0.0")
        );
    }

    #[test]
    fn corey_works() {
        let model = ModelRelPerm::new(&ParamRelPerm::Corey {
            swr: 0.2,
            sor: 0.3,
            nw: 2.0,
            no: 3.0,
            krw_max: 0.5,
            kro_max: 0.8,
        })
        .unwrap();
        // below the residual water saturation
        assert_eq!(model.krw(0.1), 0.0);
        assert_eq!(model.kro(0.1), 0.8);
        // above the residual oil saturation
        assert_eq!(model.krw(0.9), 0.5);
        assert_eq!(model.kro(0.9), 0.0);
        // se = (0.45 - 0.2) / 0.5 = 0.5
        approx_eq(model.krw(0.45), 0.5 * 0.25, 1e-15);
        approx_eq(model.kro(0.45), 0.8 * 0.125, 1e-15);
    }

    #[test]
    fn table_works() {
        let model = ModelRelPerm::new(&ParamRelPerm::Table {
            sw: vec![0.2, 0.5, 0.8],
            krw: vec![0.0, 0.1, 0.6],
            kro: vec![0.9, 0.3, 0.0],
        })
        .unwrap();
        assert_eq!(model.krw(0.0), 0.0);
        assert_eq!(model.kro(0.0), 0.9);
        assert_eq!(model.krw(1.0), 0.6);
        assert_eq!(model.kro(1.0), 0.0);
        assert_eq!(model.krw(0.5), 0.1);
        approx_eq(model.krw(0.35), 0.05, 1e-15);
        approx_eq(model.kro(0.65), 0.15, 1e-15);
    }
}
