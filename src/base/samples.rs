use super::{ParamCapPressure, ParamFluids, ParamRelPerm, NDIM};
use crate::grid::CartesianGrid;
use crate::material::ReservoirProperty;

/// Holds some sample blocks and reservoir properties
pub struct Samples;

impl Samples {
    /// Returns a unit cube made of a single cell
    pub fn grid_single_cell() -> CartesianGrid {
        CartesianGrid::new([1, 1, 1], [1.0, 1.0, 1.0]).unwrap()
    }

    /// Returns a block with `n` unit cells along x
    pub fn grid_column_x(n: usize) -> CartesianGrid {
        CartesianGrid::new([n, 1, 1], [1.0, 1.0, 1.0]).unwrap()
    }

    /// Returns a 4×3×2 block with non-uniform cell sizes
    pub fn grid_small_block() -> CartesianGrid {
        CartesianGrid::new([4, 3, 2], [0.5, 1.0, 2.0]).unwrap()
    }

    /// Returns a homogeneous property with linear relative permeabilities and equal viscosities
    ///
    /// With `krw = s`, `kro = 1 - s`, and `μw = μo = 1`, the total mobility is one everywhere.
    pub fn property_linear(grid: &CartesianGrid, porosity: f64, permeability: [f64; NDIM]) -> ReservoirProperty {
        let fluids = ParamFluids {
            viscosity1: 1.0,
            viscosity2: 1.0,
            density1: 1000.0,
            density2: 800.0,
        };
        ReservoirProperty::homogeneous(
            grid.ncell(),
            porosity,
            permeability,
            &fluids,
            &ParamRelPerm::sample_linear(),
            &ParamCapPressure::Zero,
        )
        .unwrap()
    }

    /// Returns a homogeneous property with quadratic Corey curves and water/oil viscosities
    pub fn property_corey(grid: &CartesianGrid, porosity: f64, permeability: [f64; NDIM]) -> ReservoirProperty {
        ReservoirProperty::homogeneous(
            grid.ncell(),
            porosity,
            permeability,
            &ParamFluids::sample(),
            &ParamRelPerm::sample_corey(),
            &ParamCapPressure::Zero,
        )
        .unwrap()
    }

    /// Returns a layered property (layers stacked along z) with linear relative permeabilities
    ///
    /// Each cell in the k-th z-layer gets `layers[k % layers.len()]`.
    pub fn property_layered(grid: &CartesianGrid, porosity: f64, layers: &[[f64; NDIM]]) -> ReservoirProperty {
        let [nx, ny, _] = grid.ndiv;
        let permeability = (0..grid.ncell())
            .map(|c| layers[(c / (nx * ny)) % layers.len()])
            .collect();
        let fluids = ParamFluids {
            viscosity1: 1.0,
            viscosity2: 1.0,
            density1: 1000.0,
            density2: 800.0,
        };
        ReservoirProperty::new(
            vec![porosity; grid.ncell()],
            permeability,
            &fluids,
            &ParamRelPerm::sample_linear(),
            &ParamCapPressure::Zero,
        )
        .unwrap()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
