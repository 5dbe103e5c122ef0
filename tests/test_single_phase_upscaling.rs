use relperm_upscale::prelude::*;
use relperm_upscale::StrError;
use russell_lab::mat_approx_eq;

// builds a property with linear curves and unit viscosities
fn property(permeability: Vec<[f64; 3]>) -> Result<ReservoirProperty, StrError> {
    let fluids = ParamFluids {
        viscosity1: 1.0,
        viscosity2: 1.0,
        density1: 1000.0,
        density2: 800.0,
    };
    let porosity = vec![0.25; permeability.len()];
    ReservoirProperty::new(
        porosity,
        permeability,
        &fluids,
        &ParamRelPerm::sample_linear(),
        &ParamCapPressure::Zero,
    )
}

#[test]
fn test_single_phase_homogeneous_anisotropic() -> Result<(), StrError> {
    for bc_type in [BcType::Fixed, BcType::Mixed, BcType::Periodic] {
        let grid = CartesianGrid::new([3, 4, 2], [1.0, 0.5, 2.0])?;
        let res_prop = property(vec![[5.0e-13, 2.0e-13, 1.0e-14]; grid.ncell()])?;
        let mut config = Config::new();
        config.set_bc_type(bc_type);
        let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, config)?;
        let kk = upscaler.upscale_single_phase()?;
        mat_approx_eq(
            &kk,
            &[[5.0e-13, 0.0, 0.0], [0.0, 2.0e-13, 0.0], [0.0, 0.0, 1.0e-14]],
            1e-25,
        );
    }
    Ok(())
}

#[test]
fn test_single_phase_series_and_parallel_layers() -> Result<(), StrError> {
    // layers normal to x with k = 1, 2, 4 (isotropic)
    let grid = CartesianGrid::new([3, 2, 2], [1.0, 1.0, 1.0])?;
    let layer_k = [1.0, 2.0, 4.0];
    let permeability = (0..grid.ncell()).map(|c| [layer_k[c % 3]; 3]).collect();
    let res_prop = property(permeability)?;
    let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, Config::new())?;
    let kk = upscaler.upscale_single_phase()?;

    // series along x: harmonic mean; parallel along y and z: arithmetic mean
    let harmonic = 3.0 / (1.0 / 1.0 + 1.0 / 2.0 + 1.0 / 4.0);
    let arithmetic = (1.0 + 2.0 + 4.0) / 3.0;
    mat_approx_eq(
        &kk,
        &[[harmonic, 0.0, 0.0], [0.0, arithmetic, 0.0], [0.0, 0.0, arithmetic]],
        1e-12,
    );
    Ok(())
}

#[test]
fn test_single_phase_fixed_mobility() -> Result<(), StrError> {
    // a uniform mobility scales the permeability tensor
    let grid = CartesianGrid::new([2, 2, 2], [1.0, 1.0, 1.0])?;
    let res_prop = property(vec![[1.0, 3.0, 9.0]; grid.ncell()])?;
    let mut upscaler = SinglePhaseUpscaler::new(grid, res_prop, Config::new())?;
    let mobility = FixedMobility::uniform(8, 0.5)?;
    let kk = upscaler.upscale_effective_perm(&mobility)?;
    mat_approx_eq(&kk, &[[0.5, 0.0, 0.0], [0.0, 1.5, 0.0], [0.0, 0.0, 4.5]], 1e-12);
    Ok(())
}
