use crate::base::NDIM;
use crate::StrError;
use russell_lab::{mat_inverse, mat_mat_mul, mat_scale, Matrix};

/// Checks that a matrix is 3×3
fn check_dims(a: &Matrix) -> Result<(), StrError> {
    let (nrow, ncol) = a.dims();
    if nrow != NDIM || ncol != NDIM {
        return Err("permeability tensors must be 3×3");
    }
    Ok(())
}

/// Computes the inverse of a 3×3 tensor
pub fn tensor_inverse(a: &Matrix) -> Result<Matrix, StrError> {
    check_dims(a)?;
    let mut ai = Matrix::new(NDIM, NDIM);
    let det = mat_inverse(&mut ai, a).map_err(|_| "cannot invert singular permeability tensor")?;
    if det == 0.0 || !det.is_finite() {
        return Err("cannot invert singular permeability tensor");
    }
    Ok(ai)
}

/// Computes the product `a · b` of two 3×3 tensors
pub fn tensor_product(a: &Matrix, b: &Matrix) -> Result<Matrix, StrError> {
    check_dims(a)?;
    check_dims(b)?;
    let mut c = Matrix::new(NDIM, NDIM);
    mat_mat_mul(&mut c, 1.0, a, b, 0.0)?;
    Ok(c)
}

/// Converts an effective permeability into a mobility tensor
///
/// ```text
/// λ = K_eff · K⁻¹
/// ```
///
/// The inverse multiplies from the right.
pub fn mobility_from_effective_perm(effective_perm: &Matrix, upscaled_perm: &Matrix) -> Result<Matrix, StrError> {
    let inv = tensor_inverse(upscaled_perm)?;
    tensor_product(effective_perm, &inv)
}

/// Converts a mobility tensor into a relative permeability tensor (`kr = λ · μ`)
pub fn rel_perm_from_mobility(mobility: &Matrix, viscosity: f64) -> Result<Matrix, StrError> {
    check_dims(mobility)?;
    let mut kr = mobility.clone();
    mat_scale(&mut kr, viscosity);
    Ok(kr)
}

/// Returns a diagonal 3×3 tensor
pub fn diagonal_tensor(values: &[f64; NDIM]) -> Matrix {
    let mut a = Matrix::new(NDIM, NDIM);
    for i in 0..NDIM {
        a.set(i, i, values[i]);
    }
    a
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
