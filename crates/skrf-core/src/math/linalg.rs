//! Linear algebra operations
//!
//! All ndarray <-> nalgebra conversions are contained here. Callers work
//! with ndarray types only.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::constants::SVD_TOLERANCE;

#[inline]
fn to_na(a: &Array2<Complex64>) -> DMatrix<Complex64> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| a[[i, j]])
}

#[inline]
fn from_na(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Invert a complex matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_complex(a: &Array2<Complex64>) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }
    to_na(a).try_inverse().map(|inv| from_na(&inv))
}

/// Singular values of a complex matrix, largest first
pub fn singular_values(a: &Array2<Complex64>) -> Vec<f64> {
    let mut sv: Vec<f64> = to_na(a).singular_values().iter().cloned().collect();
    sv.sort_by(|x, y| y.total_cmp(x));
    sv
}

/// Least-squares solution of `a x = b` through the SVD
///
/// Square systems give the exact solution; overdetermined ones the
/// minimum-residual one. Returns None when the system is rank deficient
/// or the shapes disagree.
pub fn lstsq_complex(a: &Array2<Complex64>, b: &Array1<Complex64>) -> Option<Array1<Complex64>> {
    let (m, n) = a.dim();
    if m != b.len() || m < n || n == 0 {
        return None;
    }

    let svd = to_na(a).svd(true, true);
    let max_sv = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let min_sv = svd.singular_values.iter().cloned().fold(f64::INFINITY, f64::min);
    if max_sv == 0.0 || min_sv / max_sv < SVD_TOLERANCE {
        return None;
    }

    let rhs = DVector::from_iterator(m, b.iter().cloned());
    let x = svd.solve(&rhs, SVD_TOLERANCE * max_sv).ok()?;
    Some(Array1::from_iter(x.iter().cloned()))
}
