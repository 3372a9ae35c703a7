//! Network parameter transformations
//!
//! Conversions between S, Z, Y and T parameters for arrays shaped
//! `[nfreq, nports, nports]`. Power-wave definitions with a diagonal,
//! per-port reference impedance `z0`.

use ndarray::{s, Array1, Array2, Array3};
use num_complex::Complex64;

use super::linalg::inv_complex;

fn diag(values: impl Iterator<Item = Complex64>) -> Array2<Complex64> {
    let v: Vec<Complex64> = values.collect();
    let mut m = Array2::<Complex64>::zeros((v.len(), v.len()));
    for (i, x) in v.into_iter().enumerate() {
        m[[i, i]] = x;
    }
    m
}

/// `out[f] = left * g(x[f]) * right` for every frequency slice.
///
/// Slices where `g` fails (singular matrix) are left as zeros.
fn per_freq<G>(x: &Array3<Complex64>, left: &Array2<Complex64>, right: &Array2<Complex64>, g: G) -> Array3<Complex64>
where
    G: Fn(&Array2<Complex64>) -> Option<Array2<Complex64>>,
{
    let mut out = Array3::<Complex64>::zeros(x.raw_dim());
    for f in 0..x.shape()[0] {
        let x_f = x.slice(s![f, .., ..]).to_owned();
        if let Some(term) = g(&x_f) {
            out.slice_mut(s![f, .., ..])
                .assign(&left.dot(&term).dot(right));
        }
    }
    out
}

/// Convert S-parameters to Z-parameters
///
/// Z = F (I + S) (I - S)^-1 F, with F = diag(sqrt(z0))
pub fn s2z(s: &Array3<Complex64>, z0: &Array1<Complex64>) -> Array3<Complex64> {
    let n = s.shape()[1];
    assert_eq!(n, z0.len(), "z0 length must match number of ports");
    let id = Array2::<Complex64>::eye(n);
    let f_mat = diag(z0.iter().map(|z| z.sqrt()));

    per_freq(s, &f_mat, &f_mat, |s_f| {
        inv_complex(&(&id - s_f)).map(|inv| (&id + s_f).dot(&inv))
    })
}

/// Convert Z-parameters to S-parameters
///
/// S = F^-1 (Z - Z0) (Z + Z0)^-1 F
pub fn z2s(z: &Array3<Complex64>, z0: &Array1<Complex64>) -> Array3<Complex64> {
    let n = z.shape()[1];
    assert_eq!(n, z0.len(), "z0 length must match number of ports");
    let z0_diag = diag(z0.iter().cloned());
    let f_mat = diag(z0.iter().map(|z| z.sqrt()));
    let inv_f = diag(z0.iter().map(|z| z.sqrt().inv()));

    per_freq(z, &inv_f, &f_mat, |z_f| {
        inv_complex(&(z_f + &z0_diag)).map(|inv| (z_f - &z0_diag).dot(&inv))
    })
}

/// Convert S-parameters to Y-parameters
///
/// Y = G (I - S) (I + S)^-1 G, with G = diag(1 / sqrt(z0))
pub fn s2y(s: &Array3<Complex64>, z0: &Array1<Complex64>) -> Array3<Complex64> {
    let n = s.shape()[1];
    assert_eq!(n, z0.len(), "z0 length must match number of ports");
    let id = Array2::<Complex64>::eye(n);
    let g_mat = diag(z0.iter().map(|z| z.sqrt().inv()));

    per_freq(s, &g_mat, &g_mat, |s_f| {
        inv_complex(&(&id + s_f)).map(|inv| (&id - s_f).dot(&inv))
    })
}

/// Convert Y-parameters to S-parameters
///
/// S = (I - Y') (I + Y')^-1, with Y' = F Y F the normalized admittance
pub fn y2s(y: &Array3<Complex64>, z0: &Array1<Complex64>) -> Array3<Complex64> {
    let n = y.shape()[1];
    assert_eq!(n, z0.len(), "z0 length must match number of ports");
    let id = Array2::<Complex64>::eye(n);
    let f_mat = diag(z0.iter().map(|z| z.sqrt()));

    per_freq(y, &id, &id, |y_f| {
        let y_norm = f_mat.dot(y_f).dot(&f_mat);
        inv_complex(&(&id + &y_norm)).map(|inv| (&id - &y_norm).dot(&inv))
    })
}

/// Convert 2-port S-parameters to scattering transfer (T) parameters
///
/// T = 1/S21 [[-det(S), S11], [-S22, 1]], so that cascading is `Ta * Tb`.
/// Returns None for non-2-port data.
pub fn s2t(s: &Array3<Complex64>) -> Option<Array3<Complex64>> {
    if s.shape()[1] != 2 || s.shape()[2] != 2 {
        return None;
    }
    let mut t = Array3::<Complex64>::zeros(s.raw_dim());
    for f in 0..s.shape()[0] {
        let (s11, s12, s21, s22) = (s[[f, 0, 0]], s[[f, 0, 1]], s[[f, 1, 0]], s[[f, 1, 1]]);
        let det = s11 * s22 - s12 * s21;
        t[[f, 0, 0]] = -det / s21;
        t[[f, 0, 1]] = s11 / s21;
        t[[f, 1, 0]] = -s22 / s21;
        t[[f, 1, 1]] = s21.inv();
    }
    Some(t)
}

/// Inverse of [`s2t`]
pub fn t2s(t: &Array3<Complex64>) -> Option<Array3<Complex64>> {
    if t.shape()[1] != 2 || t.shape()[2] != 2 {
        return None;
    }
    let mut s = Array3::<Complex64>::zeros(t.raw_dim());
    for f in 0..t.shape()[0] {
        let (t11, t12, t21, t22) = (t[[f, 0, 0]], t[[f, 0, 1]], t[[f, 1, 0]], t[[f, 1, 1]]);
        let det = t11 * t22 - t12 * t21;
        s[[f, 0, 0]] = t12 / t22;
        s[[f, 0, 1]] = det / t22;
        s[[f, 1, 0]] = t22.inv();
        s[[f, 1, 1]] = -t21 / t22;
    }
    Some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_2port() -> Array3<Complex64> {
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 0]] = Complex64::new(0.1, 0.05);
        s[[0, 0, 1]] = Complex64::new(0.7, -0.2);
        s[[0, 1, 0]] = Complex64::new(0.7, -0.2);
        s[[0, 1, 1]] = Complex64::new(-0.05, 0.1);
        s
    }

    fn assert_close(a: &Array3<Complex64>, b: &Array3<Complex64>) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-10);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_matched_load_impedance() {
        let s = Array3::<Complex64>::zeros((1, 1, 1));
        let z0 = Array1::from_elem(1, Complex64::new(50.0, 0.0));
        let z = s2z(&s, &z0);
        assert_relative_eq!(z[[0, 0, 0]].re, 50.0, epsilon = 1e-10);

        let y = s2y(&s, &z0);
        assert_relative_eq!(y[[0, 0, 0]].re, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_z_and_y_are_inverse_views() {
        let s = sample_2port();
        let z0 = Array1::from_vec(vec![Complex64::new(50.0, 0.0), Complex64::new(75.0, 0.0)]);
        assert_close(&z2s(&s2z(&s, &z0), &z0), &s);
        assert_close(&y2s(&s2y(&s, &z0), &z0), &s);
    }

    #[test]
    fn test_t_params() {
        let s = sample_2port();
        let t = s2t(&s).unwrap();
        assert_close(&t2s(&t).unwrap(), &s);
        assert!(s2t(&Array3::<Complex64>::zeros((1, 3, 3))).is_none());
    }
}
