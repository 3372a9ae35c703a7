//! Network property checks
//!
//! Passivity, reciprocity, losslessness and 2-port symmetry. Every check takes
//! an optional tolerance, defaulting to [`PROPERTY_TOL`].

use ndarray::s;
use num_complex::Complex64;

use super::core::Network;
use crate::constants::PROPERTY_TOL;
use crate::math::linalg::singular_values;

impl Network {
    /// Test if network is reciprocal
    ///
    /// A network is reciprocal if S = S^T (transpose).
    pub fn is_reciprocal(&self, tol: Option<f64>) -> bool {
        let tol = tol.unwrap_or(PROPERTY_TOL);
        let nports = self.nports();

        (0..self.nfreq()).all(|f| {
            (0..nports).all(|i| {
                (i + 1..nports).all(|j| (self.s[[f, i, j]] - self.s[[f, j, i]]).norm() <= tol)
            })
        })
    }

    /// Test if network is passive
    ///
    /// Passive when I - S^H S is positive semi-definite at every frequency,
    /// i.e. the largest singular value of S does not exceed 1.
    pub fn is_passive(&self, tol: Option<f64>) -> bool {
        let tol = tol.unwrap_or(PROPERTY_TOL);

        (0..self.nfreq()).all(|f| {
            let s_f = self.s.slice(s![f, .., ..]).to_owned();
            singular_values(&s_f)
                .first()
                .map_or(true, |&sv| sv <= 1.0 + tol)
        })
    }

    /// Test if network is lossless
    ///
    /// A network is lossless if S is unitary: S^H * S = I
    pub fn is_lossless(&self, tol: Option<f64>) -> bool {
        let tol = tol.unwrap_or(PROPERTY_TOL);
        let nports = self.nports();

        for f in 0..self.nfreq() {
            for i in 0..nports {
                for j in 0..nports {
                    let sum: Complex64 = (0..nports)
                        .map(|k| self.s[[f, k, i]].conj() * self.s[[f, k, j]])
                        .sum();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    if (sum.re - expected).abs() > tol || sum.im.abs() > tol {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Test if 2-port network has symmetric reflection coefficients (S11 = S22)
    ///
    /// Returns None for networks with other port counts.
    pub fn is_symmetric(&self, tol: Option<f64>) -> Option<bool> {
        if self.nports() != 2 {
            return None;
        }
        let tol = tol.unwrap_or(PROPERTY_TOL);
        Some((0..self.nfreq()).all(|f| (self.s[[f, 0, 0]] - self.s[[f, 1, 1]]).norm() <= tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use ndarray::Array3;

    fn network(s: Array3<Complex64>) -> Network {
        let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
        Network::with_z0(freq, s, 50.0).unwrap()
    }

    #[test]
    fn test_is_reciprocal() {
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 1]] = Complex64::new(0.5, 0.1);
        s[[0, 1, 0]] = Complex64::new(0.5, 0.1);
        assert!(network(s.clone()).is_reciprocal(None));

        s[[0, 1, 0]] = Complex64::new(0.9, 0.1);
        assert!(!network(s).is_reciprocal(None));
    }

    #[test]
    fn test_is_passive() {
        let s = Array3::from_elem((1, 1, 1), Complex64::new(0.5, 0.0));
        assert!(network(s).is_passive(None));

        // column norms are fine but the matrix amplifies [1, 1] / sqrt(2)
        let mut s = Array3::<Complex64>::zeros((1, 2, 2));
        s[[0, 0, 0]] = Complex64::new(0.7, 0.0);
        s[[0, 0, 1]] = Complex64::new(0.7, 0.0);
        s[[0, 1, 0]] = Complex64::new(0.7, 0.0);
        s[[0, 1, 1]] = Complex64::new(0.7, 0.0);
        assert!(!network(s).is_passive(None));
    }

    #[test]
    fn test_is_lossless() {
        let s = Array3::from_elem((1, 1, 1), Complex64::new(1.0, 0.0));
        assert!(network(s).is_lossless(None));

        let s = Array3::from_elem((1, 1, 1), Complex64::new(0.5, 0.0));
        assert!(!network(s).is_lossless(None));
    }

    #[test]
    fn test_is_symmetric() {
        let s = Array3::from_elem((1, 2, 2), Complex64::new(0.2, 0.0));
        assert_eq!(network(s).is_symmetric(None), Some(true));

        let s = Array3::from_elem((1, 1, 1), Complex64::new(0.2, 0.0));
        assert_eq!(network(s).is_symmetric(None), None);
    }
}
