//! S, Z, Y and T views of a network, plus scalar views of S

use ndarray::{Array1, Array3};
use num_complex::Complex64;

use super::core::Network;
use crate::frequency::Frequency;
use crate::math::transforms::{s2t, s2y, s2z};
use crate::math_functions::{complex_2_db, complex_2_degree};

impl Network {
    /// Per-port reference impedance
    pub fn z0(&self) -> &Array1<Complex64> {
        &self.z0
    }

    pub fn s(&self) -> &Array3<Complex64> {
        &self.s
    }

    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Frequency points in Hz
    pub fn f(&self) -> &[f64] {
        self.frequency.f()
    }

    /// Impedance matrix, denormalized to `z0`
    pub fn z(&self) -> Array3<Complex64> {
        s2z(&self.s, &self.z0)
    }

    /// Admittance matrix, denormalized to `z0`
    pub fn y(&self) -> Array3<Complex64> {
        s2y(&self.s, &self.z0)
    }

    /// Scattering transfer parameters; `None` unless this is a 2-port
    pub fn t(&self) -> Option<Array3<Complex64>> {
        s2t(&self.s)
    }

    pub fn s_re(&self) -> Array3<f64> {
        self.s.mapv(|c| c.re)
    }

    pub fn s_im(&self) -> Array3<f64> {
        self.s.mapv(|c| c.im)
    }

    pub fn s_mag(&self) -> Array3<f64> {
        self.s.mapv(|c| c.norm())
    }

    /// S-parameter magnitude in dB (20 log10)
    pub fn s_db(&self) -> Array3<f64> {
        self.s.mapv(complex_2_db)
    }

    /// S-parameter phase in degrees, wrapped to (-180, 180]
    pub fn s_deg(&self) -> Array3<f64> {
        self.s.mapv(complex_2_degree)
    }

    pub fn s_rad(&self) -> Array3<f64> {
        self.s.mapv(|c| c.arg())
    }

    /// dB trace of a single S-parameter, `m` and `n` zero-based
    pub fn s_db_at(&self, m: usize, n: usize) -> Vec<f64> {
        self.s
            .slice(ndarray::s![.., m, n])
            .iter()
            .map(|&c| complex_2_db(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use approx::assert_relative_eq;

    fn one_port(gamma: Complex64) -> Network {
        let freq = Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear);
        let s = Array3::from_elem((1, 1, 1), gamma);
        Network::with_z0(freq, s, 50.0).unwrap()
    }

    #[test]
    fn test_s_to_z_matched() {
        // A matched load (S11 = 0) should have Z = z0
        let z = one_port(Complex64::new(0.0, 0.0)).z();

        assert_relative_eq!(z[[0, 0, 0]].re, 50.0, epsilon = 1e-10);
        assert_relative_eq!(z[[0, 0, 0]].im, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_open_admittance_is_zero() {
        let y = one_port(Complex64::new(1.0, 0.0)).y();
        assert_relative_eq!(y[[0, 0, 0]].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scalar_views() {
        let ntwk = one_port(Complex64::new(0.0, 0.1));

        assert_relative_eq!(ntwk.s_db()[[0, 0, 0]], -20.0, epsilon = 1e-10);
        assert_relative_eq!(ntwk.s_mag()[[0, 0, 0]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(ntwk.s_deg()[[0, 0, 0]], 90.0, epsilon = 1e-10);
        assert_relative_eq!(ntwk.s_rad()[[0, 0, 0]], std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(ntwk.s_db_at(0, 0).len(), 1);
        assert!(ntwk.t().is_none());
    }
}
