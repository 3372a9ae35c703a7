//! Network operations
//!
//! Cascading, port flipping and inversion of 2-port networks.

use ndarray::{s, Array1, Array3};
use num_complex::Complex64;

use super::core::Network;
use super::NetworkError;
use crate::constants::PROPERTY_TOL;
use crate::math::linalg::inv_complex;
use crate::math::transforms::{s2t, t2s};

impl Network {
    /// Cascade with another network (self ** other)
    ///
    /// Connects port 2 of `self` to port 1 of `other`. `self` must be a
    /// 2-port; `other` may be a 2-port or a 1-port termination.
    pub fn cascade(&self, other: &Network) -> Result<Network, NetworkError> {
        if self.nports() != 2 {
            return Err(NetworkError::NotTwoPort(self.nports()));
        }
        self.check_frequency(other)?;

        match other.nports() {
            2 => self.cascade_two_port(other),
            1 => self.terminate(other),
            n => Err(NetworkError::Incompatible(format!(
                "cannot cascade a 2-port into a {}-port",
                n
            ))),
        }
    }

    /// Same points as `other`'s band, within a tolerance scaled to the stop frequency
    pub(crate) fn check_frequency(&self, other: &Network) -> Result<(), NetworkError> {
        if !self.frequency.matches(&other.frequency, PROPERTY_TOL * self.frequency.stop().max(1.0)) {
            return Err(NetworkError::Incompatible(format!(
                "frequency bands differ ({} vs {})",
                self.frequency, other.frequency
            )));
        }
        Ok(())
    }

    fn cascade_two_port(&self, other: &Network) -> Result<Network, NetworkError> {
        let nfreq = self.nfreq();
        let mut s_result = Array3::<Complex64>::zeros((nfreq, 2, 2));

        for f in 0..nfreq {
            let s_a = [
                [self.s[[f, 0, 0]], self.s[[f, 0, 1]]],
                [self.s[[f, 1, 0]], self.s[[f, 1, 1]]],
            ];
            let s_b = [
                [other.s[[f, 0, 0]], other.s[[f, 0, 1]]],
                [other.s[[f, 1, 0]], other.s[[f, 1, 1]]],
            ];

            // signal flow graph with the internal reflection loop closed
            let denom = Complex64::new(1.0, 0.0) - s_a[1][1] * s_b[0][0];

            s_result[[f, 0, 0]] = s_a[0][0] + (s_a[0][1] * s_a[1][0] * s_b[0][0]) / denom;
            s_result[[f, 0, 1]] = (s_a[0][1] * s_b[0][1]) / denom;
            s_result[[f, 1, 0]] = (s_a[1][0] * s_b[1][0]) / denom;
            s_result[[f, 1, 1]] = s_b[1][1] + (s_b[0][1] * s_b[1][0] * s_a[1][1]) / denom;
        }

        Network::new(
            self.frequency.clone(),
            s_result,
            Array1::from_vec(vec![self.z0[0], other.z0[1]]),
        )
    }

    /// Input reflection of `self` terminated by the 1-port `load`
    fn terminate(&self, load: &Network) -> Result<Network, NetworkError> {
        let nfreq = self.nfreq();
        let mut s_result = Array3::<Complex64>::zeros((nfreq, 1, 1));

        for f in 0..nfreq {
            let gamma = load.s[[f, 0, 0]];
            let (s11, s12, s21, s22) = (
                self.s[[f, 0, 0]],
                self.s[[f, 0, 1]],
                self.s[[f, 1, 0]],
                self.s[[f, 1, 1]],
            );
            s_result[[f, 0, 0]] = s11 + s12 * s21 * gamma / (Complex64::new(1.0, 0.0) - s22 * gamma);
        }

        Network::new(
            self.frequency.clone(),
            s_result,
            Array1::from_vec(vec![self.z0[0]]),
        )
    }

    /// Flip the ports of a 2-port network (swap port 1 and port 2)
    pub fn flip(&self) -> Result<Network, NetworkError> {
        if self.nports() != 2 {
            return Err(NetworkError::NotTwoPort(self.nports()));
        }

        let mut s_flipped = self.s.clone();
        for f in 0..self.nfreq() {
            // new[i,j] = old[1-i, 1-j]
            s_flipped[[f, 0, 0]] = self.s[[f, 1, 1]];
            s_flipped[[f, 0, 1]] = self.s[[f, 1, 0]];
            s_flipped[[f, 1, 0]] = self.s[[f, 0, 1]];
            s_flipped[[f, 1, 1]] = self.s[[f, 0, 0]];
        }

        let mut flipped = Network::new(
            self.frequency.clone(),
            s_flipped,
            Array1::from_vec(vec![self.z0[1], self.z0[0]]),
        )?;
        flipped.name = self.name.clone();
        Ok(flipped)
    }

    /// Inverse network, such that `self.inv()?.cascade(&self)?` is a thru
    ///
    /// Used for de-embedding. Fails when S21 vanishes at any frequency.
    pub fn inv(&self) -> Result<Network, NetworkError> {
        let t = s2t(&self.s).ok_or(NetworkError::NotTwoPort(self.nports()))?;

        let mut t_inv = Array3::<Complex64>::zeros(t.raw_dim());
        for f in 0..t.shape()[0] {
            let t_f = t.slice(s![f, .., ..]).to_owned();
            if t_f.iter().any(|c| !c.is_finite()) {
                return Err(NetworkError::Singular(f));
            }
            let inv = inv_complex(&t_f).ok_or(NetworkError::Singular(f))?;
            t_inv.slice_mut(s![f, .., ..]).assign(&inv);
        }

        let s_inv = t2s(&t_inv).ok_or(NetworkError::NotTwoPort(self.nports()))?;
        Network::new(
            self.frequency.clone(),
            s_inv,
            Array1::from_vec(vec![self.z0[1], self.z0[0]]),
        )
    }
}

/// Cascade a list of networks left to right
///
/// A trailing 1-port terminates the chain.
pub fn cascade_list(networks: &[Network]) -> Result<Network, NetworkError> {
    let (first, rest) = networks.split_first().ok_or(NetworkError::Empty)?;
    rest.iter()
        .try_fold(first.clone(), |acc, next| acc.cascade(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use approx::assert_relative_eq;

    fn freq() -> Frequency {
        Frequency::new(1.0, 2.0, 3, FrequencyUnit::GHz, SweepType::Linear)
    }

    fn two_port(s11: Complex64, s21: Complex64, s12: Complex64, s22: Complex64) -> Network {
        let mut s = Array3::<Complex64>::zeros((3, 2, 2));
        for f in 0..3 {
            s[[f, 0, 0]] = s11;
            s[[f, 0, 1]] = s12;
            s[[f, 1, 0]] = s21;
            s[[f, 1, 1]] = s22;
        }
        Network::with_z0(freq(), s, 50.0).unwrap()
    }

    fn thru() -> Network {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        two_port(zero, one, one, zero)
    }

    fn attenuator() -> Network {
        two_port(
            Complex64::new(0.1, 0.05),
            Complex64::new(0.5, 0.2),
            Complex64::new(0.5, 0.2),
            Complex64::new(-0.05, 0.1),
        )
    }

    fn assert_s_close(a: &Network, b: &Network) {
        assert_eq!(a.s.shape(), b.s.shape());
        for (x, y) in a.s.iter().zip(b.s.iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-10);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_cascade_with_thru_is_identity() {
        let a = attenuator();
        assert_s_close(&a.cascade(&thru()).unwrap(), &a);
        assert_s_close(&thru().cascade(&a).unwrap(), &a);
    }

    #[test]
    fn test_cascade_matches_t_product() {
        let a = attenuator();
        let b = a.flip().unwrap();
        let ab = a.cascade(&b).unwrap();

        let ta = a.t().unwrap();
        let tb = b.t().unwrap();
        let t_ab = ab.t().unwrap();
        for f in 0..3 {
            let ta_f: ndarray::ArrayView2<Complex64> = ta.slice(s![f, .., ..]);
            let tb_f: ndarray::ArrayView2<Complex64> = tb.slice(s![f, .., ..]);
            let product = ta_f.dot(&tb_f);
            for (x, y) in product.iter().zip(t_ab.slice(s![f, .., ..]).iter()) {
                assert_relative_eq!(x.re, y.re, epsilon = 1e-9);
                assert_relative_eq!(x.im, y.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_terminate_with_one_port() {
        let gamma = Complex64::new(0.3, -0.4);
        let load = Network::with_z0(freq(), Array3::from_elem((3, 1, 1), gamma), 50.0).unwrap();

        let through_thru = thru().cascade(&load).unwrap();
        assert_eq!(through_thru.nports(), 1);
        assert_relative_eq!(through_thru.s[[1, 0, 0]].re, gamma.re, epsilon = 1e-12);
        assert_relative_eq!(through_thru.s[[1, 0, 0]].im, gamma.im, epsilon = 1e-12);
    }

    #[test]
    fn test_inv_deembeds() {
        let a = attenuator();
        let deembedded = a.inv().unwrap().cascade(&a).unwrap();
        assert_s_close(&deembedded, &thru());
    }

    #[test]
    fn test_flip_twice_is_identity() {
        let a = attenuator();
        assert_s_close(&a.flip().unwrap().flip().unwrap(), &a);
    }

    #[test]
    fn test_cascade_list() {
        let a = attenuator();
        let chain = cascade_list(&[a.clone(), thru(), a.clone()]).unwrap();
        assert_s_close(&chain, &a.cascade(&a).unwrap());
        assert!(matches!(cascade_list(&[]), Err(NetworkError::Empty)));
    }

    #[test]
    fn test_incompatible_inputs() {
        let a = attenuator();
        let other_band = Network::with_z0(
            Frequency::new(3.0, 4.0, 3, FrequencyUnit::GHz, SweepType::Linear),
            a.s.clone(),
            50.0,
        )
        .unwrap();
        assert!(matches!(a.cascade(&other_band), Err(NetworkError::Incompatible(_))));

        let load = Network::with_z0(freq(), Array3::zeros((3, 1, 1)), 50.0).unwrap();
        assert!(matches!(load.cascade(&a), Err(NetworkError::NotTwoPort(1))));
        assert!(matches!(load.flip(), Err(NetworkError::NotTwoPort(1))));
    }
}
