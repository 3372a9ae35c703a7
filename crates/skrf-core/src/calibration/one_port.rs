use anyhow::{anyhow, ensure, Result};
use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;

use super::{Calibration, ErrorTerms};
use crate::constants::NEAR_ZERO;
use crate::math::linalg::lstsq_complex;
use crate::network::Network;

/// One-port calibration from three or more reflect standards
///
/// With exactly three standards (classically short, open, load) the error
/// terms are solved exactly; more standards give a least-squares fit.
#[derive(Debug, Clone)]
pub struct OnePort {
    measured: Vec<Network>,
    ideals: Vec<Network>,
    terms: ErrorTerms,
}

impl OnePort {
    /// Pair each measured standard with its ideal response and solve
    pub fn new(measured: Vec<Network>, ideals: Vec<Network>) -> Result<Self> {
        ensure!(
            measured.len() == ideals.len(),
            "{} measurements for {} ideal standards",
            measured.len(),
            ideals.len()
        );
        ensure!(
            measured.len() >= 3,
            "one-port calibration needs at least 3 standards, got {}",
            measured.len()
        );

        let nfreq = measured[0].nfreq();
        for ntwk in measured.iter().chain(ideals.iter()) {
            ensure!(ntwk.nports() == 1, "standard '{}' is not a 1-port", ntwk.name());
            ensure!(
                ntwk.nfreq() == nfreq,
                "standard '{}' has {} points, expected {}",
                ntwk.name(),
                ntwk.nfreq(),
                nfreq
            );
        }

        let terms = solve(&measured, &ideals)?;
        Ok(Self {
            measured,
            ideals,
            terms,
        })
    }

    pub fn nstandards(&self) -> usize {
        self.measured.len()
    }

    /// Largest deviation between each measured standard and its ideal
    /// response passed through the fitted error box
    ///
    /// Zero (to rounding) with three standards.
    pub fn residual(&self) -> Result<f64> {
        let mut worst: f64 = 0.0;
        for (meas, ideal) in self.measured.iter().zip(&self.ideals) {
            let predicted = self.embed(ideal)?;
            for (a, b) in predicted.s.iter().zip(meas.s.iter()) {
                worst = worst.max((a - b).norm());
            }
        }
        Ok(worst)
    }

    fn check(&self, ntwk: &Network) -> Result<()> {
        ensure!(ntwk.nports() == 1, "'{}' is not a 1-port", ntwk.name());
        ensure!(
            ntwk.nfreq() == self.terms.directivity.len(),
            "'{}' has {} points, calibration has {}",
            ntwk.name(),
            ntwk.nfreq(),
            self.terms.directivity.len()
        );
        Ok(())
    }

    fn with_s(&self, template: &Network, s: Array3<Complex64>) -> Result<Network> {
        let mut out = Network::new(template.frequency.clone(), s, template.z0.clone())?;
        out.name = template.name.clone();
        Ok(out)
    }
}

/// Per frequency, least squares over the standards of
///
/// `e00 - Si * de + Sm * Si * e11 = Sm`, with `de = e00 e11 - e10 e01`
fn solve(measured: &[Network], ideals: &[Network]) -> Result<ErrorTerms> {
    let nfreq = measured[0].nfreq();
    let nstd = measured.len();
    let one = Complex64::new(1.0, 0.0);

    let mut e00 = Array1::<Complex64>::zeros(nfreq);
    let mut e11 = Array1::<Complex64>::zeros(nfreq);
    let mut e10e01 = Array1::<Complex64>::zeros(nfreq);

    for f in 0..nfreq {
        let mut a = Array2::<Complex64>::zeros((nstd, 3));
        let mut b = Array1::<Complex64>::zeros(nstd);
        for (k, (meas, ideal)) in measured.iter().zip(ideals).enumerate() {
            let sm = meas.s[[f, 0, 0]];
            let si = ideal.s[[f, 0, 0]];
            a[[k, 0]] = one;
            a[[k, 1]] = -si;
            a[[k, 2]] = sm * si;
            b[k] = sm;
        }

        let x = lstsq_complex(&a, &b).ok_or_else(|| {
            anyhow!(
                "standards do not determine the error terms at frequency index {}",
                f
            )
        })?;
        e00[f] = x[0];
        e11[f] = x[2];
        e10e01[f] = x[0] * x[2] - x[1];
    }

    Ok(ErrorTerms {
        directivity: e00,
        source_match: e11,
        reflection_tracking: e10e01,
    })
}

impl Calibration for OnePort {
    /// `Si = (Sm - e00) / (Sm e11 - de)`
    fn apply(&self, raw: &Network) -> Result<Network> {
        self.check(raw)?;
        let t = &self.terms;
        let mut s = Array3::<Complex64>::zeros((raw.nfreq(), 1, 1));

        for f in 0..raw.nfreq() {
            let sm = raw.s[[f, 0, 0]];
            let de = t.directivity[f] * t.source_match[f] - t.reflection_tracking[f];
            let den = sm * t.source_match[f] - de;
            ensure!(den.norm() > NEAR_ZERO, "correction is singular at frequency index {}", f);
            s[[f, 0, 0]] = (sm - t.directivity[f]) / den;
        }
        self.with_s(raw, s)
    }

    /// `Sm = e00 + e10 e01 Si / (1 - e11 Si)`
    fn embed(&self, ideal: &Network) -> Result<Network> {
        self.check(ideal)?;
        let t = &self.terms;
        let mut s = Array3::<Complex64>::zeros((ideal.nfreq(), 1, 1));

        for f in 0..ideal.nfreq() {
            let si = ideal.s[[f, 0, 0]];
            let den = Complex64::new(1.0, 0.0) - t.source_match[f] * si;
            ensure!(den.norm() > NEAR_ZERO, "error box is singular at frequency index {}", f);
            s[[f, 0, 0]] = t.directivity[f] + t.reflection_tracking[f] * si / den;
        }
        self.with_s(ideal, s)
    }

    fn error_terms(&self) -> &ErrorTerms {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use approx::assert_relative_eq;

    const NFREQ: usize = 3;

    fn reflect(gamma: Complex64) -> Network {
        let freq = Frequency::new(1.0, 3.0, NFREQ, FrequencyUnit::GHz, SweepType::Linear);
        Network::with_z0(freq, Array3::from_elem((NFREQ, 1, 1), gamma), 50.0).unwrap()
    }

    // Directivity=0.1, SourceMatch=0.05, ReflectionTracking=0.9
    fn simulate(si: Complex64) -> Complex64 {
        let e00 = Complex64::new(0.1, 0.0);
        let e11 = Complex64::new(0.05, 0.0);
        let et = Complex64::new(0.9, 0.0);
        e00 + (et * si) / (Complex64::new(1.0, 0.0) - e11 * si)
    }

    fn sol() -> Vec<Complex64> {
        vec![
            Complex64::new(-1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        ]
    }

    fn calibrate(ideals: &[Complex64]) -> OnePort {
        let measured = ideals.iter().map(|&g| reflect(simulate(g))).collect();
        OnePort::new(measured, ideals.iter().map(|&g| reflect(g)).collect()).unwrap()
    }

    #[test]
    fn test_short_open_load_recovers_dut() -> Result<()> {
        let cal = calibrate(&sol());

        let dut = Complex64::new(0.5, 0.2);
        let corrected = cal.apply(&reflect(simulate(dut)))?;

        assert_relative_eq!(corrected.s[[0, 0, 0]].re, dut.re, epsilon = 1e-12);
        assert_relative_eq!(corrected.s[[0, 0, 0]].im, dut.im, epsilon = 1e-12);

        let terms = cal.error_terms();
        assert_relative_eq!(terms.directivity[1].re, 0.1, epsilon = 1e-12);
        assert_relative_eq!(terms.source_match[1].re, 0.05, epsilon = 1e-12);
        assert_relative_eq!(terms.reflection_tracking[1].re, 0.9, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_overdetermined_fit_is_consistent() -> Result<()> {
        let mut ideals = sol();
        ideals.push(Complex64::new(0.0, 1.0));
        ideals.push(Complex64::new(0.3, -0.6));
        let cal = calibrate(&ideals);

        assert_eq!(cal.nstandards(), 5);
        assert!(cal.residual()? < 1e-10);

        let dut = reflect(Complex64::new(-0.2, 0.7));
        let round_trip = cal.apply(&cal.embed(&dut)?)?;
        assert_relative_eq!(round_trip.s[[2, 0, 0]].im, 0.7, epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_standards() {
        let two: Vec<Network> = sol()[..2].iter().map(|&g| reflect(g)).collect();
        assert!(OnePort::new(two.clone(), two).is_err());

        let measured: Vec<Network> = sol().iter().map(|&g| reflect(g)).collect();
        assert!(OnePort::new(measured.clone(), measured[..2].to_vec()).is_err());

        // identical standards leave the system rank deficient
        let same = vec![reflect(Complex64::new(-1.0, 0.0)); 3];
        assert!(OnePort::new(same.clone(), same).is_err());
    }
}
