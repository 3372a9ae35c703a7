//! Tapered transmission lines
//!
//! A taper is approximated by cascaded uniform line sections whose
//! characteristic impedance follows a profile from one end to the other.
//! All sections share the port impedance of the base medium.

use anyhow::{ensure, Result};
use num_complex::Complex64;

use crate::media::{DefinedGammaZ0, Media};
use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::{cascade_list, Network};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("taper", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("taper", module_path!())
        .ty::<Taper>("Taper")
        .ty::<TaperProfile>("TaperProfile"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaperProfile {
    #[default]
    Linear,
    /// Impedance grows geometrically, giving a constant reflection per unit length
    Exponential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Taper {
    pub start: f64,
    pub stop: f64,
    /// Physical length in meters
    pub length: f64,
    pub n_sections: usize,
    pub profile: TaperProfile,
}

impl Taper {
    pub fn new(start: f64, stop: f64, length: f64, n_sections: usize, profile: TaperProfile) -> Self {
        Self {
            start,
            stop,
            length,
            n_sections,
            profile,
        }
    }

    /// Profile value at `x` meters from the start
    pub fn impedance_at(&self, x: f64) -> f64 {
        let t = if self.length > 0.0 { x / self.length } else { 0.0 };
        match self.profile {
            TaperProfile::Linear => self.start + (self.stop - self.start) * t,
            TaperProfile::Exponential => self.start * (t * (self.stop / self.start).ln()).exp(),
        }
    }

    /// Characteristic impedance of each section, sampled at its midpoint
    pub fn section_impedances(&self) -> Vec<f64> {
        let d = self.section_length();
        (0..self.n_sections)
            .map(|i| self.impedance_at((i as f64 + 0.5) * d))
            .collect()
    }

    pub fn section_length(&self) -> f64 {
        self.length / self.n_sections.max(1) as f64
    }

    /// Two-port response built on `media`'s propagation constant
    pub fn network(&self, media: &DefinedGammaZ0) -> Result<Network> {
        ensure!(self.n_sections > 0, "taper needs at least one section");
        ensure!(
            self.start > 0.0 && self.stop > 0.0,
            "taper impedances must be positive ({} -> {})",
            self.start,
            self.stop
        );

        let d = self.section_length();
        let sections = self
            .section_impedances()
            .into_iter()
            .map(|z| media.clone().with_z0(Complex64::new(z, 0.0)).line(d))
            .collect::<Result<Vec<_>>>()?;

        Ok(cascade_list(&sections)?.with_name("taper"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, FrequencyUnit, SweepType};
    use approx::assert_relative_eq;

    fn media() -> DefinedGammaZ0 {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear);
        DefinedGammaZ0::lossless(freq, 50.0)
    }

    #[test]
    fn test_uniform_taper_is_matched() {
        let taper = Taper::new(50.0, 50.0, 0.2, 8, TaperProfile::Linear);
        let ntwk = taper.network(&media()).unwrap();

        for f in 0..ntwk.nfreq() {
            assert_relative_eq!(ntwk.s[[f, 0, 0]].norm(), 0.0, epsilon = 1e-12);
            assert_relative_eq!(ntwk.s[[f, 1, 0]].norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_profiles() {
        let linear = Taper::new(50.0, 100.0, 1.0, 4, TaperProfile::Linear);
        assert_eq!(linear.section_impedances(), vec![56.25, 68.75, 81.25, 93.75]);

        let expo = Taper::new(50.0, 200.0, 1.0, 2, TaperProfile::Exponential);
        assert_relative_eq!(expo.impedance_at(0.5), 100.0, epsilon = 1e-9);
        assert_relative_eq!(expo.impedance_at(1.0), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stepped_taper_is_lossless() {
        let taper = Taper::new(50.0, 100.0, 0.15, 10, TaperProfile::Exponential);
        let ntwk = taper.network(&media()).unwrap();

        assert_eq!(ntwk.nports(), 2);
        assert!(ntwk.is_reciprocal(Some(1e-12)));
        assert!(ntwk.is_lossless(Some(1e-9)));
    }

    #[test]
    fn test_rejects_degenerate_taper() {
        assert!(Taper::new(50.0, 75.0, 0.1, 0, TaperProfile::Linear).network(&media()).is_err());
        assert!(Taper::new(0.0, 75.0, 0.1, 4, TaperProfile::Exponential).network(&media()).is_err());
    }
}
