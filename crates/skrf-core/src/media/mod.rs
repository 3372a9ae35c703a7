//! Transmission line media
//!
//! A medium is defined by its propagation constant and characteristic
//! impedance over a frequency band. The [`Media`] trait turns that into
//! circuit building blocks (lines, terminations, delayed shorts) as
//! [`Network`]s whose ports are referenced to the medium's port impedance.

mod defined;

use anyhow::{ensure, Result};
use ndarray::{Array1, Array3};
use num_complex::Complex64;

use crate::frequency::Frequency;
use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::Network;
use crate::tline_functions::zl_2_gamma0;

pub use defined::DefinedGammaZ0;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("media", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("media", module_path!())
        .ty::<dyn Media>("Media")
        .ty::<DefinedGammaZ0>("DefinedGammaZ0"))
}

/// A transmission line medium
pub trait Media {
    fn frequency(&self) -> &Frequency;

    /// Complex propagation constant per frequency point (1/m)
    fn gamma(&self) -> &Array1<Complex64>;

    /// Characteristic impedance per frequency point
    fn z0(&self) -> &Array1<Complex64>;

    /// Port reference impedance of generated networks
    fn port_z0(&self) -> Complex64;

    /// Matched, lossy or lossless line of physical length `d` meters
    ///
    /// When the port impedance differs from the characteristic impedance the
    /// line is renormalized, so its reflection is not zero.
    fn line(&self, d: f64) -> Result<Network> {
        let nfreq = self.frequency().npoints();
        let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));
        let one = Complex64::new(1.0, 0.0);

        for f in 0..nfreq {
            let g = zl_2_gamma0(self.port_z0(), self.z0()[f]);
            let e = (-self.gamma()[f] * d).exp();
            let denom = one - g * g * e * e;
            ensure!(denom.norm() > 0.0, "line of length {} m is resonant at point {}", d, f);

            let s11 = g * (one - e * e) / denom;
            let s21 = e * (one - g * g) / denom;
            s[[f, 0, 0]] = s11;
            s[[f, 1, 1]] = s11;
            s[[f, 0, 1]] = s21;
            s[[f, 1, 0]] = s21;
        }
        self.network(s, "line")
    }

    /// Zero-length line
    fn thru(&self) -> Result<Network> {
        Ok(self.line(0.0)?.with_name("thru"))
    }

    /// One-port with constant reflection coefficient `gamma`
    fn load(&self, gamma: Complex64) -> Result<Network> {
        let s = Array3::from_elem((self.frequency().npoints(), 1, 1), gamma);
        self.network(s, "load")
    }

    fn short(&self) -> Result<Network> {
        Ok(self.load(Complex64::new(-1.0, 0.0))?.with_name("short"))
    }

    fn open(&self) -> Result<Network> {
        Ok(self.load(Complex64::new(1.0, 0.0))?.with_name("open"))
    }

    fn match_load(&self) -> Result<Network> {
        Ok(self.load(Complex64::new(0.0, 0.0))?.with_name("match"))
    }

    /// Short circuit behind a line of length `d`
    fn delay_short(&self, d: f64) -> Result<Network> {
        Ok(self.line(d)?.cascade(&self.short()?)?.with_name("delay_short"))
    }

    /// Reflection `gamma` behind a line of length `d`
    fn delay_load(&self, gamma: Complex64, d: f64) -> Result<Network> {
        Ok(self.line(d)?.cascade(&self.load(gamma)?)?.with_name("delay_load"))
    }

    /// `gamma * d` per frequency point; imaginary part in radians
    fn electrical_length(&self, d: f64) -> Array1<Complex64> {
        self.gamma().mapv(|g| g * d)
    }

    /// Physical length giving an electrical length of `theta` radians at `f_index`
    fn to_meters(&self, theta: f64, f_index: usize) -> Result<f64> {
        let beta = self
            .gamma()
            .get(f_index)
            .map(|g| g.im)
            .ok_or_else(|| anyhow::anyhow!("frequency index {} out of range", f_index))?;
        ensure!(beta != 0.0, "medium has no phase velocity at index {}", f_index);
        Ok(theta / beta)
    }

    #[doc(hidden)]
    fn network(&self, s: Array3<Complex64>, name: &str) -> Result<Network> {
        let nports = s.shape()[1];
        let z0 = Array1::from_elem(nports, self.port_z0());
        Ok(Network::new(self.frequency().clone(), s, z0)?.with_name(name))
    }
}
