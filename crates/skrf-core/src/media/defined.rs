use anyhow::{ensure, Result};
use ndarray::Array1;
use num_complex::Complex64;

use super::Media;
use crate::constants::{C, ETA_0};
use crate::frequency::Frequency;

/// Medium given directly by its propagation constant and impedance
#[derive(Debug, Clone, PartialEq)]
pub struct DefinedGammaZ0 {
    frequency: Frequency,
    gamma: Array1<Complex64>,
    z0: Array1<Complex64>,
    port_z0: Complex64,
}

impl DefinedGammaZ0 {
    /// Both arrays must have one value per frequency point.
    ///
    /// The port impedance starts at the first characteristic impedance value
    /// (50 ohm for an empty band).
    pub fn new(frequency: Frequency, gamma: Array1<Complex64>, z0: Array1<Complex64>) -> Result<Self> {
        let n = frequency.npoints();
        ensure!(
            gamma.len() == n && z0.len() == n,
            "gamma ({}) and z0 ({}) must have {} points",
            gamma.len(),
            z0.len(),
            n
        );
        let port_z0 = z0.first().copied().unwrap_or(Complex64::new(50.0, 0.0));
        Ok(Self {
            frequency,
            gamma,
            z0,
            port_z0,
        })
    }

    /// Lossless TEM medium with phase velocity `c` and real impedance `z0`
    pub fn lossless(frequency: Frequency, z0: f64) -> Self {
        let gamma = frequency
            .w()
            .into_iter()
            .map(|w| Complex64::new(0.0, w / C))
            .collect();
        let z0_arr = Array1::from_elem(frequency.npoints(), Complex64::new(z0, 0.0));
        Self {
            frequency,
            gamma,
            z0: z0_arr,
            port_z0: Complex64::new(z0, 0.0),
        }
    }

    /// Plane wave in vacuum
    pub fn freespace(frequency: Frequency) -> Self {
        Self::lossless(frequency, ETA_0)
    }

    /// Same propagation, uniform characteristic impedance `z0`
    ///
    /// The port impedance is kept.
    pub fn with_z0(mut self, z0: Complex64) -> Self {
        self.z0 = Array1::from_elem(self.frequency.npoints(), z0);
        self
    }

    /// Same medium with networks referenced to `port_z0`
    pub fn with_port_z0(mut self, port_z0: Complex64) -> Self {
        self.port_z0 = port_z0;
        self
    }
}

impl Media for DefinedGammaZ0 {
    fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    fn gamma(&self) -> &Array1<Complex64> {
        &self.gamma
    }

    fn z0(&self) -> &Array1<Complex64> {
        &self.z0
    }

    fn port_z0(&self) -> Complex64 {
        self.port_z0
    }
}
