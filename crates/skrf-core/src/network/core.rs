//! The `Network` type, its constructors and Touchstone loading

use std::path::Path;

use ndarray::{Array1, Array2, Array3};
use num_complex::Complex64;

use super::NetworkError;
use crate::frequency::Frequency;
use crate::math::transforms::{y2s, z2s};
use crate::touchstone::{ParameterType, Touchstone, TouchstoneError};

/// An N-port electrical network
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Frequency data
    pub frequency: Frequency,
    /// S-parameter data [nfreq, nports, nports]
    pub s: Array3<Complex64>,
    /// Reference impedance (per port)
    pub z0: Array1<Complex64>,
    /// Network name
    pub name: Option<String>,
    /// Comments
    pub comments: Vec<String>,
}

impl Network {
    /// Create a new Network from S-parameters
    ///
    /// `s` must be shaped `[frequency.npoints(), n, n]` with `z0.len() == n`.
    pub fn new(
        frequency: Frequency,
        s: Array3<Complex64>,
        z0: Array1<Complex64>,
    ) -> Result<Self, NetworkError> {
        let shape = s.shape();
        if shape[0] != frequency.npoints() || shape[1] != shape[2] || shape[1] != z0.len() {
            return Err(NetworkError::ShapeMismatch {
                shape: shape.to_vec(),
                nfreq: frequency.npoints(),
                nports: z0.len(),
            });
        }
        Ok(Self {
            frequency,
            s,
            z0,
            name: None,
            comments: Vec::new(),
        })
    }

    /// Create a network with the same real reference impedance on every port
    pub fn with_z0(frequency: Frequency, s: Array3<Complex64>, z0: f64) -> Result<Self, NetworkError> {
        let nports = s.shape()[1];
        Self::new(frequency, s, Array1::from_elem(nports, Complex64::new(z0, 0.0)))
    }

    /// Builder-style name setter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Create from a Touchstone file
    ///
    /// The network is named after the file stem.
    pub fn from_touchstone<P: AsRef<Path>>(path: P) -> Result<Self, TouchstoneError> {
        let path = path.as_ref();
        let ts = Touchstone::from_file(path)?;
        let mut ntwk = Self::from_touchstone_data(ts)?;
        ntwk.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        Ok(ntwk)
    }

    /// Create from Touchstone content string
    ///
    /// # Arguments
    /// * `content` - Touchstone file content as string
    /// * `nports` - Number of ports (the `.sNp` extension for v1 content, ignored by v2)
    ///
    /// # Example
    /// ```
    /// use skrf_core::Network;
    /// let content = "# GHz S RI R 50\n1.0 0.5 0.0\n2.0 0.25 0.0\n";
    /// let ntwk = Network::from_touchstone_content(content, 1).unwrap();
    /// assert_eq!(ntwk.nfreq(), 2);
    /// ```
    pub fn from_touchstone_content(content: &str, nports: usize) -> Result<Self, TouchstoneError> {
        let ts = Touchstone::from_str(content, nports)?;
        Self::from_touchstone_data(ts)
    }

    /// Shared logic for both file and string-based construction.
    fn from_touchstone_data(ts: Touchstone) -> Result<Self, TouchstoneError> {
        let z0 = Array1::from_vec(ts.z0.iter().map(|&x| Complex64::new(x, 0.0)).collect());

        let s = match ts.param_type {
            ParameterType::S => ts.params,
            ParameterType::Z => z2s(&denormalize_v1(ts.params, &ts.z0, ts.is_v2, true), &z0),
            ParameterType::Y => y2s(&denormalize_v1(ts.params, &ts.z0, ts.is_v2, false), &z0),
            other => {
                return Err(TouchstoneError::InvalidOption(format!(
                    "{} parameters cannot be converted to S-parameters",
                    other.label()
                )))
            }
        };

        Ok(Self {
            frequency: ts.frequency,
            s,
            z0,
            name: None,
            comments: ts.comments,
        })
    }

    /// Get the number of ports
    #[inline]
    pub fn nports(&self) -> usize {
        self.s.shape()[1]
    }

    /// Get the number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.s.shape()[0]
    }

    /// Name, or an empty string for unnamed networks
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Version 1 files store Z and Y normalized to the port impedances.
///
/// Z is scaled by `sqrt(z0_i * z0_j)`, Y divided by it.
fn denormalize_v1(params: Array3<Complex64>, z0: &[f64], is_v2: bool, is_z: bool) -> Array3<Complex64> {
    if is_v2 {
        return params;
    }
    let nports = params.shape()[1];
    let scaling = Array2::from_shape_fn((nports, nports), |(i, j)| {
        Complex64::new((z0[i] * z0[j]).sqrt(), 0.0)
    });
    if is_z {
        params * &scaling
    } else {
        params / &scaling
    }
}
