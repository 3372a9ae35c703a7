//! Network I/O functions
//!
//! Provides methods for writing Network to Touchstone files.

use std::path::Path;

use ndarray::Array2;
use num_complex::Complex64;

use super::core::Network;
use crate::math::transforms::{s2y, s2z};
use crate::touchstone::{ParameterType, SParamFormat, Touchstone, TouchstoneError};

impl Network {
    /// Write the network to a Touchstone v1 file
    ///
    /// # Arguments
    /// * `path` - Path to output file (should have .sNp extension)
    /// * `format` - Output format (RI, MA, or DB)
    /// * `param_type` - S, Z or Y
    pub fn write_touchstone<P: AsRef<Path>>(
        &self,
        path: P,
        format: SParamFormat,
        param_type: ParameterType,
    ) -> Result<(), TouchstoneError> {
        self.to_touchstone(format, param_type)?.write(path)
    }

    /// Render the Touchstone v1 text of this network
    pub fn to_touchstone_contents(
        &self,
        format: SParamFormat,
        param_type: ParameterType,
    ) -> Result<String, TouchstoneError> {
        Ok(self.to_touchstone(format, param_type)?.to_string())
    }

    /// Convert Network to Touchstone data
    ///
    /// Z and Y are normalized to the port impedances as version 1 requires.
    pub fn to_touchstone(
        &self,
        format: SParamFormat,
        param_type: ParameterType,
    ) -> Result<Touchstone, TouchstoneError> {
        let params = match param_type {
            ParameterType::S => self.s.clone(),
            ParameterType::Z => s2z(&self.s, &self.z0) / &self.port_scaling(),
            ParameterType::Y => s2y(&self.s, &self.z0) * &self.port_scaling(),
            other => {
                return Err(TouchstoneError::InvalidOption(format!(
                    "writing {} parameters is not supported",
                    other.label()
                )))
            }
        };

        let mut comments = self.comments.clone();
        if let Some(name) = &self.name {
            if !comments.iter().any(|c| c.contains(name.as_str())) {
                comments.insert(0, name.clone());
            }
        }

        Ok(Touchstone {
            nports: self.nports(),
            frequency: self.frequency.clone(),
            params,
            z0: self.z0.iter().map(|z| z.re).collect(),
            comments,
            format,
            param_type,
            is_v2: false,
        })
    }

    /// `sqrt(z0_i * z0_j)` for every port pair
    fn port_scaling(&self) -> Array2<Complex64> {
        let n = self.nports();
        Array2::from_shape_fn((n, n), |(i, j)| {
            Complex64::new((self.z0[i].re * self.z0[j].re).sqrt(), 0.0)
        })
    }
}
