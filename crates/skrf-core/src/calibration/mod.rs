//! VNA calibration
//!
//! A calibration is solved from measurements of known standards and then
//! corrects raw measurements of a device. Only the one-port, three-term error
//! model is provided.

mod one_port;

use anyhow::Result;
use ndarray::Array1;
use num_complex::Complex64;

use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::Network;

pub use one_port::OnePort;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("calibration", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("calibration", module_path!())
        .ty::<dyn Calibration>("Calibration")
        .ty::<OnePort>("OnePort")
        .ty::<ErrorTerms>("ErrorTerms"))
}

/// A solved calibration
pub trait Calibration {
    /// Remove the error box from a raw measurement
    fn apply(&self, raw: &Network) -> Result<Network>;

    /// Add the error box to an ideal response, giving what the instrument would read
    fn embed(&self, ideal: &Network) -> Result<Network>;

    fn error_terms(&self) -> &ErrorTerms;
}

/// One-port error terms per frequency point
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorTerms {
    /// e00
    pub directivity: Array1<Complex64>,
    /// e11
    pub source_match: Array1<Complex64>,
    /// e10 * e01
    pub reflection_tracking: Array1<Complex64>,
}
