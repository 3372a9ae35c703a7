//! Network module - N-port electrical network representation
//!
//! Provides the core Network struct and associated operations for
//! S-parameter and other network parameter manipulation.

mod core;
mod io;
mod operators;
mod params;
mod properties;

use thiserror::Error;

use crate::math::transforms::{s2t, s2y, s2z, t2s, y2s, z2s};
use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::touchstone::TouchstoneError;

pub use self::core::Network;
pub use operators::cascade_list;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("network", exports);

/// Signature of [`cascade_list`] as bound in the namespace
pub type CascadeListFn = fn(&[Network]) -> Result<Network, NetworkError>;

/// Signature of the free parameter conversions bound in the namespace
pub type ConvertFn =
    fn(&ndarray::Array3<num_complex::Complex64>, &ndarray::Array1<num_complex::Complex64>) -> ndarray::Array3<num_complex::Complex64>;

/// Signature of the two-port S/T conversions bound in the namespace
pub type TwoPortConvertFn =
    fn(&ndarray::Array3<num_complex::Complex64>) -> Option<ndarray::Array3<num_complex::Complex64>>;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("network", module_path!())
        .ty::<Network>("Network")
        .ty::<NetworkError>("NetworkError")
        .function("cascade_list", cascade_list as CascadeListFn)
        .function("s2z", s2z as ConvertFn)
        .function("z2s", z2s as ConvertFn)
        .function("s2y", s2y as ConvertFn)
        .function("y2s", y2s as ConvertFn)
        .function("s2t", s2t as TwoPortConvertFn)
        .function("t2s", t2s as TwoPortConvertFn))
}

/// Errors from network construction and combination
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("S-parameters of shape {shape:?} do not fit {nfreq} frequencies and {nports} port impedances")]
    ShapeMismatch {
        shape: Vec<usize>,
        nfreq: usize,
        nports: usize,
    },

    #[error("networks are not compatible: {0}")]
    Incompatible(String),

    #[error("operation needs a 2-port network, got {0} ports")]
    NotTwoPort(usize),

    #[error("T-parameters are singular at frequency index {0}")]
    Singular(usize),

    #[error("empty network list")]
    Empty,

    #[error(transparent)]
    Touchstone(#[from] TouchstoneError),
}
