//! Physical and numerical constants for RF calculations
//!
//! Physical constants are SI. Tolerances are shared by the network and
//! calibration code.

use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("constants", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("constants", module_path!())
        .constant("c", C)
        .constant("mu_0", MU_0)
        .constant("epsilon_0", EPSILON_0)
        .constant("eta_0", ETA_0)
        .constant("INF", INF)
        .constant("NEAR_ZERO", NEAR_ZERO)
        .constant("PROPERTY_TOL", PROPERTY_TOL))
}

/// Speed of light in vacuum (m/s)
pub const C: f64 = 299_792_458.0;

/// Vacuum permeability (H/m)
pub const MU_0: f64 = 1.256_637_062_12e-6;

/// Vacuum permittivity (F/m)
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Impedance of free space (Ohm)
pub const ETA_0: f64 = 376.730_313_668;

/// Stand-in for an infinite impedance (open circuit)
pub const INF: f64 = 1e99;

/// Tolerance for detecting near-zero values in division and singularity checks.
pub const NEAR_ZERO: f64 = 1e-15;

/// Default tolerance for property checks (passivity, reciprocity).
/// This is the tolerance used when None is passed to property check functions.
pub const PROPERTY_TOL: f64 = 1e-12;

/// Relative singular-value cutoff for least-squares solves.
pub const SVD_TOLERANCE: f64 = 1e-14;
