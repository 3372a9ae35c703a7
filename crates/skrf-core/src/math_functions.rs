//! Scalar conversions between complex, dB, neper and phase representations.

use std::f64::consts::{PI, TAU};

use num_complex::Complex64;

use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("math_functions", exports);

pub type ComplexToRealFn = fn(Complex64) -> f64;
pub type RealToRealFn = fn(f64) -> f64;
pub type PolarToComplexFn = fn(f64, f64) -> Complex64;
pub type UnwrapFn = fn(&[f64]) -> Vec<f64>;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("math_functions", module_path!())
        .function("complex_2_magnitude", complex_2_magnitude as ComplexToRealFn)
        .function("complex_2_db", complex_2_db as ComplexToRealFn)
        .function("complex_2_db10", complex_2_db10 as ComplexToRealFn)
        .function("complex_2_radian", complex_2_radian as ComplexToRealFn)
        .function("complex_2_degree", complex_2_degree as ComplexToRealFn)
        .function("magnitude_2_db", magnitude_2_db as RealToRealFn)
        .function("db_2_magnitude", db_2_magnitude as RealToRealFn)
        .function("radian_2_degree", radian_2_degree as RealToRealFn)
        .function("degree_2_radian", degree_2_radian as RealToRealFn)
        .function("np_2_db", np_2_db as RealToRealFn)
        .function("db_2_np", db_2_np as RealToRealFn)
        .function("magdeg_2_reim", magdeg_2_reim as PolarToComplexFn)
        .function("dbdeg_2_reim", dbdeg_2_reim as PolarToComplexFn)
        .function("unwrap_rad", unwrap_rad as UnwrapFn))
}

pub fn complex_2_magnitude(z: Complex64) -> f64 {
    z.norm()
}

/// 20 log10 |z|
pub fn complex_2_db(z: Complex64) -> f64 {
    magnitude_2_db(z.norm())
}

/// 10 log10 |z|, for power quantities
pub fn complex_2_db10(z: Complex64) -> f64 {
    10.0 * z.norm().log10()
}

pub fn complex_2_radian(z: Complex64) -> f64 {
    z.arg()
}

pub fn complex_2_degree(z: Complex64) -> f64 {
    radian_2_degree(z.arg())
}

pub fn magnitude_2_db(mag: f64) -> f64 {
    20.0 * mag.log10()
}

pub fn db_2_magnitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

pub fn radian_2_degree(rad: f64) -> f64 {
    rad.to_degrees()
}

pub fn degree_2_radian(deg: f64) -> f64 {
    deg.to_radians()
}

/// Nepers to dB (1 Np = 20 / ln 10 dB)
pub fn np_2_db(np: f64) -> f64 {
    np * 20.0 / std::f64::consts::LN_10
}

pub fn db_2_np(db: f64) -> f64 {
    db * std::f64::consts::LN_10 / 20.0
}

/// Complex value from magnitude and phase in degrees
pub fn magdeg_2_reim(mag: f64, deg: f64) -> Complex64 {
    Complex64::from_polar(mag, deg.to_radians())
}

/// Complex value from dB magnitude and phase in degrees
pub fn dbdeg_2_reim(db: f64, deg: f64) -> Complex64 {
    magdeg_2_reim(db_2_magnitude(db), deg)
}

/// Remove 2π jumps from a phase trace in radians
///
/// Each step larger than π is taken to be a wrap and corrected by the
/// nearest multiple of 2π. The first sample is left as is.
pub fn unwrap_rad(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;

    for &p in phase {
        if let Some(q) = prev {
            let delta = p - q;
            if delta.abs() > PI {
                offset -= TAU * (delta / TAU).round();
            }
        }
        out.push(p + offset);
        prev = Some(p);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_db_conversions() {
        assert_relative_eq!(complex_2_db(Complex64::new(6.0, 8.0)), 20.0, epsilon = 1e-10);
        assert_relative_eq!(complex_2_db10(Complex64::new(6.0, 8.0)), 10.0, epsilon = 1e-10);
        assert_relative_eq!(db_2_magnitude(-20.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(magnitude_2_db(db_2_magnitude(-3.7)), -3.7, epsilon = 1e-12);
    }

    #[test]
    fn test_polar_conversions() {
        let z = dbdeg_2_reim(20.0, 90.0);
        assert_relative_eq!(z.re, 0.0, epsilon = 1e-10);
        assert_relative_eq!(z.im, 10.0, epsilon = 1e-10);
        assert_relative_eq!(complex_2_degree(Complex64::new(0.0, -1.0)), -90.0, epsilon = 1e-10);
    }

    #[test]
    fn test_neper() {
        assert_relative_eq!(np_2_db(1.0), 8.685_889_638, epsilon = 1e-8);
        assert_relative_eq!(db_2_np(np_2_db(0.25)), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_unwrap_rad() {
        // a linear phase ramp of -1 rad per step, wrapped into (-π, π]
        let ramp: Vec<f64> = (0..12).map(|i| -(i as f64)).collect();
        let wrapped: Vec<f64> = ramp
            .iter()
            .map(|p| Complex64::from_polar(1.0, *p).arg())
            .collect();

        for (a, b) in unwrap_rad(&wrapped).iter().zip(ramp.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
        assert!(unwrap_rad(&[]).is_empty());
    }
}
