//! Transmission line relations
//!
//! Conversions between load impedance, reflection coefficient and input
//! impedance, plus conductor loss helpers. Impedances in ohms, lengths in
//! meters, frequencies in Hz.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::constants::{INF, MU_0};
use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("tline_functions", exports);

pub type SkinDepthFn = fn(f64, f64, f64) -> f64;
pub type ImpedanceToGammaFn = fn(Complex64, Complex64) -> Complex64;
pub type InputImpedanceFn = fn(Complex64, Complex64, Complex64, f64) -> Complex64;
pub type SwrFn = fn(Complex64) -> f64;
pub type ElectricalLengthFn = fn(Complex64, f64, bool) -> Complex64;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("tline_functions", module_path!())
        .function("skin_depth", skin_depth as SkinDepthFn)
        .function("surface_resistivity", surface_resistivity as SkinDepthFn)
        .function("zl_2_gamma0", zl_2_gamma0 as ImpedanceToGammaFn)
        .function("gamma0_2_zl", gamma0_2_zl as ImpedanceToGammaFn)
        .function("zl_2_zin", zl_2_zin as InputImpedanceFn)
        .function("gamma0_2_swr", gamma0_2_swr as SwrFn)
        .function("electrical_length", electrical_length as ElectricalLengthFn))
}

/// Skin depth in meters
///
/// `rho` is the bulk resistivity (ohm m) and `mu_r` the relative permeability.
pub fn skin_depth(f: f64, rho: f64, mu_r: f64) -> f64 {
    (rho / (PI * f * mu_r * MU_0)).sqrt()
}

/// Surface resistivity in ohm per square
pub fn surface_resistivity(f: f64, rho: f64, mu_r: f64) -> f64 {
    rho / skin_depth(f, rho, mu_r)
}

/// Reflection coefficient of load `zl` seen from a line of impedance `z0`
///
/// An infinite load (open) gives +1.
pub fn zl_2_gamma0(z0: Complex64, zl: Complex64) -> Complex64 {
    if zl.norm() >= INF {
        return Complex64::new(1.0, 0.0);
    }
    (zl - z0) / (zl + z0)
}

/// Load impedance producing reflection `gamma` on a line of impedance `z0`
///
/// `gamma == 1` maps to [`INF`].
pub fn gamma0_2_zl(z0: Complex64, gamma: Complex64) -> Complex64 {
    let denom = Complex64::new(1.0, 0.0) - gamma;
    if denom.norm() == 0.0 {
        return Complex64::new(INF, 0.0);
    }
    z0 * (Complex64::new(1.0, 0.0) + gamma) / denom
}

/// Input impedance of a line of length `d` terminated in `zl`
///
/// `gamma` is the complex propagation constant of the line.
pub fn zl_2_zin(z0: Complex64, zl: Complex64, gamma: Complex64, d: f64) -> Complex64 {
    let theta = gamma * d;
    let gamma_in = zl_2_gamma0(z0, zl) * (-2.0 * theta).exp();
    gamma0_2_zl(z0, gamma_in)
}

/// Voltage standing wave ratio of a reflection coefficient
pub fn gamma0_2_swr(gamma: Complex64) -> f64 {
    let mag = gamma.norm();
    (1.0 + mag) / (1.0 - mag)
}

/// Electrical length `gamma * d` of a line, in radians or degrees
///
/// The imaginary part is the phase length, the real part the loss in nepers.
pub fn electrical_length(gamma: Complex64, d: f64, deg: bool) -> Complex64 {
    let theta = gamma * d;
    if deg {
        theta * 180.0 / PI
    } else {
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_copper_skin_depth() {
        // copper at 1 GHz is about 2.06 um
        let delta = skin_depth(1e9, 1.68e-8, 1.0);
        assert_relative_eq!(delta, 2.063e-6, max_relative = 1e-3);
        assert_relative_eq!(surface_resistivity(1e9, 1.68e-8, 1.0), 1.68e-8 / delta);
    }

    #[test]
    fn test_gamma_impedance_inverse() {
        let z0 = c(50.0, 0.0);
        let zl = c(25.0, 40.0);
        let back = gamma0_2_zl(z0, zl_2_gamma0(z0, zl));
        assert_relative_eq!(back.re, zl.re, epsilon = 1e-9);
        assert_relative_eq!(back.im, zl.im, epsilon = 1e-9);

        assert_eq!(zl_2_gamma0(z0, c(INF, 0.0)), c(1.0, 0.0));
        assert_eq!(gamma0_2_zl(z0, c(1.0, 0.0)), c(INF, 0.0));
    }

    #[test]
    fn test_quarter_wave_transformer() {
        // lossless quarter wave line inverts the load: zin = z0^2 / zl
        let beta = c(0.0, 2.0 * PI);
        let zin = zl_2_zin(c(50.0, 0.0), c(100.0, 0.0), beta, 0.25);
        assert_relative_eq!(zin.re, 25.0, epsilon = 1e-9);
        assert_relative_eq!(zin.im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_swr_and_length() {
        assert_relative_eq!(gamma0_2_swr(c(0.5, 0.0)), 3.0);
        assert_relative_eq!(gamma0_2_swr(c(0.0, 0.0)), 1.0);
        let theta = electrical_length(c(0.0, PI), 0.5, true);
        assert_relative_eq!(theta.im, 90.0, epsilon = 1e-12);
    }
}
