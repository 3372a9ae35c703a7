//! Frequency bands
//!
//! Points are stored in Hz; the unit only affects display, scaling and
//! Touchstone output.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("frequency", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("frequency", module_path!())
        .ty::<Frequency>("Frequency")
        .ty::<FrequencyUnit>("FrequencyUnit")
        .ty::<SweepType>("SweepType"))
}

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    #[default]
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    /// Upper-case spelling used on Touchstone option lines
    pub fn touchstone_label(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "HZ",
            FrequencyUnit::KHz => "KHZ",
            FrequencyUnit::MHz => "MHZ",
            FrequencyUnit::GHz => "GHZ",
            FrequencyUnit::THz => "THZ",
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hz" => Ok(FrequencyUnit::Hz),
            "khz" => Ok(FrequencyUnit::KHz),
            "mhz" => Ok(FrequencyUnit::MHz),
            "ghz" => Ok(FrequencyUnit::GHz),
            "thz" => Ok(FrequencyUnit::THz),
            _ => Err(format!(
                "Invalid frequency unit: {}. Use 'Hz', 'kHz', 'MHz', 'GHz', or 'THz'",
                s
            )),
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
            FrequencyUnit::THz => "THz",
        };
        f.write_str(s)
    }
}

/// Sweep type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    #[default]
    Linear,
    Log,
}

/// A frequency band representation
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Display unit
    unit: FrequencyUnit,
    sweep_type: SweepType,
}

impl Frequency {
    /// Create a new Frequency with start/stop/npoints
    ///
    /// # Arguments
    /// * `start` - Start frequency in the specified unit
    /// * `stop` - Stop frequency in the specified unit
    /// * `npoints` - Number of frequency points
    /// * `unit` - Frequency unit
    /// * `sweep_type` - Linear or logarithmic sweep
    ///
    /// # Example
    /// ```
    /// use skrf_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear);
    /// assert_eq!(freq.npoints(), 10);
    /// ```
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: FrequencyUnit,
        sweep_type: SweepType,
    ) -> Self {
        let mult = unit.multiplier();
        let (start_hz, stop_hz) = (start * mult, stop * mult);

        let f = match (npoints, sweep_type) {
            (0, _) => Vec::new(),
            (1, _) => vec![start_hz],
            (_, SweepType::Linear) => {
                let step = (stop_hz - start_hz) / (npoints - 1) as f64;
                (0..npoints).map(|i| start_hz + i as f64 * step).collect()
            }
            (_, SweepType::Log) => {
                let (log_start, log_stop) = (start_hz.ln(), stop_hz.ln());
                let log_step = (log_stop - log_start) / (npoints - 1) as f64;
                (0..npoints)
                    .map(|i| (log_start + i as f64 * log_step).exp())
                    .collect()
            }
        };

        Self {
            f,
            unit,
            sweep_type,
        }
    }

    /// Create from a frequency vector given in `unit`
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit) -> Self {
        let mult = unit.multiplier();
        Self {
            f: f.into_iter().map(|x| x * mult).collect(),
            unit,
            // actual sweep type unknown
            sweep_type: SweepType::Linear,
        }
    }

    /// Same points, different display unit
    pub fn with_unit(mut self, unit: FrequencyUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Get frequency vector in the current unit
    pub fn f_scaled(&self) -> Vec<f64> {
        let mult = self.unit.multiplier();
        self.f.iter().map(|&x| x / mult).collect()
    }

    /// Angular frequency in rad/s
    pub fn w(&self) -> Vec<f64> {
        self.f.iter().map(|&x| 2.0 * PI * x).collect()
    }

    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }

    /// Get the start frequency in Hz
    #[inline]
    pub fn start(&self) -> f64 {
        *self.f.first().unwrap_or(&0.0)
    }

    /// Get the stop frequency in Hz
    #[inline]
    pub fn stop(&self) -> f64 {
        *self.f.last().unwrap_or(&0.0)
    }

    /// Get the center frequency in Hz
    pub fn center(&self) -> f64 {
        (self.start() + self.stop()) / 2.0
    }

    /// Spacing between the first two points in Hz (0 for fewer than two points)
    pub fn step(&self) -> f64 {
        match self.f.as_slice() {
            [a, b, ..] => b - a,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    #[inline]
    pub fn sweep_type(&self) -> SweepType {
        self.sweep_type
    }

    /// Get the frequency span in Hz
    #[inline]
    pub fn span(&self) -> f64 {
        self.stop() - self.start()
    }

    /// Get the multiplier for the current unit
    pub fn multiplier(&self) -> f64 {
        self.unit.multiplier()
    }

    /// True when both bands hold the same points within `tol` Hz
    pub fn matches(&self, other: &Frequency, tol: f64) -> bool {
        self.npoints() == other.npoints()
            && self
                .f
                .iter()
                .zip(other.f.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mult = self.multiplier();
        write!(
            f,
            "{}-{} {}, {} pts",
            self.start() / mult,
            self.stop() / mult,
            self.unit,
            self.npoints()
        )
    }
}
