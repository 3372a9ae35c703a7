//! Ready-made frequency bands and media
//!
//! Rectangular waveguide bands follow the EIA WR designations, 1001 points
//! each, in GHz.

use crate::frequency::{Frequency, FrequencyUnit, SweepType};
use crate::media::DefinedGammaZ0;
use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("instances", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("instances", module_path!())
        .instance("f_wr1p5", f_wr1p5())
        .instance("f_wr3", f_wr3())
        .instance("f_wr10", f_wr10())
        .instance("f_wr15", f_wr15())
        .instance("air", air()))
}

const BAND_POINTS: usize = 1001;

fn band(start_ghz: f64, stop_ghz: f64) -> Frequency {
    Frequency::new(start_ghz, stop_ghz, BAND_POINTS, FrequencyUnit::GHz, SweepType::Linear)
}

/// WR-1.5, 500-750 GHz
pub fn f_wr1p5() -> Frequency {
    band(500.0, 750.0)
}

/// WR-3, 220-325 GHz
pub fn f_wr3() -> Frequency {
    band(220.0, 325.0)
}

/// WR-10, 75-110 GHz
pub fn f_wr10() -> Frequency {
    band(75.0, 110.0)
}

/// WR-15, 50-75 GHz
pub fn f_wr15() -> Frequency {
    band(50.0, 75.0)
}

/// Lossless 50 ohm TEM medium over 1-10 GHz, 101 points
pub fn air() -> DefinedGammaZ0 {
    let freq = Frequency::new(1.0, 10.0, 101, FrequencyUnit::GHz, SweepType::Linear);
    DefinedGammaZ0::lossless(freq, 50.0)
}
