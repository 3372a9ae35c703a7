//! skrf: one flat entry point over the skrf-core toolkit
//!
//! Two ways in:
//!
//! - [`prelude`] re-exports the toolkit statically, aliases included.
//! - [`init`] builds the runtime [`Namespace`] once per process. Optional
//!   modules (`vi`, `data`) that are missing from the build, disabled in
//!   [`Settings`] or carry corrupt data are left out without failing it.
//!
//! ```no_run
//! use skrf::Settings;
//!
//! let settings = Settings::load(None).unwrap();
//! skrf::logging::init(&settings.log_filter);
//! let ns = skrf::init(&settings).unwrap();
//! assert!(ns.contains("N"));
//! ```

use std::sync::OnceLock;

pub mod config;
pub mod logging;
mod toolkit;

pub use skrf_core::{
    calibration, constants, frequency, instances, io, math_functions, media, namespace, network,
    network_set, plotting, taper, tline_functions, touchstone, util,
};

#[cfg(feature = "data")]
pub use skrf_core::data;
#[cfg(feature = "vi")]
pub use skrf_core::vi;

pub use crate::config::Settings;
pub use skrf_core::namespace::{LoadError, Namespace};
pub use toolkit::{toolkit, ALIASES, OPTIONAL, REQUIRED};

/// Crate version from the manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static NAMESPACE: OnceLock<Namespace> = OnceLock::new();

/// Build the process-wide namespace, or return the one already built.
///
/// `settings` only matter on the first successful call. A failed build leaves
/// the namespace uninitialized.
pub fn init(settings: &Settings) -> Result<&'static Namespace, LoadError> {
    if let Some(ns) = NAMESPACE.get() {
        return Ok(ns);
    }
    let ns = toolkit(settings).build()?;
    Ok(NAMESPACE.get_or_init(|| ns))
}

/// The process-wide namespace, once [`init`] has succeeded
pub fn namespace() -> Option<&'static Namespace> {
    NAMESPACE.get()
}

pub mod prelude {
    pub use skrf_core::calibration::{Calibration, ErrorTerms, OnePort};
    pub use skrf_core::constants::{C, ETA_0};
    pub use skrf_core::frequency::{Frequency, FrequencyUnit, SweepType};
    pub use skrf_core::io::{load_all_touchstones, write_all_touchstones};
    pub use skrf_core::media::{DefinedGammaZ0, Media};
    pub use skrf_core::network::{cascade_list, Network, NetworkError};
    pub use skrf_core::network_set::NetworkSet;
    pub use skrf_core::plotting::{save_all_figs, Figure, FigureFormat, FigureSet, Trace};
    pub use skrf_core::taper::{Taper, TaperProfile};
    pub use skrf_core::touchstone::{ParameterType, SParamFormat};

    pub use skrf_core::frequency::Frequency as F;
    pub use skrf_core::io::load_all_touchstones as lat;
    pub use skrf_core::network::Network as N;
    pub use skrf_core::network_set::NetworkSet as NS;
    pub use skrf_core::plotting::save_all_figs as saf;
}
