//! skrf-core: Core RF/Microwave engineering library
//!
//! Networks, media, calibration and Touchstone I/O, plus the namespace
//! machinery that assembles them into one flat toolkit.
//!
//! ## Modules
//!
//! - `namespace` - Flat symbol table built from required and optional modules
//! - `frequency` - Frequency band representation
//! - `network`, `network_set` - N-port networks and sets of them
//! - `touchstone`, `io` - Touchstone file I/O
//! - `media`, `taper` - Transmission line media and tapers
//! - `calibration` - One-port VNA calibration
//! - `math`, `math_functions`, `tline_functions` - Numerics
//! - `plotting` - Figures and batch export
//! - `vi` (feature `vi`) - Instrument control
//! - `data` (feature `data`) - Bundled sample networks
//!
//! Every toolkit module carries a `MODULE` declaration naming what it exports.

pub mod calibration;
pub mod constants;
pub mod frequency;
pub mod instances;
pub mod io;
pub mod math;
pub mod math_functions;
pub mod media;
pub mod namespace;
pub mod network;
pub mod network_set;
pub mod plotting;
pub mod taper;
pub mod tline_functions;
pub mod touchstone;
pub mod util;

#[cfg(feature = "data")]
pub mod data;
#[cfg(feature = "vi")]
pub mod vi;

pub use frequency::Frequency;
pub use namespace::{Namespace, NamespaceBuilder};
pub use network::Network;
pub use network_set::NetworkSet;
