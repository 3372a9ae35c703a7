//! Sample networks compiled into the library
//!
//! WR-10 measurements of calibration standards, a straight section and a
//! ring slot resonator. They are parsed when the module is loaded; a file
//! that does not parse is reported as [`LoadError::CorruptData`].

use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::Network;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("data", exports);

struct Bundled {
    name: &'static str,
    nports: usize,
    content: &'static str,
}

const BUNDLED: &[Bundled] = &[
    Bundled {
        name: "ring_slot",
        nports: 2,
        content: include_str!("../../data/ring_slot.s2p"),
    },
    Bundled {
        name: "line",
        nports: 2,
        content: include_str!("../../data/line.s2p"),
    },
    Bundled {
        name: "short",
        nports: 1,
        content: include_str!("../../data/short.s1p"),
    },
    Bundled {
        name: "open",
        nports: 1,
        content: include_str!("../../data/open.s1p"),
    },
    Bundled {
        name: "load",
        nports: 1,
        content: include_str!("../../data/load.s1p"),
    },
];

fn exports() -> Result<ExportList, LoadError> {
    BUNDLED.iter().try_fold(ExportList::new("data", module_path!()), |list, b| {
        Ok(list.instance(b.name, parse(b)?))
    })
}

fn parse(b: &Bundled) -> Result<Network, LoadError> {
    Network::from_touchstone_content(b.content, b.nports)
        .map(|n| n.with_name(b.name))
        .map_err(|e| LoadError::corrupt("data", format!("{}: {}", b.name, e)))
}

/// Names of the bundled networks
pub fn names() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|b| b.name)
}

/// Parse one bundled network by name
pub fn load(name: &str) -> Option<Result<Network, LoadError>> {
    BUNDLED.iter().find(|b| b.name == name).map(parse)
}

pub fn ring_slot() -> Result<Network, LoadError> {
    parse(&BUNDLED[0])
}
