//! Bulk Touchstone I/O for directories of measurements.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::namespace::{ExportList, LoadError, ModuleDecl};
use crate::network::Network;
use crate::touchstone::{ParameterType, SParamFormat, Touchstone, TouchstoneError};
use crate::util::get_extn;

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("io", exports);

/// Signature of [`load_all_touchstones`] as bound in the namespace
pub type LoadAllTouchstonesFn =
    fn(&Path, Option<&str>) -> Result<BTreeMap<String, Network>, TouchstoneError>;

/// Signature of [`write_all_touchstones`] as bound in the namespace
pub type WriteAllTouchstonesFn =
    fn(&BTreeMap<String, Network>, &Path, SParamFormat) -> Result<Vec<PathBuf>, TouchstoneError>;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("io", module_path!())
        .function(
            "load_all_touchstones",
            (|dir: &Path, contains: Option<&str>| load_all_touchstones(dir, contains))
                as LoadAllTouchstonesFn,
        )
        .function(
            "write_all_touchstones",
            (|networks: &BTreeMap<String, Network>, dir: &Path, format: SParamFormat| {
                write_all_touchstones(networks, dir, format)
            }) as WriteAllTouchstonesFn,
        ))
}

/// Load every `.sNp`/`.ts` file in `dir`, keyed by file stem
///
/// With `contains`, only file names containing that substring are read.
/// Files that fail to parse are logged and skipped; a missing directory is an
/// error.
pub fn load_all_touchstones<P: AsRef<Path>>(
    dir: P,
    contains: Option<&str>,
) -> Result<BTreeMap<String, Network>, TouchstoneError> {
    let mut networks = BTreeMap::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let Some(ext) = get_extn(&path) else { continue };
        if Touchstone::parse_extension(&ext).is_err() {
            continue;
        }
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if contains.is_some_and(|c| !file_name.contains(c)) {
            continue;
        }

        match Network::from_touchstone(&path) {
            Ok(ntwk) => {
                debug!(file = %path.display(), nports = ntwk.nports(), "loaded touchstone");
                networks.insert(ntwk.name().to_string(), ntwk);
            }
            Err(err) => warn!(file = %path.display(), error = %err, "skipping unreadable touchstone"),
        }
    }

    Ok(networks)
}

/// Write each network to `dir/<key>.sNp` as S-parameters
///
/// Returns the written paths in key order.
pub fn write_all_touchstones<P: AsRef<Path>>(
    networks: &BTreeMap<String, Network>,
    dir: P,
    format: SParamFormat,
) -> Result<Vec<PathBuf>, TouchstoneError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    networks
        .iter()
        .map(|(name, ntwk)| {
            let path = dir.join(format!("{}.s{}p", name, ntwk.nports()));
            ntwk.write_touchstone(&path, format, ParameterType::S)?;
            debug!(file = %path.display(), "wrote touchstone");
            Ok(path)
        })
        .collect()
}
