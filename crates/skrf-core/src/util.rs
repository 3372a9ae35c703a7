//! Small helpers for frequency vectors and file names.

use std::ops::Range;
use std::path::Path;

use crate::namespace::{ExportList, LoadError, ModuleDecl};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("util", exports);

pub type FindNearestIndexFn = fn(&[f64], f64) -> Option<usize>;
pub type SliceDomainFn = fn(&[f64], f64, f64) -> Range<usize>;
pub type PathStrFn = fn(&Path) -> Option<String>;

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("util", module_path!())
        .function("find_nearest_index", find_nearest_index as FindNearestIndexFn)
        .function("slice_domain", slice_domain as SliceDomainFn)
        .function("basename_noext", basename_noext as PathStrFn)
        .function("get_extn", get_extn as PathStrFn))
}

/// Index of the element closest to `value`; the first one wins on ties
pub fn find_nearest_index(values: &[f64], value: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
}

/// Index range of an ascending vector covering `[start, stop]`
///
/// The ends snap to the nearest samples, so the range is never empty for a
/// non-empty vector.
pub fn slice_domain(values: &[f64], start: f64, stop: f64) -> Range<usize> {
    match (find_nearest_index(values, start), find_nearest_index(values, stop)) {
        (Some(a), Some(b)) => a.min(b)..a.max(b) + 1,
        _ => 0..0,
    }
}

/// File name without directory or extension
pub fn basename_noext(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Lower-case extension without the dot
pub fn get_extn(path: &Path) -> Option<String> {
    path.extension().map(|s| s.to_string_lossy().to_lowercase())
}
