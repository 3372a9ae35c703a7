//! Namespace module - one flat table of the toolkit's public names
//!
//! Each submodule declares an explicit [`ExportList`]. A [`NamespaceBuilder`]
//! loads the required modules in order, attempts the optional ones, re-exports
//! their symbols (later modules shadow earlier ones) and finally binds the
//! short aliases.
//!
//! Optional modules that fail with [`LoadError::MissingDependency`] are skipped
//! and recorded as [`ModuleStatus::Unavailable`]. Corrupt bundled data follows the
//! configured [`CorruptDataPolicy`]. Every other failure aborts the build.

mod builder;
mod error;
mod module;
mod symbol;
mod table;

pub use builder::NamespaceBuilder;
pub use error::{BoxError, LoadError};
pub use module::{Binding, CorruptDataPolicy, ExportList, ModuleDecl, ModuleStatus, Submodule};
pub use symbol::{Symbol, SymbolKind};
pub use table::{Namespace, Shadowing};
