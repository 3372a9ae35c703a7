//! Submodule declarations and explicit export lists

use std::any::Any;
use std::collections::HashSet;
use std::fmt;

use super::error::LoadError;
use super::symbol::Symbol;

/// Explicit list of the names a submodule exposes
///
/// Built once per load with the chaining methods below. Names are kept in
/// declaration order; a name declared twice is reported by [`ExportList::validate`].
#[derive(Debug, Clone)]
pub struct ExportList {
    module: String,
    path: String,
    entries: Vec<(String, Symbol)>,
}

impl ExportList {
    /// Start an export list for module `module` whose items live under `path`
    /// (usually `module_path!()`)
    pub fn new(module: &str, path: &str) -> Self {
        Self {
            module: module.to_string(),
            path: path.to_string(),
            entries: Vec::new(),
        }
    }

    fn push(mut self, name: &str, symbol: Symbol) -> Self {
        self.entries.push((name.to_string(), symbol));
        self
    }

    fn item_path(&self, name: &str) -> String {
        format!("{}::{}", self.path, name)
    }

    /// Export a type
    pub fn ty<T: ?Sized + 'static>(self, name: &str) -> Self {
        let sym = Symbol::ty::<T>(&self.module, &self.item_path(name));
        self.push(name, sym)
    }

    /// Export a function pointer
    pub fn function<F: Any + Send + Sync>(self, name: &str, f: F) -> Self {
        let sym = Symbol::function(&self.module, &self.item_path(name), f);
        self.push(name, sym)
    }

    /// Export a numeric constant
    pub fn constant(self, name: &str, value: f64) -> Self {
        let sym = Symbol::constant(&self.module, &self.item_path(name), value);
        self.push(name, sym)
    }

    /// Export a prebuilt value
    pub fn instance<T: Any + Send + Sync>(self, name: &str, value: T) -> Self {
        let sym = Symbol::instance(&self.module, &self.item_path(name), value);
        self.push(name, sym)
    }

    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exported names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Reject lists that declare a name more than once
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (name, _) in &self.entries {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::DuplicateExport {
                    module: self.module.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Symbol)> {
        self.entries
    }
}

/// A unit of the toolkit that can be loaded into the namespace
pub trait Submodule: Send + Sync {
    /// Name the module is bound under
    fn id(&self) -> &str;

    /// Resolve the module and declare its exports
    fn load(&self) -> Result<ExportList, LoadError>;
}

impl<M: Submodule + ?Sized> Submodule for Box<M> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn load(&self) -> Result<ExportList, LoadError> {
        (**self).load()
    }
}

#[derive(Clone, Copy)]
enum Loader {
    Exports(fn() -> Result<ExportList, LoadError>),
    Unavailable(&'static str),
}

/// Static declaration of a toolkit submodule
#[derive(Clone, Copy)]
pub struct ModuleDecl {
    id: &'static str,
    loader: Loader,
}

impl ModuleDecl {
    pub const fn new(id: &'static str, exports: fn() -> Result<ExportList, LoadError>) -> Self {
        Self {
            id,
            loader: Loader::Exports(exports),
        }
    }

    /// A module whose dependency `dependency` is absent from this build
    pub const fn unavailable(id: &'static str, dependency: &'static str) -> Self {
        Self {
            id,
            loader: Loader::Unavailable(dependency),
        }
    }

    /// This module, made unavailable for want of `dependency`
    pub const fn without(self, dependency: &'static str) -> Self {
        Self::unavailable(self.id, dependency)
    }
}

impl Submodule for ModuleDecl {
    fn id(&self) -> &str {
        self.id
    }

    fn load(&self) -> Result<ExportList, LoadError> {
        match self.loader {
            Loader::Exports(exports) => exports(),
            Loader::Unavailable(dependency) => Err(LoadError::missing(self.id, dependency)),
        }
    }
}

impl fmt::Debug for ModuleDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let available = matches!(self.loader, Loader::Exports(_));
        f.debug_struct("ModuleDecl")
            .field("id", &self.id)
            .field("available", &available)
            .finish()
    }
}

/// How a loaded module enters the namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Binding {
    /// Bind the module name and re-export all of its declared symbols
    #[default]
    Glob,
    /// Bind the module name only
    Qualified,
}

/// Outcome of loading one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStatus {
    Loaded,
    /// Optional module whose dependency did not resolve
    Unavailable { reason: String },
    /// Optional module that resolved but whose data was rejected
    Degraded { reason: String },
}

impl ModuleStatus {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModuleStatus::Loaded)
    }
}

/// What to do when an optional module reports corrupt bundled data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptDataPolicy {
    /// Skip the module silently
    Ignore,
    /// Skip the module and log a warning
    #[default]
    Warn,
    /// Abort initialization
    Fatal,
}

impl std::str::FromStr for CorruptDataPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(CorruptDataPolicy::Ignore),
            "warn" => Ok(CorruptDataPolicy::Warn),
            "fatal" => Ok(CorruptDataPolicy::Fatal),
            other => Err(format!(
                "invalid corrupt data policy: {other}. Use 'ignore', 'warn' or 'fatal'"
            )),
        }
    }
}
