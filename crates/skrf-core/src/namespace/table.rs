//! The assembled, read-only namespace

use std::any::Any;
use std::collections::BTreeMap;

use super::module::ModuleStatus;
use super::symbol::{Symbol, SymbolKind};

/// A name that was rebound by a later module or alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shadowing {
    pub name: String,
    /// Module whose symbol was replaced
    pub previous: String,
    /// Module whose symbol now holds the name
    pub current: String,
}

/// Flat name -> symbol table built by [`NamespaceBuilder`](super::NamespaceBuilder)
///
/// Immutable once built; share it by reference or clone it.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub(super) bindings: BTreeMap<String, Symbol>,
    pub(super) aliases: BTreeMap<String, String>,
    pub(super) modules: Vec<(String, ModuleStatus)>,
    pub(super) qualified: BTreeMap<String, BTreeMap<String, Symbol>>,
    pub(super) shadowed: Vec<Shadowing>,
}

impl Namespace {
    /// Symbol bound to `name`, aliases included
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.bindings.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bound names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Canonical name an alias was bound to
    pub fn resolve_alias(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Load outcome of a registered module
    pub fn status(&self, module: &str) -> Option<&ModuleStatus> {
        self.modules
            .iter()
            .find(|(id, _)| id == module)
            .map(|(_, status)| status)
    }

    pub fn is_loaded(&self, module: &str) -> bool {
        self.status(module).is_some_and(ModuleStatus::is_loaded)
    }

    /// Every registered module with its status, required modules first
    pub fn modules(&self) -> &[(String, ModuleStatus)] {
        &self.modules
    }

    /// A symbol looked up through its module, whether or not it was re-exported
    pub fn qualified(&self, module: &str, name: &str) -> Option<&Symbol> {
        self.qualified.get(module)?.get(name)
    }

    /// Names declared by a loaded module
    pub fn module_exports(&self, module: &str) -> Option<impl Iterator<Item = &str>> {
        self.qualified
            .get(module)
            .map(|table| table.keys().map(String::as_str))
    }

    /// Names that were rebound during initialization, in bind order
    pub fn shadowed(&self) -> &[Shadowing] {
        &self.shadowed
    }

    /// Borrow the function bound to `name` as `F`
    pub fn function<F: Any>(&self, name: &str) -> Option<&F> {
        self.get(name)
            .filter(|s| s.kind() == SymbolKind::Function)
            .and_then(Symbol::downcast_ref::<F>)
    }

    /// Borrow the prebuilt value bound to `name` as `T`
    pub fn instance<T: Any>(&self, name: &str) -> Option<&T> {
        self.get(name)
            .filter(|s| s.kind() == SymbolKind::Instance)
            .and_then(Symbol::downcast_ref::<T>)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Symbol::as_constant)
    }

    /// True when `name` is bound to the type symbol for `T`
    pub fn is_type<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.get(name).is_some_and(Symbol::is_type::<T>)
    }
}
