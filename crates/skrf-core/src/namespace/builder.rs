//! Namespace assembly
//!
//! Loads required modules (fatal on failure), attempts optional ones, then
//! binds module names, re-exports and aliases in that order.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use super::error::LoadError;
use super::module::{Binding, CorruptDataPolicy, ExportList, ModuleStatus, Submodule};
use super::symbol::Symbol;
use super::table::{Namespace, Shadowing};

struct Registration {
    module: Box<dyn Submodule>,
    binding: Binding,
}

/// Collects the module registry and alias table, then builds a [`Namespace`]
///
/// # Example
/// ```
/// use skrf_core::namespace::{Binding, NamespaceBuilder};
///
/// let ns = NamespaceBuilder::new()
///     .require(skrf_core::frequency::MODULE, Binding::Glob)
///     .alias("F", "Frequency")
///     .build()
///     .unwrap();
/// assert!(ns.is_type::<skrf_core::Frequency>("F"));
/// ```
#[derive(Default)]
pub struct NamespaceBuilder {
    required: Vec<Registration>,
    optional: Vec<Registration>,
    aliases: Vec<(String, String)>,
    corrupt_data: CorruptDataPolicy,
}

impl NamespaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module whose load failure aborts initialization
    pub fn require(mut self, module: impl Submodule + 'static, binding: Binding) -> Self {
        self.required.push(Registration {
            module: Box::new(module),
            binding,
        });
        self
    }

    /// Register a module that may be absent
    pub fn optional(mut self, module: impl Submodule + 'static, binding: Binding) -> Self {
        self.optional.push(Registration {
            module: Box::new(module),
            binding,
        });
        self
    }

    /// Bind `alias` to whatever `target` names once all exports are in place
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), target.into()));
        self
    }

    pub fn corrupt_data_policy(mut self, policy: CorruptDataPolicy) -> Self {
        self.corrupt_data = policy;
        self
    }

    /// Registered module ids, required first
    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(|r| r.module.id())
    }

    /// Load every module and assemble the namespace.
    ///
    /// The builder is left untouched, so calling this again yields an equal namespace
    /// as long as the modules themselves load the same way.
    pub fn build(&self) -> Result<Namespace, LoadError> {
        self.check_unique_ids()?;

        let mut modules = Vec::with_capacity(self.required.len() + self.optional.len());
        let mut loaded: Vec<(String, ExportList, Binding)> = Vec::new();

        for reg in &self.required {
            let id = reg.module.id().to_string();
            let exports = load_validated(reg.module.as_ref())?;
            debug!(module = %id, symbols = exports.len(), "loaded required module");
            modules.push((id.clone(), ModuleStatus::Loaded));
            loaded.push((id, exports, reg.binding));
        }

        for reg in &self.optional {
            let id = reg.module.id().to_string();
            let status = match load_validated(reg.module.as_ref()) {
                Ok(exports) => {
                    debug!(module = %id, symbols = exports.len(), "loaded optional module");
                    loaded.push((id.clone(), exports, reg.binding));
                    ModuleStatus::Loaded
                }
                Err(err @ LoadError::MissingDependency { .. }) => {
                    debug!(module = %id, reason = %err, "optional module unavailable");
                    ModuleStatus::Unavailable {
                        reason: err.to_string(),
                    }
                }
                Err(err @ LoadError::CorruptData { .. }) => match self.corrupt_data {
                    CorruptDataPolicy::Fatal => return Err(err),
                    CorruptDataPolicy::Warn => {
                        warn!(module = %id, reason = %err, "skipping optional module");
                        ModuleStatus::Degraded {
                            reason: err.to_string(),
                        }
                    }
                    CorruptDataPolicy::Ignore => {
                        debug!(module = %id, reason = %err, "skipping optional module");
                        ModuleStatus::Degraded {
                            reason: err.to_string(),
                        }
                    }
                },
                Err(err) => return Err(err),
            };
            modules.push((id, status));
        }

        let mut bindings = BTreeMap::new();
        let mut shadowed = Vec::new();

        for (id, _, _) in &loaded {
            bind(&mut bindings, &mut shadowed, id, Symbol::module(id));
        }

        let mut qualified = BTreeMap::new();
        for (id, exports, binding) in loaded {
            let table: BTreeMap<String, Symbol> = exports.into_entries().into_iter().collect();
            if binding == Binding::Glob {
                for (name, symbol) in &table {
                    bind(&mut bindings, &mut shadowed, name, symbol.clone());
                }
            }
            qualified.insert(id, table);
        }

        let mut aliases = BTreeMap::new();
        for (alias, target) in &self.aliases {
            let symbol = bindings
                .get(target)
                .cloned()
                .ok_or_else(|| LoadError::UnresolvedAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                })?;
            bind(&mut bindings, &mut shadowed, alias, symbol);
            aliases.insert(alias.clone(), target.clone());
        }

        info!(
            modules = modules.len(),
            symbols = bindings.len(),
            aliases = aliases.len(),
            "namespace initialized"
        );

        Ok(Namespace {
            bindings,
            aliases,
            modules,
            qualified,
            shadowed,
        })
    }

    fn check_unique_ids(&self) -> Result<(), LoadError> {
        let mut seen = HashSet::new();
        for id in self.module_ids() {
            if !seen.insert(id) {
                return Err(LoadError::DuplicateModule(id.to_string()));
            }
        }
        Ok(())
    }
}

fn load_validated(module: &dyn Submodule) -> Result<ExportList, LoadError> {
    let exports = module.load()?;
    exports.validate()?;
    Ok(exports)
}

/// Last writer wins; every overwrite is recorded
fn bind(
    bindings: &mut BTreeMap<String, Symbol>,
    shadowed: &mut Vec<Shadowing>,
    name: &str,
    symbol: Symbol,
) {
    let current = symbol.origin().to_string();
    if let Some(previous) = bindings.insert(name.to_string(), symbol) {
        debug!(name, previous = previous.origin(), current = %current, "name rebound");
        shadowed.push(Shadowing {
            name: name.to_string(),
            previous: previous.origin().to_string(),
            current,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::ModuleDecl;

    fn alpha() -> Result<ExportList, LoadError> {
        Ok(ExportList::new("alpha", "tests::alpha")
            .constant("X", 1.0)
            .constant("ONLY_ALPHA", 10.0))
    }

    fn beta() -> Result<ExportList, LoadError> {
        Ok(ExportList::new("beta", "tests::beta").constant("X", 2.0))
    }

    #[test]
    fn test_last_writer_wins() {
        let ns = NamespaceBuilder::new()
            .require(ModuleDecl::new("alpha", alpha), Binding::Glob)
            .require(ModuleDecl::new("beta", beta), Binding::Glob)
            .build()
            .unwrap();

        assert_eq!(ns.constant("X"), Some(2.0));
        assert_eq!(ns.constant("ONLY_ALPHA"), Some(10.0));
        assert_eq!(ns.get("X").unwrap().origin(), "beta");
        assert_eq!(ns.qualified("alpha", "X").unwrap().as_constant(), Some(1.0));
        assert_eq!(
            ns.shadowed(),
            &[Shadowing {
                name: "X".to_string(),
                previous: "alpha".to_string(),
                current: "beta".to_string(),
            }]
        );
    }

    #[test]
    fn test_qualified_binding_keeps_names_out() {
        let ns = NamespaceBuilder::new()
            .require(ModuleDecl::new("alpha", alpha), Binding::Qualified)
            .build()
            .unwrap();

        assert!(ns.contains("alpha"));
        assert!(!ns.contains("X"));
        assert!(ns.qualified("alpha", "X").is_some());
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let err = NamespaceBuilder::new()
            .require(ModuleDecl::new("alpha", alpha), Binding::Glob)
            .optional(ModuleDecl::new("alpha", alpha), Binding::Glob)
            .build()
            .unwrap_err();
        assert!(matches!(err, LoadError::DuplicateModule(ref id) if id == "alpha"));
    }

    #[test]
    fn test_unresolved_alias() {
        let err = NamespaceBuilder::new()
            .require(ModuleDecl::new("alpha", alpha), Binding::Glob)
            .alias("Y", "NOPE")
            .build()
            .unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedAlias { ref alias, .. } if alias == "Y"));
    }
}
