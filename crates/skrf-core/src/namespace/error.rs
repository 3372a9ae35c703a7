//! Namespace load errors

use thiserror::Error;

/// Boxed cause of a module initialization failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while loading submodules or assembling the namespace
#[derive(Error, Debug)]
pub enum LoadError {
    /// A dependency of the module cannot be resolved in this build or environment
    #[error("module `{module}` depends on `{dependency}`, which is not available")]
    MissingDependency { module: String, dependency: String },

    /// The module resolved but its bundled data did not decode
    #[error("module `{module}` carries corrupt data: {detail}")]
    CorruptData { module: String, detail: String },

    #[error("module `{module}` exports `{name}` more than once")]
    DuplicateExport { module: String, name: String },

    #[error("module `{0}` is registered more than once")]
    DuplicateModule(String),

    #[error("alias `{alias}` points at `{target}`, which no module exports")]
    UnresolvedAlias { alias: String, target: String },

    #[error("module `{module}` failed to initialize: {source}")]
    Init {
        module: String,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    pub fn missing(module: &str, dependency: &str) -> Self {
        LoadError::MissingDependency {
            module: module.to_string(),
            dependency: dependency.to_string(),
        }
    }

    pub fn corrupt(module: &str, detail: impl ToString) -> Self {
        LoadError::CorruptData {
            module: module.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn init(module: &str, source: impl Into<BoxError>) -> Self {
        LoadError::Init {
            module: module.to_string(),
            source: source.into(),
        }
    }

    /// Module the error is attributed to, if any
    pub fn module(&self) -> Option<&str> {
        match self {
            LoadError::MissingDependency { module, .. }
            | LoadError::CorruptData { module, .. }
            | LoadError::DuplicateExport { module, .. }
            | LoadError::Init { module, .. } => Some(module),
            LoadError::DuplicateModule(module) => Some(module),
            LoadError::UnresolvedAlias { .. } => None,
        }
    }

    #[inline]
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, LoadError::MissingDependency { .. })
    }
}
