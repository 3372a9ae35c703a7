//! Symbols carried by the toolkit namespace
//!
//! A symbol is a named value with a stable identity: the module that exported it,
//! its canonical path and its kind. Functions and instances are stored type-erased
//! and recovered with [`Symbol::downcast_ref`].

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// What a symbol stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
    Function,
    Constant,
    Instance,
    Module,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SymbolKind::Type => "type",
            SymbolKind::Function => "function",
            SymbolKind::Constant => "constant",
            SymbolKind::Instance => "instance",
            SymbolKind::Module => "module",
        };
        f.write_str(s)
    }
}

#[derive(Clone)]
enum Value {
    Type { id: TypeId, name: &'static str },
    Erased(Arc<dyn Any + Send + Sync>),
    Constant(f64),
    Module,
}

/// A named value exported by a submodule
#[derive(Clone)]
pub struct Symbol {
    origin: Arc<str>,
    path: Arc<str>,
    kind: SymbolKind,
    value: Value,
}

impl Symbol {
    /// A type exported under `path`
    pub fn ty<T: ?Sized + 'static>(origin: &str, path: &str) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
            kind: SymbolKind::Type,
            value: Value::Type {
                id: TypeId::of::<T>(),
                name: type_name::<T>(),
            },
        }
    }

    /// A function value.
    ///
    /// Pass a function pointer (`my_fn as fn(f64) -> f64`) so consumers can
    /// downcast to a nameable type.
    pub fn function<F: Any + Send + Sync>(origin: &str, path: &str, f: F) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
            kind: SymbolKind::Function,
            value: Value::Erased(Arc::new(f)),
        }
    }

    /// A numeric constant
    pub fn constant(origin: &str, path: &str, value: f64) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
            kind: SymbolKind::Constant,
            value: Value::Constant(value),
        }
    }

    /// A prebuilt object (a frequency band, a media, a sample network)
    pub fn instance<T: Any + Send + Sync>(origin: &str, path: &str, value: T) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
            kind: SymbolKind::Instance,
            value: Value::Erased(Arc::new(value)),
        }
    }

    /// The binding of a module's own name
    pub fn module(id: &str) -> Self {
        Self {
            origin: id.into(),
            path: id.into(),
            kind: SymbolKind::Module,
            value: Value::Module,
        }
    }

    /// Module that exported this symbol
    #[inline]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Canonical path, e.g. `skrf_core::frequency::Frequency`
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Borrow the value of a function or instance symbol as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.value {
            Value::Erased(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Value of a constant symbol
    pub fn as_constant(&self) -> Option<f64> {
        match self.value {
            Value::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// `TypeId` of a type symbol
    pub fn type_id(&self) -> Option<TypeId> {
        match self.value {
            Value::Type { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Rust type name of a type symbol
    pub fn type_name(&self) -> Option<&'static str> {
        match self.value {
            Value::Type { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True when this is the type symbol for `T`
    pub fn is_type<T: ?Sized + 'static>(&self) -> bool {
        self.type_id() == Some(TypeId::of::<T>())
    }
}

/// Identity plus value where the value is comparable.
///
/// Erased functions and instances compare by their concrete type only, so two
/// builds of the same module are equal even though the values are not `PartialEq`.
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.path == other.path
            && self.kind == other.kind
            && match (&self.value, &other.value) {
                (Value::Constant(a), Value::Constant(b)) => a.to_bits() == b.to_bits(),
                (Value::Type { id: a, .. }, Value::Type { id: b, .. }) => a == b,
                (Value::Erased(a), Value::Erased(b)) => erased_type(&**a) == erased_type(&**b),
                (Value::Module, Value::Module) => true,
                _ => false,
            }
    }
}

fn erased_type(value: &(dyn Any + Send + Sync)) -> TypeId {
    let value: &dyn Any = value;
    value.type_id()
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("origin", &self.origin)
            .finish()
    }
}
