//! Runtime values seen by late binding.
//!
//! Binding only ever looks at the runtime type of an argument, so a value is
//! its closed type plus an opaque identity that lets callers tell instances
//! apart.

use bridgegen_symbols::{SymbolGraph, TypeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// The result of a call without a value.
    Unit,
    Null,
    /// An instance of a closed runtime type.
    Object { ty: TypeId, id: u64 },
    /// `default(T)` for the given type.
    Default(TypeId),
}

impl Value {
    #[must_use]
    pub const fn object(ty: TypeId, id: u64) -> Self {
        Self::Object { ty, id }
    }

    /// Runtime type of the value; `None` for null references.
    ///
    /// A value type's default is a real instance, a reference type's default
    /// is null.
    #[must_use]
    pub fn runtime_type(&self, graph: &SymbolGraph) -> Option<TypeId> {
        match *self {
            Self::Object { ty, .. } => Some(ty),
            Self::Default(ty) if graph.is_value_type(ty) => Some(ty),
            Self::Unit | Self::Null | Self::Default(_) => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
