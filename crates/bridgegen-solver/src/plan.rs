//! Bridge plans: everything the emitter needs to render one bridged method.

use bridgegen_symbols::{
    ConstantValue, ConstraintKinds, DefId, MethodId, RefKind, TypeId, TypeParamId,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

/// Suffix pattern of the renamed target method.
#[must_use]
pub fn target_name(method_name: &str) -> String {
    format!("_{method_name}_PrivateBridgeTarget")
}

/// Whether the wrapper awaits the target, and the type of the value it
/// produces (the awaited result for async wrappers).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AsyncShape {
    pub is_async: bool,
    /// `None` when the wrapper returns nothing (`void`, `Task`, `ValueTask`).
    pub value: Option<TypeId>,
}

impl AsyncShape {
    pub const VOID: Self = Self {
        is_async: false,
        value: None,
    };

    #[must_use]
    pub const fn returns_value(&self) -> bool {
        self.value.is_some()
    }
}

/// Sibling partial method declarations the wrapper could implement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartialCandidate {
    None,
    Unique(MethodId),
    Ambiguous(Vec<MethodId>),
}

impl PartialCandidate {
    #[must_use]
    pub fn from_matches(mut matches: Vec<MethodId>) -> Self {
        match matches.len() {
            0 => Self::None,
            1 => Self::Unique(matches.remove(0)),
            _ => Self::Ambiguous(matches),
        }
    }
}

/// `where T : ...` clause of a type parameter on a generated declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintClause {
    pub param: TypeParamId,
    pub kinds: ConstraintKinds,
    pub types: Vec<TypeId>,
}

impl ConstraintClause {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.types.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrapperParam {
    pub name: String,
    /// Type in the wrapper's signature.
    pub ty: TypeId,
    /// Type of the matching parameter of the original method.
    pub target_ty: TypeId,
    pub ref_kind: RefKind,
    pub is_params: bool,
    pub default: Option<ConstantValue>,
    /// The argument is erased and forwarded as `dynamic`.
    pub dynamic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrapperSignature {
    pub name: String,
    /// Accessibility or the marker's modifier override; may be empty.
    pub modifiers: String,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_extension: bool,
    /// The wrapper implements a partial definition.
    pub is_partial: bool,
    /// `TypeId::VOID` for `void`.
    pub return_type: TypeId,
    pub type_params: Vec<TypeParamId>,
    pub constraints: Vec<ConstraintClause>,
    pub params: Vec<WrapperParam>,
}

impl WrapperSignature {
    /// Parameters forwarded as `dynamic`.
    pub fn dynamic_params(&self) -> impl Iterator<Item = &WrapperParam> {
        self.params.iter().filter(|p| p.dynamic)
    }
}

/// Plan for one bridged method. Built once, consumed once by the emitter.
#[derive(Clone, Debug)]
pub struct BridgePlan {
    pub method: MethodId,
    pub containing: DefId,
    /// Marked type parameters and their erasures, in declaration order.
    pub erasures: IndexMap<TypeParamId, TypeId, FxBuildHasher>,
    /// Type parameters of the method that stay generic on the wrapper.
    pub retained: Vec<TypeParamId>,
    pub target_name: String,
    pub wrapper: WrapperSignature,
    pub async_shape: AsyncShape,
    /// The partial definition the wrapper implements, if any.
    pub partial: Option<MethodId>,
    /// Marked type parameters recoverable from the argument types.
    pub inferable: IndexSet<TypeParamId, FxBuildHasher>,
    pub ignore_unbound: bool,
}

impl BridgePlan {
    /// A plan is only handed out when every erasure is a real type, every
    /// marked parameter can be inferred and the target name is distinct.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.erasures.values().all(|&ty| ty != TypeId::ERROR)
            && self.erasures.keys().all(|p| self.inferable.contains(p))
            && self.target_name != self.wrapper.name
    }
}
