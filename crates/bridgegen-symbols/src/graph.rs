//! The symbol graph: read-only view of the host program.
//!
//! Built once by the loader, then shared immutably. All hierarchy questions
//! the generator asks (base types, implemented interfaces, substitution of
//! type arguments) are pure queries here.

use crate::intern::TypeInterner;
use crate::types::*;
use bridgegen_common::limits::MAX_BASE_CHAIN_LENGTH;
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use smallvec::SmallVec;

/// Mapping from type parameters to the types that replace them.
pub type Substitution = FxHashMap<TypeParamId, TypeId>;

pub struct SymbolGraph {
    interner: TypeInterner,
    defs: Vec<TypeDef>,
    methods: Vec<MethodDef>,
    type_params: Vec<TypeParamDef>,
    by_metadata_name: FxHashMap<String, DefId>,
    special: FxHashMap<SpecialType, DefId>,
}

impl SymbolGraph {
    pub(crate) fn new() -> Self {
        Self {
            interner: TypeInterner::new(),
            defs: Vec::new(),
            methods: Vec::new(),
            type_params: Vec::new(),
            by_metadata_name: FxHashMap::default(),
            special: FxHashMap::default(),
        }
    }

    // =========================================================================
    // Construction (loader only)
    // =========================================================================

    pub(crate) fn add_def(&mut self, def: TypeDef) -> DefId {
        let id = DefId(self.defs.len() as u32);
        if let Some(special) = def.special {
            self.special.insert(special, id);
        }
        let containing = def.containing;
        self.defs.push(def);
        if let Some(parent) = containing {
            self.defs[parent.0 as usize].nested.push(id);
        }
        id
    }

    /// Make a definition findable by metadata name. Called once its type
    /// parameters are known, since the arity is part of the name.
    pub(crate) fn register_metadata_name(&mut self, id: DefId) {
        let name = self.metadata_name(id);
        self.by_metadata_name.insert(name, id);
    }

    pub(crate) fn def_mut(&mut self, id: DefId) -> &mut TypeDef {
        &mut self.defs[id.0 as usize]
    }

    pub(crate) fn add_method(&mut self, method: MethodDef) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        let owner = method.containing;
        self.methods.push(method);
        self.defs[owner.0 as usize].methods.push(id);
        id
    }

    pub(crate) fn method_mut(&mut self, id: MethodId) -> &mut MethodDef {
        &mut self.methods[id.0 as usize]
    }

    pub(crate) fn add_type_param(&mut self, param: TypeParamDef) -> TypeParamId {
        let id = TypeParamId(self.type_params.len() as u32);
        self.type_params.push(param);
        id
    }

    pub(crate) fn type_param_mut(&mut self, id: TypeParamId) -> &mut TypeParamDef {
        &mut self.type_params[id.0 as usize]
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    #[must_use]
    pub fn def(&self, id: DefId) -> &TypeDef {
        &self.defs[id.0 as usize]
    }

    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0 as usize]
    }

    #[must_use]
    pub fn type_param(&self, id: TypeParamId) -> &TypeParamDef {
        &self.type_params[id.0 as usize]
    }

    pub fn defs(&self) -> impl Iterator<Item = (DefId, &TypeDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (DefId(i as u32), def))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodDef)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, method)| (MethodId(i as u32), method))
    }

    /// Metadata name: `Ns.Outer`1+Inner`2`.
    #[must_use]
    pub fn metadata_name(&self, id: DefId) -> String {
        let def = self.def(id);
        let mut name = match def.containing {
            Some(parent) => format!("{}+", self.metadata_name(parent)),
            None => match &def.namespace {
                Some(ns) => format!("{ns}."),
                None => String::new(),
            },
        };
        name.push_str(&def.name);
        if def.arity() > 0 {
            name.push('`');
            name.push_str(&def.arity().to_string());
        }
        name
    }

    #[must_use]
    pub fn def_by_metadata_name(&self, name: &str) -> Option<DefId> {
        self.by_metadata_name.get(name).copied()
    }

    #[must_use]
    pub fn special_def(&self, special: SpecialType) -> Option<DefId> {
        self.special.get(&special).copied()
    }

    #[must_use]
    pub fn special_type(&self, special: SpecialType) -> Option<TypeId> {
        self.special_def(special).map(|def| self.named(def, &[]))
    }

    /// Chain of containing types, outermost first, ending with `id` itself.
    #[must_use]
    pub fn containing_chain(&self, id: DefId) -> Vec<DefId> {
        let mut chain = vec![id];
        let mut current = self.def(id).containing;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.def(parent).containing;
        }
        chain.reverse();
        chain
    }

    /// Namespace a definition is declared in, looking through containing types.
    #[must_use]
    pub fn namespace_of(&self, id: DefId) -> Option<&str> {
        let outermost = self.containing_chain(id)[0];
        self.def(outermost).namespace.as_deref()
    }

    /// Methods of `def` with the given name, in declaration order.
    pub fn methods_named<'a>(
        &'a self,
        def: DefId,
        name: &'a str,
    ) -> impl Iterator<Item = MethodId> + 'a {
        self.def(def)
            .methods
            .iter()
            .copied()
            .filter(move |&m| self.method(m).name == name)
    }

    /// Whether `def` declares any member (method, field, nested type, ...) named `name`.
    #[must_use]
    pub fn has_member_named(&self, def: DefId, name: &str) -> bool {
        let decl = self.def(def);
        decl.member_names.iter().any(|n| n == name)
            || self.methods_named(def, name).next().is_some()
            || decl.nested.iter().any(|&n| self.def(n).name == name)
    }

    // =========================================================================
    // Types
    // =========================================================================

    #[must_use]
    pub const fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    #[must_use]
    pub fn lookup(&self, ty: TypeId) -> TypeData {
        self.interner.lookup(ty)
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        self.interner.intern(data)
    }

    pub fn named(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Named {
            def,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn array(&self, element: TypeId, rank: u8) -> TypeId {
        self.intern(TypeData::Array {
            element,
            rank: rank.max(1),
        })
    }

    pub fn param_type(&self, param: TypeParamId) -> TypeId {
        self.intern(TypeData::Param(param))
    }

    /// Type parameters in scope of a definition: those of its containing
    /// types, outermost first, followed by its own. Named types carry one
    /// argument per entry.
    #[must_use]
    pub fn all_type_params(&self, def: DefId) -> Vec<TypeParamId> {
        self.containing_chain(def)
            .into_iter()
            .flat_map(|d| self.def(d).type_params.iter().copied())
            .collect()
    }

    /// The definition applied to its own type parameters: `Container<T>`.
    pub fn declared_type(&self, def: DefId) -> TypeId {
        let args: SmallVec<[TypeId; 2]> = self
            .all_type_params(def)
            .into_iter()
            .map(|p| self.param_type(p))
            .collect();
        self.intern(TypeData::Named { def, args })
    }

    /// Definition of a named type.
    #[must_use]
    pub fn def_of(&self, ty: TypeId) -> Option<DefId> {
        match self.lookup(ty) {
            TypeData::Named { def, .. } => Some(def),
            _ => None,
        }
    }

    /// Whether `ty` is the given special type.
    #[must_use]
    pub fn is_special(&self, ty: TypeId, special: SpecialType) -> bool {
        self.def_of(ty)
            .is_some_and(|def| self.def(def).special == Some(special))
    }

    #[must_use]
    pub fn is_interface(&self, ty: TypeId) -> bool {
        self.def_of(ty)
            .is_some_and(|def| self.def(def).kind == DefKind::Interface)
    }

    /// Whether values of `ty` are value types.
    ///
    /// `System.ValueType` and `System.Enum` themselves are reference types.
    #[must_use]
    pub fn is_value_type(&self, ty: TypeId) -> bool {
        match self.lookup(ty) {
            TypeData::Named { def, .. } => {
                let decl = self.def(def);
                decl.kind.is_value_type()
                    && !matches!(
                        decl.special,
                        Some(SpecialType::ValueType | SpecialType::Enum)
                    )
            }
            TypeData::Param(param) => self
                .type_param(param)
                .constraints
                .intersects(ConstraintKinds::VALUE | ConstraintKinds::UNMANAGED),
            TypeData::Pointer(_) | TypeData::FunctionPointer { .. } => true,
            _ => false,
        }
    }

    /// Replace type parameters in `ty` according to `subst`.
    pub fn substitute(&self, ty: TypeId, subst: &Substitution) -> TypeId {
        if subst.is_empty() {
            return ty;
        }
        match self.lookup(ty) {
            TypeData::Param(param) => subst.get(&param).copied().unwrap_or(ty),
            TypeData::Named { def, args } => {
                let args: SmallVec<[TypeId; 2]> =
                    args.iter().map(|&a| self.substitute(a, subst)).collect();
                self.intern(TypeData::Named { def, args })
            }
            TypeData::Array { element, rank } => {
                let element = self.substitute(element, subst);
                self.intern(TypeData::Array { element, rank })
            }
            TypeData::Pointer(element) => {
                let element = self.substitute(element, subst);
                self.intern(TypeData::Pointer(element))
            }
            TypeData::FunctionPointer { params, ret } => {
                let params = params.iter().map(|&p| self.substitute(p, subst)).collect();
                let ret = self.substitute(ret, subst);
                self.intern(TypeData::FunctionPointer { params, ret })
            }
            TypeData::Void | TypeData::Dynamic | TypeData::Error => ty,
        }
    }

    /// Substitution mapping a definition's type parameters to `args`.
    fn substitution_for(&self, def: DefId, args: &[TypeId]) -> Substitution {
        let mut subst = Substitution::with_capacity_and_hasher(args.len(), FxBuildHasher);
        for (param, &arg) in self.all_type_params(def).into_iter().zip(args) {
            subst.insert(param, arg);
        }
        subst
    }

    /// Immediate base type of `ty`, with type arguments applied.
    ///
    /// Interfaces and type parameters have no base type here; arrays derive
    /// from `System.Array`.
    #[must_use]
    pub fn base_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.lookup(ty) {
            TypeData::Named { def, args } => {
                let base = self.def(def).base?;
                Some(self.substitute(base, &self.substitution_for(def, &args)))
            }
            TypeData::Array { .. } => self.special_type(SpecialType::Array),
            _ => None,
        }
    }

    /// Base chain of `ty`, nearest first, excluding `ty` itself.
    #[must_use]
    pub fn base_chain(&self, ty: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = self.base_type(ty);
        while let Some(base) = current {
            if chain.len() >= MAX_BASE_CHAIN_LENGTH || chain.contains(&base) {
                break;
            }
            chain.push(base);
            current = self.base_type(base);
        }
        chain
    }

    /// Directly implemented interfaces of `ty`, with type arguments applied.
    #[must_use]
    pub fn interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        match self.lookup(ty) {
            TypeData::Named { def, args } => {
                let subst = self.substitution_for(def, &args);
                self.def(def)
                    .interfaces
                    .iter()
                    .map(|&i| self.substitute(i, &subst))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Every interface `ty` implements: its own, inherited through interfaces,
    /// and those of its base types. Order is stable and duplicates removed.
    #[must_use]
    pub fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let mut seen: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
        let mut pending: Vec<TypeId> = Vec::new();
        for owner in std::iter::once(ty).chain(self.base_chain(ty)) {
            pending.extend(self.interfaces(owner).into_iter().rev());
            while let Some(next) = pending.pop() {
                if seen.insert(next) {
                    pending.extend(self.interfaces(next).into_iter().rev());
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Whether a value of type `source` can be used where `target` is expected
    /// by reference or boxing conversion.
    #[must_use]
    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        if source == target || self.is_special(target, SpecialType::Object) {
            return true;
        }
        if self.is_special(target, SpecialType::ValueType) && self.is_value_type(source) {
            return true;
        }
        if let (
            TypeData::Array {
                element: source_element,
                rank: source_rank,
            },
            TypeData::Array {
                element: target_element,
                rank: target_rank,
            },
        ) = (self.lookup(source), self.lookup(target))
        {
            // Array covariance only holds for reference element types.
            return source_rank == target_rank
                && (source_element == target_element
                    || (!self.is_value_type(source_element)
                        && self.is_assignable(source_element, target_element)));
        }
        self.base_chain(source).contains(&target) || self.all_interfaces(source).contains(&target)
    }
}

#[cfg(test)]
#[path = "tests/graph_tests.rs"]
mod tests;
