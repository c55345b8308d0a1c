//! Type simplification (erasure).
//!
//! A type needs simplifying when it mentions a marked type parameter
//! anywhere inside it. Such a type cannot appear in the wrapper's signature,
//! so it is replaced by the closest type that does not mention one:
//!
//! - arrays become `System.Array`;
//! - interfaces become their single usable implemented interface;
//! - classes and structs become their nearest usable base type (skipping
//!   `object` and `System.ValueType`), else their single usable interface;
//!   when there is no single one, structs become `System.ValueType` and
//!   classes are unresolvable;
//! - marked type parameters become their explicit erasure, else their single
//!   usable constraint type, else `System.ValueType` when value-constrained,
//!   else `object` when unconstrained.
//!
//! Types that do not need simplifying are returned unchanged.

use bridgegen_common::limits::MAX_TYPE_NESTING_DEPTH;
use bridgegen_symbols::{
    ConstraintKinds, DefKind, SymbolGraph, TypeData, TypeId, TypeParamId, WellKnownTypes,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::trace;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimplifyError {
    /// More than one equally good erasure.
    #[error("ambiguous erasure")]
    Ambiguous { candidates: Vec<TypeId> },
    /// No erasure that is free of marked type parameters.
    #[error("unresolvable erasure")]
    Unresolvable,
    /// A pointer or function pointer mentions a marked type parameter.
    #[error("pointer type needs dynamic dispatch")]
    Pointer { pointer: TypeId },
}

pub struct Simplifier<'a> {
    graph: &'a SymbolGraph,
    known: &'a WellKnownTypes,
    marked: &'a IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher>,
    erased: FxHashMap<TypeParamId, Result<TypeId, SimplifyError>>,
    visiting: FxHashSet<TypeParamId>,
}

impl<'a> Simplifier<'a> {
    pub fn new(
        graph: &'a SymbolGraph,
        known: &'a WellKnownTypes,
        marked: &'a IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher>,
    ) -> Self {
        Self {
            graph,
            known,
            marked,
            erased: FxHashMap::default(),
            visiting: FxHashSet::default(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `ty` mentions a marked type parameter.
    #[must_use]
    pub fn needs_simplifying(&self, ty: TypeId) -> bool {
        self.needs_at_depth(ty, 0)
    }

    /// Past the nesting limit a type is assumed to need simplifying, so that
    /// `simplify` gets to reject it.
    fn needs_at_depth(&self, ty: TypeId, depth: u32) -> bool {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return true;
        }
        match self.graph.lookup(ty) {
            TypeData::Named { args, .. } => args.iter().any(|&a| self.needs_at_depth(a, depth + 1)),
            TypeData::Array { element, .. } | TypeData::Pointer(element) => {
                self.needs_at_depth(element, depth + 1)
            }
            TypeData::FunctionPointer { params, ret } => {
                params.iter().any(|&p| self.needs_at_depth(p, depth + 1))
                    || self.needs_at_depth(ret, depth + 1)
            }
            TypeData::Param(param) => self.marked.contains_key(&param),
            TypeData::Void | TypeData::Dynamic | TypeData::Error => false,
        }
    }

    fn exceeds_nesting_limit(&self, ty: TypeId, depth: u32) -> bool {
        if depth > MAX_TYPE_NESTING_DEPTH {
            return true;
        }
        match self.graph.lookup(ty) {
            TypeData::Named { args, .. } => args
                .iter()
                .any(|&a| self.exceeds_nesting_limit(a, depth + 1)),
            TypeData::Array { element, .. } | TypeData::Pointer(element) => {
                self.exceeds_nesting_limit(element, depth + 1)
            }
            TypeData::FunctionPointer { params, ret } => {
                params
                    .iter()
                    .any(|&p| self.exceeds_nesting_limit(p, depth + 1))
                    || self.exceeds_nesting_limit(ret, depth + 1)
            }
            TypeData::Param(_) | TypeData::Void | TypeData::Dynamic | TypeData::Error => false,
        }
    }

    /// Add every marked type parameter mentioned by `ty` to `found`.
    pub fn collect_marked(&self, ty: TypeId, found: &mut IndexSet<TypeParamId, FxBuildHasher>) {
        match self.graph.lookup(ty) {
            TypeData::Named { args, .. } => {
                for arg in args {
                    self.collect_marked(arg, found);
                }
            }
            TypeData::Array { element, .. } | TypeData::Pointer(element) => {
                self.collect_marked(element, found);
            }
            TypeData::FunctionPointer { params, ret } => {
                for param in params {
                    self.collect_marked(param, found);
                }
                self.collect_marked(ret, found);
            }
            TypeData::Param(param) => {
                if self.marked.contains_key(&param) {
                    found.insert(param);
                }
            }
            TypeData::Void | TypeData::Dynamic | TypeData::Error => {}
        }
    }

    // =========================================================================
    // Simplification
    // =========================================================================

    /// Erase `ty` if it needs simplifying.
    pub fn simplify(&mut self, ty: TypeId) -> Result<TypeId, SimplifyError> {
        if !self.needs_simplifying(ty) {
            return Ok(ty);
        }
        if self.exceeds_nesting_limit(ty, 0) {
            trace!("type nested past the limit");
            return Err(SimplifyError::Unresolvable);
        }
        let result = match self.graph.lookup(ty) {
            TypeData::Array { .. } => Ok(self.known.array),
            TypeData::Param(param) => self.erase_param(param),
            TypeData::Pointer(_) | TypeData::FunctionPointer { .. } => {
                Err(SimplifyError::Pointer { pointer: ty })
            }
            TypeData::Named { def, .. } => {
                if self.graph.def(def).kind == DefKind::Interface {
                    self.simplify_interface(ty)
                } else {
                    self.simplify_class(ty)
                }
            }
            TypeData::Void | TypeData::Dynamic | TypeData::Error => Ok(ty),
        };
        trace!(
            ty = %self.graph.display_type(ty),
            ok = result.is_ok(),
            "simplified type"
        );
        result
    }

    /// Erase the return type of a method. For async methods, `Task<X>` and
    /// `ValueTask<X>` needing simplification become `Task` and `ValueTask`.
    pub fn simplify_return(&mut self, ty: TypeId, is_async: bool) -> Result<TypeId, SimplifyError> {
        if is_async && self.needs_simplifying(ty) {
            if let TypeData::Named { def, .. } = self.graph.lookup(ty) {
                if Some(def) == self.known.generic_task {
                    if let Some(task) = self.known.task {
                        return Ok(task);
                    }
                }
                if Some(def) == self.known.generic_value_task {
                    if let Some(value_task) = self.known.value_task {
                        return Ok(value_task);
                    }
                }
            }
        }
        self.simplify(ty)
    }

    /// Erasure of a marked type parameter. Results are memoized; a constraint
    /// cycle between marked parameters is unresolvable.
    pub fn erase_param(&mut self, param: TypeParamId) -> Result<TypeId, SimplifyError> {
        if let Some(Some(explicit)) = self.marked.get(&param) {
            return Ok(*explicit);
        }
        if let Some(result) = self.erased.get(&param) {
            return result.clone();
        }
        if !self.visiting.insert(param) {
            return Err(SimplifyError::Unresolvable);
        }
        let result = self.erase_from_constraints(param);
        self.visiting.remove(&param);
        self.erased.insert(param, result.clone());
        result
    }

    fn erase_from_constraints(&mut self, param: TypeParamId) -> Result<TypeId, SimplifyError> {
        let decl = self.graph.type_param(param);
        let constraint_types = decl.constraint_types.clone();
        let kinds = decl.constraints;

        let direct: Vec<TypeId> = constraint_types
            .iter()
            .copied()
            .filter(|&c| !self.needs_simplifying(c))
            .collect();
        match direct.as_slice() {
            [single] => return Ok(*single),
            [] => {}
            _ => return Err(SimplifyError::Ambiguous { candidates: direct }),
        }

        // Failed constraint erasures are skipped, not propagated.
        let mut erased: IndexSet<TypeId, FxBuildHasher> = IndexSet::default();
        for constraint in constraint_types.iter().copied() {
            if let Ok(ty) = self.simplify(constraint) {
                erased.insert(ty);
            }
        }
        match erased.len() {
            1 => return Ok(erased[0]),
            0 => {}
            _ => {
                return Err(SimplifyError::Ambiguous {
                    candidates: erased.into_iter().collect(),
                });
            }
        }

        if kinds.intersects(ConstraintKinds::VALUE | ConstraintKinds::UNMANAGED) {
            Ok(self.known.value_type)
        } else if constraint_types.is_empty() {
            Ok(self.known.object)
        } else {
            Err(SimplifyError::Unresolvable)
        }
    }

    fn simplify_class(&mut self, ty: TypeId) -> Result<TypeId, SimplifyError> {
        for base in self.graph.base_chain(ty) {
            if base == self.known.object || base == self.known.value_type {
                break;
            }
            if !self.needs_simplifying(base) {
                return Ok(base);
            }
        }
        // Any failed interface search, ambiguous or not, ends at the value
        // type root for structs.
        match self.simplify_interface(ty) {
            Ok(erased) => Ok(erased),
            Err(_) if self.graph.is_value_type(ty) => Ok(self.known.value_type),
            Err(_) => Err(SimplifyError::Unresolvable),
        }
    }

    /// Single implemented interface free of marked type parameters: direct
    /// interfaces first, then the full closure.
    fn simplify_interface(&self, ty: TypeId) -> Result<TypeId, SimplifyError> {
        for candidates in [self.graph.interfaces(ty), self.graph.all_interfaces(ty)] {
            let usable: Vec<TypeId> = candidates
                .into_iter()
                .filter(|&i| !self.needs_simplifying(i))
                .collect();
            match usable.as_slice() {
                [single] => return Ok(*single),
                [] => {}
                _ => return Err(SimplifyError::Ambiguous { candidates: usable }),
            }
        }
        Err(SimplifyError::Unresolvable)
    }
}

#[cfg(test)]
#[path = "tests/simplify_tests.rs"]
mod tests;
