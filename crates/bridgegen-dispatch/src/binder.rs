//! Late binding of a generic method call.
//!
//! The binder rebuilds the type arguments of a call from the runtime types
//! of its arguments, the way the host's runtime binder does for a call made
//! with `dynamic` arguments:
//!
//! 1. every parameter type that mentions a method type parameter is unified
//!    with the runtime type of its argument; a generic definition in the
//!    parameter type is matched against the argument type, its base chain
//!    and all of its interfaces, an array only against an array of the same
//!    rank;
//! 2. null arguments carry no type information;
//! 3. every type parameter must end up bound exactly once;
//! 4. reference/value constraint kinds and constraint types are checked
//!    against the inferred arguments (`unmanaged`, `notnull` and `new()` are
//!    not enforced at binding time);
//! 5. every argument must convert to its instantiated parameter type.

use bridgegen_symbols::{
    ConstraintKinds, MethodId, Substitution, SymbolGraph, TypeData, TypeId, TypeParamId,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use thiserror::Error;
use tracing::trace;

use crate::value::Value;

const NULLABLE: &str = "System.Nullable`1";

/// Why a late-bound call could not be bound.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BindFailure {
    #[error("'{method}' takes {expected} arguments but was given {actual}")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },
    #[error("argument '{param}' of type '{actual}' does not convert to '{expected}'")]
    ArgumentMismatch {
        param: String,
        actual: String,
        expected: String,
    },
    #[error("null cannot be passed as argument '{param}' of value type '{expected}'")]
    NullForValueType { param: String, expected: String },
    #[error("type argument '{param}' inferred as both '{first}' and '{second}'")]
    Conflict {
        param: String,
        first: String,
        second: String,
    },
    #[error("type argument '{param}' cannot be inferred from the arguments")]
    Uninferred { param: String },
    #[error("type '{ty}' does not satisfy the constraints of type parameter '{param}'")]
    ConstraintViolated { param: String, ty: String },
    /// Raised by code running after a successful bind.
    #[error("{message}")]
    Raised { message: String },
}

/// Type arguments of a bound call, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instantiation {
    args: IndexMap<TypeParamId, TypeId, FxBuildHasher>,
}

impl Instantiation {
    #[must_use]
    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.args.get(&param).copied()
    }

    #[must_use]
    pub fn type_args(&self) -> Vec<TypeId> {
        self.args.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeParamId, TypeId)> + '_ {
        self.args.iter().map(|(&p, &t)| (p, t))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    #[must_use]
    pub fn substitution(&self) -> Substitution {
        self.args.iter().map(|(&p, &t)| (p, t)).collect()
    }
}

/// Outcome of unifying one parameter type with one runtime type.
enum Unify {
    Mismatch,
    Conflict {
        param: TypeParamId,
        first: TypeId,
        second: TypeId,
    },
}

pub struct LateBinder<'a> {
    graph: &'a SymbolGraph,
}

impl<'a> LateBinder<'a> {
    #[must_use]
    pub const fn new(graph: &'a SymbolGraph) -> Self {
        Self { graph }
    }

    /// Infer the type arguments of `method` for a call with `args`.
    pub fn infer(&self, method: MethodId, args: &[Value]) -> Result<Instantiation, BindFailure> {
        let decl = self.graph.method(method);
        if args.len() != decl.params.len() {
            return Err(BindFailure::ArgumentCount {
                method: self.graph.display_method(method),
                expected: decl.params.len(),
                actual: args.len(),
            });
        }

        let generic: IndexSet<TypeParamId, FxBuildHasher> =
            decl.type_params.iter().copied().collect();
        let mut bindings = Substitution::default();
        for (param, arg) in decl.params.iter().zip(args) {
            let Some(actual) = arg.runtime_type(self.graph) else {
                continue;
            };
            self.unify(param.ty, actual, &generic, &mut bindings)
                .map_err(|failure| match failure {
                    Unify::Mismatch => BindFailure::ArgumentMismatch {
                        param: param.name.clone(),
                        actual: self.graph.display_type(actual),
                        expected: self.graph.display_type(param.ty),
                    },
                    Unify::Conflict {
                        param: type_param,
                        first,
                        second,
                    } => BindFailure::Conflict {
                        param: self.graph.display_type_param(type_param),
                        first: self.graph.display_type(first),
                        second: self.graph.display_type(second),
                    },
                })?;
        }

        let mut instantiation = Instantiation::default();
        for &param in &decl.type_params {
            let Some(&ty) = bindings.get(&param) else {
                return Err(BindFailure::Uninferred {
                    param: self.graph.display_type_param(param),
                });
            };
            instantiation.args.insert(param, ty);
        }

        let subst = instantiation.substitution();
        for (param, ty) in instantiation.iter() {
            self.check_constraints(param, ty, &subst)?;
        }
        for (param, arg) in decl.params.iter().zip(args) {
            let expected = self.graph.substitute(param.ty, &subst);
            match arg.runtime_type(self.graph) {
                Some(actual) if !self.graph.is_assignable(actual, expected) => {
                    return Err(BindFailure::ArgumentMismatch {
                        param: param.name.clone(),
                        actual: self.graph.display_type(actual),
                        expected: self.graph.display_type(expected),
                    });
                }
                None if self.is_non_nullable_value_type(expected) => {
                    return Err(BindFailure::NullForValueType {
                        param: param.name.clone(),
                        expected: self.graph.display_type(expected),
                    });
                }
                _ => {}
            }
        }

        trace!(
            method = %decl.name,
            args = instantiation.len(),
            "bound late-bound call"
        );
        Ok(instantiation)
    }

    // =========================================================================
    // Unification
    // =========================================================================

    fn unify(
        &self,
        pattern: TypeId,
        actual: TypeId,
        generic: &IndexSet<TypeParamId, FxBuildHasher>,
        bindings: &mut Substitution,
    ) -> Result<(), Unify> {
        if !self.mentions(pattern, generic) {
            // Checked by conversion once every type argument is known.
            return Ok(());
        }
        match self.graph.lookup(pattern) {
            TypeData::Param(param) => match bindings.get(&param) {
                Some(&first) if first != actual => Err(Unify::Conflict {
                    param,
                    first,
                    second: actual,
                }),
                Some(_) => Ok(()),
                None => {
                    bindings.insert(param, actual);
                    Ok(())
                }
            },
            TypeData::Array { element, rank } => match self.graph.lookup(actual) {
                TypeData::Array {
                    element: actual_element,
                    rank: actual_rank,
                } if actual_rank == rank => self.unify(element, actual_element, generic, bindings),
                _ => Err(Unify::Mismatch),
            },
            TypeData::Named { def, args } => {
                let matches: IndexSet<TypeId, FxBuildHasher> = std::iter::once(actual)
                    .chain(self.graph.base_chain(actual))
                    .chain(self.graph.all_interfaces(actual))
                    .filter(|&ty| self.graph.def_of(ty) == Some(def))
                    .collect();
                // Several instantiations of one generic interface give no
                // unique inference.
                let (Some(&matched), 1) = (matches.first(), matches.len()) else {
                    return Err(Unify::Mismatch);
                };
                let TypeData::Named {
                    args: matched_args, ..
                } = self.graph.lookup(matched)
                else {
                    return Err(Unify::Mismatch);
                };
                for (&pattern_arg, &actual_arg) in args.iter().zip(matched_args.iter()) {
                    self.unify(pattern_arg, actual_arg, generic, bindings)?;
                }
                Ok(())
            }
            _ => Err(Unify::Mismatch),
        }
    }

    fn mentions(&self, ty: TypeId, generic: &IndexSet<TypeParamId, FxBuildHasher>) -> bool {
        match self.graph.lookup(ty) {
            TypeData::Param(param) => generic.contains(&param),
            TypeData::Named { args, .. } => args.iter().any(|&a| self.mentions(a, generic)),
            TypeData::Array { element, .. } | TypeData::Pointer(element) => {
                self.mentions(element, generic)
            }
            TypeData::FunctionPointer { params, ret } => {
                params.iter().any(|&p| self.mentions(p, generic)) || self.mentions(ret, generic)
            }
            TypeData::Void | TypeData::Dynamic | TypeData::Error => false,
        }
    }

    // =========================================================================
    // Checks
    // =========================================================================

    fn check_constraints(
        &self,
        param: TypeParamId,
        ty: TypeId,
        subst: &Substitution,
    ) -> Result<(), BindFailure> {
        let decl = self.graph.type_param(param);
        let kinds = decl.constraints;
        let is_value = self.graph.is_value_type(ty);
        let satisfied = !(kinds.contains(ConstraintKinds::REFERENCE) && is_value)
            && !(kinds.contains(ConstraintKinds::VALUE) && !self.is_non_nullable_value_type(ty))
            && decl.constraint_types.iter().all(|&constraint| {
                let constraint = self.graph.substitute(constraint, subst);
                self.graph.is_assignable(ty, constraint)
            });
        if satisfied {
            Ok(())
        } else {
            Err(BindFailure::ConstraintViolated {
                param: decl.name.clone(),
                ty: self.graph.display_type(ty),
            })
        }
    }

    fn is_non_nullable_value_type(&self, ty: TypeId) -> bool {
        if !self.graph.is_value_type(ty) {
            return false;
        }
        let nullable = self.graph.def_by_metadata_name(NULLABLE);
        nullable.is_none() || self.graph.def_of(ty) != nullable
    }
}

#[cfg(test)]
#[path = "tests/binder_tests.rs"]
mod tests;
