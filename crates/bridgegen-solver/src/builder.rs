//! Bridge plan builder.
//!
//! Turns a marked method into a [`BridgePlan`], or reports why it cannot be
//! bridged. Every check runs before a plan is handed out, so a method either
//! gets a complete plan or only diagnostics.

use crate::options::SolverOptions;
use crate::plan::*;
use crate::scanner::{BridgeMarks, read_marks};
use crate::simplify::{SimplifyError, Simplifier};
use bridgegen_common::{Diagnostic, DiagnosticBag, SourceLocation, diagnostic_codes};
use bridgegen_symbols::{
    ConstantValue, ConstraintKinds, DefId, MethodDef, MethodFlags, MethodId, RefKind,
    SymbolGraph, TypeData, TypeId, TypeParamId, WellKnownTypes,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

/// Plans and diagnostics for one group of methods.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub plans: Vec<BridgePlan>,
    pub diagnostics: DiagnosticBag,
}

pub struct PlanBuilder<'a> {
    graph: &'a SymbolGraph,
    known: &'a WellKnownTypes,
    options: &'a SolverOptions,
}

impl<'a> PlanBuilder<'a> {
    #[must_use]
    pub const fn new(
        graph: &'a SymbolGraph,
        known: &'a WellKnownTypes,
        options: &'a SolverOptions,
    ) -> Self {
        Self {
            graph,
            known,
            options,
        }
    }

    /// Plan every method of one delivery group.
    ///
    /// Methods of a type that is not partial (or is nested in one that is
    /// not) are skipped; each such type is reported once.
    #[must_use]
    pub fn plan_group(&self, methods: &[MethodId]) -> PlanOutcome {
        let mut outcome = PlanOutcome::default();
        let mut partial_ok: FxHashMap<DefId, bool> = FxHashMap::default();
        let mut reported: FxHashSet<DefId> = FxHashSet::default();

        for &method in methods {
            let def = self.graph.method(method).containing;
            let ok = *partial_ok.entry(def).or_insert_with(|| {
                self.check_partial_chain(def, &mut reported, &mut outcome.diagnostics)
            });
            if !ok {
                continue;
            }
            if let Some(plan) = self.plan_method(method, &mut outcome.diagnostics) {
                outcome.plans.push(plan);
            }
        }
        outcome
    }

    fn check_partial_chain(
        &self,
        def: DefId,
        reported: &mut FxHashSet<DefId>,
        bag: &mut DiagnosticBag,
    ) -> bool {
        let mut ok = true;
        for link in self.graph.containing_chain(def) {
            let decl = self.graph.def(link);
            if decl.is_partial {
                continue;
            }
            ok = false;
            if reported.insert(link) {
                bag.report(
                    diagnostic_codes::TYPE_NOT_PARTIAL,
                    &[self.graph.display_def(link).as_str()],
                    decl.location.as_ref(),
                );
            }
        }
        ok
    }

    /// Build the plan for one method, reporting every problem found.
    pub fn plan_method(&self, method: MethodId, bag: &mut DiagnosticBag) -> Option<BridgePlan> {
        let marks = read_marks(self.graph, method, self.options, bag)?;
        let decl = self.graph.method(method);
        let ctx = MethodContext {
            method,
            decl,
            name: self.graph.display_method(method),
        };
        let mut local = DiagnosticBag::new();

        self.check_signature(&ctx, &marks, &mut local);

        let mut simplifier = Simplifier::new(self.graph, self.known, &marks.marked);

        let mut erasures = IndexMap::default();
        for &param in marks.marked.keys() {
            match simplifier.erase_param(param) {
                Ok(ty) => {
                    erasures.insert(param, ty);
                }
                Err(err) => {
                    let shown = self.graph.display_type_param(param);
                    let location = self.graph.type_param(param).location.as_ref();
                    self.report_simplify(&ctx, &err, &shown, location, &mut local);
                }
            }
        }

        let mut simplified_params = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let needs = simplifier.needs_simplifying(param.ty);
            if needs && param.ref_kind != RefKind::None {
                local.report(
                    diagnostic_codes::REFERENCE_PARAMETER_NEEDS_DISPATCH,
                    &[ctx.name.as_str(), param.name.as_str()],
                    param.location.as_ref().or(decl.location.as_ref()),
                );
            }
            let ty = match simplifier.simplify(param.ty) {
                Ok(ty) => ty,
                Err(err) => {
                    let shown = self.graph.display_type(param.ty);
                    let location = param.location.as_ref().or(decl.location.as_ref());
                    self.report_simplify(&ctx, &err, &shown, location, &mut local);
                    TypeId::ERROR
                }
            };
            simplified_params.push((ty, needs));
        }

        let simplified_return = if decl.returns_void() {
            TypeId::VOID
        } else {
            match simplifier.simplify_return(decl.return_type, decl.is_async()) {
                Ok(ty) => ty,
                Err(err) => {
                    let shown = self.graph.display_type(decl.return_type);
                    self.report_simplify(&ctx, &err, &shown, decl.location.as_ref(), &mut local);
                    TypeId::ERROR
                }
            }
        };

        let wrapper_name = marks
            .method_mark
            .as_ref()
            .and_then(|mark| mark.rename.clone())
            .unwrap_or_else(|| decl.name.clone());
        let target = target_name(&decl.name);
        if wrapper_name == target || self.graph.has_member_named(decl.containing, &target) {
            local.report(
                diagnostic_codes::TARGET_NOT_REFERENCEABLE,
                &[ctx.name.as_str(), target.as_str()],
                decl.location.as_ref(),
            );
        }

        let retained: Vec<TypeParamId> = decl
            .type_params
            .iter()
            .copied()
            .filter(|p| !marks.is_marked(*p))
            .collect();

        let candidate = match self.find_partial_candidate(&ctx, &wrapper_name, retained.len()) {
            PartialCandidate::None => None,
            PartialCandidate::Unique(candidate) => Some(candidate),
            PartialCandidate::Ambiguous(candidates) => {
                let shown: Vec<String> = candidates
                    .iter()
                    .map(|&c| format!("'{}'", self.graph.display_method(c)))
                    .collect();
                local.report(
                    diagnostic_codes::AMBIGUOUS_PARTIAL_DEFINITION,
                    &[ctx.name.as_str(), wrapper_name.as_str(), shown.join(", ").as_str()],
                    decl.location.as_ref(),
                );
                None
            }
        };

        let mut inferable = IndexSet::default();
        for param in &decl.params {
            simplifier.collect_marked(param.ty, &mut inferable);
        }
        let missing: Vec<String> = marks
            .marked
            .keys()
            .filter(|p| !inferable.contains(*p))
            .map(|&p| self.graph.display_type_param(p))
            .collect();
        if !missing.is_empty() {
            local.report(
                diagnostic_codes::UNINFERABLE_TYPE_PARAMETERS,
                &[ctx.name.as_str(), missing.join(", ").as_str()],
                decl.location.as_ref(),
            );
        }

        let failed = local.has_errors();
        push_unique(bag, local);
        if failed {
            debug!(method = %ctx.name, "method not bridged");
            return None;
        }

        let (wrapper, async_shape) = match candidate {
            Some(candidate) => self.partial_wrapper(&ctx, candidate, &simplified_params),
            None => self.fresh_wrapper(
                &ctx,
                &marks,
                &mut simplifier,
                wrapper_name,
                &retained,
                &simplified_params,
                simplified_return,
            ),
        };

        let plan = BridgePlan {
            method,
            containing: decl.containing,
            erasures,
            retained,
            target_name: target,
            wrapper,
            async_shape,
            partial: candidate,
            inferable,
            ignore_unbound: marks
                .method_mark
                .as_ref()
                .is_some_and(|mark| mark.ignore_unbound),
        };
        debug_assert!(plan.is_valid());
        debug!(
            method = %ctx.name,
            wrapper = %plan.wrapper.name,
            is_async = plan.async_shape.is_async,
            partial = plan.partial.is_some(),
            "planned bridge"
        );
        Some(plan)
    }

    // =========================================================================
    // Checks
    // =========================================================================

    fn check_signature(&self, ctx: &MethodContext<'_>, marks: &BridgeMarks, bag: &mut DiagnosticBag) {
        for &param in marks.marked.keys() {
            let decl = self.graph.type_param(param);
            for (kind, text) in [
                (ConstraintKinds::UNMANAGED, "unmanaged"),
                (ConstraintKinds::NOT_NULL, "notnull"),
            ] {
                if decl.constraints.contains(kind) {
                    bag.report(
                        diagnostic_codes::UNENFORCED_CONSTRAINT,
                        &[ctx.name.as_str(), decl.name.as_str(), text],
                        decl.location.as_ref().or(ctx.decl.location.as_ref()),
                    );
                }
            }
        }
        if ctx.decl.flags.contains(MethodFlags::EXPLICIT_INTERFACE_IMPL) {
            bag.report(
                diagnostic_codes::EXPLICIT_INTERFACE_IMPLEMENTATION,
                &[ctx.name.as_str()],
                ctx.decl.location.as_ref(),
            );
        }
        if ctx.decl.flags.contains(MethodFlags::RETURNS_BY_REF) {
            bag.report(
                diagnostic_codes::RETURNS_BY_REFERENCE,
                &[ctx.name.as_str()],
                ctx.decl.location.as_ref(),
            );
        }
    }

    fn report_simplify(
        &self,
        ctx: &MethodContext<'_>,
        err: &SimplifyError,
        shown: &str,
        location: Option<&SourceLocation>,
        bag: &mut DiagnosticBag,
    ) {
        trace!(method = %ctx.name, ty = shown, %err, "erasure failed");
        match err {
            SimplifyError::Ambiguous { candidates } => {
                let listed: Vec<String> = candidates
                    .iter()
                    .map(|&c| format!("'{}'", self.graph.display_type(c)))
                    .collect();
                bag.report(
                    diagnostic_codes::AMBIGUOUS_ERASURE,
                    &[shown, ctx.name.as_str(), listed.join(", ").as_str()],
                    location,
                );
            }
            SimplifyError::Unresolvable => bag.report(
                diagnostic_codes::UNRESOLVABLE_ERASURE,
                &[shown, ctx.name.as_str()],
                location,
            ),
            SimplifyError::Pointer { pointer } => bag.report(
                diagnostic_codes::POINTER_NEEDS_DISPATCH,
                &[self.graph.display_type(*pointer).as_str(), ctx.name.as_str()],
                location,
            ),
        }
    }

    /// Sibling partial definitions named like the wrapper with the same
    /// static-ness, parameter count and the retained arity.
    fn find_partial_candidate(
        &self,
        ctx: &MethodContext<'_>,
        wrapper_name: &str,
        retained: usize,
    ) -> PartialCandidate {
        let matches = self
            .graph
            .methods_named(ctx.decl.containing, wrapper_name)
            .filter(|&other| {
                let candidate = self.graph.method(other);
                other != ctx.method
                    && candidate.is_partial_definition()
                    && candidate.is_static() == ctx.decl.is_static()
                    && candidate.params.len() == ctx.decl.params.len()
                    && candidate.arity() == retained
            })
            .collect();
        PartialCandidate::from_matches(matches)
    }

    // =========================================================================
    // Wrapper Signatures
    // =========================================================================

    fn async_shape(&self, return_type: TypeId, is_async: bool) -> AsyncShape {
        if return_type == TypeId::VOID {
            // `async void` is not awaitable from the outside.
            return AsyncShape::VOID;
        }
        if is_async {
            if self.known.is_plain_awaitable(return_type) {
                return AsyncShape {
                    is_async: true,
                    value: None,
                };
            }
            if let TypeData::Named { def, args } = self.graph.lookup(return_type) {
                if self.known.is_generic_awaitable(def) && args.len() == 1 {
                    return AsyncShape {
                        is_async: true,
                        value: Some(args[0]),
                    };
                }
            }
        }
        AsyncShape {
            is_async: false,
            value: Some(return_type),
        }
    }

    fn fresh_wrapper(
        &self,
        ctx: &MethodContext<'_>,
        marks: &BridgeMarks,
        simplifier: &mut Simplifier<'_>,
        name: String,
        retained: &[TypeParamId],
        simplified_params: &[(TypeId, bool)],
        simplified_return: TypeId,
    ) -> (WrapperSignature, AsyncShape) {
        let decl = ctx.decl;
        let params = decl
            .params
            .iter()
            .zip(simplified_params)
            .map(|(param, &(ty, dynamic))| WrapperParam {
                name: param.name.clone(),
                ty,
                target_ty: param.ty,
                ref_kind: param.ref_kind,
                // An erased `params` array would never match compiler-built arguments.
                is_params: param.is_params && !dynamic,
                default: param
                    .default
                    .clone()
                    .filter(|value| !dynamic || *value == ConstantValue::Null),
                dynamic,
            })
            .collect();

        let constraints = retained
            .iter()
            .map(|&param| {
                let tp = self.graph.type_param(param);
                let types = tp
                    .constraint_types
                    .iter()
                    .filter_map(|&c| simplifier.simplify(c).ok())
                    // `object` and `ValueType` are not valid constraint types.
                    .filter(|&c| c != self.known.object && c != self.known.value_type)
                    .collect();
                ConstraintClause {
                    param,
                    kinds: tp.constraints,
                    types,
                }
            })
            .collect();

        let modifiers = marks
            .method_mark
            .as_ref()
            .and_then(|mark| mark.modifiers.clone())
            .unwrap_or_else(|| decl.accessibility.keyword().to_string());

        let wrapper = WrapperSignature {
            name,
            modifiers,
            is_static: decl.is_static(),
            is_readonly: decl.is_readonly(),
            is_extension: decl.is_extension(),
            is_partial: false,
            return_type: simplified_return,
            type_params: retained.to_vec(),
            constraints,
            params,
        };
        let shape = self.async_shape(simplified_return, decl.is_async());
        (wrapper, shape)
    }

    fn partial_wrapper(
        &self,
        ctx: &MethodContext<'_>,
        candidate: MethodId,
        simplified_params: &[(TypeId, bool)],
    ) -> (WrapperSignature, AsyncShape) {
        let definition: &MethodDef = self.graph.method(candidate);
        let params = definition
            .params
            .iter()
            .zip(&ctx.decl.params)
            .zip(simplified_params)
            .map(|((param, target), &(_, dynamic))| WrapperParam {
                name: param.name.clone(),
                ty: param.ty,
                target_ty: target.ty,
                ref_kind: param.ref_kind,
                is_params: param.is_params,
                default: None,
                dynamic,
            })
            .collect();
        let constraints = definition
            .type_params
            .iter()
            .map(|&param| {
                let tp = self.graph.type_param(param);
                ConstraintClause {
                    param,
                    kinds: tp.constraints,
                    types: tp.constraint_types.clone(),
                }
            })
            .collect();

        let wrapper = WrapperSignature {
            name: definition.name.clone(),
            modifiers: definition.accessibility.keyword().to_string(),
            is_static: definition.is_static(),
            is_readonly: definition.is_readonly(),
            is_extension: definition.is_extension(),
            is_partial: true,
            return_type: definition.return_type,
            type_params: definition.type_params.clone(),
            constraints,
            params,
        };
        // Partial definitions cannot be `async`; the bridged method decides.
        let shape = self.async_shape(
            definition.return_type,
            ctx.decl.is_async() || definition.is_async(),
        );
        (wrapper, shape)
    }
}

struct MethodContext<'a> {
    method: MethodId,
    decl: &'a MethodDef,
    name: String,
}

/// Move `local` into `bag`, dropping repeats of the same report (a marked
/// parameter used in several positions fails the same way each time).
fn push_unique(bag: &mut DiagnosticBag, local: DiagnosticBag) {
    let mut seen: Vec<Diagnostic> = Vec::with_capacity(local.len());
    for diagnostic in local.into_vec() {
        if !seen.contains(&diagnostic) {
            seen.push(diagnostic.clone());
            bag.push(diagnostic);
        }
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
