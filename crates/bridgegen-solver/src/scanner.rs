//! Annotation scanner.
//!
//! Finds the methods that ask for a bridge and reads their markers: which
//! type parameters are resolved at runtime (with an optional explicit
//! erasure), and the method-level options.

use crate::options::{IGNORE_UNBOUND_OPTION, MODIFIERS_OPTION, SolverOptions};
use bridgegen_common::{DiagnosticBag, diagnostic_codes};
use bridgegen_symbols::{
    Attribute, ConstantValue, MethodId, SymbolGraph, TypeId, TypeParamId, TypedConstant,
};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Options of the method marker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodMark {
    /// Name of the generated wrapper, when not the method's own name.
    pub rename: Option<String>,
    /// Modifier text replacing the method's accessibility on the wrapper.
    pub modifiers: Option<String>,
    pub ignore_unbound: bool,
}

/// Markers read from one method.
#[derive(Clone, Debug, Default)]
pub struct BridgeMarks {
    /// Marked type parameters in declaration order, with the erasure given
    /// on the marker if any.
    pub marked: IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher>,
    pub method_mark: Option<MethodMark>,
}

impl BridgeMarks {
    #[must_use]
    pub fn is_marked(&self, param: TypeParamId) -> bool {
        self.marked.contains_key(&param)
    }
}

/// Methods carrying the method marker or at least one marked type parameter,
/// in declaration order.
#[must_use]
pub fn find_candidates(graph: &SymbolGraph, options: &SolverOptions) -> Vec<MethodId> {
    graph
        .methods()
        .filter(|(_, method)| {
            find_attribute(&method.attributes, &options.method_marker_attribute).is_some()
                || method.type_params.iter().any(|&p| {
                    find_attribute(&graph.type_param(p).attributes, &options.marker_attribute)
                        .is_some()
                })
        })
        .map(|(id, _)| id)
        .collect()
}

fn find_attribute<'a>(attributes: &'a [Attribute], class_name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.class_name == class_name)
}

fn is_identifier(text: &str) -> bool {
    let body = text.strip_prefix('@').unwrap_or(text);
    let mut chars = body.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Read and validate the markers of `method`.
///
/// Returns `None` when a marker is malformed or when the method marker is
/// present without any marked type parameter; the reason is reported to
/// `bag`.
pub fn read_marks(
    graph: &SymbolGraph,
    method: MethodId,
    options: &SolverOptions,
    bag: &mut DiagnosticBag,
) -> Option<BridgeMarks> {
    let decl = graph.method(method);
    let method_name = graph.display_method(method);
    let mut marks = BridgeMarks::default();

    for &param in &decl.type_params {
        let param_decl = graph.type_param(param);
        let Some(marker) = find_attribute(&param_decl.attributes, &options.marker_attribute) else {
            continue;
        };
        let erasure = match (marker.args.as_slice(), marker.named.is_empty()) {
            ([], true) => None,
            ([TypedConstant::Type(ty)], true) if *ty != TypeId::ERROR => Some(*ty),
            _ => {
                bag.report(
                    diagnostic_codes::MALFORMED_BRIDGE_MARKER,
                    &[
                        method_name.as_str(),
                        SolverOptions::short_name(&options.marker_attribute),
                        param_decl.name.as_str(),
                    ],
                    param_decl.location.as_ref().or(decl.location.as_ref()),
                );
                return None;
            }
        };
        marks.marked.insert(param, erasure);
    }

    let method_marker = find_attribute(&decl.attributes, &options.method_marker_attribute);

    if marks.marked.is_empty() {
        if method_marker.is_some() {
            bag.report(
                diagnostic_codes::METHOD_MARKER_WITHOUT_MARKED_PARAMETERS,
                &[
                    method_name.as_str(),
                    SolverOptions::short_name(&options.method_marker_attribute),
                    SolverOptions::short_name(&options.marker_attribute),
                ],
                decl.location.as_ref(),
            );
        }
        return None;
    }

    if let Some(marker) = method_marker {
        let location = decl.location.as_ref();
        marks.method_mark = Some(read_method_mark(marker, &method_name, options, location, bag)?);
    }
    Some(marks)
}

fn read_method_mark(
    marker: &Attribute,
    method_name: &str,
    options: &SolverOptions,
    location: Option<&bridgegen_common::SourceLocation>,
    bag: &mut DiagnosticBag,
) -> Option<MethodMark> {
    let attribute = SolverOptions::short_name(&options.method_marker_attribute);
    let mut mark = MethodMark::default();

    match marker.args.as_slice() {
        [] | [TypedConstant::Value(ConstantValue::Null)] => {}
        [TypedConstant::Value(ConstantValue::String(name))] if is_identifier(name) => {
            mark.rename = Some(name.clone());
        }
        _ => {
            bag.report(
                diagnostic_codes::MALFORMED_METHOD_MARKER,
                &[method_name, attribute],
                location,
            );
            return None;
        }
    }

    for (name, value) in &marker.named {
        let valid = match (name.as_str(), value) {
            (MODIFIERS_OPTION, TypedConstant::Value(ConstantValue::Null)) => true,
            (MODIFIERS_OPTION, TypedConstant::Value(ConstantValue::String(text))) => {
                mark.modifiers = Some(text.clone());
                true
            }
            (IGNORE_UNBOUND_OPTION, TypedConstant::Value(ConstantValue::Null)) => true,
            (IGNORE_UNBOUND_OPTION, TypedConstant::Value(ConstantValue::Bool(flag))) => {
                mark.ignore_unbound = *flag;
                true
            }
            _ => false,
        };
        if !valid {
            bag.report(
                diagnostic_codes::MALFORMED_METHOD_MARKER_OPTION,
                &[method_name, attribute, name.as_str()],
                location,
            );
            return None;
        }
    }
    Some(mark)
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
