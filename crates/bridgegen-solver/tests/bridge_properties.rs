//! End-to-end properties of bridge planning, driven through the public API.

use bridgegen_solver::{PlanBuilder, PlanOutcome, SimplifyError, Simplifier, SolverOptions};
use bridgegen_symbols::{SymbolGraph, TypeId, TypeParamId, WellKnownTypes, load_json};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde_json::{Value, json};

fn marked(name: &str) -> Value {
    json!({ "name": name, "attributes": [{ "name": "Bridgegen.DynamicBridgeAttribute" }] })
}

fn load(methods: Value) -> (SymbolGraph, WellKnownTypes) {
    let document = json!({
        "usings": ["System"],
        "types": [
            { "kind": "interface", "name": "IContainer", "namespace": "Demo" },
            { "kind": "class", "name": "Container", "namespace": "Demo",
              "typeParameters": [{ "name": "T" }], "interfaces": ["IContainer"] },
            { "kind": "struct", "name": "Pair", "namespace": "Demo",
              "typeParameters": [{ "name": "T" }], "interfaces": ["IComparable", "IDisposable"] },
            { "kind": "class", "name": "Host", "namespace": "Demo", "partial": true,
              "methods": methods }
        ]
    });
    let graph = load_json(&document.to_string()).unwrap();
    let known = WellKnownTypes::resolve(&graph).unwrap();
    (graph, known)
}

fn plan(graph: &SymbolGraph, known: &WellKnownTypes) -> PlanOutcome {
    let options = SolverOptions::default();
    let candidates = bridgegen_solver::find_candidates(graph, &options);
    PlanBuilder::new(graph, known, &options).plan_group(&candidates)
}

fn erase_param_types(graph: &SymbolGraph, known: &WellKnownTypes) -> Vec<Result<TypeId, SimplifyError>> {
    let (_, method) = graph.methods().next().unwrap();
    let marks: IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher> =
        method.type_params.iter().map(|&p| (p, None)).collect();
    let mut simplifier = Simplifier::new(graph, known, &marks);
    method.params.iter().map(|p| simplifier.simplify(p.ty)).collect()
}

#[test]
fn arrays_erase_to_system_array_idempotently() {
    let (graph, known) = load(json!([{
        "name": "M",
        "typeParameters": [marked("T")],
        "parameters": [
            { "name": "a", "type": "T[]" },
            { "name": "b", "type": "Container<T>[][]" },
            { "name": "c", "type": "T[,,]" }
        ]
    }]));
    for erased in erase_param_types(&graph, &known) {
        let erased = erased.unwrap();
        assert_eq!(erased, known.array);
        assert_eq!(graph.display_type(erased), "System.Array");
    }

    let marks: IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher> = IndexMap::default();
    let mut simplifier = Simplifier::new(&graph, &known, &marks);
    assert_eq!(simplifier.simplify(known.array), Ok(known.array));
}

#[test]
fn constraint_interfaces_decide_the_erasure() {
    let (graph, known) = load(json!([{
        "name": "M",
        "typeParameters": [
            { "name": "One", "constraints": ["IDisposable"],
              "attributes": [{ "name": "Bridgegen.DynamicBridgeAttribute" }] },
            { "name": "Two", "constraints": ["IDisposable", "IComparable"],
              "attributes": [{ "name": "Bridgegen.DynamicBridgeAttribute" }] }
        ],
        "parameters": [{ "name": "a", "type": "One" }, { "name": "b", "type": "Two" }]
    }]));
    let erased = erase_param_types(&graph, &known);
    assert_eq!(graph.display_type(erased[0].clone().unwrap()), "System.IDisposable");
    assert!(matches!(&erased[1], Err(SimplifyError::Ambiguous { candidates }) if candidates.len() == 2));

    let outcome = plan(&graph, &known);
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [14]);
}

#[test]
fn return_only_marked_parameter_is_uninferable() {
    let (graph, known) = load(json!([{
        "name": "Create",
        "typeParameters": [marked("T")],
        "returns": "T"
    }]));
    let outcome = plan(&graph, &known);
    assert!(outcome.plans.is_empty());
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [8]);
}

#[test]
fn method_marker_without_marked_parameters() {
    let (graph, known) = load(json!([{
        "name": "Run",
        "typeParameters": [{ "name": "T" }],
        "parameters": [{ "name": "x", "type": "T" }],
        "attributes": [{ "name": "Bridgegen.DynamicBridgeMethodAttribute" }]
    }]));
    let outcome = plan(&graph, &known);
    assert!(outcome.plans.is_empty());
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [12]);
}

#[test]
fn container_argument_becomes_its_interface() {
    let (graph, known) = load(json!([{
        "name": "Get",
        "typeParameters": [marked("T")],
        "parameters": [{ "name": "c", "type": "Container<T>" }],
        "returns": "T"
    }]));
    let outcome = plan(&graph, &known);
    assert!(outcome.diagnostics.is_empty());
    let plan = &outcome.plans[0];
    assert_eq!(plan.wrapper.name, "Get");
    assert_eq!(plan.wrapper.return_type, known.object);
    assert!(plan.wrapper.type_params.is_empty());
    let dynamic: Vec<(&str, String)> = plan
        .wrapper
        .dynamic_params()
        .map(|p| (p.name.as_str(), graph.display_type(p.ty)))
        .collect();
    assert_eq!(dynamic, [("c", "Demo.IContainer".to_string())]);
}

#[test]
fn struct_with_several_interfaces_erases_to_value_type() {
    let (graph, known) = load(json!([{
        "name": "Take", "accessibility": "public", "static": true,
        "typeParameters": [marked("T")],
        "parameters": [{ "name": "p", "type": "Pair<T>" }]
    }]));
    let outcome = plan(&graph, &known);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.plans.len(), 1);

    let param = &outcome.plans[0].wrapper.params[0];
    assert_eq!(param.ty, known.value_type);
    assert!(param.dynamic);
}

#[test]
fn type_nested_past_the_limit_is_unresolvable() {
    let depth = bridgegen_common::limits::MAX_TYPE_NESTING_DEPTH as usize + 6;
    let nested = format!("{}T{}", "Container<".repeat(depth), ">".repeat(depth));
    let (graph, known) = load(json!([{
        "name": "Deep", "accessibility": "public", "static": true,
        "typeParameters": [marked("T")],
        "parameters": [{ "name": "p", "type": nested }]
    }]));
    let outcome = plan(&graph, &known);
    assert!(outcome.plans.is_empty());
    let codes: Vec<u32> = outcome.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, [15]);
}
