use super::*;
use crate::test_fixtures::TestContext;
use bridgegen_symbols::MethodId;

const SHAPES: &str = r#"{
    "usings": ["System", "System.Collections.Generic", "System.Threading.Tasks"],
    "types": [
        { "kind": "interface", "name": "IContainer", "namespace": "Demo" },
        { "kind": "interface", "name": "IContainer", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }], "interfaces": ["IContainer"] },
        { "kind": "class", "name": "Container", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }], "interfaces": ["IContainer<T>"] },
        { "kind": "class", "name": "Shape", "namespace": "Demo" },
        { "kind": "class", "name": "Circle", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }], "base": "Shape" },
        { "kind": "struct", "name": "Cell", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }] },
        { "kind": "struct", "name": "Pair", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }], "interfaces": ["IComparable", "IDisposable"] },
        { "kind": "class", "name": "Twin", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }], "interfaces": ["IComparable", "IDisposable"] },
        { "kind": "class", "name": "Host", "namespace": "Demo", "partial": true, "methods": [
            { "name": "Array", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "T[,]" }] },
            { "name": "Unconstrained", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "ValueConstrained", "typeParameters": [{ "name": "T", "constraints": ["struct"] }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "SingleInterface", "typeParameters": [{ "name": "T", "constraints": ["class", "IDisposable"] }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "TwoInterfaces",
              "typeParameters": [{ "name": "T", "constraints": ["IDisposable", "IComparable"] }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "GenericClass", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "Container<T>" }] },
            { "name": "GenericInterface", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "IContainer<T>" }] },
            { "name": "BaseClass", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "Circle<T>" }] },
            { "name": "BareStruct", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "Cell<T>" }] },
            { "name": "AmbiguousStruct", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "Pair<T>" }] },
            { "name": "AmbiguousClass", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "Twin<T>" }] },
            { "name": "Pointer", "typeParameters": [{ "name": "T", "constraints": ["unmanaged"] }],
              "parameters": [{ "name": "p", "type": "T*" }] },
            { "name": "Cycle",
              "typeParameters": [{ "name": "T", "constraints": ["U"] }, { "name": "U", "constraints": ["T"] }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "Chained",
              "typeParameters": [{ "name": "T", "constraints": ["U"] }, { "name": "U" }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "GenericConstraint",
              "typeParameters": [{ "name": "T", "constraints": ["IEquatable<T>"] }],
              "parameters": [{ "name": "p", "type": "T" }] },
            { "name": "Untouched", "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "List<int>" }] },
            { "name": "Async", "async": true, "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "T" }], "returns": "Task<T>" },
            { "name": "AsyncValue", "async": true, "typeParameters": [{ "name": "T" }],
              "parameters": [{ "name": "p", "type": "T" }], "returns": "ValueTask<List<T>>" }
        ] }
    ]
}"#;

/// Every type parameter of the method is marked without an explicit erasure.
fn all_marked(ctx: &TestContext, method: MethodId) -> IndexMap<TypeParamId, Option<TypeId>, FxBuildHasher> {
    ctx.graph
        .method(method)
        .type_params
        .iter()
        .map(|&p| (p, None))
        .collect()
}

/// Simplify the first parameter of `name`.
fn erase_first(ctx: &TestContext, name: &str) -> Result<String, SimplifyError> {
    let method = ctx.method(name);
    let marked = all_marked(ctx, method);
    let mut simplifier = Simplifier::new(&ctx.graph, &ctx.known, &marked);
    simplifier
        .simplify(ctx.graph.method(method).params[0].ty)
        .map(|ty| ctx.display(ty))
}

fn candidates(ctx: &TestContext, err: SimplifyError) -> Vec<String> {
    match err {
        SimplifyError::Ambiguous { candidates } => {
            candidates.into_iter().map(|c| ctx.display(c)).collect()
        }
        other => panic!("expected an ambiguous erasure, got {other:?}"),
    }
}

#[test]
fn test_arrays_erase_to_system_array() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "Array").unwrap(), "System.Array");
}

#[test]
fn test_type_parameter_erasure_from_constraints() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "Unconstrained").unwrap(), "object");
    assert_eq!(erase_first(&ctx, "ValueConstrained").unwrap(), "System.ValueType");
    assert_eq!(erase_first(&ctx, "SingleInterface").unwrap(), "System.IDisposable");
    assert_eq!(erase_first(&ctx, "Chained").unwrap(), "object");
}

#[test]
fn test_two_constraint_interfaces_are_ambiguous() {
    let ctx = TestContext::new(SHAPES);
    let err = erase_first(&ctx, "TwoInterfaces").unwrap_err();
    assert_eq!(candidates(&ctx, err), ["System.IDisposable", "System.IComparable"]);
}

#[test]
fn test_self_referencing_constraint_is_unresolvable() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(
        erase_first(&ctx, "GenericConstraint"),
        Err(SimplifyError::Unresolvable)
    );
}

#[test]
fn test_constraint_cycle_is_unresolvable() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "Cycle"), Err(SimplifyError::Unresolvable));
}

#[test]
fn test_generic_types_erase_to_non_generic_interface() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "GenericClass").unwrap(), "Demo.IContainer");
    assert_eq!(erase_first(&ctx, "GenericInterface").unwrap(), "Demo.IContainer");
}

#[test]
fn test_class_erases_to_nearest_base() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "BaseClass").unwrap(), "Demo.Shape");
}

#[test]
fn test_struct_without_interfaces_erases_to_value_type() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "BareStruct").unwrap(), "System.ValueType");
}

#[test]
fn test_struct_with_several_interfaces_erases_to_value_type() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(erase_first(&ctx, "AmbiguousStruct").unwrap(), "System.ValueType");
}

#[test]
fn test_class_with_several_interfaces_is_unresolvable() {
    let ctx = TestContext::new(SHAPES);
    assert_eq!(
        erase_first(&ctx, "AmbiguousClass"),
        Err(SimplifyError::Unresolvable)
    );
}

#[test]
fn test_pointer_mentioning_marked_parameter_fails() {
    let ctx = TestContext::new(SHAPES);
    let method = ctx.method("Pointer");
    let pointer = ctx.graph.method(method).params[0].ty;
    assert_eq!(
        erase_first(&ctx, "Pointer"),
        Err(SimplifyError::Pointer { pointer })
    );
}

#[test]
fn test_types_without_marked_parameters_are_unchanged() {
    let ctx = TestContext::new(SHAPES);
    let method = ctx.method("Untouched");
    let marked = all_marked(&ctx, method);
    let mut simplifier = Simplifier::new(&ctx.graph, &ctx.known, &marked);
    let ty = ctx.graph.method(method).params[0].ty;
    assert!(!simplifier.needs_simplifying(ty));
    assert_eq!(simplifier.simplify(ty), Ok(ty));
}

#[test]
fn test_explicit_erasure_wins() {
    let ctx = TestContext::new(SHAPES);
    let method = ctx.method("TwoInterfaces");
    let param = ctx.graph.method(method).type_params[0];
    let mut marked = all_marked(&ctx, method);
    marked.insert(param, Some(ctx.known.object));
    let mut simplifier = Simplifier::new(&ctx.graph, &ctx.known, &marked);
    assert_eq!(simplifier.erase_param(param), Ok(ctx.known.object));
}

#[test]
fn test_async_return_drops_the_result_type() {
    let ctx = TestContext::new(SHAPES);
    for (name, expected) in [
        ("Async", "System.Threading.Tasks.Task"),
        ("AsyncValue", "System.Threading.Tasks.ValueTask"),
    ] {
        let method = ctx.method(name);
        let marked = all_marked(&ctx, method);
        let mut simplifier = Simplifier::new(&ctx.graph, &ctx.known, &marked);
        let ret = ctx.graph.method(method).return_type;
        let erased = simplifier.simplify_return(ret, true).unwrap();
        assert_eq!(ctx.display(erased), expected);
    }
}

#[test]
fn test_collect_marked_walks_nested_types() {
    let ctx = TestContext::new(SHAPES);
    let method = ctx.method("AsyncValue");
    let marked = all_marked(&ctx, method);
    let simplifier = Simplifier::new(&ctx.graph, &ctx.known, &marked);
    let mut found = IndexSet::default();
    simplifier.collect_marked(ctx.graph.method(method).return_type, &mut found);
    assert_eq!(found.into_iter().collect::<Vec<_>>(), ctx.graph.method(method).type_params);
}
