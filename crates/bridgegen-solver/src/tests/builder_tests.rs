use super::*;
use crate::test_fixtures::TestContext;

const MARK: &str = r#"[{ "name": "Bridgegen.DynamicBridgeAttribute" }]"#;

/// Partial `Demo.Host` declaring `methods`, next to the container types.
fn host(methods: &str) -> String {
    format!(
        r#"{{ "usings": ["System", "System.Threading.Tasks"], "types": [
            {{ "kind": "interface", "name": "IContainer", "namespace": "Demo" }},
            {{ "kind": "class", "name": "Container", "namespace": "Demo",
               "typeParameters": [{{ "name": "T" }}], "interfaces": ["IContainer"] }},
            {{ "kind": "class", "name": "Host", "namespace": "Demo", "partial": true,
               "members": ["_Taken_PrivateBridgeTarget"],
               "methods": [{methods}] }}
        ] }}"#
    )
}

fn plan_all(ctx: &TestContext) -> PlanOutcome {
    let candidates = crate::scanner::find_candidates(&ctx.graph, &ctx.options);
    PlanBuilder::new(&ctx.graph, &ctx.known, &ctx.options).plan_group(&candidates)
}

fn codes(outcome: &PlanOutcome) -> Vec<u32> {
    outcome.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_plan_for_generic_container_argument() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Get", "accessibility": "public", "static": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "c", "type": "Container<T>" }}],
             "returns": "T" }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let [plan] = outcome.plans.as_slice() else {
        panic!("expected one plan");
    };

    assert_eq!(plan.target_name, "_Get_PrivateBridgeTarget");
    assert_eq!(plan.wrapper.name, "Get");
    assert_eq!(plan.wrapper.modifiers, "public");
    assert!(plan.wrapper.is_static);
    assert!(!plan.wrapper.is_partial);
    assert!(plan.wrapper.type_params.is_empty());
    assert_eq!(ctx.display(plan.wrapper.return_type), "object");

    let [param] = plan.wrapper.params.as_slice() else {
        panic!("expected one parameter");
    };
    assert_eq!(param.name, "c");
    assert_eq!(ctx.display(param.ty), "Demo.IContainer");
    assert_eq!(ctx.display(param.target_ty), "Demo.Container<T>");
    assert!(param.dynamic);

    assert_eq!(
        plan.async_shape,
        AsyncShape {
            is_async: false,
            value: Some(ctx.known.object)
        }
    );
    assert!(plan.partial.is_none());
    assert!(!plan.ignore_unbound);
    assert!(plan.is_valid());
}

#[test]
fn test_type_not_partial_reported_once() {
    let json = format!(
        r#"{{ "types": [
            {{ "kind": "class", "name": "Sealed", "location": {{ "file": "Sealed.cs", "line": 3 }},
               "methods": [
                {{ "name": "A", "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
                   "parameters": [{{ "name": "x", "type": "T" }}] }},
                {{ "name": "B", "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
                   "parameters": [{{ "name": "x", "type": "T" }}] }}
            ] }},
            {{ "kind": "class", "name": "Outer", "nested": [
                {{ "kind": "class", "name": "Inner", "partial": true, "methods": [
                    {{ "name": "C", "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
                       "parameters": [{{ "name": "x", "type": "T" }}] }}
                ] }}
            ] }}
        ] }}"#
    );
    let ctx = TestContext::new(&json);
    let outcome = plan_all(&ctx);
    assert!(outcome.plans.is_empty());
    assert_eq!(codes(&outcome), [13, 13]);
    let first = outcome.diagnostics.iter().next().unwrap();
    assert!(first.message_text.contains("'Sealed'"));
    assert_eq!(first.location.as_ref().map(|l| l.line), Some(3));
    assert!(outcome.diagnostics.iter().nth(1).unwrap().message_text.contains("'Outer'"));
}

#[test]
fn test_return_only_marked_parameter_is_uninferable() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Make",
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}, {{ "name": "U", "attributes": {MARK} }}],
             "parameters": [{{ "name": "seed", "type": "U" }}],
             "returns": "T" }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.plans.is_empty());
    assert_eq!(codes(&outcome), [8]);
    assert!(outcome.diagnostics.iter().next().unwrap().message_text.contains(": T."));
}

#[test]
fn test_signature_rejections() {
    let cases = [
        (r#""explicitInterface": true"#, r#""parameters": [{ "name": "x", "type": "T" }]"#, 10),
        (r#""returnsByRef": true"#, r#""parameters": [{ "name": "x", "type": "T" }]"#, 3),
        ("\"static\": true", r#""parameters": [{ "name": "x", "type": "T", "refKind": "ref" }]"#, 7),
        ("\"static\": true", r#""parameters": [{ "name": "x", "type": "T*" }, { "name": "y", "type": "T*" }]"#, 9),
    ];
    for (flags, params, code) in cases {
        let ctx = TestContext::new(&host(&format!(
            r#"{{ "name": "M", {flags},
                 "typeParameters": [{{ "name": "T", "constraints": ["unmanaged"], "attributes": {MARK} }}],
                 {params} }}"#
        )));
        let outcome = plan_all(&ctx);
        assert!(outcome.plans.is_empty(), "{flags} {params}");
        // The `unmanaged` warning rides along with every case.
        assert_eq!(codes(&outcome), [11, code], "{flags} {params}");
    }
}

#[test]
fn test_unenforced_constraint_is_only_a_warning() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Sum",
             "typeParameters": [{{ "name": "T", "constraints": ["notnull"], "attributes": {MARK} }}],
             "parameters": [{{ "name": "x", "type": "T" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert_eq!(codes(&outcome), [11]);
    assert!(!outcome.diagnostics.has_errors());
    assert_eq!(outcome.plans.len(), 1);
    assert_eq!(ctx.display(outcome.plans[0].wrapper.params[0].ty), "object");
}

#[test]
fn test_target_name_collision() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Taken",
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "x", "type": "T" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert_eq!(codes(&outcome), [4]);
    assert!(
        outcome
            .diagnostics
            .iter()
            .next()
            .unwrap()
            .message_text
            .contains("'_Taken_PrivateBridgeTarget'")
    );
}

#[test]
fn test_erasure_failures_are_reported_once() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Both",
             "typeParameters": [{{ "name": "T", "constraints": ["IDisposable", "IComparable"], "attributes": {MARK} }}],
             "parameters": [{{ "name": "a", "type": "T" }}, {{ "name": "b", "type": "T" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert_eq!(codes(&outcome), [14]);
    let message = &outcome.diagnostics.iter().next().unwrap().message_text;
    assert!(message.contains("'System.IDisposable', 'System.IComparable'"), "{message}");
}

#[test]
fn test_fresh_wrapper_renames_and_overrides_modifiers() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Store", "accessibility": "private",
             "typeParameters": [
                {{ "name": "T", "attributes": {MARK} }},
                {{ "name": "U", "constraints": ["class", "IDisposable", "new()"] }}
             ],
             "parameters": [
                {{ "name": "value", "type": "T", "default": null }},
                {{ "name": "count", "type": "int", "default": 3 }},
                {{ "name": "other", "type": "T", "default": 7 }},
                {{ "name": "rest", "type": "U[]", "params": true }}
             ],
             "attributes": [{{ "name": "Bridgegen.DynamicBridgeMethodAttribute", "args": ["Put"],
                "named": [{{ "name": "Modifiers", "value": "internal" }},
                          {{ "name": "IgnoreUnbound", "value": true }}] }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let plan = &outcome.plans[0];
    assert_eq!(plan.wrapper.name, "Put");
    assert_eq!(plan.target_name, "_Store_PrivateBridgeTarget");
    assert_eq!(plan.wrapper.modifiers, "internal");
    assert!(plan.ignore_unbound);
    assert_eq!(plan.wrapper.return_type, TypeId::VOID);
    assert_eq!(plan.async_shape, AsyncShape::VOID);

    let defaults: Vec<Option<ConstantValue>> =
        plan.wrapper.params.iter().map(|p| p.default.clone()).collect();
    assert_eq!(
        defaults,
        [Some(ConstantValue::Null), Some(ConstantValue::Int(3)), None, None]
    );
    assert!(plan.wrapper.params[3].is_params);
    assert!(!plan.wrapper.params[3].dynamic);

    let u = ctx.graph.method(plan.method).type_params[1];
    assert_eq!(plan.retained, [u]);
    assert_eq!(plan.wrapper.type_params, [u]);
    let [clause] = plan.wrapper.constraints.as_slice() else {
        panic!("expected one clause");
    };
    assert_eq!(
        clause.kinds,
        ConstraintKinds::REFERENCE | ConstraintKinds::CONSTRUCTOR
    );
    let types: Vec<String> = clause.types.iter().map(|&t| ctx.display(t)).collect();
    assert_eq!(types, ["System.IDisposable"]);
}

#[test]
fn test_async_shapes() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Load", "async": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "x", "type": "T" }}], "returns": "Task<T>" }},
           {{ "name": "Count", "async": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "x", "type": "T" }}], "returns": "Task<int>" }},
           {{ "name": "Fire", "async": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "x", "type": "T" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let shapes: Vec<(String, AsyncShape)> = outcome
        .plans
        .iter()
        .map(|p| (ctx.display(p.wrapper.return_type), p.async_shape))
        .collect();
    let int = ctx.graph.special_type(bridgegen_symbols::SpecialType::Int32);
    assert_eq!(
        shapes,
        [
            (
                "System.Threading.Tasks.Task".to_string(),
                AsyncShape {
                    is_async: true,
                    value: None
                }
            ),
            (
                "System.Threading.Tasks.Task<int>".to_string(),
                AsyncShape {
                    is_async: true,
                    value: int
                }
            ),
            ("void".to_string(), AsyncShape::VOID),
        ]
    );
}

#[test]
fn test_partial_definition_supplies_the_wrapper_signature() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Get", "accessibility": "private", "async": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "c", "type": "Container<T>", "default": null }}],
             "returns": "Task<T>" }},
           {{ "name": "Get", "accessibility": "public", "partialDefinition": true,
             "parameters": [{{ "name": "container", "type": "IContainer" }}],
             "returns": "Task<object>" }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let [plan] = outcome.plans.as_slice() else {
        panic!("expected one plan");
    };
    assert!(plan.partial.is_some());
    assert!(plan.wrapper.is_partial);
    assert_eq!(plan.wrapper.modifiers, "public");
    assert_eq!(
        ctx.display(plan.wrapper.return_type),
        "System.Threading.Tasks.Task<object>"
    );
    assert_eq!(
        plan.async_shape,
        AsyncShape {
            is_async: true,
            value: Some(ctx.known.object)
        }
    );
    let param = &plan.wrapper.params[0];
    assert_eq!(param.name, "container");
    assert_eq!(ctx.display(param.ty), "Demo.IContainer");
    assert_eq!(ctx.display(param.target_ty), "Demo.Container<T>");
    assert!(param.dynamic);
    assert_eq!(param.default, None);
}

#[test]
fn test_ambiguous_partial_definitions() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Get",
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "c", "type": "Container<T>" }}] }},
           {{ "name": "Get", "partialDefinition": true,
             "parameters": [{{ "name": "c", "type": "IContainer" }}] }},
           {{ "name": "Get", "partialDefinition": true,
             "parameters": [{{ "name": "c", "type": "object" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.plans.is_empty());
    assert_eq!(codes(&outcome), [16]);
    let message = &outcome.diagnostics.iter().next().unwrap().message_text;
    assert!(message.contains("'Demo.Host.Get(Demo.IContainer)', 'Demo.Host.Get(object)'"), "{message}");
}

#[test]
fn test_partial_definition_must_match_static_ness() {
    let ctx = TestContext::new(&host(&format!(
        r#"{{ "name": "Get", "static": true,
             "typeParameters": [{{ "name": "T", "attributes": {MARK} }}],
             "parameters": [{{ "name": "c", "type": "Container<T>" }}] }},
           {{ "name": "Get", "partialDefinition": true,
             "parameters": [{{ "name": "c", "type": "IContainer" }}] }}"#
    )));
    let outcome = plan_all(&ctx);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert!(outcome.plans[0].partial.is_none());
}
