use super::*;
use crate::test_fixtures::{MARKER, TestContext, demo_document};

fn context() -> TestContext {
    let mark = format!(r#""attributes": [{{ "name": "{MARKER}" }}]"#);
    TestContext::new(&demo_document(&format!(
        r#"{{ "name": "Get", "typeParameters": [{{ "name": "T", {mark} }}],
             "parameters": [{{ "name": "c", "type": "Container<T>" }}], "returns": "T" }},
           {{ "name": "Same", "typeParameters": [{{ "name": "T", {mark} }}],
             "parameters": [{{ "name": "x", "type": "T" }}, {{ "name": "y", "type": "T" }}] }},
           {{ "name": "Grid", "typeParameters": [{{ "name": "T", {mark} }}],
             "parameters": [{{ "name": "cells", "type": "T[,]" }}] }}"#
    )))
}

fn unreachable_body(_: &Instantiation, _: &mut [Value]) -> Result<Value, BindFailure> {
    panic!("target body must not run when binding fails")
}

#[test]
fn test_bound_call_runs_target_with_type_arguments() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Get"));
    let container = ctx.ty("Demo.Container`1", &[ctx.int()]);
    let int = ctx.int();

    let mut args = [Value::object(container, 1)];
    let result = call.invoke(&mut args, |inst, _| {
        assert_eq!(inst.type_args(), vec![int]);
        Ok(Value::object(int, 7))
    });
    assert_eq!(result, Ok(Value::object(int, 7)));
}

#[test]
fn test_unbound_single_argument_names_parameter_and_runtime_type() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Get"));

    let mut args = [Value::object(ctx.string(), 1)];
    let error = call.invoke(&mut args, unreachable_body).unwrap_err();

    assert_eq!(error.origin(), Origin::Bridge);
    assert_eq!(
        error.to_string(),
        "The argument of type 'string' could not be dynamically resolved to its specific type 'Demo.Container<T>'."
    );
    let BridgeError::ArgumentType {
        param,
        runtime_type,
        expected,
        source,
        ..
    } = error
    else {
        panic!("expected an argument type error");
    };
    assert_eq!(param, "c");
    assert_eq!(runtime_type.as_deref(), Some("string"));
    assert_eq!(expected.as_deref(), Some("Demo.Container<T>"));
    assert!(matches!(source, BindFailure::ArgumentMismatch { .. }));
}

#[test]
fn test_unbound_null_argument_has_no_runtime_type() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Get"));

    let mut args = [Value::Null];
    let error = call.invoke(&mut args, unreachable_body).unwrap_err();
    assert!(matches!(
        &error,
        BridgeError::ArgumentType { runtime_type: None, source: BindFailure::Uninferred { .. }, .. }
    ));
}

#[test]
fn test_unbound_array_argument_without_generic_definition() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Grid"));

    let mut args = [Value::object(ctx.graph.array(ctx.int(), 1), 1)];
    let error = call.invoke(&mut args, unreachable_body).unwrap_err();
    assert_eq!(
        error.to_string(),
        "The argument of type 'int[]' could not be dynamically resolved to its specific type."
    );
}

#[test]
fn test_unbound_several_arguments_use_plural_error() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Same"));

    let mut args = [Value::object(ctx.int(), 1), Value::object(ctx.string(), 2)];
    let error = call.invoke(&mut args, unreachable_body).unwrap_err();
    assert!(matches!(
        error,
        BridgeError::Arguments {
            source: BindFailure::Conflict { .. }
        }
    ));
    assert_eq!(
        error.to_string(),
        "The arguments could not be dynamically resolved to their specific types."
    );
}

#[test]
fn test_failure_inside_target_is_not_reclassified() {
    let ctx = context();
    let call = BridgeCall::new(&ctx.graph, ctx.plan("Get"));
    let container = ctx.ty("Demo.Container`1", &[ctx.string()]);
    let raised = BindFailure::Raised {
        message: "inner call did not bind".to_string(),
    };

    let mut args = [Value::object(container, 1)];
    let error = call
        .invoke(&mut args, |_, _| Err(raised.clone()))
        .unwrap_err();
    assert_eq!(error.origin(), Origin::Inner);
    assert_eq!(error.failure(), &raised);
    assert_eq!(error, BridgeError::Inner(raised));
}
