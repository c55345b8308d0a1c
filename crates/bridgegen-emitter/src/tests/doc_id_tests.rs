use super::*;
use bridgegen_symbols::load_json;

const DOC: &str = r#"{
    "usings": ["System.Collections.Generic"],
    "types": [
        { "kind": "class", "name": "Container", "namespace": "Demo",
          "typeParameters": [{ "name": "T" }] },
        { "kind": "class", "name": "Outer", "namespace": "Demo",
          "typeParameters": [{ "name": "A" }, { "name": "B" }],
          "nested": [{ "kind": "class", "name": "Host", "partial": true,
            "typeParameters": [{ "name": "C" }],
            "methods": [
                { "name": "Get",
                  "typeParameters": [{ "name": "T" }, { "name": "U" }],
                  "parameters": [
                    { "name": "c", "type": "Container<U>" },
                    { "name": "n", "type": "int", "refKind": "ref" },
                    { "name": "grid", "type": "T[,]" },
                    { "name": "outer", "type": "List<B>" },
                    { "name": "own", "type": "C*" }
                  ] },
                { "name": "Empty" },
                { "name": "Call", "parameters": [{ "name": "f", "type": "delegate*<int, void>" }] }
            ] }] }
    ]
}"#;

fn method(graph: &SymbolGraph, name: &str) -> MethodId {
    graph
        .methods()
        .find(|(_, m)| m.name == name)
        .map(|(id, _)| id)
        .unwrap()
}

#[test]
fn test_method_doc_id_encodes_parameters() {
    let graph = load_json(DOC).unwrap();
    assert_eq!(
        method_doc_id(&graph, method(&graph, "Get")),
        "M:Demo.Outer`2.Host`1.Get``2(Demo.Container{``1},System.Int32@,``0[0:,0:],\
         System.Collections.Generic.List{`1},`2*)"
    );
}

#[test]
fn test_member_doc_id_renames_the_method() {
    let graph = load_json(DOC).unwrap();
    let get = method(&graph, "Get");
    assert!(member_doc_id(&graph, get, "_Get_PrivateBridgeTarget").starts_with("_Get_PrivateBridgeTarget``2(Demo.Container{``1},"));
}

#[test]
fn test_parameterless_and_function_pointer_ids() {
    let graph = load_json(DOC).unwrap();
    assert_eq!(method_doc_id(&graph, method(&graph, "Empty")), "M:Demo.Outer`2.Host`1.Empty");
    assert_eq!(
        member_doc_id(&graph, method(&graph, "Call"), "Call"),
        "Call(=FUNC:System.Void(System.Int32))"
    );
}
