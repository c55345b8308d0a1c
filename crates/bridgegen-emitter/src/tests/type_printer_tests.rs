use super::*;
use bridgegen_symbols::load_json;

const DOC: &str = r#"{
    "usings": ["System", "System.Collections.Generic"],
    "types": [
        { "kind": "enum", "name": "Mode", "namespace": "Demo", "members": ["A", "B"] },
        { "kind": "interface", "name": "IFeed", "namespace": "Demo",
          "typeParameters": [{ "name": "T", "variance": "out" }] },
        { "kind": "class", "name": "Outer", "namespace": "Demo",
          "typeParameters": [{ "name": "TKey" }, { "name": "TValue" }],
          "nested": [{ "kind": "struct", "name": "Entry", "typeParameters": [{ "name": "TExtra" }] }] },
        { "kind": "class", "name": "Loose",
          "methods": [{ "name": "M",
            "typeParameters": [{ "name": "T" }],
            "parameters": [
                { "name": "a", "type": "Dictionary<string, T>" },
                { "name": "b", "type": "Demo.Outer<int, T>.Entry<bool>[][,]" },
                { "name": "c", "type": "delegate*<int*, void>" },
                { "name": "d", "type": "dynamic" },
                { "name": "e", "type": "int?" },
                { "name": "f", "type": "Demo.Mode" },
                { "name": "g", "type": "float" },
                { "name": "h", "type": "decimal" }
            ] }] }
    ]
}"#;

fn param_types(graph: &SymbolGraph) -> Vec<TypeId> {
    let (_, method) = graph.methods().next().unwrap();
    method.params.iter().map(|p| p.ty).collect()
}

#[test]
fn test_print_types_fully_qualified() {
    let graph = load_json(DOC).unwrap();
    let printer = TypePrinter::new(&graph);
    let printed: Vec<String> = param_types(&graph)
        .into_iter()
        .map(|ty| printer.print_type(ty))
        .collect();
    assert_eq!(
        printed,
        [
            "global::System.Collections.Generic.Dictionary<string, T>",
            "global::Demo.Outer<int, T>.Entry<bool>[][,]",
            "delegate*<int*, void>",
            "dynamic",
            "global::System.Nullable<int>",
            "global::Demo.Mode",
            "float",
            "decimal",
        ]
    );
}

#[test]
fn test_print_unbound_generic_definitions() {
    let graph = load_json(DOC).unwrap();
    let printer = TypePrinter::new(&graph);
    let types = param_types(&graph);
    assert_eq!(
        printer.print_unbound(types[0]).as_deref(),
        Some("global::System.Collections.Generic.Dictionary<,>")
    );
    assert_eq!(printer.print_unbound(types[5]).as_deref(), Some("global::Demo.Mode"));
    assert_eq!(printer.print_unbound(types[1]), None);

    let entry = graph.def_by_metadata_name("Demo.Outer`2+Entry`1").unwrap();
    assert_eq!(
        printer.print_unbound(graph.declared_type(entry)).as_deref(),
        Some("global::Demo.Outer<,>.Entry<>")
    );
}

#[test]
fn test_print_type_declaration_keeps_variance() {
    let graph = load_json(DOC).unwrap();
    let printer = TypePrinter::new(&graph);
    let feed = graph.def_by_metadata_name("Demo.IFeed`1").unwrap();
    assert_eq!(printer.print_type_declaration(feed), "interface IFeed<out T>");
    let entry = graph.def_by_metadata_name("Demo.Outer`2+Entry`1").unwrap();
    assert_eq!(printer.print_type_declaration(entry), "struct Entry<TExtra>");
}

#[test]
fn test_print_constants() {
    let graph = load_json(DOC).unwrap();
    let printer = TypePrinter::new(&graph);
    let types = param_types(&graph);
    let (dictionary, mode, float, decimal) = (types[0], types[5], types[6], types[7]);
    let int = graph.special_type(SpecialType::Int32).unwrap();
    let string = graph.special_type(SpecialType::String).unwrap();
    let char_ty = graph.special_type(SpecialType::Char).unwrap();

    assert_eq!(
        printer.print_constant(&ConstantValue::Null, dictionary),
        "default(global::System.Collections.Generic.Dictionary<string, T>)"
    );
    assert_eq!(printer.print_constant(&ConstantValue::Int(-2), int), "-2");
    assert_eq!(printer.print_constant(&ConstantValue::Int(1), mode), "(global::Demo.Mode)1");
    assert_eq!(printer.print_constant(&ConstantValue::Int(-1), mode), "(global::Demo.Mode)(-1)");
    assert_eq!(printer.print_constant(&ConstantValue::Float(1.5), float), "1.5F");
    assert_eq!(printer.print_constant(&ConstantValue::Int(3), decimal), "3M");
    assert_eq!(printer.print_constant(&ConstantValue::Float(f64::NAN), float), "float.NaN");
    assert_eq!(
        printer.print_constant(&ConstantValue::Float(f64::NEG_INFINITY), int),
        "double.NegativeInfinity"
    );
    assert_eq!(printer.print_constant(&ConstantValue::Bool(true), int), "true");
    assert_eq!(
        printer.print_constant(&ConstantValue::String("a\"b\\\n".to_string()), string),
        r#""a\"b\\\n""#
    );
    assert_eq!(printer.print_constant(&ConstantValue::Char('\''), char_ty), r"'\''");
}
