//! Documentation comment ids.
//!
//! `DynamicDependency` names a member of the containing type by its
//! documentation id without the `M:` prefix and type name:
//! `_Get_PrivateBridgeTarget``1(Demo.Container{``0},System.Int32@)`.

use bridgegen_symbols::{DefId, MethodId, RefKind, SymbolGraph, TypeData, TypeId, TypeParamOwner};

/// Full id of a method: `M:Demo.Host.Get``1(Demo.Container{``0})`.
#[must_use]
pub fn method_doc_id(graph: &SymbolGraph, method: MethodId) -> String {
    let decl = graph.method(method);
    let mut out = String::from("M:");
    write_definition(graph, &mut out, decl.containing);
    out.push('.');
    out.push_str(&member_doc_id(graph, method, &decl.name));
    out
}

/// Member part of a method id, with the method renamed to `name`.
#[must_use]
pub fn member_doc_id(graph: &SymbolGraph, method: MethodId, name: &str) -> String {
    let decl = graph.method(method);
    let mut out = name.to_string();
    if !decl.type_params.is_empty() {
        out.push_str("``");
        out.push_str(&decl.type_params.len().to_string());
    }
    if !decl.params.is_empty() {
        out.push('(');
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_type(graph, &mut out, param.ty);
            if param.ref_kind != RefKind::None {
                out.push('@');
            }
        }
        out.push(')');
    }
    out
}

/// `Demo.Outer`1.Inner`: the definition itself, arity-suffixed.
fn write_definition(graph: &SymbolGraph, out: &mut String, def: DefId) {
    if let Some(ns) = graph.namespace_of(def) {
        out.push_str(ns);
        out.push('.');
    }
    for (i, link) in graph.containing_chain(def).into_iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        let decl = graph.def(link);
        out.push_str(&decl.name);
        if !decl.type_params.is_empty() {
            out.push('`');
            out.push_str(&decl.type_params.len().to_string());
        }
    }
}

fn write_type(graph: &SymbolGraph, out: &mut String, ty: TypeId) {
    match graph.lookup(ty) {
        TypeData::Named { def, args } => {
            if let Some(ns) = graph.namespace_of(def) {
                out.push_str(ns);
                out.push('.');
            }
            let mut offset = 0;
            for (i, link) in graph.containing_chain(def).into_iter().enumerate() {
                if i > 0 {
                    out.push('.');
                }
                let decl = graph.def(link);
                out.push_str(&decl.name);
                let own = decl.type_params.len();
                if own == 0 {
                    continue;
                }
                out.push('{');
                for (j, &arg) in args.iter().skip(offset).take(own).enumerate() {
                    if j > 0 {
                        out.push(',');
                    }
                    write_type(graph, out, arg);
                }
                out.push('}');
                offset += own;
            }
        }
        TypeData::Array { element, rank } => {
            write_type(graph, out, element);
            if rank == 1 {
                out.push_str("[]");
            } else {
                let bounds = vec!["0:"; usize::from(rank)];
                out.push('[');
                out.push_str(&bounds.join(","));
                out.push(']');
            }
        }
        TypeData::Param(param) => {
            let decl = graph.type_param(param);
            match decl.owner {
                TypeParamOwner::Type(def) => {
                    let index = graph
                        .all_type_params(def)
                        .iter()
                        .position(|&p| p == param)
                        .unwrap_or(usize::from(decl.ordinal));
                    out.push('`');
                    out.push_str(&index.to_string());
                }
                TypeParamOwner::Method(_) => {
                    out.push_str("``");
                    out.push_str(&decl.ordinal.to_string());
                }
            }
        }
        TypeData::Pointer(element) => {
            write_type(graph, out, element);
            out.push('*');
        }
        TypeData::FunctionPointer { params, ret } => {
            out.push_str("=FUNC:");
            write_type(graph, out, ret);
            out.push('(');
            for (i, &param) in params.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_type(graph, out, param);
            }
            out.push(')');
        }
        TypeData::Void => out.push_str("System.Void"),
        TypeData::Dynamic | TypeData::Error => out.push_str("System.Object"),
    }
}

#[cfg(test)]
#[path = "tests/doc_id_tests.rs"]
mod tests;
