//! Human-readable names for diagnostics.
//!
//! Types print the way the host compiler prints them in error messages:
//! namespace-qualified, keywords for special types, no `global::`.

use crate::graph::SymbolGraph;
use crate::types::{DefId, MethodId, TypeData, TypeId, TypeParamId};

impl SymbolGraph {
    #[must_use]
    pub fn display_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        match self.lookup(ty) {
            TypeData::Named { def, args } => {
                if let Some(keyword) = self.def(def).special.and_then(|s| s.keyword()) {
                    out.push_str(keyword);
                    return;
                }
                self.write_def_with_args(out, def, &args);
            }
            TypeData::Array { .. } => {
                // Rank specifiers print outermost first: `int[][,]`.
                let mut ranks = Vec::new();
                let mut current = ty;
                while let TypeData::Array { element, rank } = self.lookup(current) {
                    ranks.push(rank);
                    current = element;
                }
                self.write_type(out, current);
                for rank in ranks {
                    out.push('[');
                    for _ in 1..rank {
                        out.push(',');
                    }
                    out.push(']');
                }
            }
            TypeData::Param(param) => out.push_str(&self.type_param(param).name),
            TypeData::Pointer(element) => {
                self.write_type(out, element);
                out.push('*');
            }
            TypeData::FunctionPointer { params, ret } => {
                out.push_str("delegate*<");
                for param in &params {
                    self.write_type(out, *param);
                    out.push_str(", ");
                }
                self.write_type(out, ret);
                out.push('>');
            }
            TypeData::Void => out.push_str("void"),
            TypeData::Dynamic => out.push_str("dynamic"),
            TypeData::Error => out.push_str("?"),
        }
    }

    /// `Ns.Outer<A>.Inner<B>`: arguments are split across the containing chain.
    fn write_def_with_args(&self, out: &mut String, def: DefId, args: &[TypeId]) {
        let chain = self.containing_chain(def);
        if let Some(ns) = self.namespace_of(def) {
            out.push_str(ns);
            out.push('.');
        }
        let mut offset = 0;
        for (i, &link) in chain.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            let decl = self.def(link);
            out.push_str(&decl.name);
            let own = decl.type_params.len();
            if own > 0 {
                out.push('<');
                for (j, &arg) in args.iter().skip(offset).take(own).enumerate() {
                    if j > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, arg);
                }
                out.push('>');
            }
            offset += own;
        }
    }

    /// Definition with its declared type parameters: `Demo.Container<T>`.
    #[must_use]
    pub fn display_def(&self, def: DefId) -> String {
        self.display_type(self.declared_type(def))
    }

    #[must_use]
    pub fn display_type_param(&self, param: TypeParamId) -> String {
        self.type_param(param).name.clone()
    }

    /// `Demo.Host.Get<T>(Demo.Container<T>)`
    #[must_use]
    pub fn display_method(&self, method: MethodId) -> String {
        let decl = self.method(method);
        let mut out = self.display_def(decl.containing);
        out.push('.');
        out.push_str(&decl.name);
        if !decl.type_params.is_empty() {
            out.push('<');
            let names: Vec<&str> = decl
                .type_params
                .iter()
                .map(|&p| self.type_param(p).name.as_str())
                .collect();
            out.push_str(&names.join(", "));
            out.push('>');
        }
        out.push('(');
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if i == 0 && decl.is_extension() {
                out.push_str("this ");
            }
            out.push_str(param.ref_kind.prefix());
            self.write_type(&mut out, param.ty);
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
