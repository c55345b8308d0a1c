//! Type Printer - Convert TypeId to C# syntax
//!
//! Generated code must compile no matter which names are in scope at the
//! insertion point, so every named type is printed fully qualified with
//! `global::`. Special types use their keywords.

use bridgegen_symbols::{
    ConstantValue, DefId, DefKind, SpecialType, SymbolGraph, TypeData, TypeId, TypeParamId,
};

pub struct TypePrinter<'a> {
    graph: &'a SymbolGraph,
}

impl<'a> TypePrinter<'a> {
    #[must_use]
    pub const fn new(graph: &'a SymbolGraph) -> Self {
        Self { graph }
    }

    /// Convert a `TypeId` to C# syntax: `global::Demo.Container<int>[]`.
    #[must_use]
    pub fn print_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        match self.graph.lookup(ty) {
            TypeData::Named { def, args } => {
                if let Some(keyword) = self.graph.def(def).special.and_then(SpecialType::keyword) {
                    out.push_str(keyword);
                    return;
                }
                self.write_qualified(out, def, Some(args.as_slice()));
            }
            TypeData::Array { .. } => {
                let mut ranks = Vec::new();
                let mut current = ty;
                while let TypeData::Array { element, rank } = self.graph.lookup(current) {
                    ranks.push(rank);
                    current = element;
                }
                self.write_type(out, current);
                for rank in ranks {
                    write_rank(out, rank);
                }
            }
            TypeData::Param(param) => out.push_str(&self.graph.type_param(param).name),
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
            // Never reaches a plan; keep the output compilable regardless.
            TypeData::Error => out.push_str("object"),
        }
    }

    /// `global::Ns.Outer<A>.Inner<B>`; with `args == None` the generic
    /// definition is printed unbound: `global::Ns.Outer<>.Inner<,>`.
    fn write_qualified(&self, out: &mut String, def: DefId, args: Option<&[TypeId]>) {
        out.push_str("global::");
        if let Some(ns) = self.graph.namespace_of(def) {
            out.push_str(ns);
            out.push('.');
        }
        let mut offset = 0;
        for (i, link) in self.graph.containing_chain(def).into_iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            let decl = self.graph.def(link);
            out.push_str(&decl.name);
            let own = decl.type_params.len();
            if own == 0 {
                continue;
            }
            out.push('<');
            match args {
                Some(args) => {
                    for (j, &arg) in args.iter().skip(offset).take(own).enumerate() {
                        if j > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(out, arg);
                    }
                }
                None => out.push_str(&",".repeat(own - 1)),
            }
            out.push('>');
            offset += own;
        }
    }

    /// Unbound generic form of the definition behind `ty`, for `typeof`.
    ///
    /// Returns `None` for types that are not named types.
    #[must_use]
    pub fn print_unbound(&self, ty: TypeId) -> Option<String> {
        let TypeData::Named { def, .. } = self.graph.lookup(ty) else {
            return None;
        };
        let decl = self.graph.def(def);
        if let Some(keyword) = decl.special.and_then(SpecialType::keyword) {
            return Some(keyword.to_string());
        }
        let mut out = String::new();
        if self.graph.all_type_params(def).is_empty() {
            self.write_qualified(&mut out, def, Some(&[][..]));
        } else {
            self.write_qualified(&mut out, def, None);
        }
        Some(out)
    }

    /// `<T, U>`, or nothing for an empty list.
    #[must_use]
    pub fn print_type_param_list(&self, params: &[TypeParamId]) -> String {
        if params.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = params
            .iter()
            .map(|&p| self.graph.type_param(p).name.as_str())
            .collect();
        format!("<{}>", names.join(", "))
    }

    /// Header of a partial re-declaration: `class Host<T>`, `interface IFoo<out T>`.
    #[must_use]
    pub fn print_type_declaration(&self, def: DefId) -> String {
        let decl = self.graph.def(def);
        let mut out = format!("{} {}", decl.kind.keyword(), decl.name);
        if !decl.type_params.is_empty() {
            let params: Vec<String> = decl
                .type_params
                .iter()
                .map(|&p| {
                    let param = self.graph.type_param(p);
                    format!("{}{}", param.variance.prefix(), param.name)
                })
                .collect();
            out.push('<');
            out.push_str(&params.join(", "));
            out.push('>');
        }
        out
    }

    // =========================================================================
    // Literals
    // =========================================================================

    /// C# literal for a parameter default of type `ty`.
    ///
    /// `null` prints as `default(T)`, which is valid for every parameter type.
    #[must_use]
    pub fn print_constant(&self, value: &ConstantValue, ty: TypeId) -> String {
        let special = self
            .graph
            .def_of(ty)
            .and_then(|def| self.graph.def(def).special);
        match value {
            ConstantValue::Null => format!("default({})", self.print_type(ty)),
            ConstantValue::Bool(flag) => flag.to_string(),
            ConstantValue::Int(number) => {
                if self.is_enum(ty) {
                    let text = if *number < 0 {
                        format!("({number})")
                    } else {
                        number.to_string()
                    };
                    return format!("({}){text}", self.print_type(ty));
                }
                format!("{number}{}", numeric_suffix(special))
            }
            ConstantValue::Float(number) => print_float(*number, special),
            ConstantValue::Char(ch) => format!("'{}'", escape_char(*ch, '\'')),
            ConstantValue::String(text) => {
                let escaped: String = text.chars().map(|c| escape_char(c, '"')).collect();
                format!("\"{escaped}\"")
            }
        }
    }

    fn is_enum(&self, ty: TypeId) -> bool {
        self.graph.def_of(ty).is_some_and(|def| {
            let decl = self.graph.def(def);
            decl.kind == DefKind::Enum && decl.special.is_none()
        })
    }
}

fn write_rank(out: &mut String, rank: u8) {
    out.push('[');
    for _ in 1..rank {
        out.push(',');
    }
    out.push(']');
}

const fn numeric_suffix(special: Option<SpecialType>) -> &'static str {
    match special {
        Some(SpecialType::Single) => "F",
        Some(SpecialType::Double) => "D",
        Some(SpecialType::Decimal) => "M",
        _ => "",
    }
}

fn print_float(number: f64, special: Option<SpecialType>) -> String {
    let keyword = if special == Some(SpecialType::Single) {
        "float"
    } else {
        "double"
    };
    if number.is_nan() {
        return format!("{keyword}.NaN");
    }
    if number.is_infinite() {
        let which = if number > 0.0 {
            "PositiveInfinity"
        } else {
            "NegativeInfinity"
        };
        return format!("{keyword}.{which}");
    }
    let suffix = match numeric_suffix(special) {
        "" => "D",
        suffix => suffix,
    };
    format!("{number}{suffix}")
}

/// Escape one character for a literal delimited by `quote`.
fn escape_char(ch: char, quote: char) -> String {
    match ch {
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\0' => "\\0".to_string(),
        c if c == quote => format!("\\{c}"),
        c if c.is_control() => format!("\\u{:04X}", c as u32),
        c => c.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/type_printer_tests.rs"]
mod tests;
