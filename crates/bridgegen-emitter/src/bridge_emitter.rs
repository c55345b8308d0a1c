//! Bridge emission.
//!
//! Each plan becomes two members of the containing type:
//!
//! - the **target**, which keeps the original signature under a private name
//!   and calls the original method with explicit type arguments. A binding
//!   failure raised inside it is tagged with [`BINDER_FAILURE_MARKER`] before
//!   it is rethrown;
//! - the **wrapper**, which has the simplified signature and calls the target
//!   with every erased argument cast to `dynamic`. A failure carrying the
//!   marker came from inside the target and is rethrown untouched; any other
//!   failure means the wrapper's own late-bound call did not bind.

use crate::doc_id::member_doc_id;
use crate::options::EmitOptions;
use crate::source_writer::SourceWriter;
use crate::type_printer::TypePrinter;
use bridgegen_solver::{BridgePlan, ConstraintClause, WrapperParam};
use bridgegen_symbols::{
    ConstraintKinds, RefKind, SymbolGraph, TypeData, TypeId, WellKnownTypes,
};
use tracing::trace;

/// Key of the exception data entry that tags failures from inside a target.
pub const BINDER_FAILURE_MARKER: &str = "Bridgegen_InnerBinderException";

const EXCEPTION_VARIABLE: &str = "bridgegen_binderException";
const DYNAMIC_DEPENDENCY_ATTRIBUTE: &str =
    "global::System.Diagnostics.CodeAnalysis.DynamicDependencyAttribute";
const UNCONDITIONAL_SUPPRESS_ATTRIBUTE: &str =
    "global::System.Diagnostics.CodeAnalysis.UnconditionalSuppressMessageAttribute";

pub struct BridgeEmitter<'a> {
    graph: &'a SymbolGraph,
    known: &'a WellKnownTypes,
    options: &'a EmitOptions,
    printer: TypePrinter<'a>,
}

impl<'a> BridgeEmitter<'a> {
    #[must_use]
    pub const fn new(
        graph: &'a SymbolGraph,
        known: &'a WellKnownTypes,
        options: &'a EmitOptions,
    ) -> Self {
        Self {
            graph,
            known,
            options,
            printer: TypePrinter::new(graph),
        }
    }

    /// Emit the target and the wrapper of `plan`.
    pub fn emit_bridge(&self, writer: &mut SourceWriter, plan: &BridgePlan) {
        trace!(
            target = %plan.target_name,
            wrapper = %plan.wrapper.name,
            "emitting bridge"
        );
        self.emit_target(writer, plan);
        self.emit_wrapper(writer, plan);
    }

    // =========================================================================
    // Target
    // =========================================================================

    fn emit_target(&self, writer: &mut SourceWriter, plan: &BridgePlan) {
        let decl = self.graph.method(plan.method);

        if self.options.hide_targets {
            if let (Some(attribute), Some(state)) = (
                self.known.editor_browsable_attribute,
                self.known.editor_browsable_state,
            ) {
                writer.line(&format!(
                    "[{}({}.Never)]",
                    self.printer.print_type(attribute),
                    self.printer.print_type(state)
                ));
            }
            self.emit_debugger_hidden(writer);
        }

        if decl.is_static() {
            writer.write("static ");
        }
        if decl.is_readonly() {
            writer.write("readonly ");
        }
        writer.write(&self.print_return(decl.return_type));
        writer.write(" ");
        writer.write(&plan.target_name);
        writer.write(&self.printer.print_type_param_list(&decl.type_params));
        writer.write("(");
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                writer.write(", ");
            }
            writer.write(param.ref_kind.prefix());
            writer.write(&self.printer.print_type(param.ty));
            writer.write(" ");
            writer.write(&param.name);
        }
        writer.line(")");

        let clauses: Vec<ConstraintClause> = decl
            .type_params
            .iter()
            .map(|&param| {
                let tp = self.graph.type_param(param);
                ConstraintClause {
                    param,
                    kinds: tp.constraints,
                    types: tp.constraint_types.clone(),
                }
            })
            .collect();
        self.emit_constraints(writer, &clauses);

        writer.open_block();
        writer.line("try");
        writer.open_block();
        if !decl.returns_void() {
            writer.write("return ");
        }
        writer.write(&decl.name);
        writer.write(&self.printer.print_type_param_list(&decl.type_params));
        writer.write("(");
        writer.write_joined(
            ", ",
            decl.params
                .iter()
                .map(|p| format!("{}{}", p.ref_kind.prefix(), p.name)),
        );
        writer.line(");");
        writer.close_block();

        self.emit_catch_header(writer);
        writer.line(&format!(
            "{EXCEPTION_VARIABLE}.Data[\"{BINDER_FAILURE_MARKER}\"] = \"\";"
        ));
        writer.line("throw;");
        writer.close_block();

        writer.close_block();
    }

    // =========================================================================
    // Wrapper
    // =========================================================================

    fn emit_wrapper(&self, writer: &mut SourceWriter, plan: &BridgePlan) {
        if self.options.trimming_attributes {
            let member_id = member_doc_id(self.graph, plan.method, &plan.target_name);
            writer.line(&format!(
                "[{DYNAMIC_DEPENDENCY_ATTRIBUTE}(\"{member_id}\")]"
            ));
            writer.line(&format!(
                "[{UNCONDITIONAL_SUPPRESS_ATTRIBUTE}(\"AssemblyLoadTrimming\", \"IL2026:RequiresUnreferencedCode\")]"
            ));
        }
        if self.options.hide_targets {
            self.emit_debugger_hidden(writer);
        }

        self.emit_wrapper_header(writer, plan);

        writer.open_block();
        writer.line("try");
        writer.open_block();
        if plan.async_shape.returns_value() {
            writer.write("return ");
        }
        if plan.async_shape.is_async {
            writer.write("await ");
        }
        writer.write(&plan.target_name);
        writer.write("(");
        writer.write_joined(
            ", ",
            plan.wrapper.params.iter().map(|p| {
                let cast = if p.dynamic { "(dynamic)" } else { "" };
                format!("{}{cast}{}", p.ref_kind.prefix(), p.name)
            }),
        );
        writer.line(");");
        writer.close_block();

        self.emit_catch_header(writer);
        writer.line(&format!(
            "if({EXCEPTION_VARIABLE}.Data[\"{BINDER_FAILURE_MARKER}\"] != null)"
        ));
        writer.open_block();
        writer.line(&format!(
            "{EXCEPTION_VARIABLE}.Data.Remove(\"{BINDER_FAILURE_MARKER}\");"
        ));
        writer.line("throw;");
        writer.close_block();
        self.emit_unbound_fallback(writer, plan);
        writer.close_block();

        writer.close_block();
    }

    fn emit_wrapper_header(&self, writer: &mut SourceWriter, plan: &BridgePlan) {
        let wrapper = &plan.wrapper;
        if !wrapper.modifiers.is_empty() {
            writer.write(&wrapper.modifiers);
            writer.write(" ");
        }
        if wrapper.is_static && !has_word(&wrapper.modifiers, "static") {
            writer.write("static ");
        }
        if plan.async_shape.is_async {
            writer.write("async ");
        }
        if wrapper.is_readonly {
            writer.write("readonly ");
        }
        if wrapper.is_partial {
            writer.write("partial ");
        }
        writer.write(&self.print_return(wrapper.return_type));
        writer.write(" ");
        writer.write(&wrapper.name);
        writer.write(&self.printer.print_type_param_list(&wrapper.type_params));
        writer.write("(");
        for (i, param) in wrapper.params.iter().enumerate() {
            if i > 0 {
                writer.write(", ");
            } else if wrapper.is_extension {
                writer.write("this ");
            }
            self.emit_wrapper_param(writer, param);
        }
        writer.line(")");
        self.emit_constraints(writer, &wrapper.constraints);
    }

    fn emit_wrapper_param(&self, writer: &mut SourceWriter, param: &WrapperParam) {
        if param.is_params {
            writer.write("params ");
        }
        writer.write(param.ref_kind.prefix());
        writer.write(&self.printer.print_type(param.ty));
        writer.write(" ");
        writer.write(&param.name);
        if let Some(value) = &param.default {
            writer.write(" = ");
            writer.write(&self.printer.print_constant(value, param.ty));
        }
    }

    /// Catch branch for a failure of the wrapper's own late-bound call.
    fn emit_unbound_fallback(&self, writer: &mut SourceWriter, plan: &BridgePlan) {
        if plan.ignore_unbound {
            for param in &plan.wrapper.params {
                if param.ref_kind == RefKind::Out {
                    writer.line(&format!(
                        "{} = default({});",
                        param.name,
                        self.printer.print_type(param.ty)
                    ));
                }
            }
            if let Some(value) = plan.async_shape.value {
                writer.line(&format!("return default({});", self.printer.print_type(value)));
            }
            return;
        }

        let exception = self.printer.print_type(self.known.argument_exception);
        let dynamic: Vec<&WrapperParam> = plan.wrapper.dynamic_params().collect();
        match dynamic.as_slice() {
            [param] => {
                let runtime_type = format!("{{((object){})?.GetType()}}", param.name);
                let message = match self.print_expected_type(param.target_ty) {
                    Some(expected) => format!(
                        "$\"The argument of type '{runtime_type}' could not be dynamically resolved to its specific type '{{{expected}}}'.\""
                    ),
                    None => format!(
                        "$\"The argument of type '{runtime_type}' could not be dynamically resolved to its specific type.\""
                    ),
                };
                writer.line(&format!(
                    "throw new {exception}({message}, nameof({}), {EXCEPTION_VARIABLE});",
                    param.name
                ));
            }
            _ => writer.line(&format!(
                "throw new {exception}(\"The arguments could not be dynamically resolved to their specific types.\", {EXCEPTION_VARIABLE});"
            )),
        }
    }

    /// `typeof` expression naming the generic definition an argument had to
    /// match: `typeof(global::Demo.Container<>)`, `typeof(...).MakeArrayType(2)`.
    fn print_expected_type(&self, ty: TypeId) -> Option<String> {
        match self.graph.lookup(ty) {
            TypeData::Named { .. } => {
                let unbound = self.printer.print_unbound(ty)?;
                Some(format!("typeof({unbound})"))
            }
            TypeData::Array { element, rank } => {
                let unbound = self.printer.print_unbound(element)?;
                let rank = if rank <= 1 {
                    String::new()
                } else {
                    rank.to_string()
                };
                Some(format!("typeof({unbound}).MakeArrayType({rank})"))
            }
            _ => None,
        }
    }

    // =========================================================================
    // Shared Pieces
    // =========================================================================

    fn emit_debugger_hidden(&self, writer: &mut SourceWriter) {
        if let Some(attribute) = self.known.debugger_non_user_code_attribute {
            writer.line(&format!("[{}]", self.printer.print_type(attribute)));
        }
    }

    fn emit_catch_header(&self, writer: &mut SourceWriter) {
        writer.line(&format!(
            "catch({} {EXCEPTION_VARIABLE})",
            self.printer.print_type(self.known.binder_exception)
        ));
        writer.open_block();
    }

    fn print_return(&self, ty: TypeId) -> String {
        if ty == TypeId::VOID {
            "void".to_string()
        } else {
            self.printer.print_type(ty)
        }
    }

    /// One `where` line per constrained type parameter, in the order the
    /// language requires: primary constraint, type constraints, `new()`.
    fn emit_constraints(&self, writer: &mut SourceWriter, clauses: &[ConstraintClause]) {
        writer.increase_indent();
        for clause in clauses.iter().filter(|c| !c.is_empty()) {
            let mut parts: Vec<String> = Vec::new();
            let kinds = clause.kinds;
            if kinds.contains(ConstraintKinds::REFERENCE) {
                if kinds.contains(ConstraintKinds::NULLABLE_REFERENCE) {
                    parts.push("class?".to_string());
                } else {
                    parts.push("class".to_string());
                }
            }
            if kinds.contains(ConstraintKinds::UNMANAGED) {
                parts.push("unmanaged".to_string());
            } else if kinds.contains(ConstraintKinds::VALUE) {
                parts.push("struct".to_string());
            }
            if kinds.contains(ConstraintKinds::NOT_NULL) {
                parts.push("notnull".to_string());
            }
            parts.extend(clause.types.iter().map(|&t| self.printer.print_type(t)));
            if kinds.contains(ConstraintKinds::CONSTRUCTOR) {
                parts.push("new()".to_string());
            }
            writer.line(&format!(
                "where {} : {}",
                self.graph.type_param(clause.param).name,
                parts.join(", ")
            ));
        }
        writer.decrease_indent();
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split_whitespace().any(|w| w == word)
}
