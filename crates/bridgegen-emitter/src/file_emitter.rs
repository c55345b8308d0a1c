//! Whole artifacts.
//!
//! Every namespace gets one artifact holding the bridges of all its types.
//! The generated members land in re-declared `partial` forms of their
//! containing types, so nested types get their whole containing chain
//! re-declared around them.

use crate::bridge_emitter::BridgeEmitter;
use crate::options::EmitOptions;
use crate::source_writer::SourceWriter;
use crate::type_printer::TypePrinter;
use bridgegen_solver::BridgePlan;
use bridgegen_symbols::{DefId, SymbolGraph, WellKnownTypes};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// `Demo.Models_Bridges.g.cs`, or `Bridges.g.cs` for the global namespace.
#[must_use]
pub fn artifact_file_name(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("{ns}_Bridges.g.cs"),
        None => "Bridges.g.cs".to_string(),
    }
}

/// Generated source for one namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub namespace: Option<String>,
    pub text: String,
    pub bridge_count: usize,
}

/// One re-declared type: its own bridges, then its re-declared nested types.
#[derive(Default)]
struct TypeNode<'p> {
    plans: Vec<&'p BridgePlan>,
    nested: IndexMap<DefId, TypeNode<'p>, FxBuildHasher>,
}

impl<'p> TypeNode<'p> {
    fn insert(&mut self, chain: &[DefId], plan: &'p BridgePlan) {
        match chain.split_first() {
            None => self.plans.push(plan),
            Some((&first, rest)) => self.nested.entry(first).or_default().insert(rest, plan),
        }
    }
}

pub struct FileEmitter<'a> {
    graph: &'a SymbolGraph,
    options: &'a EmitOptions,
    printer: TypePrinter<'a>,
    bridges: BridgeEmitter<'a>,
}

impl<'a> FileEmitter<'a> {
    #[must_use]
    pub const fn new(
        graph: &'a SymbolGraph,
        known: &'a WellKnownTypes,
        options: &'a EmitOptions,
    ) -> Self {
        Self {
            graph,
            options,
            printer: TypePrinter::new(graph),
            bridges: BridgeEmitter::new(graph, known, options),
        }
    }

    /// Render the artifact of `namespace` from its plans, in plan order.
    #[must_use]
    pub fn emit(&self, namespace: Option<&str>, plans: &[BridgePlan]) -> Artifact {
        let mut root = TypeNode::default();
        for plan in plans {
            root.insert(&self.graph.containing_chain(plan.containing), plan);
        }

        let mut writer = SourceWriter::new(self.options.indent);
        writer.line("// <auto-generated/>");
        if self.options.nullable_directive {
            writer.line("#nullable disable");
        }
        writer.blank_line();

        if let Some(ns) = namespace {
            writer.line(&format!("namespace {ns}"));
            writer.open_block();
        }
        self.emit_nested(&mut writer, &root.nested);
        if namespace.is_some() {
            writer.close_block();
        }

        let file_name = artifact_file_name(namespace);
        debug!(file = %file_name, bridges = plans.len(), "emitted artifact");
        Artifact {
            file_name,
            namespace: namespace.map(str::to_string),
            text: writer.finish(),
            bridge_count: plans.len(),
        }
    }

    fn emit_nested(
        &self,
        writer: &mut SourceWriter,
        nested: &IndexMap<DefId, TypeNode<'_>, FxBuildHasher>,
    ) {
        for (i, (&def, node)) in nested.iter().enumerate() {
            if i > 0 {
                writer.blank_line();
            }
            self.emit_type(writer, def, node);
        }
    }

    fn emit_type(&self, writer: &mut SourceWriter, def: DefId, node: &TypeNode<'_>) {
        writer.line(&format!(
            "partial {}",
            self.printer.print_type_declaration(def)
        ));
        writer.open_block();
        for (i, plan) in node.plans.iter().enumerate() {
            if i > 0 {
                writer.blank_line();
            }
            self.bridges.emit_bridge(writer, plan);
        }
        if !node.plans.is_empty() && !node.nested.is_empty() {
            writer.blank_line();
        }
        self.emit_nested(writer, &node.nested);
        writer.close_block();
    }
}
