//! Generation pipeline.
//!
//! Marked methods are grouped by the namespace of their declaring type. Each
//! group is planned and emitted independently (in parallel unless disabled)
//! and produces at most one artifact:
//!
//! - a group whose planning reported an error delivers no artifact, but the
//!   other groups are unaffected;
//! - a missing predefined type aborts the whole pass before any group runs.

use bridgegen_common::{Diagnostic, DiagnosticCategory};
use bridgegen_emitter::{Artifact, EmitOptions, FileEmitter};
use bridgegen_solver::{BridgePlan, PlanBuilder, SolverOptions, find_candidates};
use bridgegen_symbols::{
    GraphDocument, LoadError, MethodId, SymbolGraph, WellKnownTypes, load_documents,
};
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;
use tracing::{debug, debug_span, warn};

/// Everything that shapes one generation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub solver: SolverOptions,
    pub emit: EmitOptions,
    /// Process namespace groups on the rayon pool.
    pub parallel: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            solver: SolverOptions::default(),
            emit: EmitOptions::default(),
            parallel: true,
        }
    }
}

/// Outcome of one namespace group.
#[derive(Debug)]
pub struct GroupResult {
    pub namespace: Option<String>,
    pub plans: Vec<BridgePlan>,
    /// `None` when the group reported an error.
    pub artifact: Option<Artifact>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GroupResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Outcome of a whole pass, groups in first-seen order.
#[derive(Debug, Default)]
pub struct GenerationResult {
    pub groups: Vec<GroupResult>,
    /// Diagnostics not tied to a group (a missing predefined type).
    pub global_diagnostics: Vec<Diagnostic>,
}

impl GenerationResult {
    /// Delivered artifacts.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.groups.iter().filter_map(|g| g.artifact.as_ref())
    }

    /// Plans of every group, delivered or not.
    pub fn plans(&self) -> impl Iterator<Item = &BridgePlan> {
        self.groups.iter().flat_map(|g| g.plans.iter())
    }

    /// All diagnostics, pass-level ones first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.global_diagnostics
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.diagnostics.iter()))
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics().filter(|d| d.is_error()).count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics()
            .filter(|d| d.category == DiagnosticCategory::Warning)
            .count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Run one generation pass over `graph`.
#[must_use]
pub fn generate(graph: &SymbolGraph, options: &GeneratorOptions) -> GenerationResult {
    let _span = debug_span!("generate").entered();

    let known = match WellKnownTypes::resolve(graph) {
        Ok(known) => known,
        Err(diagnostic) => {
            warn!(message = %diagnostic.message_text, "predefined type missing; nothing generated");
            return GenerationResult {
                groups: Vec::new(),
                global_diagnostics: vec![diagnostic],
            };
        }
    };

    let groups = group_by_namespace(graph, &find_candidates(graph, &options.solver));
    debug!(groups = groups.len(), parallel = options.parallel, "planning groups");

    let groups: Vec<(Option<String>, Vec<MethodId>)> = groups.into_iter().collect();
    let results: Vec<GroupResult> = if options.parallel {
        groups
            .into_par_iter()
            .map(|(namespace, methods)| run_group(graph, &known, options, namespace, &methods))
            .collect()
    } else {
        groups
            .into_iter()
            .map(|(namespace, methods)| run_group(graph, &known, options, namespace, &methods))
            .collect()
    };

    GenerationResult {
        groups: results,
        global_diagnostics: Vec::new(),
    }
}

/// Load graph documents and run one generation pass.
pub fn generate_documents(
    documents: &[GraphDocument],
    options: &GeneratorOptions,
) -> Result<GenerationResult, LoadError> {
    let graph = load_documents(documents)?;
    Ok(generate(&graph, options))
}

/// Candidate methods keyed by the namespace of their declaring type, in
/// first-seen order. The global namespace is keyed `None`.
fn group_by_namespace(
    graph: &SymbolGraph,
    methods: &[MethodId],
) -> IndexMap<Option<String>, Vec<MethodId>, FxBuildHasher> {
    let mut groups: IndexMap<Option<String>, Vec<MethodId>, FxBuildHasher> = IndexMap::default();
    for &method in methods {
        let namespace = graph
            .namespace_of(graph.method(method).containing)
            .map(str::to_string);
        groups.entry(namespace).or_default().push(method);
    }
    groups
}

fn run_group(
    graph: &SymbolGraph,
    known: &WellKnownTypes,
    options: &GeneratorOptions,
    namespace: Option<String>,
    methods: &[MethodId],
) -> GroupResult {
    let _span = debug_span!(
        "group",
        namespace = namespace.as_deref().unwrap_or("<global>")
    )
    .entered();

    let outcome = PlanBuilder::new(graph, known, &options.solver).plan_group(methods);
    let diagnostics = outcome.diagnostics.into_vec();
    let failed = diagnostics.iter().any(Diagnostic::is_error);

    let artifact = if failed {
        debug!(
            errors = diagnostics.iter().filter(|d| d.is_error()).count(),
            "group has errors; artifact suppressed"
        );
        None
    } else if outcome.plans.is_empty() {
        None
    } else {
        Some(FileEmitter::new(graph, known, &options.emit).emit(namespace.as_deref(), &outcome.plans))
    };

    GroupResult {
        namespace,
        plans: outcome.plans,
        artifact,
        diagnostics,
    }
}
