//! Types the generator refers to by name.

use crate::graph::SymbolGraph;
use crate::types::{DefId, DefKind, TypeId};
use bridgegen_common::{Diagnostic, diagnostic_codes};

pub const ARGUMENT_EXCEPTION: &str = "System.ArgumentException";
pub const RUNTIME_BINDER_EXCEPTION: &str = "Microsoft.CSharp.RuntimeBinder.RuntimeBinderException";
pub const TASK: &str = "System.Threading.Tasks.Task";
pub const VALUE_TASK: &str = "System.Threading.Tasks.ValueTask";
pub const GENERIC_TASK: &str = "System.Threading.Tasks.Task`1";
pub const GENERIC_VALUE_TASK: &str = "System.Threading.Tasks.ValueTask`1";
pub const EDITOR_BROWSABLE_ATTRIBUTE: &str = "System.ComponentModel.EditorBrowsableAttribute";
pub const EDITOR_BROWSABLE_STATE: &str = "System.ComponentModel.EditorBrowsableState";
pub const DEBUGGER_NON_USER_CODE_ATTRIBUTE: &str = "System.Diagnostics.DebuggerNonUserCodeAttribute";

/// Resolved well-known types.
///
/// The required ones must exist for generation to run at all; the optional
/// ones only enable extra output (async wrappers, hiding attributes).
#[derive(Clone, Debug)]
pub struct WellKnownTypes {
    pub object: TypeId,
    pub value_type: TypeId,
    pub array: TypeId,
    pub string: TypeId,
    pub boolean: TypeId,
    pub argument_exception: TypeId,
    pub binder_exception: TypeId,
    pub task: Option<TypeId>,
    pub value_task: Option<TypeId>,
    pub generic_task: Option<DefId>,
    pub generic_value_task: Option<DefId>,
    pub editor_browsable_attribute: Option<TypeId>,
    /// Only set when the enum declares a `Never` member.
    pub editor_browsable_state: Option<TypeId>,
    pub debugger_non_user_code_attribute: Option<TypeId>,
}

impl WellKnownTypes {
    /// Look up every well-known type. A missing required type is reported as
    /// the diagnostic that aborts the generation pass.
    pub fn resolve(graph: &SymbolGraph) -> Result<Self, Diagnostic> {
        let required = |name: &str| -> Result<TypeId, Diagnostic> {
            graph
                .def_by_metadata_name(name)
                .map(|def| graph.named(def, &[]))
                .ok_or_else(|| {
                    Diagnostic::new(diagnostic_codes::PREDEFINED_TYPE_NOT_FOUND, &[name], None)
                })
        };
        let optional = |name: &str| -> Option<TypeId> {
            graph
                .def_by_metadata_name(name)
                .map(|def| graph.named(def, &[]))
        };

        let editor_browsable_state = graph
            .def_by_metadata_name(EDITOR_BROWSABLE_STATE)
            .filter(|&def| {
                let decl = graph.def(def);
                decl.kind == DefKind::Enum && decl.member_names.iter().any(|m| m == "Never")
            })
            .map(|def| graph.named(def, &[]));

        Ok(Self {
            object: required("System.Object")?,
            value_type: required("System.ValueType")?,
            array: required("System.Array")?,
            string: required("System.String")?,
            boolean: required("System.Boolean")?,
            argument_exception: required(ARGUMENT_EXCEPTION)?,
            binder_exception: required(RUNTIME_BINDER_EXCEPTION)?,
            task: optional(TASK),
            value_task: optional(VALUE_TASK),
            generic_task: graph.def_by_metadata_name(GENERIC_TASK),
            generic_value_task: graph.def_by_metadata_name(GENERIC_VALUE_TASK),
            editor_browsable_attribute: optional(EDITOR_BROWSABLE_ATTRIBUTE),
            editor_browsable_state,
            debugger_non_user_code_attribute: optional(DEBUGGER_NON_USER_CODE_ATTRIBUTE),
        })
    }

    /// Whether `ty` is the non-generic `Task` or `ValueTask`.
    #[must_use]
    pub fn is_plain_awaitable(&self, ty: TypeId) -> bool {
        Some(ty) == self.task || Some(ty) == self.value_task
    }

    /// Whether `def` is `Task<T>` or `ValueTask<T>`.
    #[must_use]
    pub fn is_generic_awaitable(&self, def: DefId) -> bool {
        Some(def) == self.generic_task || Some(def) == self.generic_value_task
    }
}
