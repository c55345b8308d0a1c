//! Diagnostic message table.
//!
//! Codes are stable: tooling and suppression files refer to them as `BRG###`.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const PREDEFINED_TYPE_NOT_FOUND: u32 = 1;
    pub const MALFORMED_BRIDGE_MARKER: u32 = 2;
    pub const RETURNS_BY_REFERENCE: u32 = 3;
    pub const TARGET_NOT_REFERENCEABLE: u32 = 4;
    pub const MALFORMED_METHOD_MARKER: u32 = 5;
    pub const MALFORMED_METHOD_MARKER_OPTION: u32 = 6;
    pub const REFERENCE_PARAMETER_NEEDS_DISPATCH: u32 = 7;
    pub const UNINFERABLE_TYPE_PARAMETERS: u32 = 8;
    pub const POINTER_NEEDS_DISPATCH: u32 = 9;
    pub const EXPLICIT_INTERFACE_IMPLEMENTATION: u32 = 10;
    pub const UNENFORCED_CONSTRAINT: u32 = 11;
    pub const METHOD_MARKER_WITHOUT_MARKED_PARAMETERS: u32 = 12;
    pub const TYPE_NOT_PARTIAL: u32 = 13;
    pub const AMBIGUOUS_ERASURE: u32 = 14;
    pub const UNRESOLVABLE_ERASURE: u32 = 15;
    pub const AMBIGUOUS_PARTIAL_DEFINITION: u32 = 16;
}

use diagnostic_codes::*;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: PREDEFINED_TYPE_NOT_FOUND,
        category: DiagnosticCategory::Error,
        message: "Predefined type '{0}' could not be found.",
    },
    DiagnosticMessage {
        code: MALFORMED_BRIDGE_MARKER,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' has incorrectly used the {1} attribute on type parameter '{2}'.",
    },
    DiagnosticMessage {
        code: RETURNS_BY_REFERENCE,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' returns by reference, which is not supported for dynamic dispatch.",
    },
    DiagnosticMessage {
        code: TARGET_NOT_REFERENCEABLE,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' could not be referenced: the bridge target name '{1}' is already in use.",
    },
    DiagnosticMessage {
        code: MALFORMED_METHOD_MARKER,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' has incorrectly used the {1} attribute.",
    },
    DiagnosticMessage {
        code: MALFORMED_METHOD_MARKER_OPTION,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' has incorrectly used {1}.{2}.",
    },
    DiagnosticMessage {
        code: REFERENCE_PARAMETER_NEEDS_DISPATCH,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' has a reference parameter '{1}' that requires dynamic dispatch, which is not supported.",
    },
    DiagnosticMessage {
        code: UNINFERABLE_TYPE_PARAMETERS,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' cannot be dynamically bridged because some type parameters could not be resolved at runtime: {1}. The type parameters must appear in the method's parameter list in order to be inferable.",
    },
    DiagnosticMessage {
        code: POINTER_NEEDS_DISPATCH,
        category: DiagnosticCategory::Error,
        message: "Pointer type '{0}' in method '{1}' cannot be used with dynamically bridged type parameters.",
    },
    DiagnosticMessage {
        code: EXPLICIT_INTERFACE_IMPLEMENTATION,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' is an explicit interface implementation, which is not supported as a dynamic bridge method.",
    },
    DiagnosticMessage {
        code: UNENFORCED_CONSTRAINT,
        category: DiagnosticCategory::Warning,
        message: "Method '{0}' has a dynamically bridged type parameter '{1}' with the '{2}' constraint. Language-specific constraints are not enforced by the runtime binder and are dropped.",
    },
    DiagnosticMessage {
        code: METHOD_MARKER_WITHOUT_MARKED_PARAMETERS,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' has the {1} attribute, but none of its type parameters are annotated with the {2} attribute.",
    },
    DiagnosticMessage {
        code: TYPE_NOT_PARTIAL,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' must be declared as partial to add dynamic bridge methods.",
    },
    DiagnosticMessage {
        code: AMBIGUOUS_ERASURE,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' in method '{1}' has no single erasure: candidates are {2}. Specify the erasure type explicitly on the type parameter.",
    },
    DiagnosticMessage {
        code: UNRESOLVABLE_ERASURE,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' in method '{1}' cannot be erased to a type that does not depend on dynamically bridged type parameters.",
    },
    DiagnosticMessage {
        code: AMBIGUOUS_PARTIAL_DEFINITION,
        category: DiagnosticCategory::Error,
        message: "Method '{0}' matches more than one partial definition named '{1}': {2}.",
    },
];
