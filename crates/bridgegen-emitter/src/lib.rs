//! C# emission for the bridgegen code generator.
//!
//! This crate turns `BridgePlan`s into source text:
//! - `SourceWriter` - indented text output
//! - `TypePrinter` - fully qualified C# type syntax and literals
//! - Documentation ids for `DynamicDependency`
//! - `BridgeEmitter` - the target and wrapper declarations of one plan
//! - `FileEmitter` - one artifact per namespace with re-declared partial types

pub mod options;
pub use options::EmitOptions;

// SourceWriter - indented output buffer
pub mod source_writer;
pub use source_writer::SourceWriter;

// C# type syntax
pub mod type_printer;
pub use type_printer::TypePrinter;

// Documentation comment ids
pub mod doc_id;

// Declarations for one plan
pub mod bridge_emitter;
pub use bridge_emitter::{BINDER_FAILURE_MARKER, BridgeEmitter};

// Whole artifacts
pub mod file_emitter;
pub use file_emitter::{Artifact, FileEmitter, artifact_file_name};
