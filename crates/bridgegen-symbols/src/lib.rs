//! Symbol graph of the host program for the bridgegen code generator.
//!
//! This crate provides:
//! - Symbol and type representations (`TypeDef`, `MethodDef`, `TypeData`, ...)
//! - The concurrent type interner shared by generation workers
//! - Hierarchy queries (base chains, implemented interfaces, substitution)
//! - Graph documents and the loader that binds them into a `SymbolGraph`
//! - Well-known type lookup and diagnostic display names

// Symbol and type data
pub mod types;
pub use types::*;

// Type interning
pub mod intern;
pub use intern::TypeInterner;

// The graph and its hierarchy queries
pub mod graph;
pub use graph::{Substitution, SymbolGraph};

// Diagnostic display names
mod display;

// Serialized graph documents and loading
pub mod document;
pub use document::GraphDocument;
pub mod loader;
pub use loader::{LoadError, load_documents, load_json};
pub mod type_syntax;

// Types referred to by name
pub mod well_known;
pub use well_known::WellKnownTypes;
