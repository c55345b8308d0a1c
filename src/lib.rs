//! bridgegen: late-bound bridges for C# generic methods.
//!
//! A generic method whose type parameters are marked for runtime resolution
//! gets a non-generic wrapper that accepts the erased argument types and
//! re-dispatches through the language's dynamic binder to a private target
//! that forwards to the original. This crate ties the pieces together:
//!
//! - [`bridgegen_symbols`]: the symbol graph handed in by the host
//! - [`bridgegen_solver`]: marker scanning, erasure and bridge planning
//! - [`bridgegen_emitter`]: C# source for the planned bridges
//! - [`bridgegen_dispatch`]: the runtime semantics the generated code relies on
//! - [`pipeline`]: one generation pass, grouped by namespace
//! - `cli`: the `bridgegen` binary's argument, config and output handling

pub use bridgegen_common as common;
pub use bridgegen_dispatch as dispatch;
pub use bridgegen_emitter as emitter;
pub use bridgegen_solver as solver;
pub use bridgegen_symbols as symbols;

pub use bridgegen_common::{Diagnostic, DiagnosticCategory};

// Generation pass
pub mod pipeline;
pub use pipeline::{GenerationResult, GeneratorOptions, GroupResult, generate, generate_documents};

// Tracing subscriber setup for the binary
pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;
