//! Common types and utilities for the bridgegen code generator.
//!
//! This crate provides foundational types used across all bridgegen crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, `DiagnosticBag`)
//! - The diagnostic message table and `{0}`-style message formatting
//! - Source locations attached to symbols
//! - Generator limits and thresholds

// Diagnostics - codes, templates, and collected reports
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticMessage, diagnostic_codes,
    format_message, get_diagnostic_message,
};

// Source locations for symbols handed in by the symbol model
pub mod location;
pub use location::SourceLocation;

// Centralized limits and thresholds
pub mod limits;
