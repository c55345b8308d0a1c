//! Bridge planning for the bridgegen code generator.
//!
//! This crate decides what gets generated:
//! - The annotation scanner finds marked methods and reads their markers
//! - The simplifier erases types that mention runtime-resolved type parameters
//! - The plan builder validates a method and produces its `BridgePlan`
//!
//! Nothing here writes source text; the emitter consumes the plans.

// Marker attribute names and option names
pub mod options;
pub use options::SolverOptions;

// Annotation scanning
pub mod scanner;
pub use scanner::{BridgeMarks, MethodMark, find_candidates, read_marks};

// Type erasure
pub mod simplify;
pub use simplify::{SimplifyError, Simplifier};

// Plans and the builder that produces them
pub mod plan;
pub use plan::{
    AsyncShape, BridgePlan, ConstraintClause, PartialCandidate, WrapperParam, WrapperSignature,
    target_name,
};
pub mod builder;
pub use builder::{PlanBuilder, PlanOutcome};

#[cfg(test)]
#[path = "tests/test_fixtures.rs"]
pub mod test_fixtures;
