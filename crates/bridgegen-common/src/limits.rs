//! Centralized limits and thresholds for the generator.
//!
//! The symbol graph comes from outside and is not guaranteed to be acyclic
//! (constraint cycles such as `T : U, U : T` are legal in the host language),
//! so every recursive walk over it is bounded by one of these values.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when checking whether a type mentions a marked type
/// parameter or when erasing it.
///
/// Real generic types rarely nest more than a handful of levels; hitting this
/// limit means the graph is malformed and the type is reported as unresolvable.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 64;

/// Maximum number of base types followed when walking a class hierarchy.
///
/// Protects against cyclic `base` links in hand-written symbol documents.
pub const MAX_BASE_CHAIN_LENGTH: usize = 256;

/// Maximum nesting depth accepted by the type syntax parser.
pub const MAX_TYPE_SYNTAX_DEPTH: u32 = 128;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the text buffer of one generated artifact.
pub const ARTIFACT_INITIAL_CAPACITY: usize = 4 * 1024;
