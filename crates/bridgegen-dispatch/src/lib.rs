//! Native late-binding model for bridgegen bridges.
//!
//! Generated bridges rely on the host runtime's binder; this crate models
//! that binder so bridge plans can be executed and checked without a host:
//! - `Value` - runtime values as seen by binding
//! - `LateBinder` - type-argument inference from runtime argument types
//! - `BridgeCall` - a bridge call with explicit failure origins

pub mod value;
pub use value::Value;

// Type-argument inference
pub mod binder;
pub use binder::{BindFailure, Instantiation, LateBinder};

// Bridge calls and failure classification
pub mod call;
pub use call::{BridgeCall, BridgeError, Origin};

#[cfg(test)]
#[path = "tests/test_fixtures.rs"]
pub mod test_fixtures;
