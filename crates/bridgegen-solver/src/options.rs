//! Names of the marker attributes the generator looks for.

pub const DEFAULT_MARKER_ATTRIBUTE: &str = "Bridgegen.DynamicBridgeAttribute";
pub const DEFAULT_METHOD_MARKER_ATTRIBUTE: &str = "Bridgegen.DynamicBridgeMethodAttribute";

/// Named option of the method marker overriding the wrapper's modifiers.
pub const MODIFIERS_OPTION: &str = "Modifiers";
/// Named option of the method marker suppressing binding failures.
pub const IGNORE_UNBOUND_OPTION: &str = "IgnoreUnbound";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOptions {
    /// Metadata name of the type-parameter marker.
    pub marker_attribute: String,
    /// Metadata name of the method marker.
    pub method_marker_attribute: String,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            method_marker_attribute: DEFAULT_METHOD_MARKER_ATTRIBUTE.to_string(),
        }
    }
}

impl SolverOptions {
    /// Attribute name as written in source: `DynamicBridge` for
    /// `Bridgegen.DynamicBridgeAttribute`.
    #[must_use]
    pub fn short_name(metadata_name: &str) -> &str {
        let simple = metadata_name
            .rsplit(['.', '+'])
            .next()
            .unwrap_or(metadata_name);
        simple.strip_suffix("Attribute").unwrap_or(simple)
    }
}
