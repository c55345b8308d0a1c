use serde::{Deserialize, Serialize};

/// Output settings. Every field has a default so partial config files work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmitOptions {
    /// Spaces per indentation level; `0` indents with tabs.
    pub indent: usize,
    /// Hide bridge targets from editors and debuggers.
    pub hide_targets: bool,
    /// Emit `DynamicDependency` and the trimming suppression on wrappers.
    pub trimming_attributes: bool,
    /// Start each artifact with `#nullable disable`.
    pub nullable_directive: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            hide_targets: true,
            trimming_attributes: true,
            nullable_directive: true,
        }
    }
}
