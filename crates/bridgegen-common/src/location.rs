use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a declaration in the host program's sources.
///
/// Lines and columns are 1-based, matching what the host compiler reports.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default = "first")]
    pub line: u32,
    #[serde(default = "first")]
    pub column: u32,
}

const fn first() -> u32 {
    1
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.file, self.line, self.column)
    }
}
