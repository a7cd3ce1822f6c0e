//! Diagnostic records for naming-convention violations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `file:line:column` source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Source file name.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One reported naming-convention violation.
///
/// Diagnostics are emitted in discovery order; at most one is produced per
/// binding occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Where the binding occurrence was found.
    pub pos: Position,
    /// The offending identifier.
    pub name: String,
    /// Canonical display string of the identifier's type, after stripping
    /// indirection wrappers.
    pub type_display: String,
    /// The matcher's warning.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {}: {}",
            self.pos, self.name, self.type_display, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_display() {
        let pos = Position {
            file: "pkg/file.src".to_string(),
            line: 12,
            column: 3,
        };
        assert_eq!(pos.to_string(), "pkg/file.src:12:3");
    }

    #[test]
    fn diagnostic_display_matches_reference_format() {
        let d = Diagnostic {
            pos: Position {
                file: "m.src".to_string(),
                line: 3,
                column: 5,
            },
            name: "num".to_string(),
            type_display: "int".to_string(),
            message: "rename to n".to_string(),
        };
        assert_eq!(d.to_string(), "m.src:3:5: num int: rename to n");
    }
}
