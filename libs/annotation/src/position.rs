//! Source positions attached to annotations

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in a source file
///
/// A position is valid when its line is known (non-zero). Column zero means
/// the column is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A position nothing is known about
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

/// Renders `file:line:column`, dropping unknown parts; `-` when nothing is known
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.file.clone();
        if self.is_valid() {
            if !s.is_empty() {
                s.push(':');
            }
            s.push_str(&self.line.to_string());
            if self.column != 0 {
                s.push_str(&format!(":{}", self.column));
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        f.write_str(&s)
    }
}
