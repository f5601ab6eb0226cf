//! Severity-tagged diagnostics collected during a decode pass

use std::fmt;

use mosaic_annotation::Position;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// One warning or failure, optionally tied to an annotation key and position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Diagnostic {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Failure,
            message: message.into(),
            key: None,
            position: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            key: None,
            position: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(pos) if pos.is_valid() => write!(f, "{}: {}", pos, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Ordered aggregate of diagnostics; entries are never merged or dropped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(other);
    }

    pub fn failures(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Failure)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Split into `(failures, warnings)`, each keeping encounter order
    pub fn partition(&self) -> (Vec<&Diagnostic>, Vec<&Diagnostic>) {
        self.items.iter().partition(|d| d.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.items.iter().any(Diagnostic::is_failure)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Grouped rendering: failures first, then warnings, one bullet each
    ///
    /// Empty groups are omitted; an empty aggregate renders as "".
    pub fn summary(&self) -> String {
        let (failures, warnings) = self.partition();
        let mut sections = Vec::new();
        if !failures.is_empty() {
            sections.push(render_group(&failures, "error", "errors"));
        }
        if !warnings.is_empty() {
            sections.push(render_group(&warnings, "warning", "warnings"));
        }
        sections.join("\n\n")
    }
}

fn render_group(items: &[&Diagnostic], singular: &str, plural: &str) -> String {
    let noun = if items.len() == 1 { singular } else { plural };
    let mut out = format!("{} {}:", items.len(), noun);
    for d in items {
        out.push_str(&format!("\n\t* {d}"));
    }
    out
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Diagnostics {
        let mut d = Diagnostics::new();
        d.push(Diagnostic::failure("http-method: required").with_position(Position::new(
            "svc.go", 4, 2,
        )));
        d.push(Diagnostic::warning("http-unused: not used"));
        d.push(Diagnostic::failure("second"));
        d
    }

    #[test]
    fn test_partition_keeps_order() {
        let d = sample();
        let (failures, warnings) = d.partition();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[1].message, "second");
        assert_eq!(warnings.len(), 1);
        assert!(d.has_failures());
        assert_eq!(d.failure_count(), 2);
        assert_eq!(d.warning_count(), 1);
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(
            summary,
            "2 errors:\n\t* svc.go:4:2: http-method: required\n\t* second\n\n1 warning:\n\t* http-unused: not used"
        );
        assert_eq!(Diagnostics::new().summary(), "");
    }

    #[test]
    fn test_display_skips_unknown_position() {
        let d = Diagnostic::warning("msg").with_position(Position::unknown());
        assert_eq!(d.to_string(), "msg");
    }

    #[test]
    fn test_warnings_alone_are_not_failures() {
        let d: Diagnostics = vec![Diagnostic::warning("a"), Diagnostic::warning("b")]
            .into_iter()
            .collect();
        assert!(!d.has_failures());
        assert_eq!(d.len(), 2);
    }
}
