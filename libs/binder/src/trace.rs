//! Field path to source annotation map built during a decode pass

use std::collections::BTreeMap;

use mosaic_annotation::{Annotation, Position};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub annotation: Annotation,
    pub position: Position,
}

/// Dotted field paths (`Schema.field.sub[1].name`) of every field bound from
/// an annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldTrace {
    entries: BTreeMap<String, TraceEntry>,
}

impl FieldTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<String>, annotation: &Annotation, position: &Position) {
        self.entries.insert(
            path.into(),
            TraceEntry {
                annotation: annotation.clone(),
                position: position.clone(),
            },
        );
    }

    pub fn get(&self, path: &str) -> Option<&TraceEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraceEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another trace, prefixing its paths with `prefix.`
    pub fn merge_under(&mut self, prefix: &str, other: FieldTrace) {
        for (path, entry) in other.entries {
            self.entries.insert(format!("{prefix}.{path}"), entry);
        }
    }
}
