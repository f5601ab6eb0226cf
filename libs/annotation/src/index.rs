//! Per-declaration annotation index
//!
//! An index is built once from the annotation lines of one declaration and
//! is read-only afterwards, so it can be shared by any number of decode
//! passes, including concurrent ones.

use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::annotation::Annotation;
use crate::error::Error;
use crate::position::Position;

/// An annotation together with where it was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedAnnotation {
    #[serde(flatten)]
    pub annotation: Annotation,
    #[serde(default)]
    pub position: Position,
}

impl PositionedAnnotation {
    pub fn new(annotation: Annotation, position: Position) -> Self {
        Self {
            annotation,
            position,
        }
    }
}

impl Deref for PositionedAnnotation {
    type Target = Annotation;

    fn deref(&self) -> &Annotation {
        &self.annotation
    }
}

/// A line that could not be tokenized and was left out of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub text: String,
    pub position: Position,
    pub error: Error,
}

/// Ordered annotations of one declaration, queryable by key
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    entries: Vec<PositionedAnnotation>,
    by_key: HashMap<String, Vec<usize>>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize annotation lines into an index
    ///
    /// Lines that fail the grammar are excluded from the index and returned
    /// separately, in input order.
    pub fn from_lines<I, S>(lines: I) -> (Self, Vec<RejectedLine>)
    where
        I: IntoIterator<Item = (S, Position)>,
        S: AsRef<str>,
    {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for (text, position) in lines {
            let text = text.as_ref();
            match Annotation::parse(text) {
                Ok(annotation) => accepted.push(PositionedAnnotation::new(annotation, position)),
                Err(error) => {
                    tracing::warn!(%position, %error, "skipping malformed annotation line");
                    rejected.push(RejectedLine {
                        text: text.to_string(),
                        position,
                        error,
                    });
                }
            }
        }

        (accepted.into_iter().collect(), rejected)
    }

    /// First annotation with the given key
    pub fn get(&self, key: &str) -> Option<&PositionedAnnotation> {
        self.by_key
            .get(key)
            .and_then(|idx| idx.first())
            .map(|&i| &self.entries[i])
    }

    /// Every annotation with the given key, in encounter order
    pub fn get_all(&self, key: &str) -> Vec<&PositionedAnnotation> {
        self.by_key
            .get(key)
            .map(|idx| idx.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Annotations whose key is `prefix` itself or lies under `prefix-`
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a PositionedAnnotation> + 'a {
        self.entries.iter().filter(move |a| {
            a.key == prefix
                || (a.key.len() > prefix.len()
                    && a.key.starts_with(prefix)
                    && a.key[prefix.len()..].starts_with('-'))
        })
    }

    /// Distinct keys in first-encounter order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(self.by_key.len());
        for entry in &self.entries {
            if !keys.contains(&entry.key.as_str()) {
                keys.push(&entry.key);
            }
        }
        keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PositionedAnnotation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PositionedAnnotation> for AnnotationIndex {
    fn from_iter<I: IntoIterator<Item = PositionedAnnotation>>(iter: I) -> Self {
        let entries: Vec<PositionedAnnotation> = iter.into_iter().collect();
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_key.entry(entry.key.clone()).or_default().push(i);
        }
        Self { entries, by_key }
    }
}

impl<'a> IntoIterator for &'a AnnotationIndex {
    type Item = &'a PositionedAnnotation;
    type IntoIter = std::slice::Iter<'a, PositionedAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
