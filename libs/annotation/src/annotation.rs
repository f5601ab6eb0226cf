//! Structured annotations parsed from `@key option name=value` lines

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexer::Lexer;

/// Marker character that starts every annotation
pub const MARKER: char = '@';

/// One directive extracted from an annotation comment line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Key without the leading marker, e.g. `http-path`
    pub key: String,
    /// Positional values in the order they were written
    #[serde(default)]
    pub options: Vec<String>,
    /// Named `name=value` pairs; a repeated name keeps the last value
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Annotation {
    /// Parse a raw annotation line
    ///
    /// ```
    /// use mosaic_annotation::Annotation;
    ///
    /// let a = Annotation::parse(r#"@http-path "/user/{id}" method=GET"#).unwrap();
    /// assert_eq!(a.key, "http-path");
    /// assert_eq!(a.value(), "/user/{id}");
    /// assert_eq!(a.param("method"), Some("GET"));
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Empty);
        }
        if !trimmed.starts_with(MARKER) {
            return Err(Error::MissingMarker(trimmed.to_string()));
        }

        let mut tokens = Lexer::new(trimmed).tokenize().into_iter();
        let head = tokens.next().ok_or(Error::Empty)?;
        let key: String = head.chars.iter().skip(1).map(|c| c.ch).collect();

        let mut annotation = Annotation {
            key,
            ..Default::default()
        };

        for token in tokens {
            match token.split_param() {
                Some((name, value)) => {
                    let name = name.unquoted().trim().to_string();
                    annotation.params.insert(name, value.unquoted());
                }
                None => annotation.options.push(token.unquoted()),
            }
        }

        Ok(annotation)
    }

    /// The first option, or an empty string
    pub fn value(&self) -> &str {
        self.options.first().map(String::as_str).unwrap_or("")
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Parse a raw annotation line
pub fn parse(raw: &str) -> Result<Annotation> {
    Annotation::parse(raw)
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", MARKER, self.key)?;
        for option in &self.options {
            write!(f, " {}", render_token(option))?;
        }
        for (name, value) in &self.params {
            write!(f, " {}={}", render_token(name), render_token(value))?;
        }
        Ok(())
    }
}

/// Render a value so that parsing it back yields the same text
fn render_token(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '=' || c == '"' || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
