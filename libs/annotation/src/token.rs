//! Token types for the annotation lexer
//!
//! A token keeps, for every character, how the lexer saw it. Classification
//! into options and params happens after lexing and needs to know whether an
//! `=` or a quote character was written bare, inside quotes, or escaped.

/// How a single character was read by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharKind {
    /// Plain character outside any quoted span
    Bare,
    /// Character inside a quoted span
    Quoted,
    /// Character following a backslash
    Escaped,
    /// A quote character that opened or closed a quoted span
    Quote,
}

/// A character together with its lexical kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenChar {
    pub ch: char,
    pub kind: CharKind,
}

/// A whitespace-delimited token of an annotation line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub chars: Vec<TokenChar>,
    /// Character offset of the first character in the source line
    pub position: usize,
}

impl Token {
    pub fn new(chars: Vec<TokenChar>, position: usize) -> Self {
        Self { chars, position }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Token text with escapes resolved and quote characters kept
    pub fn text(&self) -> String {
        self.chars.iter().map(|c| c.ch).collect()
    }

    /// Index of the first `=` that is neither quoted nor escaped
    pub fn param_separator(&self) -> Option<usize> {
        self.chars
            .iter()
            .position(|c| c.kind == CharKind::Bare && c.ch == '=')
    }

    /// Split a `name=value` token at its first bare `=`
    pub fn split_param(&self) -> Option<(Token, Token)> {
        let idx = self.param_separator()?;
        let name = Token::new(self.chars[..idx].to_vec(), self.position);
        let value = Token::new(self.chars[idx + 1..].to_vec(), self.position + idx + 1);
        Some((name, value))
    }

    /// Token text with one matching pair of surrounding quotes removed
    ///
    /// Only structural quotes count: an escaped quote at either end is part
    /// of the value.
    pub fn unquoted(&self) -> String {
        let chars = &self.chars;
        if chars.len() >= 2 {
            let first = chars[0];
            let last = chars[chars.len() - 1];
            if first.kind == CharKind::Quote && last.kind == CharKind::Quote && first.ch == last.ch
            {
                return chars[1..chars.len() - 1].iter().map(|c| c.ch).collect();
            }
        }
        self.text()
    }
}
