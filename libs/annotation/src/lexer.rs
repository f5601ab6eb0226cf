//! Annotation lexer - splits an annotation line into tokens
//!
//! Whitespace separates tokens, except inside a quoted span opened by `"` or
//! `'` and closed by the same character. A backslash makes the following
//! character literal: it neither delimits, nor opens or closes a quote.
//! An unterminated quote keeps the rest of the line in one token.

use crate::token::{CharKind, Token, TokenChar};

/// The annotation lexer
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    current_char: Option<char>,
    /// Quote character of the span being read, if any
    quote: Option<char>,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            chars,
            position: 0,
            current_char,
            quote: None,
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Skip whitespace characters between tokens
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();
        self.current_char?;

        let start = self.position;
        let mut chars = Vec::new();

        while let Some(c) = self.current_char {
            if c == '\\' {
                self.advance();
                if let Some(escaped) = self.current_char {
                    chars.push(TokenChar {
                        ch: escaped,
                        kind: CharKind::Escaped,
                    });
                    self.advance();
                }
                continue;
            }

            match self.quote {
                Some(open) if c == open => {
                    self.quote = None;
                    chars.push(TokenChar {
                        ch: c,
                        kind: CharKind::Quote,
                    });
                }
                Some(_) => chars.push(TokenChar {
                    ch: c,
                    kind: CharKind::Quoted,
                }),
                None if c == '"' || c == '\'' => {
                    self.quote = Some(c);
                    chars.push(TokenChar {
                        ch: c,
                        kind: CharKind::Quote,
                    });
                }
                None if c.is_whitespace() => break,
                None => chars.push(TokenChar {
                    ch: c,
                    kind: CharKind::Bare,
                }),
            }
            self.advance();
        }

        Some(Token::new(chars, start))
    }

    /// Tokenize the whole input
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            // A lone trailing backslash yields an empty token
            if !token.is_empty() {
                tokens.push(token);
            }
        }
        tokens
    }
}
