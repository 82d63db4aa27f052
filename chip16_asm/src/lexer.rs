//! Source text → token stream (spec §4.4).
//!
//! A char-by-char scanner over a `Peekable<Chars>` recognizing three
//! lexical rules: `#` line comments, alphanumeric/`_` identifiers, and
//! the `,`/`:` singletons.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::AsmError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Comma,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, AsmError> {
    let mut chars: Peekable<Chars> = source.chars().peekable();
    let mut tokens = Vec::new();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    chars.next();
                    if c == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            ',' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    line,
                });
            }
            ':' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Colon,
                    line,
                });
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(ident),
                    line,
                });
            }
            other => {
                return Err(AsmError::SyntaxError {
                    line,
                    message: format!("unexpected character `{other}`"),
                });
            }
        }
    }

    Ok(tokens)
}
