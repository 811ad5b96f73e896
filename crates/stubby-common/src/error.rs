use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A lexer error with location information.
///
/// The lexer keeps going after an error (it emits an `Error` token and
/// continues), so several of these can be reported for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    UnexpectedCharacter(char),
    /// A string literal was not closed before end of input.
    UnterminatedString,
    /// A `/* ... */` comment was not closed before end of input.
    UnterminatedBlockComment,
    /// A backtick-escaped identifier was not closed on its line.
    UnterminatedEscapedIdent,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character: {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            Self::UnterminatedEscapedIdent => write!(f, "unterminated escaped identifier"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}
