//! Parse error types.

use std::fmt;

use stubby_common::error::LexError;
use stubby_common::span::Span;

/// A parse error with location information and optional related span.
///
/// The related span carries context such as "type body opened here" for an
/// unclosed brace.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            related: Some((related_message.into(), related_span)),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.kind.to_string(), err.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
