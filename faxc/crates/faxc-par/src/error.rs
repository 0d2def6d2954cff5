//! Parser error type.

use faxc_util::Span;
use thiserror::Error;

/// A syntactic error, raised when the parser hits a token shape the
/// grammar does not accept at that point.
///
/// Backtracked attempts (statement-vs-tail-expression,
/// assignment-vs-expression) construct and discard these internally; only
/// the error from the *committed* parse path is ever surfaced to a caller.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message} at offset {span_start}", span_start = span.start)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Builds the standard "expected X, found Y" message the spec's
    /// error-reporting section requires (expected set + actual tag/value).
    pub fn unexpected(expected: &str, found_tag: &str, found_text: &str, span: Span) -> Self {
        Self::new(
            format!("expected {expected}, found {found_tag} `{found_text}`"),
            span,
        )
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
