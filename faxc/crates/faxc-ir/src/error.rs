//! IR generator error type.
//!
//! The only failure mode here is an invariant violation: a `break`/
//! `continue` reaching the generator with an empty loop stack. The checker
//! is supposed to reject every such program first (`§4.3` rule 12), so this
//! should be unreachable in practice, but the generator still raises rather
//! than emitting malformed IR (`§4.4`).

use faxc_util::Span;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message} at offset {span_start}", span_start = span.start)]
pub struct IrError {
    pub message: String,
    pub span: Span,
}

pub type IrResult<T> = Result<T, IrError>;

impl IrError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }

    pub fn break_outside_loop(span: Span) -> Self {
        Self::new("internal error: `break` reached the IR generator outside any loop", span)
    }

    pub fn continue_outside_loop(span: Span) -> Self {
        Self::new("internal error: `continue` reached the IR generator outside any loop", span)
    }
}
