//! Driver-level error type.
//!
//! Wraps whichever stage failed, so `faxc-drv` can report a single
//! human-readable message and categorize it as "syntax" (lexer/parser/
//! checker) or "other" (`§6`, `§7`) without every stage needing to agree on
//! a shared enum. The library crates (`faxc-lex` through `faxc-gen`) keep
//! their own `thiserror`-derived types; only the driver binary depends on
//! `anyhow`, at its own CLI boundary (`§10.2`).

use faxc_util::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] faxc_par::ParseError),

    #[error(transparent)]
    Check(#[from] faxc_sem::CheckError),

    #[error(transparent)]
    Ir(#[from] faxc_ir::IrError),

    #[error(transparent)]
    Gen(#[from] faxc_gen::GenError),
}

/// The external, message-only error surface (`§6`): every stage collapses
/// to one of these two buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Other,
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::Parse(_) | CompileError::Check(_) => ErrorCategory::Syntax,
            CompileError::Ir(_) | CompileError::Gen(_) => ErrorCategory::Other,
        }
    }

    /// The source position of the failure, where one is known.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Parse(e) => Some(e.span),
            CompileError::Check(e) => Some(e.span),
            CompileError::Ir(e) => Some(e.span),
            CompileError::Gen(_) => None,
        }
    }
}
