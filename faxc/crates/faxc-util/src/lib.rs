//! faxc-util - Core Utilities and Foundation Types
//!
//! This crate provides the fundamental utilities shared across the faxc
//! compiler crates: interned identifiers ([`Symbol`]), source location
//! tracking ([`Span`], [`SourceMap`]), and diagnostic reporting
//! ([`Handler`], [`Diagnostic`]).
//!
//! None of these types are specific to any one compiler stage; the lexer,
//! parser, checker and IR generator all build on top of this crate.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level, SourceSnippet};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{Symbol, KEYWORDS};

// Re-export the known-keyword constants at crate root so callers can write
// `faxc_util::KW_FN` rather than reaching into the `symbol` module.
pub use symbol::{
    KW_BREAK, KW_CONTINUE, KW_ELSE, KW_FN, KW_FOR, KW_I32, KW_IF, KW_IN, KW_LET, KW_LOOP, KW_MUT,
    KW_RETURN, KW_WHILE,
};

pub use rustc_hash::{FxHashMap, FxHashSet};
