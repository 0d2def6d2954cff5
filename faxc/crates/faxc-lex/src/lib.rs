//! faxc-lex - Incremental, backtrackable lexer.
//!
//! Produces tokens on demand from a `&str` source. The parser drives
//! [`Lexer`] via `peek`/`next`, and rewinds speculative parses with
//! `mark`/`reset`. See the crate-level docs on [`Lexer`] for the token
//! scanning algorithm.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{Lexer, LexerState};
pub use token::{DelimKind, Keyword, OpKind, SepKind, Token, TokenKind};
