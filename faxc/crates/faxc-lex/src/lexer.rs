//! Pull-driven lexer with lookahead and speculative backtracking.
//!
//! The parser drives this lexer on demand: `peek(k)` inspects upcoming
//! tokens without consuming them, `next()` consumes one, and `mark()` /
//! `reset()` let the parser try a construct and rewind if it turns out to
//! be the wrong one (the statement-vs-tail-expression and
//! assignment-vs-expression ambiguities in `faxc-par`).

use std::collections::VecDeque;

use faxc_util::span::FileId;
use faxc_util::symbol::Symbol;
use faxc_util::Span;

use crate::cursor::Cursor;
use crate::token::{DelimKind, Keyword, OpKind, SepKind, Token, TokenKind};

/// An opaque snapshot of lexer state, produced by [`Lexer::mark`] and
/// consumed by [`Lexer::reset`].
///
/// Holds exactly the state the spec requires a rewind to restore: the
/// cursor position (and its line/column), the buffered lookahead, how many
/// tokens had been emitted, and whether EOF had already been observed.
pub struct LexerState {
    cursor_pos: usize,
    cursor_line: u32,
    cursor_column: u32,
    lookahead: VecDeque<Token>,
    emitted_len: usize,
    eof_observed: bool,
}

/// The lexer itself.
///
/// Tokens are produced lazily: `scan_token` is only called when the
/// lookahead buffer does not already hold the requested token.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file_id: FileId,
    lookahead: VecDeque<Token>,
    emitted: Vec<Token>,
    eof_observed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file_id: FileId) -> Self {
        Self {
            cursor: Cursor::new(source),
            file_id,
            lookahead: VecDeque::new(),
            emitted: Vec::new(),
            eof_observed: false,
        }
    }

    /// Returns the `k`-th upcoming token without consuming it (`k = 0` is
    /// the next token `next()` would return).
    pub fn peek(&mut self, k: usize) -> &Token {
        while self.lookahead.len() <= k {
            let tok = self.scan_token();
            self.lookahead.push_back(tok);
        }
        &self.lookahead[k]
    }

    /// Consumes and returns the next token, recording it in `emitted()`.
    pub fn next(&mut self) -> Token {
        let tok = match self.lookahead.pop_front() {
            Some(tok) => tok,
            None => self.scan_token(),
        };
        self.emitted.push(tok.clone());
        tok
    }

    /// Snapshots the current state for a later [`Lexer::reset`].
    pub fn mark(&self) -> LexerState {
        LexerState {
            cursor_pos: self.cursor.position(),
            cursor_line: self.cursor.line(),
            cursor_column: self.cursor.column(),
            lookahead: self.lookahead.clone(),
            emitted_len: self.emitted.len(),
            eof_observed: self.eof_observed,
        }
    }

    /// Restores a snapshot taken by [`Lexer::mark`]. Any tokens consumed
    /// since the mark (and recorded in `emitted()`) are discarded; no
    /// source text is re-scanned, since the lookahead buffer at mark time
    /// is restored verbatim.
    pub fn reset(&mut self, state: LexerState) {
        self.cursor = self.cursor.rewound_to(state.cursor_pos, state.cursor_line, state.cursor_column);
        self.lookahead = state.lookahead;
        self.emitted.truncate(state.emitted_len);
        self.eof_observed = state.eof_observed;
    }

    /// Consumes every remaining token through (and including) `EOF`.
    pub fn drain(&mut self) -> &[Token] {
        loop {
            let tok = self.next();
            if tok.is_eof() {
                break;
            }
        }
        &self.emitted
    }

    /// All tokens consumed so far, in order.
    pub fn emitted(&self) -> &[Token] {
        &self.emitted
    }

    fn make_span(&self, start: usize, start_line: u32, start_col: u32) -> Span {
        Span::with_file(start, self.cursor.position(), self.file_id, start_line, start_col)
    }

    /// Scans one token starting at the cursor's current position, skipping
    /// any whitespace and comments first. Never fails: an unrecognized
    /// character synthesizes a permanent EOF instead of raising.
    fn scan_token(&mut self) -> Token {
        if self.eof_observed {
            return self.eof_token();
        }

        loop {
            self.skip_whitespace();
            if self.skip_comment() {
                continue;
            }
            break;
        }

        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_col = self.cursor.column();

        if self.cursor.is_at_end() {
            self.eof_observed = true;
            return Token::new(TokenKind::Eof, self.make_span(start, start_line, start_col));
        }

        let c = self.cursor.current_char();

        // ANDMUT before AND: "&mut" only counts as one token when the
        // literal characters are adjacent (no whitespace between them).
        if c == '&' && self.cursor.remaining().starts_with("&mut") {
            let next_char = self.cursor.peek_char(4);
            if !next_char.is_alphanumeric() && next_char != '_' {
                self.cursor.advance_n(4);
                return Token::new(TokenKind::AndMut, self.make_span(start, start_line, start_col));
            }
        }

        if c == '&' {
            self.cursor.advance();
            return Token::new(TokenKind::And, self.make_span(start, start_line, start_col));
        }

        if c == '-' && self.cursor.peek_char(1) == '>' {
            self.cursor.advance_n(2);
            return Token::new(TokenKind::Arrow, self.make_span(start, start_line, start_col));
        }

        if c == '.' && self.cursor.peek_char(1) == '.' {
            self.cursor.advance_n(2);
            return Token::new(TokenKind::DotDot, self.make_span(start, start_line, start_col));
        }

        if c == '.' {
            self.cursor.advance();
            return Token::new(TokenKind::Dot, self.make_span(start, start_line, start_col));
        }

        if c.is_ascii_digit() {
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(start);
            let sym = Symbol::intern(text);
            return Token::new(TokenKind::Number(sym), self.make_span(start, start_line, start_col));
        }

        if c.is_alphabetic() || c == '_' {
            while {
                let ch = self.cursor.current_char();
                ch.is_alphanumeric() || ch == '_'
            } {
                self.cursor.advance();
            }
            let text = self.cursor.slice_from(start);
            let sym = Symbol::intern(text);
            let kind = if sym.is_known() {
                match Keyword::from_symbol(sym) {
                    Some(kw) => TokenKind::Keyword(kw),
                    None => TokenKind::Ident(sym),
                }
            } else {
                TokenKind::Ident(sym)
            };
            return Token::new(kind, self.make_span(start, start_line, start_col));
        }

        if let Some(op) = self.match_operator() {
            return Token::new(TokenKind::Op(op), self.make_span(start, start_line, start_col));
        }

        if c == '=' {
            self.cursor.advance();
            return Token::new(TokenKind::Assign, self.make_span(start, start_line, start_col));
        }

        if let Some(delim) = delim_of(c) {
            self.cursor.advance();
            return Token::new(TokenKind::Delim(delim), self.make_span(start, start_line, start_col));
        }

        if let Some(sep) = sep_of(c) {
            self.cursor.advance();
            return Token::new(TokenKind::Sep(sep), self.make_span(start, start_line, start_col));
        }

        // Nothing matched: synthesize a permanent EOF rather than raising.
        self.eof_observed = true;
        Token::new(TokenKind::Eof, self.make_span(start, start_line, start_col))
    }

    /// Longest-match among the comparison/arithmetic operator spellings,
    /// two-character spellings tried before their one-character prefixes.
    fn match_operator(&mut self) -> Option<OpKind> {
        let c0 = self.cursor.current_char();
        let c1 = self.cursor.peek_char(1);
        let op = match (c0, c1) {
            ('=', '=') => Some((OpKind::EqEq, 2)),
            ('!', '=') => Some((OpKind::Ne, 2)),
            ('<', '=') => Some((OpKind::Le, 2)),
            ('>', '=') => Some((OpKind::Ge, 2)),
            ('<', _) => Some((OpKind::Lt, 1)),
            ('>', _) => Some((OpKind::Gt, 1)),
            ('+', _) => Some((OpKind::Plus, 1)),
            ('-', _) => Some((OpKind::Minus, 1)),
            ('*', _) => Some((OpKind::Star, 1)),
            ('/', _) => Some((OpKind::Slash, 1)),
            _ => None,
        };
        if let Some((kind, len)) = op {
            self.cursor.advance_n(len);
            Some(kind)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.skip_whitespace();
    }

    /// Skips one `//...` line comment or one `/* ... */` block comment
    /// (non-nested) if present. Returns whether a comment was skipped, so
    /// the caller can loop (whitespace/comments may alternate).
    fn skip_comment(&mut self) -> bool {
        if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '/' {
            while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                self.cursor.advance();
            }
            return true;
        }
        if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
            self.cursor.advance_n(2);
            while !self.cursor.is_at_end()
                && !(self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/')
            {
                self.cursor.advance();
            }
            if !self.cursor.is_at_end() {
                self.cursor.advance_n(2);
            }
            return true;
        }
        false
    }

    fn eof_token(&self) -> Token {
        let pos = self.cursor.position();
        Token::new(
            TokenKind::Eof,
            Span::with_file(pos, pos, self.file_id, self.cursor.line(), self.cursor.column()),
        )
    }
}

fn delim_of(c: char) -> Option<DelimKind> {
    match c {
        '(' => Some(DelimKind::LParen),
        ')' => Some(DelimKind::RParen),
        '{' => Some(DelimKind::LBrace),
        '}' => Some(DelimKind::RBrace),
        '[' => Some(DelimKind::LBracket),
        ']' => Some(DelimKind::RBracket),
        _ => None,
    }
}

fn sep_of(c: char) -> Option<SepKind> {
    match c {
        ';' => Some(SepKind::Semi),
        ':' => Some(SepKind::Colon),
        ',' => Some(SepKind::Comma),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lex = Lexer::new(src, FileId(0));
        lex.drain();
        lex.emitted().iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn lexes_identity_function() {
        let ks = kinds("fn main() -> i32 { let x: i32 = 1; return x; }");
        assert_eq!(ks.first(), Some(&TokenKind::Keyword(Keyword::Fn)));
        assert_eq!(ks.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn skips_line_and_block_comments() {
        let ks = kinds("// hi\nlet /* block */ x = 1;");
        assert_eq!(ks[0], TokenKind::Keyword(Keyword::Let));
    }

    #[test]
    fn andmut_is_one_token_only_when_adjacent() {
        let ks = kinds("&mut x");
        assert_eq!(ks[0], TokenKind::AndMut);

        let ks2 = kinds("& mut x");
        assert_eq!(ks2[0], TokenKind::And);
        assert_eq!(ks2[1], TokenKind::Keyword(Keyword::Mut));
    }

    #[test]
    fn eof_terminates_at_input_length() {
        let src = "let x";
        let mut lex = Lexer::new(src, FileId(0));
        lex.drain();
        let last = lex.emitted().last().unwrap();
        assert!(last.is_eof());
        assert_eq!(last.pos(), src.len());
    }

    #[test]
    fn positions_are_non_decreasing() {
        let mut lex = Lexer::new("fn f ( a : i32 ) { }", FileId(0));
        lex.drain();
        let mut last_pos = 0;
        for tok in lex.emitted() {
            assert!(tok.pos() >= last_pos);
            last_pos = tok.pos();
        }
    }

    #[test]
    fn mark_reset_restores_peek() {
        let mut lex = Lexer::new("let mut x = 1;", FileId(0));
        let before = lex.peek(0).clone();
        let mark = lex.mark();
        let _ = lex.next();
        let _ = lex.next();
        lex.reset(mark);
        assert_eq!(lex.peek(0), &before);
    }

    #[test]
    fn unrecognized_character_synthesizes_eof() {
        let mut lex = Lexer::new("let x `", FileId(0));
        lex.drain();
        assert!(lex.emitted().last().unwrap().is_eof());
    }
}

/// Property tests for the invariants `§8` states over arbitrary input,
/// not just the hand-picked fixtures above.
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property 1: lexer totality. `drain` terminates for any input
        /// (guaranteed here since it's bounded by quickcheck's own
        /// timeout, but the real claim under test is the second half:
        /// the final emitted token is EOF positioned at the input's byte
        /// length) and property 2: position monotonicity.
        #[test]
        fn drain_always_ends_in_eof_at_input_length_with_nondecreasing_positions(s in ".{0,200}") {
            let mut lex = Lexer::new(&s, FileId(0));
            lex.drain();
            let emitted = lex.emitted();
            let last = emitted.last().expect("drain always emits at least EOF");
            prop_assert!(last.is_eof());
            prop_assert_eq!(last.pos(), s.len());

            let mut prev = 0;
            for tok in emitted {
                prop_assert!(tok.pos() >= prev);
                prev = tok.pos();
            }
        }

        /// Property 3: mark/reset idempotence. Peeking, marking,
        /// consuming an arbitrary number of tokens, then resetting must
        /// restore `peek(0)` to what it was before the mark.
        #[test]
        fn mark_reset_restores_peek_after_arbitrary_consumption(s in ".{0,200}", n in 0usize..8) {
            let mut lex = Lexer::new(&s, FileId(0));
            let before = lex.peek(0).clone();
            let mark = lex.mark();
            for _ in 0..n {
                if lex.peek(0).is_eof() {
                    break;
                }
                let _ = lex.next();
            }
            lex.reset(mark);
            prop_assert_eq!(lex.peek(0), &before);
        }
    }
}
