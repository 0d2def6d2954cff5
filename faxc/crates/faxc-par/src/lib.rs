//! faxc-par - Recursive-descent parser.
//!
//! Pull-driven: the [`Parser`] drives a `faxc_lex::Lexer` via `peek`/`next`,
//! with selective one-construct backtracking through the lexer's
//! `mark`/`reset` for the two ambiguities the grammar can't resolve with a
//! single token of lookahead (statement-vs-tail-expression inside a block,
//! and assignment-vs-expression). See `§4.2` of the spec this implements
//! for the grammar and the rationale behind each backtracking point.

pub mod ast;
mod error;
mod expr;
mod stmt;
mod types;

pub use ast::*;
pub use error::{ParseError, ParseResult};

use faxc_lex::{DelimKind, Keyword, Lexer, LexerState, SepKind, Token, TokenKind};
use faxc_util::{Span, Symbol};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parses a full `Program` (`program := function*`) from source.
    pub fn parse_source(source: &'a str, file_id: faxc_util::span::FileId) -> ParseResult<Program> {
        let lexer = Lexer::new(source, file_id);
        Parser::new(lexer).parse_program()
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut functions = Vec::new();
        while !self.at_eof() {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    pub(crate) fn peek(&mut self, k: usize) -> Token {
        self.lexer.peek(k).clone()
    }

    pub(crate) fn bump(&mut self) -> Token {
        self.lexer.next()
    }

    pub(crate) fn at_eof(&mut self) -> bool {
        self.peek(0).is_eof()
    }

    pub(crate) fn mark(&self) -> LexerState {
        self.lexer.mark()
    }

    pub(crate) fn reset(&mut self, state: LexerState) {
        self.lexer.reset(state);
    }

    pub(crate) fn is_kind(tok: &Token, kind: &TokenKind) -> bool {
        std::mem::discriminant(&tok.kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn at_keyword(&mut self, kw: Keyword) -> bool {
        matches!(self.peek(0).kind, TokenKind::Keyword(k) if k == kw)
    }

    pub(crate) fn at_delim(&mut self, d: DelimKind) -> bool {
        matches!(self.peek(0).kind, TokenKind::Delim(k) if k == d)
    }

    pub(crate) fn at_sep(&mut self, s: SepKind) -> bool {
        matches!(self.peek(0).kind, TokenKind::Sep(k) if k == s)
    }

    pub(crate) fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.at_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_delim(&mut self, d: DelimKind) -> bool {
        if self.at_delim(d) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_sep(&mut self, s: SepKind) -> bool {
        if self.at_sep(s) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword, expected: &str) -> ParseResult<Span> {
        let tok = self.peek(0);
        if self.eat_keyword(kw) {
            Ok(tok.span)
        } else {
            Err(self.unexpected(expected, &tok))
        }
    }

    pub(crate) fn expect_delim(&mut self, d: DelimKind, expected: &str) -> ParseResult<Span> {
        let tok = self.peek(0);
        if self.eat_delim(d) {
            Ok(tok.span)
        } else {
            Err(self.unexpected(expected, &tok))
        }
    }

    pub(crate) fn expect_sep(&mut self, s: SepKind, expected: &str) -> ParseResult<Span> {
        let tok = self.peek(0);
        if self.eat_sep(s) {
            Ok(tok.span)
        } else {
            Err(self.unexpected(expected, &tok))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> ParseResult<(Symbol, Span)> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Ident(sym) => {
                self.bump();
                Ok((sym, tok.span))
            }
            _ => Err(self.unexpected("an identifier", &tok)),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str, tok: &Token) -> ParseError {
        ParseError::unexpected(expected, tok.tag_name(), &token_text(tok), tok.span)
    }
}

/// Renders a token's source text for error messages (the spec's "expected
/// set, actual tag, actual value" contract, `§4.2`/`§7`).
pub(crate) fn token_text(tok: &Token) -> String {
    match &tok.kind {
        TokenKind::Ident(sym) | TokenKind::Number(sym) => sym.as_str().to_string(),
        TokenKind::Keyword(kw) => keyword_text(*kw).to_string(),
        TokenKind::Op(op) => op.as_str().to_string(),
        TokenKind::Arrow => "->".to_string(),
        TokenKind::DotDot => "..".to_string(),
        TokenKind::Dot => ".".to_string(),
        TokenKind::Assign => "=".to_string(),
        TokenKind::Delim(d) => d.as_char().to_string(),
        TokenKind::Sep(s) => s.as_char().to_string(),
        TokenKind::AndMut => "&mut".to_string(),
        TokenKind::And => "&".to_string(),
        TokenKind::Eof => "<eof>".to_string(),
    }
}

fn keyword_text(kw: Keyword) -> &'static str {
    match kw {
        Keyword::I32 => "i32",
        Keyword::Let => "let",
        Keyword::If => "if",
        Keyword::Else => "else",
        Keyword::While => "while",
        Keyword::Return => "return",
        Keyword::Mut => "mut",
        Keyword::Fn => "fn",
        Keyword::For => "for",
        Keyword::In => "in",
        Keyword::Loop => "loop",
        Keyword::Break => "break",
        Keyword::Continue => "continue",
    }
}

mod function {
    use super::*;

    impl<'a> Parser<'a> {
        /// `function := 'fn' ID '(' params? ')' ('->' type)? func_body`
        pub(crate) fn parse_function(&mut self) -> ParseResult<Function> {
            let start = self.expect_keyword(Keyword::Fn, "`fn`")?;
            let (name, _) = self.expect_ident()?;
            self.expect_delim(DelimKind::LParen, "`(`")?;
            let params = self.parse_params()?;
            self.expect_delim(DelimKind::RParen, "`)`")?;

            let ret_type = if matches!(self.peek(0).kind, TokenKind::Arrow) {
                self.bump();
                Some(self.parse_type()?)
            } else {
                None
            };

            let body = self.parse_func_body()?;
            let end = match &body {
                FuncBody::Block(b) => b.span,
                FuncBody::Expr(e) => e.span(),
            };
            Ok(Function {
                name,
                params,
                ret_type,
                body,
                span: start.to(end),
            })
        }

        fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
            let mut params = Vec::new();
            if self.at_delim(DelimKind::RParen) {
                return Ok(params);
            }
            loop {
                params.push(self.parse_param()?);
                if !self.eat_sep(SepKind::Comma) {
                    break;
                }
            }
            Ok(params)
        }

        /// `param := 'mut'? ID ':' type`
        fn parse_param(&mut self) -> ParseResult<Param> {
            let start_tok = self.peek(0);
            let mutable = self.eat_keyword(Keyword::Mut);
            let (name, name_span) = self.expect_ident()?;
            self.expect_sep(SepKind::Colon, "`:`")?;
            let ty = self.parse_type()?;
            Ok(Param {
                mutable,
                name,
                ty,
                span: start_tok.span.to(name_span),
            })
        }

        /// `func_body := block | expr`
        fn parse_func_body(&mut self) -> ParseResult<FuncBody> {
            if self.at_delim(DelimKind::LBrace) {
                Ok(FuncBody::Block(self.parse_block()?))
            } else {
                Ok(FuncBody::Expr(Box::new(self.parse_expr()?)))
            }
        }
    }
}

/// A small helper trait used only for building spans that cover two
/// source positions (start of one token, end of an already-parsed node).
trait SpanExt {
    fn to(self, other: Span) -> Span;
}

impl SpanExt for Span {
    fn to(self, other: Span) -> Span {
        Span::with_file(
            self.start.min(other.start),
            self.end.max(other.end),
            self.file_id,
            self.line,
            self.column,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_util::span::FileId;

    fn parse(source: &str) -> Program {
        Parser::parse_source(source, FileId(0)).expect("fixture should parse")
    }

    fn parse_err(source: &str) -> ParseError {
        Parser::parse_source(source, FileId(0)).unwrap_err()
    }

    #[test]
    fn parses_empty_program() {
        let prog = parse("");
        assert!(prog.functions.is_empty());
    }

    #[test]
    fn parses_function_with_params_and_return_type() {
        let prog = parse("fn add(a: i32, b: i32) -> i32 { return a + b; }");
        assert_eq!(prog.functions.len(), 1);
        let f = &prog.functions[0];
        assert_eq!(f.name.as_str(), "add");
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.ret_type, Some(Type::I32));
        match &f.body {
            FuncBody::Block(b) => assert_eq!(b.stmts.len(), 1),
            FuncBody::Expr(_) => panic!("expected a block body"),
        }
    }

    #[test]
    fn parses_bare_expression_function_body() {
        let prog = parse("fn answer() -> i32 42");
        match &prog.functions[0].body {
            FuncBody::Expr(e) => assert!(matches!(**e, Expr::Number { value: 42, .. })),
            FuncBody::Block(_) => panic!("expected a bare expr body"),
        }
    }

    #[test]
    fn mut_param_and_ref_types_parse() {
        let prog = parse("fn f(mut x: i32, y: &i32, z: &mut i32) { }");
        let params = &prog.functions[0].params;
        assert!(params[0].mutable);
        assert_eq!(params[1].ty, Type::Ref { mutable: false, to: Box::new(Type::I32) });
        assert_eq!(params[2].ty, Type::Ref { mutable: true, to: Box::new(Type::I32) });
    }

    #[test]
    fn array_and_tuple_types_parse() {
        let prog = parse("fn f(a: [i32; 3], t: (i32, i32)) { }");
        let params = &prog.functions[0].params;
        assert_eq!(
            params[0].ty,
            Type::Array { elem: Box::new(Type::I32), size: 3 }
        );
        assert_eq!(params[1].ty, Type::Tuple(vec![Type::I32, Type::I32]));
    }

    #[test]
    fn let_with_and_without_initializer() {
        let prog = parse("fn f() { let mut x: i32 = 1; let y; }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        assert!(matches!(
            body.stmts[0],
            Stmt::Let { mutable: true, init: Some(_), .. }
        ));
        assert!(matches!(
            body.stmts[1],
            Stmt::Let { mutable: false, init: None, ty: None, .. }
        ));
    }

    #[test]
    fn arithmetic_respects_precedence() {
        let prog = parse("fn f() -> i32 1 + 2 * 3");
        let FuncBody::Expr(e) = &prog.functions[0].body else {
            panic!("expected expr body")
        };
        match &**e {
            Expr::BinaryOp { op: BinOp::Add, lhs, rhs, .. } => {
                assert!(matches!(**lhs, Expr::Number { value: 1, .. }));
                assert!(matches!(**rhs, Expr::BinaryOp { op: BinOp::Mul, .. }));
            }
            other => panic!("expected top-level `+`, got {other:?}"),
        }
    }

    #[test]
    fn comparison_binds_looser_than_addition() {
        let prog = parse("fn f() -> i32 1 + 2 < 4 - 1");
        let FuncBody::Expr(e) = &prog.functions[0].body else {
            panic!("expected expr body")
        };
        assert!(matches!(
            &**e,
            Expr::BinaryOp { op: BinOp::Lt, .. }
        ));
    }

    #[test]
    fn assignment_and_tail_expression_are_disambiguated() {
        let prog = parse("fn f() -> i32 { let mut x: i32 = 0; x = 1; x }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        assert!(matches!(body.stmts[1], Stmt::Assign { .. }));
        match &body.stmts[2] {
            Stmt::ExprStmt { tail, expr, .. } => {
                assert!(*tail);
                assert!(matches!(expr, Expr::Variable { .. }));
            }
            other => panic!("expected a tail expression statement, got {other:?}"),
        }
    }

    #[test]
    fn if_without_else_is_accepted_as_a_statement() {
        let prog = parse("fn f() { if 1 < 2 { } }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::If(if_stmt) => assert!(if_stmt.else_branch.is_none()),
            other => panic!("expected an if statement, got {other:?}"),
        }
    }

    #[test]
    fn if_else_with_both_branches_parses_as_a_statement() {
        // `if`/`loop` are their own statement productions (`§4.2`'s grammar
        // keeps `stmt := ... | if | ... | loop` distinct from
        // `assign_or_expr`); a block's tail value may still be such a
        // statement, which the checker/IR resolve, not the parser.
        let prog = parse("fn f() -> i32 { if 1 < 2 { 1 } else { 2 } }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::If(if_stmt) => assert!(if_stmt.else_branch.is_some()),
            other => panic!("expected an if statement, got {other:?}"),
        }
    }

    #[test]
    fn if_nested_in_an_expression_position_is_an_expr_node() {
        let prog = parse("fn f() -> i32 { let x: i32 = if 1 < 2 { 1 } else { 2 }; x }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::Let { init: Some(Expr::If(_)), .. } => {}
            other => panic!("expected a let bound to an if-expression, got {other:?}"),
        }
    }

    #[test]
    fn while_for_loop_break_continue_parse() {
        let prog = parse(
            "fn f() { while 1 < 2 { break; } for i in 0..10 { continue; } loop { break 1; } }",
        );
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        assert!(matches!(body.stmts[0], Stmt::While { .. }));
        assert!(matches!(body.stmts[1], Stmt::For { .. }));
        assert!(matches!(body.stmts[2], Stmt::Loop { .. }));
    }

    #[test]
    fn parenthesized_expr_is_not_a_single_element_tuple() {
        let prog = parse("fn f() -> i32 (1 + 2)");
        let FuncBody::Expr(e) = &prog.functions[0].body else {
            panic!("expected expr body")
        };
        assert!(matches!(**e, Expr::BinaryOp { op: BinOp::Add, .. }));
    }

    #[test]
    fn comma_makes_a_tuple_even_with_one_element() {
        let prog = parse("fn f() -> i32 { (1,).0 }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::ExprStmt { expr, .. } => {
                assert!(matches!(expr, Expr::TupleGet { index: 0, .. }));
            }
            other => panic!("expected a tuple-get tail expression, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_accepts_a_trailing_comma() {
        let prog = parse("fn f() -> i32 { [1, 2,][0] }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::ExprStmt { expr, .. } => match expr {
                Expr::Index { base, .. } => {
                    assert!(matches!(**base, Expr::Array { ref elems, .. } if elems.len() == 2));
                }
                other => panic!("expected an index expression, got {other:?}"),
            },
            other => panic!("expected an index tail expression, got {other:?}"),
        }
    }

    #[test]
    fn empty_parens_are_the_unit_tuple() {
        let prog = parse("fn f() -> i32 ()");
        let FuncBody::Expr(e) = &prog.functions[0].body else {
            panic!("expected expr body")
        };
        assert!(matches!(**e, Expr::Tuple { ref elems, .. } if elems.is_empty()));
    }

    #[test]
    fn call_index_and_field_access_chain() {
        let prog = parse("fn f(a: [i32; 4]) -> i32 { g(a[0], 1).1 }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::ExprStmt { expr: Expr::TupleGet { base, index: 1, .. }, .. } => {
                assert!(matches!(**base, Expr::Call { .. }));
            }
            other => panic!("expected call(...).1, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_deref_and_references_parse() {
        let prog = parse("fn f(mut x: i32) -> i32 { -*&mut x }");
        let body = match &prog.functions[0].body {
            FuncBody::Block(b) => b,
            _ => unreachable!(),
        };
        match &body.stmts[0] {
            Stmt::ExprStmt { expr: Expr::UnaryOp { expr: inner, .. }, .. } => {
                assert!(matches!(**inner, Expr::Deref { .. }));
            }
            other => panic!("expected unary minus over a deref, got {other:?}"),
        }
    }

    #[test]
    fn missing_semicolon_reports_offset_and_expected_token() {
        let err = parse_err("fn f() { let x: i32 = 1 let y: i32 = 2; }");
        assert!(err.message.contains(';'));
    }

    #[test]
    fn unterminated_block_reports_eof() {
        let err = parse_err("fn f() {");
        assert!(err.message.contains("EOF") || err.message.contains("eof"));
    }

    /// `§8` property 4: identical input yields an identical AST (or, on a
    /// rejected program, an identical error) across repeated parses.
    #[test]
    fn parsing_the_same_source_twice_yields_identical_results() {
        for source in [
            "",
            "fn main() -> i32 { let x: i32 = 1; return x; }",
            "fn f(a: i32) -> i32 { if a < 1 { return 0; } else { return a; } }",
            "fn f() { let x: i32 ( }",
        ] {
            let a = Parser::parse_source(source, FileId(0));
            let b = Parser::parse_source(source, FileId(0));
            assert_eq!(a, b, "non-deterministic parse for {source:?}");
        }
    }
}
