//! Statements, blocks, and the two backtracking points the grammar needs:
//! statement-vs-tail-expression and assignment-vs-expression.

use crate::ast::{Block, BlockOrExpr, IfStmt, Iterable, Stmt};
use crate::error::ParseResult;
use crate::Parser;
use crate::SpanExt;
use faxc_lex::{DelimKind, Keyword, SepKind, TokenKind};

impl<'a> Parser<'a> {
    /// `block := '{' stmt* '}'`
    pub(crate) fn parse_block(&mut self) -> ParseResult<Block> {
        let start = self.expect_delim(DelimKind::LBrace, "`{`")?;
        let mut stmts = Vec::new();
        while !self.at_delim(DelimKind::RBrace) && !self.at_eof() {
            stmts.push(self.parse_stmt()?);
        }
        let end = self.expect_delim(DelimKind::RBrace, "`}`")?;
        Ok(Block {
            stmts,
            span: start.to(end),
        })
    }

    /// `block_or_expr := block | expr`
    pub(crate) fn parse_block_or_expr(&mut self) -> ParseResult<BlockOrExpr> {
        if self.at_delim(DelimKind::LBrace) {
            Ok(BlockOrExpr::Block(self.parse_block()?))
        } else {
            Ok(BlockOrExpr::Expr(self.parse_expr()?))
        }
    }

    /// `stmt := let | return | if | while | for | loop | break | continue
    ///          | ';' | assign_or_expr`
    pub(crate) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let tok = self.peek(0);
        match &tok.kind {
            TokenKind::Keyword(Keyword::Let) => self.parse_let(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::If) => Ok(Stmt::If(self.parse_if()?)),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Loop) => self.parse_loop_stmt(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break(),
            TokenKind::Keyword(Keyword::Continue) => self.parse_continue(),
            TokenKind::Sep(SepKind::Semi) => {
                self.bump();
                Ok(Stmt::Empty)
            }
            _ => self.parse_assign_or_tail_expr(),
        }
    }

    /// `let := 'let' 'mut'? ID (':' type)? ('=' expr)? ';'`
    fn parse_let(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::Let, "`let`")?;
        let mutable = self.eat_keyword(Keyword::Mut);
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat_sep(SepKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if matches!(self.peek(0).kind, TokenKind::Assign) {
            self.bump();
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.expect_sep(SepKind::Semi, "`;`")?;
        Ok(Stmt::Let {
            mutable,
            name,
            ty,
            init,
            span: start.to(end),
        })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::Return, "`return`")?;
        let value = if self.at_sep(SepKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = self.expect_sep(SepKind::Semi, "`;`")?;
        Ok(Stmt::Return {
            value,
            span: start.to(end),
        })
    }

    /// `if` as both a statement and an expression share one node; `else`
    /// is syntactically optional (the IR generator fuses the join label
    /// with the else label when absent), though using an elseless `if` as
    /// a value is a type error the checker raises, not a parse error.
    pub(crate) fn parse_if(&mut self) -> ParseResult<IfStmt> {
        let start = self.expect_keyword(Keyword::If, "`if`")?;
        let cond = Box::new(self.parse_expr()?);
        let then_branch = Box::new(self.parse_block_or_expr()?);
        let mut end = match then_branch.as_ref() {
            BlockOrExpr::Block(b) => b.span,
            BlockOrExpr::Expr(e) => e.span(),
        };
        let else_branch = if self.eat_keyword(Keyword::Else) {
            let branch = self.parse_block_or_expr()?;
            end = match &branch {
                BlockOrExpr::Block(b) => b.span,
                BlockOrExpr::Expr(e) => e.span(),
            };
            Some(Box::new(branch))
        } else {
            None
        };
        Ok(IfStmt {
            cond,
            then_branch,
            else_branch,
            span: start.to(end),
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::While, "`while`")?;
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        Ok(Stmt::While {
            span: start.to(body.span),
            cond,
            body,
        })
    }

    /// `for := 'for' 'mut'? ID 'in' expr '..' expr block`
    fn parse_for(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::For, "`for`")?;
        let mutable = self.eat_keyword(Keyword::Mut);
        let (name, _) = self.expect_ident()?;
        self.expect_keyword(Keyword::In, "`in`")?;
        let range_start = Box::new(self.parse_range_endpoint()?);
        self.expect_dotdot()?;
        let range_end = Box::new(self.parse_range_endpoint()?);
        let body = self.parse_block()?;
        Ok(Stmt::For {
            name,
            mutable,
            iterable: Iterable::Range {
                start: range_start,
                end: range_end,
            },
            span: start.to(body.span),
            body,
        })
    }

    fn expect_dotdot(&mut self) -> ParseResult<()> {
        let tok = self.peek(0);
        if matches!(tok.kind, TokenKind::DotDot) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected("`..`", &tok))
        }
    }

    fn parse_loop_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::Loop, "`loop`")?;
        let body = self.parse_block()?;
        Ok(Stmt::Loop {
            span: start.to(body.span),
            body,
        })
    }

    fn parse_break(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::Break, "`break`")?;
        let value = if self.at_sep(SepKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = self.expect_sep(SepKind::Semi, "`;`")?;
        Ok(Stmt::Break {
            value,
            span: start.to(end),
        })
    }

    fn parse_continue(&mut self) -> ParseResult<Stmt> {
        let start = self.expect_keyword(Keyword::Continue, "`continue`")?;
        let end = self.expect_sep(SepKind::Semi, "`;`")?;
        let _ = end;
        Ok(Stmt::Continue { span: start })
    }

    /// Handles both `assign_or_expr := expr ('=' expr)? ';'` and the
    /// tail-expression case. Tries the committed form first (expression,
    /// optional `= expr`, required `;`); if that fails — the only way it
    /// fails here is a missing `;`, i.e. the expression was actually the
    /// block's final value — rewinds and reparses as a bare tail
    /// expression instead.
    fn parse_assign_or_tail_expr(&mut self) -> ParseResult<Stmt> {
        let state = self.mark();
        match self.parse_assign_or_expr_stmt() {
            Ok(stmt) => Ok(stmt),
            Err(_) => {
                self.reset(state);
                self.parse_tail_expr_stmt()
            }
        }
    }

    fn parse_assign_or_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let start_tok = self.peek(0);
        let expr = self.parse_expr()?;

        if matches!(self.peek(0).kind, TokenKind::Assign) {
            self.bump();
            let value = self.parse_expr()?;
            let end = self.expect_sep(SepKind::Semi, "`;`")?;
            return Ok(Stmt::Assign {
                target: expr,
                value,
                span: start_tok.span.to(end),
            });
        }

        let end = self.expect_sep(SepKind::Semi, "`;`")?;
        Ok(Stmt::ExprStmt {
            span: start_tok.span.to(end),
            expr,
            tail: false,
        })
    }

    fn parse_tail_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        let span = expr.span();
        Ok(Stmt::ExprStmt {
            expr,
            tail: true,
            span,
        })
    }
}
