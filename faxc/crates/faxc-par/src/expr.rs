//! Expression grammar, precedence low to high:
//! `if_expr > loop_expr > cmp > add > mul > unary > postfix > primary`.

use crate::ast::{BinOp, Expr};
use crate::error::ParseResult;
use crate::Parser;
use crate::SpanExt;
use faxc_lex::{DelimKind, Keyword, OpKind, SepKind, TokenKind};

impl<'a> Parser<'a> {
    /// `expr := if_expr`
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_if_expr()
    }

    /// `if_expr := 'if' expr block_or_expr 'else' block_or_expr | loop_expr`
    fn parse_if_expr(&mut self) -> ParseResult<Expr> {
        if self.at_keyword(Keyword::If) {
            Ok(Expr::If(self.parse_if()?))
        } else {
            self.parse_loop_expr()
        }
    }

    /// `loop_expr := 'loop' block_or_expr | cmp`
    fn parse_loop_expr(&mut self) -> ParseResult<Expr> {
        if self.at_keyword(Keyword::Loop) {
            let start = self.expect_keyword(Keyword::Loop, "`loop`")?;
            let body = self.parse_block()?;
            Ok(Expr::Loop {
                span: start.to(body.span),
                body,
            })
        } else {
            self.parse_cmp()
        }
    }

    /// A `for i in start..end` range endpoint: arithmetic, not a full
    /// comparison — `a..b < c` would otherwise be ambiguous between "range
    /// of a comparison" and "comparison of a range", and the grammar has
    /// no production for the latter anyway.
    pub(crate) fn parse_range_endpoint(&mut self) -> ParseResult<Expr> {
        self.parse_add()
    }

    /// `cmp := add (('=='|'!='|'<'|'>'|'<='|'>=') add)*`
    pub(crate) fn parse_cmp(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_add()?;
        loop {
            let op = match self.peek(0).kind {
                TokenKind::Op(OpKind::EqEq) => BinOp::Eq,
                TokenKind::Op(OpKind::Ne) => BinOp::Ne,
                TokenKind::Op(OpKind::Lt) => BinOp::Lt,
                TokenKind::Op(OpKind::Gt) => BinOp::Gt,
                TokenKind::Op(OpKind::Le) => BinOp::Le,
                TokenKind::Op(OpKind::Ge) => BinOp::Ge,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_add()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    /// `add := mul (('+'|'-') mul)*`
    fn parse_add(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_mul()?;
        loop {
            let op = match self.peek(0).kind {
                TokenKind::Op(OpKind::Plus) => BinOp::Add,
                TokenKind::Op(OpKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_mul()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    /// `mul := unary (('*'|'/') unary)*`
    fn parse_mul(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek(0).kind {
                TokenKind::Op(OpKind::Star) => BinOp::Mul,
                TokenKind::Op(OpKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary()?;
            let span = lhs.span().to(rhs.span());
            lhs = Expr::BinaryOp {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Ok(lhs)
    }

    /// `unary := '-' unary | '*' unary | '&mut' unary | '&' unary | postfix`
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Op(OpKind::Minus) => {
                self.bump();
                let expr = self.parse_unary()?;
                let span = tok.span.to(expr.span());
                Ok(Expr::UnaryOp {
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::Op(OpKind::Star) => {
                self.bump();
                let expr = self.parse_unary()?;
                let span = tok.span.to(expr.span());
                Ok(Expr::Deref {
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::AndMut => {
                self.bump();
                let expr = self.parse_unary()?;
                let span = tok.span.to(expr.span());
                Ok(Expr::AddrOfMut {
                    expr: Box::new(expr),
                    span,
                })
            }
            TokenKind::And => {
                self.bump();
                let expr = self.parse_unary()?;
                let span = tok.span.to(expr.span());
                Ok(Expr::AddrOf {
                    expr: Box::new(expr),
                    span,
                })
            }
            _ => self.parse_postfix(),
        }
    }

    /// `postfix := primary ( call_args | '[' expr ']' | '.' NUMBER )*`
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut base = self.parse_primary()?;
        loop {
            if self.at_delim(DelimKind::LParen) {
                base = self.parse_call_args(base)?;
            } else if self.at_delim(DelimKind::LBracket) {
                self.bump();
                let index = self.parse_expr()?;
                let end = self.expect_delim(DelimKind::RBracket, "`]`")?;
                let span = base.span().to(end);
                base = Expr::Index {
                    base: Box::new(base),
                    index: Box::new(index),
                    span,
                };
            } else if matches!(self.peek(0).kind, TokenKind::Dot) {
                self.bump();
                let tok = self.peek(0);
                let index = match tok.kind {
                    TokenKind::Number(sym) => sym
                        .as_str()
                        .parse::<u32>()
                        .map_err(|_| self.unexpected("a tuple field index", &tok))?,
                    _ => return Err(self.unexpected("a tuple field index", &tok)),
                };
                self.bump();
                let span = base.span().to(tok.span);
                base = Expr::TupleGet {
                    base: Box::new(base),
                    index,
                    span,
                };
            } else {
                break;
            }
        }
        Ok(base)
    }

    /// `call_args := '(' (expr (',' expr)*)? ')'`, only legal when the
    /// callee is a bare identifier (enforced by the caller: anything else
    /// reaching here is a parse error, since the grammar has no other
    /// notion of a callable expression).
    fn parse_call_args(&mut self, callee: Expr) -> ParseResult<Expr> {
        let Expr::Variable { name, span: callee_span } = callee else {
            let tok = self.peek(0);
            return Err(self.unexpected("a function name before `(`", &tok));
        };
        self.expect_delim(DelimKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.at_delim(DelimKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat_sep(SepKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect_delim(DelimKind::RParen, "`)`")?;
        Ok(Expr::Call {
            callee: name,
            args,
            span: callee_span.to(end),
        })
    }

    /// `primary := NUMBER | ID | '(' expr_list? ')' | block | '[' expr_list? ']'`
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Number(sym) => {
                self.bump();
                let value = sym
                    .as_str()
                    .parse::<i64>()
                    .map_err(|_| self.unexpected("a valid integer literal", &tok))?;
                Ok(Expr::Number {
                    value,
                    span: tok.span,
                })
            }
            TokenKind::Ident(name) => {
                self.bump();
                Ok(Expr::Variable {
                    name,
                    span: tok.span,
                })
            }
            TokenKind::Delim(DelimKind::LParen) => self.parse_paren_or_tuple(),
            TokenKind::Delim(DelimKind::LBrace) => Ok(Expr::Block(self.parse_block()?)),
            TokenKind::Delim(DelimKind::LBracket) => self.parse_array_literal(),
            _ => Err(self.unexpected("an expression", &tok)),
        }
    }

    /// `'(' expr_list? ')'`: zero elements or any comma yields a `Tuple`;
    /// exactly one comma-free expression is a parenthesized grouping.
    fn parse_paren_or_tuple(&mut self) -> ParseResult<Expr> {
        let start = self.expect_delim(DelimKind::LParen, "`(`")?;
        if self.at_delim(DelimKind::RParen) {
            let end = self.expect_delim(DelimKind::RParen, "`)`")?;
            return Ok(Expr::Tuple {
                elems: Vec::new(),
                span: start.to(end),
            });
        }

        let mut elems = vec![self.parse_expr()?];
        let mut saw_comma = false;
        while self.eat_sep(SepKind::Comma) {
            saw_comma = true;
            if self.at_delim(DelimKind::RParen) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        let end = self.expect_delim(DelimKind::RParen, "`)`")?;
        let span = start.to(end);

        if saw_comma {
            Ok(Expr::Tuple { elems, span })
        } else {
            let mut elems = elems;
            Ok(elems.pop().expect("parse_paren_or_tuple always parses one expr"))
        }
    }

    /// `'[' expr_list? ']'`
    fn parse_array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.expect_delim(DelimKind::LBracket, "`[`")?;
        let mut elems = Vec::new();
        if !self.at_delim(DelimKind::RBracket) {
            loop {
                elems.push(self.parse_expr()?);
                if !self.eat_sep(SepKind::Comma) {
                    break;
                }
                if self.at_delim(DelimKind::RBracket) {
                    break;
                }
            }
        }
        let end = self.expect_delim(DelimKind::RBracket, "`]`")?;
        Ok(Expr::Array {
            elems,
            span: start.to(end),
        })
    }
}
