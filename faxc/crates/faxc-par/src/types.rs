//! `type := 'i32' | '&' 'mut'? type | '[' type ';' NUMBER ']' | '(' (type (',' type)*)? ')'`

use crate::ast::Type;
use crate::error::ParseResult;
use crate::Parser;
use faxc_lex::{DelimKind, Keyword, SepKind, TokenKind};

impl<'a> Parser<'a> {
    pub(crate) fn parse_type(&mut self) -> ParseResult<Type> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Keyword(Keyword::I32) => {
                self.bump();
                Ok(Type::I32)
            }
            TokenKind::And => {
                self.bump();
                let to = self.parse_type()?;
                Ok(Type::Ref {
                    mutable: false,
                    to: Box::new(to),
                })
            }
            TokenKind::AndMut => {
                self.bump();
                let to = self.parse_type()?;
                Ok(Type::Ref {
                    mutable: true,
                    to: Box::new(to),
                })
            }
            TokenKind::Delim(DelimKind::LBracket) => {
                self.bump();
                let elem = self.parse_type()?;
                self.expect_sep(SepKind::Semi, "`;`")?;
                let size = self.parse_array_size()?;
                self.expect_delim(DelimKind::RBracket, "`]`")?;
                Ok(Type::Array {
                    elem: Box::new(elem),
                    size,
                })
            }
            TokenKind::Delim(DelimKind::LParen) => {
                self.bump();
                let mut elems = Vec::new();
                if !self.at_delim(DelimKind::RParen) {
                    loop {
                        elems.push(self.parse_type()?);
                        if !self.eat_sep(SepKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect_delim(DelimKind::RParen, "`)`")?;
                Ok(Type::Tuple(elems))
            }
            _ => Err(self.unexpected("a type", &tok)),
        }
    }

    fn parse_array_size(&mut self) -> ParseResult<u64> {
        let tok = self.peek(0);
        match tok.kind {
            TokenKind::Number(sym) => {
                self.bump();
                sym.as_str()
                    .parse::<u64>()
                    .map_err(|_| self.unexpected("an array length", &tok))
            }
            _ => Err(self.unexpected("an array length", &tok)),
        }
    }
}
