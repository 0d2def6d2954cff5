//! Expression lowering (`§4.4`): every `Expr` variant evaluates to a
//! "value" — a variable name, a temporary name, or a numeric literal — that
//! the caller can drop straight into the next quadruple's operand fields.

use crate::quad::Quad;
use crate::{IrError, IrGen, IrResult};
use faxc_par::Expr;

impl IrGen {
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> IrResult<String> {
        match expr {
            Expr::Number { value, .. } => Ok(value.to_string()),
            Expr::Variable { name, .. } => Ok(name.as_str().to_string()),
            Expr::BinaryOp { op, lhs, rhs, .. } => {
                let a = self.lower_expr(lhs)?;
                let b = self.lower_expr(rhs)?;
                let res = self.fresh_temp();
                self.emit(Quad::binary(op.as_str(), &a, &b, &res));
                Ok(res)
            }
            Expr::UnaryOp { expr: inner, .. } => {
                let a = self.lower_expr(inner)?;
                let res = self.fresh_temp();
                self.emit(Quad::unary_neg(&a, &res));
                Ok(res)
            }
            // `faxc_sem`'s checker only accepts a bare variable under `&`/
            // `&mut` (`§4.3` rule 6), so the inner expression is always a
            // `Variable` by the time a validated tree reaches the generator.
            Expr::AddrOf { expr: inner, .. } | Expr::AddrOfMut { expr: inner, .. } => {
                let name = match inner.as_ref() {
                    Expr::Variable { name, .. } => name.as_str().to_string(),
                    other => return Err(IrError::new("internal error: `&`/`&mut` target is not a variable", other.span())),
                };
                let res = self.fresh_temp();
                self.emit(Quad::addr(&name, &res));
                Ok(res)
            }
            Expr::Deref { expr: inner, .. } => {
                let p = self.lower_expr(inner)?;
                let res = self.fresh_temp();
                self.emit(Quad::load(&p, &res));
                Ok(res)
            }
            Expr::Call { callee, args, .. } => {
                let mut arg_vals = Vec::with_capacity(args.len());
                for a in args {
                    arg_vals.push(self.lower_expr(a)?);
                }
                for (i, v) in arg_vals.iter().enumerate() {
                    self.emit(Quad::arg(v, i));
                }
                let res = self.fresh_temp();
                self.emit(Quad::call(callee.as_str(), args.len(), &res));
                Ok(res)
            }
            // `base[index]` reads either an array (`ALOAD`) or, since the
            // grammar's bracket syntax doesn't distinguish the two, a tuple
            // with a constant index (`TLOAD`) — `§4.3` rule 5 accepts both
            // in read position even though `.{NUMBER}` is the only tuple
            // access the grammar normally reaches for.
            Expr::Index { base, index, .. } => {
                let is_tuple = self.types.is_tuple(base);
                let arr = self.lower_expr(base)?;
                let idx = self.lower_expr(index)?;
                let res = self.fresh_temp();
                if is_tuple {
                    self.emit(Quad::tload(&arr, &idx, &res));
                } else {
                    self.emit(Quad::aload(&arr, &idx, &res));
                }
                Ok(res)
            }
            Expr::TupleGet { base, index, .. } => {
                let tup = self.lower_expr(base)?;
                let res = self.fresh_temp();
                self.emit(Quad::tload(&tup, &index.to_string(), &res));
                Ok(res)
            }
            Expr::Array { elems, .. } => {
                let mut vals = Vec::with_capacity(elems.len());
                for e in elems {
                    vals.push(self.lower_expr(e)?);
                }
                let res = self.fresh_temp();
                self.emit(Quad::array(vals.len(), &vals.join(","), &res));
                Ok(res)
            }
            Expr::Tuple { elems, .. } => {
                let mut vals = Vec::with_capacity(elems.len());
                for e in elems {
                    vals.push(self.lower_expr(e)?);
                }
                let res = self.fresh_temp();
                self.emit(Quad::tuple(vals.len(), &vals.join(","), &res));
                Ok(res)
            }
            Expr::If(if_stmt) => {
                let v = self.lower_if(if_stmt, true)?;
                Ok(v.expect("want_value=true always yields a result"))
            }
            Expr::Loop { body, .. } => {
                let v = self.lower_loop(body, true)?;
                Ok(v.expect("want_value=true always yields a result"))
            }
            Expr::Block(block) => self.lower_block_value(block),
        }
    }
}
