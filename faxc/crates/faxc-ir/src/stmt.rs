//! Statement, block, and control-flow lowering (`§4.4`).
//!
//! `if`, `loop`, and block all share one wrinkle: the same node shape is
//! used both in statement position (the value is thrown away) and in
//! expression position (a fresh temporary must carry the value out). Each
//! lowering function below takes a `want_value` flag for exactly that.

use crate::quad::Quad;
use crate::{IrError, IrGen, IrResult, LoopLabels};
use faxc_par::{Block, BlockOrExpr, Expr, IfStmt, Iterable, Stmt};
use faxc_util::{Span, Symbol};

impl IrGen {
    /// Lowers a block for its side effects only; any tail expression's
    /// value is computed (for its side effects) and discarded.
    pub(crate) fn lower_block_discard(&mut self, block: &Block) -> IrResult<()> {
        self.types.push_scope();
        let result = self.lower_block_stmts(block);
        self.types.pop_scope();
        result?;
        Ok(())
    }

    /// Lowers a block as an expression: the value of its tail
    /// `ExprStmt`, or the empty string if it has none (`§4.4`'s
    /// block-as-expression rule).
    pub(crate) fn lower_block_value(&mut self, block: &Block) -> IrResult<String> {
        self.types.push_scope();
        let result = self.lower_block_stmts(block);
        self.types.pop_scope();
        result
    }

    fn lower_block_stmts(&mut self, block: &Block) -> IrResult<String> {
        let mut tail_value = String::new();
        for stmt in &block.stmts {
            match stmt {
                Stmt::ExprStmt { expr, tail: true, .. } => tail_value = self.lower_expr(expr)?,
                other => self.lower_stmt(other)?,
            }
        }
        Ok(tail_value)
    }

    fn lower_block_or_expr_value(&mut self, b: &BlockOrExpr) -> IrResult<String> {
        match b {
            BlockOrExpr::Block(block) => self.lower_block_value(block),
            BlockOrExpr::Expr(e) => self.lower_expr(e),
        }
    }

    fn lower_block_or_expr_discard(&mut self, b: &BlockOrExpr) -> IrResult<()> {
        match b {
            BlockOrExpr::Block(block) => self.lower_block_discard(block),
            BlockOrExpr::Expr(e) => {
                self.lower_expr(e)?;
                Ok(())
            }
        }
    }

    fn lower_branch(&mut self, b: &BlockOrExpr, want_value: bool) -> IrResult<Option<String>> {
        if want_value {
            Ok(Some(self.lower_block_or_expr_value(b)?))
        } else {
            self.lower_block_or_expr_discard(b)?;
            Ok(None)
        }
    }

    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> IrResult<()> {
        match stmt {
            Stmt::Let { name, ty, init, .. } => self.lower_let(*name, ty, init),
            Stmt::Assign { target, value, .. } => self.lower_assign(target, value),
            Stmt::Return { value, .. } => self.lower_return(value),
            Stmt::If(if_stmt) => self.lower_if(if_stmt, false).map(|_| ()),
            Stmt::While { cond, body, .. } => self.lower_while(cond, body),
            Stmt::For { name, iterable, body, .. } => self.lower_for(*name, iterable, body),
            Stmt::Loop { body, .. } => self.lower_loop(body, false).map(|_| ()),
            Stmt::Break { value, span } => self.lower_break(value, *span),
            Stmt::Continue { span } => self.lower_continue(*span),
            Stmt::ExprStmt { expr, .. } => {
                self.lower_expr(expr)?;
                Ok(())
            }
            Stmt::Empty => Ok(()),
        }
    }

    fn lower_let(&mut self, name: Symbol, ty: &Option<faxc_par::Type>, init: &Option<Expr>) -> IrResult<()> {
        let resolved = ty.as_ref().map(faxc_sem::Type::from_ast).or_else(|| init.as_ref().map(|e| self.types.infer(e)));
        match init {
            Some(e) => {
                let v = self.lower_expr(e)?;
                self.emit(Quad::let_decl(name.as_str(), &v));
            }
            None => self.emit(Quad::let_decl(name.as_str(), "")),
        }
        if let Some(ty) = resolved {
            self.types.declare(name, ty);
        }
        Ok(())
    }

    fn lower_assign(&mut self, target: &Expr, value: &Expr) -> IrResult<()> {
        let val = self.lower_expr(value)?;
        match target {
            Expr::Variable { name, .. } => {
                self.emit(Quad::copy(name.as_str(), &val));
                let ty = self.types.infer(value);
                self.types.update(*name, ty);
            }
            Expr::Index { base, index, .. } => {
                let arr = self.lower_expr(base)?;
                let idx = self.lower_expr(index)?;
                self.emit(Quad::astore(&arr, &idx, &val));
            }
            Expr::TupleGet { base, index, .. } => {
                let tup = self.lower_expr(base)?;
                self.emit(Quad::tstore(&tup, &index.to_string(), &val));
            }
            Expr::Deref { expr: inner, .. } => {
                let p = self.lower_expr(inner)?;
                self.emit(Quad::pstore(&p, &val));
            }
            other => {
                return Err(IrError::new(
                    "internal error: assignment target is not a variable/index/tuple-field/deref",
                    other.span(),
                ))
            }
        }
        Ok(())
    }

    fn lower_return(&mut self, value: &Option<Expr>) -> IrResult<()> {
        match value {
            Some(e) => {
                let v = self.lower_expr(e)?;
                self.emit(Quad::ret(&v));
            }
            None => self.emit(Quad::ret("")),
        }
        Ok(())
    }

    /// `if c then else`: `§4.4`. With no `else`, `Lelse`/`Lend` are fused
    /// into one label since there is nothing for the `else` arm to do.
    pub(crate) fn lower_if(&mut self, if_stmt: &IfStmt, want_value: bool) -> IrResult<Option<String>> {
        let cond = self.lower_expr(&if_stmt.cond)?;
        let res = if want_value { Some(self.fresh_temp()) } else { None };

        match &if_stmt.else_branch {
            Some(else_branch) => {
                let l_else = self.fresh_label();
                let l_end = self.fresh_label();
                self.emit(Quad::ifz(&cond, &l_else));
                let then_val = self.lower_branch(&if_stmt.then_branch, want_value)?;
                if let (Some(r), Some(v)) = (&res, &then_val) {
                    self.emit(Quad::copy(r, v));
                }
                self.emit(Quad::goto(&l_end));
                self.emit(Quad::label(&l_else));
                let else_val = self.lower_branch(else_branch, want_value)?;
                if let (Some(r), Some(v)) = (&res, &else_val) {
                    self.emit(Quad::copy(r, v));
                }
                self.emit(Quad::label(&l_end));
            }
            None => {
                let l_end = self.fresh_label();
                self.emit(Quad::ifz(&cond, &l_end));
                self.lower_block_or_expr_discard(&if_stmt.then_branch)?;
                self.emit(Quad::label(&l_end));
            }
        }
        Ok(res)
    }

    /// `while c body`: `§4.4`. `continue` re-checks `c` (`Lcond`); `break`
    /// exits to `Lend`.
    fn lower_while(&mut self, cond: &Expr, body: &Block) -> IrResult<()> {
        let l_cond = self.fresh_label();
        let l_top = self.fresh_label();
        let l_end = self.fresh_label();

        self.emit(Quad::goto(&l_cond));
        self.emit(Quad::label(&l_top));
        self.loop_stack.push(LoopLabels { start: l_cond.clone(), end: l_end.clone() });
        let body_result = self.lower_block_discard(body);
        self.loop_stack.pop();
        body_result?;

        self.emit(Quad::label(&l_cond));
        let c = self.lower_expr(cond)?;
        self.emit(Quad::ifnz(&c, &l_top));
        self.emit(Quad::label(&l_end));
        Ok(())
    }

    /// `for i in a..b body`: `§4.4`. Unlike the literal quadruple template,
    /// `continue` targets a dedicated label right before the increment
    /// rather than the condition check directly — otherwise `continue`
    /// would skip incrementing `i` and the loop would never terminate.
    fn lower_for(&mut self, name: Symbol, iterable: &Iterable, body: &Block) -> IrResult<()> {
        let Iterable::Range { start, end } = iterable;
        let a = self.lower_expr(start)?;
        let b = self.lower_expr(end)?;
        let var = name.as_str().to_string();
        self.emit(Quad::let_decl(&var, &a));

        let l_cond = self.fresh_label();
        let l_body = self.fresh_label();
        let l_continue = self.fresh_label();
        let l_end = self.fresh_label();

        self.emit(Quad::goto(&l_cond));
        self.emit(Quad::label(&l_body));

        self.types.push_scope();
        self.types.declare(name, faxc_sem::Type::I32);
        self.loop_stack.push(LoopLabels { start: l_continue.clone(), end: l_end.clone() });
        let body_result = self.lower_block_discard(body);
        self.loop_stack.pop();
        self.types.pop_scope();
        body_result?;

        self.emit(Quad::label(&l_continue));
        let next = self.fresh_temp();
        self.emit(Quad::binary("+", &var, "1", &next));
        self.emit(Quad::copy(&var, &next));
        self.emit(Quad::label(&l_cond));
        let t = self.fresh_temp();
        self.emit(Quad::binary("<", &var, &b, &t));
        self.emit(Quad::ifnz(&t, &l_body));
        self.emit(Quad::label(&l_end));
        Ok(())
    }

    /// `loop body`: `§4.4`. When used as an expression, the per-function
    /// `break_result_<function>` slot (`§9`'s conservative, collision-prone
    /// convention, preserved as documented) carries the value out; the
    /// slot is declared up front so every exit path — including a `loop`
    /// whose body never actually reaches a `break` — leaves it defined.
    pub(crate) fn lower_loop(&mut self, body: &Block, want_value: bool) -> IrResult<Option<String>> {
        let l_top = self.fresh_label();
        let l_end = self.fresh_label();
        let slot = self.break_result_slot();
        if want_value {
            self.emit(Quad::let_decl(&slot, ""));
        }

        self.emit(Quad::label(&l_top));
        self.loop_stack.push(LoopLabels { start: l_top.clone(), end: l_end.clone() });
        let body_result = self.lower_block_discard(body);
        self.loop_stack.pop();
        body_result?;
        self.emit(Quad::goto(&l_top));
        self.emit(Quad::label(&l_end));

        if want_value {
            let res = self.fresh_temp();
            self.emit(Quad::copy(&res, &slot));
            Ok(Some(res))
        } else {
            Ok(None)
        }
    }

    fn lower_break(&mut self, value: &Option<Expr>, span: Span) -> IrResult<()> {
        let end = match self.loop_stack.last() {
            Some(ctx) => ctx.end.clone(),
            None => return Err(IrError::break_outside_loop(span)),
        };
        if let Some(e) = value {
            let v = self.lower_expr(e)?;
            let slot = self.break_result_slot();
            self.emit(Quad::copy(&slot, &v));
        }
        self.emit(Quad::goto(&end));
        Ok(())
    }

    fn lower_continue(&mut self, span: Span) -> IrResult<()> {
        let start = match self.loop_stack.last() {
            Some(ctx) => ctx.start.clone(),
            None => return Err(IrError::continue_outside_loop(span)),
        };
        self.emit(Quad::goto(&start));
        Ok(())
    }
}
