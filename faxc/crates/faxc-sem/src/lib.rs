//! faxc-sem - Semantic checker.
//!
//! Walks a validated [`faxc_par::Program`] and enforces the rules in `§4.3`:
//! declaration/initialization/mutability, the reference-aliasing discipline,
//! indexing and arity, control-flow placement, and return-type agreement.
//! The empty tuple `()` doubles as this checker's unit type, so a function
//! without a declared return type, or a block without a tail expression,
//! simply type-checks as `()` rather than needing a separate `Option<Type>`
//! threaded through every helper.

pub mod error;
pub mod symbol;
pub mod types;

pub use error::{CheckError, CheckResult};
pub use symbol::{RefKind, VarSymbol};
pub use types::Type;

use faxc_par::{BinOp, Block, BlockOrExpr, Expr, FuncBody, Function, IfStmt, Iterable, Program, Stmt};
use faxc_util::{Span, Symbol};
use indexmap::IndexMap;

/// Checks a whole program. `Ok(())` means every function passed every rule
/// in `§4.3`; the first violation aborts the whole check (`§7`: fail-fast).
pub fn check_program(program: &Program) -> CheckResult<()> {
    Checker::new().check_program(program)
}

#[derive(Clone)]
struct FuncSig {
    params: Vec<Type>,
    ret: Type,
}

struct LoopCtx {
    break_ty: Type,
    has_break: bool,
}

pub struct Checker {
    scopes: Vec<IndexMap<Symbol, VarSymbol>>,
    functions: IndexMap<Symbol, FuncSig>,
    loop_stack: Vec<LoopCtx>,
    current_return: Type,
    current_fn_name: Symbol,
}

impl Checker {
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            functions: IndexMap::new(),
            loop_stack: Vec::new(),
            current_return: Type::unit(),
            current_fn_name: Symbol::intern(""),
        }
    }

    pub fn check_program(&mut self, program: &Program) -> CheckResult<()> {
        self.collect_functions(program);
        for f in &program.functions {
            self.check_function(f)?;
        }
        Ok(())
    }

    /// First pass: populate the function table before any body is checked,
    /// so forward references between functions resolve regardless of
    /// declaration order (`§4.3`).
    fn collect_functions(&mut self, program: &Program) {
        for f in &program.functions {
            let params = f.params.iter().map(|p| Type::from_ast(&p.ty)).collect();
            let ret = f
                .ret_type
                .as_ref()
                .map(Type::from_ast)
                .unwrap_or_else(Type::unit);
            self.functions.insert(f.name, FuncSig { params, ret });
        }
    }

    fn check_function(&mut self, f: &Function) -> CheckResult<()> {
        self.scopes.clear();
        self.loop_stack.clear();
        self.current_fn_name = f.name;
        self.current_return = self.functions[&f.name].ret.clone();

        self.push_scope();
        for p in &f.params {
            let ty = Type::from_ast(&p.ty);
            self.declare(p.name, VarSymbol::new(Some(ty), p.mutable, true, p.span));
        }

        match &f.body {
            // A block body's tail value, if any, is never implicitly
            // returned: only an explicit `return` carries a value out of a
            // block (matches the IR generator's epilogue, which appends an
            // *empty* `RET`, not the tail value).
            FuncBody::Block(block) => {
                self.check_block(block)?;
            }
            // The bare-expression form is sugar for `return expr;` and is
            // checked against the declared return type directly.
            FuncBody::Expr(expr) => {
                let ty = self.check_expr(expr)?;
                let expected = self.current_return.clone();
                if ty != expected {
                    return Err(CheckError::type_mismatch(&expected, &ty, expr.span()));
                }
            }
        }

        self.pop_scope()
    }

    // ------------------------------------------------------------------
    // Scopes
    // ------------------------------------------------------------------

    fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    /// Pops the innermost scope, rejecting any binding whose type never
    /// became known (`§4.3` rule 1: a type-less `let` must be resolved by
    /// the time its scope ends).
    fn pop_scope(&mut self) -> CheckResult<()> {
        let scope = self.scopes.pop().expect("checker scope stack underflow");
        for (name, sym) in &scope {
            if sym.ty.is_none() {
                return Err(CheckError::cannot_infer(name.as_str(), sym.decl_span));
            }
        }
        Ok(())
    }

    fn declare(&mut self, name: Symbol, sym: VarSymbol) {
        self.scopes
            .last_mut()
            .expect("declare outside any scope")
            .insert(name, sym);
    }

    fn lookup(&self, name: Symbol) -> Option<&VarSymbol> {
        self.scopes.iter().rev().find_map(|s| s.get(&name))
    }

    fn lookup_mut(&mut self, name: Symbol) -> Option<&mut VarSymbol> {
        self.scopes.iter_mut().rev().find_map(|s| s.get_mut(&name))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn check_block(&mut self, block: &Block) -> CheckResult<Type> {
        self.push_scope();
        let mut result = Type::unit();
        for stmt in &block.stmts {
            match stmt {
                Stmt::ExprStmt { expr, tail: true, .. } => {
                    result = self.check_expr(expr)?;
                }
                _ => self.check_stmt(stmt)?,
            }
        }
        self.pop_scope()?;
        Ok(result)
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> CheckResult<()> {
        match stmt {
            Stmt::Let { mutable, name, ty, init, span } => self.check_let(*mutable, *name, ty, init, *span),
            Stmt::Assign { target, value, span } => {
                let value_ty = self.check_expr(value)?;
                self.check_assign(target, &value_ty, *span)
            }
            Stmt::Return { value, span } => self.check_return(value, *span),
            Stmt::If(if_stmt) => self.check_if(if_stmt).map(|_| ()),
            Stmt::While { cond, body, .. } => {
                let cond_ty = self.check_expr(cond)?;
                if !cond_ty.is_i32() {
                    return Err(CheckError::type_mismatch(&Type::I32, &cond_ty, cond.span()));
                }
                self.with_loop(|me| me.check_block(body).map(|_| ()))
            }
            Stmt::For { name, mutable, iterable, body, .. } => self.check_for(*name, *mutable, iterable, body),
            Stmt::Loop { body, .. } => self.with_loop(|me| me.check_block(body).map(|_| ())),
            Stmt::Break { value, span } => self.check_break(value, *span),
            Stmt::Continue { span } => {
                if self.loop_stack.is_empty() {
                    return Err(CheckError::continue_outside_loop(*span));
                }
                Ok(())
            }
            Stmt::ExprStmt { expr, .. } => self.check_expr(expr).map(|_| ()),
            Stmt::Empty => Ok(()),
        }
    }

    fn check_let(
        &mut self,
        mutable: bool,
        name: Symbol,
        ty: &Option<faxc_par::Type>,
        init: &Option<Expr>,
        span: Span,
    ) -> CheckResult<()> {
        let init_ty = match init {
            Some(e) => Some(self.check_expr(e)?),
            None => None,
        };
        let declared_ty = ty.as_ref().map(Type::from_ast);
        let resolved = match (declared_ty, init_ty) {
            (Some(dt), Some(it)) => {
                if dt != it {
                    return Err(CheckError::type_mismatch(&dt, &it, span));
                }
                Some(dt)
            }
            (Some(dt), None) => Some(dt),
            (None, Some(it)) => Some(it),
            (None, None) => None,
        };
        let mut sym = VarSymbol::new(resolved, mutable, init.is_some(), span);
        sym.decl_span = span;
        self.declare(name, sym);
        Ok(())
    }

    fn check_return(&mut self, value: &Option<Expr>, span: Span) -> CheckResult<()> {
        let fn_name = self.current_fn_name.as_str().to_string();
        match value {
            Some(e) => {
                let ty = self.check_expr(e)?;
                let expected = self.current_return.clone();
                if ty == expected {
                    Ok(())
                } else if expected.is_unit() {
                    Err(CheckError::return_value_not_expected(&fn_name, &ty, span))
                } else {
                    Err(CheckError::return_type_mismatch(&fn_name, &expected, &ty, span))
                }
            }
            None => {
                let expected = self.current_return.clone();
                if expected.is_unit() {
                    Ok(())
                } else {
                    Err(CheckError::return_value_expected(&fn_name, &expected, span))
                }
            }
        }
    }

    fn check_for(
        &mut self,
        name: Symbol,
        mutable: bool,
        iterable: &Iterable,
        body: &Block,
    ) -> CheckResult<()> {
        let Iterable::Range { start, end } = iterable;
        let start_ty = self.check_expr(start)?;
        if !start_ty.is_i32() {
            return Err(CheckError::type_mismatch(&Type::I32, &start_ty, start.span()));
        }
        let end_ty = self.check_expr(end)?;
        if !end_ty.is_i32() {
            return Err(CheckError::type_mismatch(&Type::I32, &end_ty, end.span()));
        }

        self.push_scope();
        self.declare(name, VarSymbol::new(Some(Type::I32), mutable, true, start.span()));
        let result = self.with_loop(|me| me.check_block(body).map(|_| ()));
        self.pop_scope()?;
        result
    }

    fn check_break(&mut self, value: &Option<Expr>, span: Span) -> CheckResult<()> {
        if self.loop_stack.is_empty() {
            return Err(CheckError::break_outside_loop(span));
        }
        let value_ty = match value {
            Some(e) => self.check_expr(e)?,
            None => Type::unit(),
        };
        let top = self.loop_stack.last_mut().expect("checked non-empty above");
        if top.has_break {
            if top.break_ty != value_ty {
                return Err(CheckError::type_mismatch(&top.break_ty, &value_ty, span));
            }
        } else {
            top.break_ty = value_ty;
            top.has_break = true;
        }
        Ok(())
    }

    /// Runs `f` with a fresh loop context pushed, for `break`/`continue`
    /// validation; used by `while`, `for`, and `loop`.
    fn with_loop<F>(&mut self, f: F) -> CheckResult<()>
    where
        F: FnOnce(&mut Self) -> CheckResult<()>,
    {
        self.loop_stack.push(LoopCtx { break_ty: Type::unit(), has_break: false });
        let result = f(self);
        self.loop_stack.pop();
        result
    }

    /// Like [`Checker::with_loop`] but returns the loop's value type (the
    /// type every `break <expr>` agreed on, or `()` if none carried a
    /// value) — used for `loop` in expression position.
    fn check_loop_body(&mut self, body: &Block) -> CheckResult<Type> {
        self.loop_stack.push(LoopCtx { break_ty: Type::unit(), has_break: false });
        let block_result = self.check_block(body);
        let ctx = self.loop_stack.pop().expect("just pushed");
        block_result?;
        Ok(ctx.break_ty)
    }

    // ------------------------------------------------------------------
    // `if`, shared between statement and expression position
    // ------------------------------------------------------------------

    fn check_if(&mut self, if_stmt: &IfStmt) -> CheckResult<Type> {
        let cond_ty = self.check_expr(&if_stmt.cond)?;
        if !cond_ty.is_i32() {
            return Err(CheckError::type_mismatch(&Type::I32, &cond_ty, if_stmt.cond.span()));
        }
        let then_ty = self.check_block_or_expr(&if_stmt.then_branch)?;
        let else_ty = match &if_stmt.else_branch {
            Some(branch) => self.check_block_or_expr(branch)?,
            None => Type::unit(),
        };
        if then_ty != else_ty {
            return Err(CheckError::type_mismatch(&then_ty, &else_ty, if_stmt.span));
        }
        Ok(then_ty)
    }

    fn check_block_or_expr(&mut self, b: &BlockOrExpr) -> CheckResult<Type> {
        match b {
            BlockOrExpr::Block(block) => self.check_block(block),
            BlockOrExpr::Expr(e) => self.check_expr(e),
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn check_expr(&mut self, expr: &Expr) -> CheckResult<Type> {
        match expr {
            Expr::Number { .. } => Ok(Type::I32),
            Expr::Variable { name, span } => self.check_variable_read(*name, *span),
            Expr::BinaryOp { op, lhs, rhs, span } => self.check_binary_op(*op, lhs, rhs, *span),
            Expr::UnaryOp { expr: inner, span } => {
                let ty = self.check_expr(inner)?;
                if !ty.is_i32() {
                    return Err(CheckError::type_mismatch(&Type::I32, &ty, *span));
                }
                Ok(Type::I32)
            }
            Expr::AddrOf { expr: inner, span } => self.check_addr_of(inner, false, *span),
            Expr::AddrOfMut { expr: inner, span } => self.check_addr_of(inner, true, *span),
            Expr::Deref { expr: inner, span } => {
                let ty = self.check_expr(inner)?;
                match ty {
                    Type::Ref { to, .. } => Ok(*to),
                    other => Err(CheckError::not_a_reference(&other, *span)),
                }
            }
            Expr::Call { callee, args, span } => self.check_call(*callee, args, *span),
            Expr::Index { base, index, span } => self.check_index(base, index, *span),
            Expr::TupleGet { base, index, span } => self.check_tuple_get(base, *index, *span),
            Expr::Array { elems, span } => self.check_array(elems, *span),
            Expr::Tuple { elems, .. } => {
                let mut tys = Vec::with_capacity(elems.len());
                for e in elems {
                    tys.push(self.check_expr(e)?);
                }
                Ok(Type::Tuple(tys))
            }
            Expr::If(if_stmt) => self.check_if(if_stmt),
            Expr::Loop { body, .. } => self.check_loop_body(body),
            Expr::Block(block) => self.check_block(block),
        }
    }

    fn check_variable_read(&self, name: Symbol, span: Span) -> CheckResult<Type> {
        let sym = self
            .lookup(name)
            .ok_or_else(|| CheckError::undeclared(name.as_str(), span))?;
        if !sym.initialized {
            return Err(CheckError::uninitialized(name.as_str(), span));
        }
        sym.ty
            .clone()
            .ok_or_else(|| CheckError::cannot_infer(name.as_str(), span))
    }

    fn check_binary_op(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: Span) -> CheckResult<Type> {
        let lt = self.check_expr(lhs)?;
        let rt = self.check_expr(rhs)?;
        if lt != rt {
            return Err(CheckError::type_mismatch(&lt, &rt, span));
        }
        if op.is_comparison() {
            Ok(Type::I32)
        } else {
            Ok(lt)
        }
    }

    /// `&e` / `&mut e`: `e` must be a bare variable (`§4.3` rule 6). Checks
    /// and records the aliasing discipline before returning the reference
    /// type.
    fn check_addr_of(&mut self, inner: &Expr, mutable: bool, span: Span) -> CheckResult<Type> {
        let Expr::Variable { name, span: var_span } = inner else {
            return Err(CheckError::new("can only take a reference to a variable", span));
        };
        let name = *name;
        let var_span = *var_span;
        let name_str = name.as_str();

        let target_ty = {
            let sym = self
                .lookup(name)
                .ok_or_else(|| CheckError::undeclared(name_str, var_span))?;
            if !sym.initialized {
                return Err(CheckError::uninitialized(name_str, var_span));
            }
            let ty = sym
                .ty
                .clone()
                .ok_or_else(|| CheckError::cannot_infer(name_str, var_span))?;
            if mutable {
                if !sym.mutable {
                    return Err(CheckError::requires_mutable_binding(name_str, span));
                }
                if sym.has_any_ref() {
                    return Err(CheckError::aliasing_conflict(name_str, span));
                }
            } else if sym.has_mut_ref() {
                return Err(CheckError::aliasing_conflict(name_str, span));
            }
            ty
        };

        let sym = self.lookup_mut(name).expect("just looked up above");
        sym.refs.push(if mutable { RefKind::Mut } else { RefKind::Imm });
        Ok(Type::Ref { mutable, to: Box::new(target_ty) })
    }

    fn check_call(&mut self, callee: Symbol, args: &[Expr], span: Span) -> CheckResult<Type> {
        let sig = self
            .functions
            .get(&callee)
            .cloned()
            .ok_or_else(|| CheckError::not_a_function(callee.as_str(), span))?;
        if sig.params.len() != args.len() {
            return Err(CheckError::arity_mismatch(
                callee.as_str(),
                sig.params.len(),
                args.len(),
                span,
            ));
        }
        for (param_ty, arg) in sig.params.iter().zip(args) {
            let arg_ty = self.check_expr(arg)?;
            if *param_ty != arg_ty {
                return Err(CheckError::type_mismatch(param_ty, &arg_ty, arg.span()));
            }
        }
        Ok(sig.ret)
    }

    fn check_index(&mut self, base: &Expr, index: &Expr, span: Span) -> CheckResult<Type> {
        let base_ty = self.check_expr(base)?;
        let index_ty = self.check_expr(index)?;
        if !index_ty.is_i32() {
            return Err(CheckError::type_mismatch(&Type::I32, &index_ty, index.span()));
        }
        match base_ty {
            Type::Array { elem, size } => {
                check_constant_array_bound(index, size)?;
                Ok(*elem)
            }
            Type::Tuple(elems) => match index {
                Expr::Number { value, span: idx_span } => {
                    let idx = constant_tuple_index(*value, elems.len(), *idx_span)?;
                    Ok(elems[idx].clone())
                }
                _ => Err(CheckError::new("tuple index must be a constant", index.span())),
            },
            other => Err(CheckError::not_indexable(&other, span)),
        }
    }

    fn check_tuple_get(&mut self, base: &Expr, index: u32, span: Span) -> CheckResult<Type> {
        let base_ty = self.check_expr(base)?;
        match base_ty {
            Type::Tuple(elems) => {
                let idx = index as usize;
                if idx >= elems.len() {
                    return Err(CheckError::tuple_field_out_of_range(
                        index,
                        elems.len().saturating_sub(1),
                        span,
                    ));
                }
                Ok(elems[idx].clone())
            }
            other => Err(CheckError::not_a_tuple(&other, span)),
        }
    }

    fn check_array(&mut self, elems: &[Expr], span: Span) -> CheckResult<Type> {
        if elems.is_empty() {
            return Err(CheckError::new(
                "array literal must have at least one element to infer its element type",
                span,
            ));
        }
        let mut iter = elems.iter();
        let first_ty = self.check_expr(iter.next().expect("non-empty checked above"))?;
        for e in iter {
            let ty = self.check_expr(e)?;
            if ty != first_ty {
                return Err(CheckError::type_mismatch(&first_ty, &ty, e.span()));
            }
        }
        Ok(Type::Array { elem: Box::new(first_ty), size: elems.len() as u64 })
    }

    // ------------------------------------------------------------------
    // Assignment targets (`§4.3` rules 3-4)
    // ------------------------------------------------------------------

    fn check_assign(&mut self, target: &Expr, value_ty: &Type, span: Span) -> CheckResult<()> {
        match target {
            Expr::Variable { name, span: var_span } => self.check_assign_variable(*name, *var_span, value_ty, span),
            Expr::Index { base, index, span: idx_span } => {
                self.check_mutable_container_base(base)?;
                self.check_assign_index(base, index, value_ty, span, *idx_span)
            }
            Expr::TupleGet { base, index, span: tg_span } => {
                self.check_mutable_container_base(base)?;
                self.check_assign_tuple_get(base, *index, value_ty, span, *tg_span)
            }
            Expr::Deref { expr: inner, span: deref_span } => self.check_assign_deref(inner, value_ty, span, *deref_span),
            _ => Err(CheckError::bad_lvalue(span)),
        }
    }

    fn check_assign_variable(
        &mut self,
        name: Symbol,
        var_span: Span,
        value_ty: &Type,
        span: Span,
    ) -> CheckResult<()> {
        let name_str = name.as_str();
        {
            let sym = self
                .lookup(name)
                .ok_or_else(|| CheckError::undeclared(name_str, var_span))?;
            if let Some(existing) = &sym.ty {
                if existing != value_ty {
                    return Err(CheckError::type_mismatch(existing, value_ty, span));
                }
            }
            // First write to an uninitialized binding is allowed without `mut`.
            if sym.initialized && !sym.mutable {
                return Err(CheckError::not_mutable(name_str, span));
            }
        }
        let sym = self.lookup_mut(name).expect("just looked up above");
        if sym.ty.is_none() {
            sym.ty = Some(value_ty.clone());
        }
        sym.initialized = true;
        Ok(())
    }

    /// Only a bare variable is a legal base for an indexed/tuple-field
    /// assignment target, and it must be `mut` (`§4.3` rules 3-4).
    fn check_mutable_container_base(&self, base: &Expr) -> CheckResult<()> {
        match base {
            Expr::Variable { name, span } => {
                let sym = self
                    .lookup(*name)
                    .ok_or_else(|| CheckError::undeclared(name.as_str(), *span))?;
                if !sym.mutable {
                    return Err(CheckError::not_mutable(name.as_str(), *span));
                }
                Ok(())
            }
            other => Err(CheckError::bad_lvalue(other.span())),
        }
    }

    fn check_assign_index(
        &mut self,
        base: &Expr,
        index: &Expr,
        value_ty: &Type,
        span: Span,
        idx_span: Span,
    ) -> CheckResult<()> {
        let base_ty = self.check_expr(base)?;
        let index_ty = self.check_expr(index)?;
        if !index_ty.is_i32() {
            return Err(CheckError::type_mismatch(&Type::I32, &index_ty, index.span()));
        }
        let elem_ty = match base_ty {
            Type::Array { elem, size } => {
                check_constant_array_bound(index, size)?;
                *elem
            }
            other => return Err(CheckError::not_indexable(&other, idx_span)),
        };
        if elem_ty != *value_ty {
            return Err(CheckError::type_mismatch(&elem_ty, value_ty, span));
        }
        Ok(())
    }

    fn check_assign_tuple_get(
        &mut self,
        base: &Expr,
        index: u32,
        value_ty: &Type,
        span: Span,
        tg_span: Span,
    ) -> CheckResult<()> {
        let base_ty = self.check_expr(base)?;
        let field_ty = match base_ty {
            Type::Tuple(elems) => {
                let idx = index as usize;
                if idx >= elems.len() {
                    return Err(CheckError::tuple_field_out_of_range(
                        index,
                        elems.len().saturating_sub(1),
                        tg_span,
                    ));
                }
                elems[idx].clone()
            }
            other => return Err(CheckError::not_a_tuple(&other, tg_span)),
        };
        if field_ty != *value_ty {
            return Err(CheckError::type_mismatch(&field_ty, value_ty, span));
        }
        Ok(())
    }

    fn check_assign_deref(
        &mut self,
        inner: &Expr,
        value_ty: &Type,
        span: Span,
        deref_span: Span,
    ) -> CheckResult<()> {
        let inner_ty = self.check_expr(inner)?;
        match inner_ty {
            Type::Ref { mutable: true, to } => {
                if *to != *value_ty {
                    return Err(CheckError::type_mismatch(&to, value_ty, span));
                }
                Ok(())
            }
            Type::Ref { mutable: false, .. } => {
                Err(CheckError::new("cannot assign through an immutable reference", deref_span))
            }
            other => Err(CheckError::not_a_reference(&other, deref_span)),
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

fn check_constant_array_bound(index: &Expr, size: u64) -> CheckResult<()> {
    if let Expr::Number { value, span } = index {
        if *value < 0 || *value as u64 >= size {
            return Err(CheckError::index_out_of_range(*value as u64, size.saturating_sub(1), *span));
        }
    }
    Ok(())
}

fn constant_tuple_index(value: i64, len: usize, span: Span) -> CheckResult<usize> {
    if value < 0 || value as usize >= len {
        return Err(CheckError::tuple_field_out_of_range(value as u32, len.saturating_sub(1), span));
    }
    Ok(value as usize)
}
