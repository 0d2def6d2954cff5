//! A second, much smaller walk of the same shape as `faxc_sem`'s checker,
//! used only to re-derive an expression's type where the IR generator's
//! lowering decision actually depends on it — today, exactly one place:
//! disambiguating `Expr::Index` over an array (`ALOAD`) from `Expr::Index`
//! over a tuple (`TLOAD`), since the grammar's `base[expr]` syntax accepts
//! both and the AST alone doesn't carry the answer.
//!
//! This never raises: `faxc_sem::check_program` has already rejected any
//! program for which these lookups could fail, so every fallback below is
//! dead in practice and only here to keep the function total.

use faxc_par::{BlockOrExpr, Expr, Function, Iterable, Program, Stmt};
use faxc_sem::Type;
use faxc_util::Symbol;
use indexmap::IndexMap;

pub(crate) struct TypeEnv {
    scopes: Vec<IndexMap<Symbol, Type>>,
    functions: IndexMap<Symbol, (Vec<Type>, Type)>,
}

impl TypeEnv {
    pub(crate) fn new() -> Self {
        Self { scopes: Vec::new(), functions: IndexMap::new() }
    }

    pub(crate) fn collect_functions(&mut self, program: &Program) {
        for f in &program.functions {
            let params = f.params.iter().map(|p| Type::from_ast(&p.ty)).collect();
            let ret = f.ret_type.as_ref().map(Type::from_ast).unwrap_or_else(Type::unit);
            self.functions.insert(f.name, (params, ret));
        }
    }

    pub(crate) fn enter_function(&mut self, f: &Function) {
        self.scopes.clear();
        self.push_scope();
        for p in &f.params {
            self.declare(p.name, Type::from_ast(&p.ty));
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn declare(&mut self, name: Symbol, ty: Type) {
        self.scopes
            .last_mut()
            .expect("declare outside any scope")
            .insert(name, ty);
    }

    fn lookup(&self, name: Symbol) -> Option<&Type> {
        self.scopes.iter().rev().find_map(|s| s.get(&name))
    }

    /// Updates a variable already tracked in some enclosing scope in
    /// place (mirrors `faxc_sem::Checker::lookup_mut`): a first write to an
    /// uninitialized `let` resolves its type from the assigned value, and
    /// that resolution must land in the scope where the `let` actually
    /// lives, not in whatever nested scope the assignment happens to sit
    /// in. Falls back to declaring at the top scope if somehow untracked.
    pub(crate) fn update(&mut self, name: Symbol, ty: Type) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(&name) {
                *slot = ty;
                return;
            }
        }
        self.declare(name, ty);
    }

    /// Whether `expr`, used as an `Index` base, names a tuple (`TLOAD`) as
    /// opposed to an array (`ALOAD`).
    pub(crate) fn is_tuple(&self, expr: &Expr) -> bool {
        matches!(self.infer(expr), Type::Tuple(_))
    }

    pub(crate) fn infer(&self, expr: &Expr) -> Type {
        match expr {
            Expr::Number { .. } => Type::I32,
            Expr::Variable { name, .. } => self.lookup(*name).cloned().unwrap_or(Type::I32),
            Expr::BinaryOp { op, lhs, .. } => {
                if op.is_comparison() {
                    Type::I32
                } else {
                    self.infer(lhs)
                }
            }
            Expr::UnaryOp { .. } => Type::I32,
            Expr::AddrOf { expr: inner, .. } => Type::Ref { mutable: false, to: Box::new(self.infer(inner)) },
            Expr::AddrOfMut { expr: inner, .. } => Type::Ref { mutable: true, to: Box::new(self.infer(inner)) },
            Expr::Deref { expr: inner, .. } => match self.infer(inner) {
                Type::Ref { to, .. } => *to,
                other => other,
            },
            Expr::Call { callee, .. } => self
                .functions
                .get(callee)
                .map(|(_, ret)| ret.clone())
                .unwrap_or_else(Type::unit),
            Expr::Index { base, .. } => match self.infer(base) {
                Type::Array { elem, .. } => *elem,
                Type::Tuple(elems) => elems.into_iter().next().unwrap_or_else(Type::unit),
                other => other,
            },
            Expr::TupleGet { base, index, .. } => match self.infer(base) {
                Type::Tuple(elems) => elems.into_iter().nth(*index as usize).unwrap_or_else(Type::unit),
                other => other,
            },
            Expr::Array { elems, .. } => {
                let elem = elems.first().map(|e| self.infer(e)).unwrap_or(Type::I32);
                Type::Array { elem: Box::new(elem), size: elems.len() as u64 }
            }
            Expr::Tuple { elems, .. } => Type::Tuple(elems.iter().map(|e| self.infer(e)).collect()),
            Expr::If(if_stmt) => self.infer_block_or_expr(&if_stmt.then_branch),
            Expr::Loop { body, .. } => self.infer_break_type(body),
            Expr::Block(block) => self.infer_block(block),
        }
    }

    fn infer_block_or_expr(&self, b: &BlockOrExpr) -> Type {
        match b {
            BlockOrExpr::Block(block) => self.infer_block(block),
            BlockOrExpr::Expr(e) => self.infer(e),
        }
    }

    /// A scratch copy of the enclosing scopes, so a nested block's own
    /// `let`s don't leak into the caller once inference is done.
    fn infer_block(&self, block: &faxc_par::Block) -> Type {
        let mut scratch = TypeEnv {
            scopes: self.scopes.clone(),
            functions: IndexMap::new(),
        };
        scratch.push_scope();
        let mut result = Type::unit();
        for stmt in &block.stmts {
            match stmt {
                Stmt::ExprStmt { expr, tail: true, .. } => result = scratch.infer(expr),
                Stmt::Let { name, ty, init, .. } => {
                    let ty = ty
                        .as_ref()
                        .map(Type::from_ast)
                        .or_else(|| init.as_ref().map(|e| scratch.infer(e)))
                        .unwrap_or(Type::I32);
                    scratch.declare(*name, ty);
                }
                Stmt::For { name, iterable, .. } => {
                    let Iterable::Range { .. } = iterable;
                    scratch.push_scope();
                    scratch.declare(*name, Type::I32);
                    scratch.pop_scope();
                }
                _ => {}
            }
        }
        result
    }

    /// The type every `break <expr>` inside `body` agreed on (or `()`), for
    /// a `loop` used in Index-base position — an exotic shape the grammar
    /// allows but real programs are unlikely to write.
    fn infer_break_type(&self, body: &faxc_par::Block) -> Type {
        for stmt in &body.stmts {
            if let Stmt::Break { value: Some(e), .. } = stmt {
                return self.infer(e);
            }
        }
        Type::unit()
    }
}
