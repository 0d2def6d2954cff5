//! AST node definitions.
//!
//! One variant per grammar production (`§3` of the spec this parser
//! implements), as sum types rather than the tagged-map representation a
//! dynamically typed reference implementation would use. Every node keeps
//! its source [`Span`] for diagnostics downstream in `faxc-sem`/`faxc-ir`.

use faxc_util::{Span, Symbol};

/// A whole source file: an ordered sequence of function declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub functions: Vec<Function>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret_type: Option<Type>,
    pub body: FuncBody,
    pub span: Span,
}

/// A function body is either a `{ ... }` block or a bare tail expression
/// (`fn f() -> i32 42`-shaped forms are not legal Fax, but the grammar's
/// `func_body := block | expr` production is still general over both, so
/// the node keeps the distinction rather than eagerly wrapping into a
/// single-statement block).
#[derive(Clone, Debug, PartialEq)]
pub enum FuncBody {
    Block(Block),
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub mutable: bool,
    pub name: Symbol,
    pub ty: Type,
    pub span: Span,
}

/// A type expression, as written in source (not the checker's resolved
/// [`faxc_sem::types::Type`] value).
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    I32,
    Ref { mutable: bool, to: Box<Type> },
    Array { elem: Box<Type>, size: u64 },
    Tuple(Vec<Type>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Let {
        mutable: bool,
        name: Symbol,
        ty: Option<Type>,
        init: Option<Expr>,
        span: Span,
    },
    Assign {
        target: Expr,
        value: Expr,
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    If(IfStmt),
    While {
        cond: Expr,
        body: Block,
        span: Span,
    },
    For {
        name: Symbol,
        mutable: bool,
        iterable: Iterable,
        body: Block,
        span: Span,
    },
    Loop {
        body: Block,
        span: Span,
    },
    Break {
        value: Option<Expr>,
        span: Span,
    },
    Continue {
        span: Span,
    },
    /// An expression evaluated for its side effects (or, if `tail` is set,
    /// for its value as the enclosing block's result).
    ExprStmt {
        expr: Expr,
        tail: bool,
        span: Span,
    },
    Empty,
}

/// `if` as a statement is just `Stmt::If` wrapping the same node the
/// expression grammar produces; the parser only distinguishes "is this
/// `if` a tail expression" at the block level, not at the `if` node
/// itself (`§4.2` assignment/tail disambiguation).
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Box<Expr>,
    pub then_branch: Box<BlockOrExpr>,
    pub else_branch: Option<Box<BlockOrExpr>>,
    pub span: Span,
}

/// `block_or_expr` in the grammar: both arms of `if`/`loop` accept either
/// a `{ ... }` block or a bare expression.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockOrExpr {
    Block(Block),
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Iterable {
    Range { start: Box<Expr>, end: Box<Expr> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number {
        value: i64,
        span: Span,
    },
    Variable {
        name: Symbol,
        span: Span,
    },
    BinaryOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    UnaryOp {
        expr: Box<Expr>,
        span: Span,
    },
    AddrOf {
        expr: Box<Expr>,
        span: Span,
    },
    AddrOfMut {
        expr: Box<Expr>,
        span: Span,
    },
    Deref {
        expr: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Symbol,
        args: Vec<Expr>,
        span: Span,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },
    TupleGet {
        base: Box<Expr>,
        index: u32,
        span: Span,
    },
    Array {
        elems: Vec<Expr>,
        span: Span,
    },
    Tuple {
        elems: Vec<Expr>,
        span: Span,
    },
    If(IfStmt),
    Loop {
        body: Block,
        span: Span,
    },
    Block(Block),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number { span, .. }
            | Expr::Variable { span, .. }
            | Expr::BinaryOp { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::AddrOf { span, .. }
            | Expr::AddrOfMut { span, .. }
            | Expr::Deref { span, .. }
            | Expr::Call { span, .. }
            | Expr::Index { span, .. }
            | Expr::TupleGet { span, .. }
            | Expr::Array { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::Loop { span, .. } => *span,
            Expr::If(if_stmt) => if_stmt.span,
            Expr::Block(block) => block.span,
        }
    }
}
