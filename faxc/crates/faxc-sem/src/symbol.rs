//! The checker's per-variable bookkeeping: type, mutability, initialization,
//! and the live-reference list the aliasing discipline reads from (`§4.3`
//! rule 6, `§9`'s "conservative no-end-of-borrow" note).

use crate::types::Type;
use faxc_util::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefKind {
    Imm,
    Mut,
}

#[derive(Clone, Debug)]
pub struct VarSymbol {
    /// `None` until the type becomes known — either from an explicit
    /// annotation, an initializer, or the first assignment to an
    /// uninitialized `let` without one.
    pub ty: Option<Type>,
    pub mutable: bool,
    pub initialized: bool,
    /// References taken out against this variable. Never retired once
    /// recorded: a `mut` borrow here blocks every later borrow for the rest
    /// of the enclosing function.
    pub refs: Vec<RefKind>,
    /// Where this binding was declared, for diagnostics raised when its
    /// scope closes with its type still unresolved.
    pub decl_span: Span,
}

impl VarSymbol {
    pub fn new(ty: Option<Type>, mutable: bool, initialized: bool, decl_span: Span) -> Self {
        Self { ty, mutable, initialized, refs: Vec::new(), decl_span }
    }

    pub fn has_mut_ref(&self) -> bool {
        self.refs.iter().any(|r| *r == RefKind::Mut)
    }

    pub fn has_any_ref(&self) -> bool {
        !self.refs.is_empty()
    }
}
