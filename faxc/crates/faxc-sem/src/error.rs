//! Checker error type.

use crate::types::Type;
use faxc_util::Span;
use thiserror::Error;

/// A semantic error: the AST parsed fine but violates one of the checker's
/// rules (`§4.3`, `§7`'s semantic error bucket).
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message} at offset {span_start}", span_start = span.start)]
pub struct CheckError {
    pub message: String,
    pub span: Span,
}

pub type CheckResult<T> = Result<T, CheckError>;

impl CheckError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }

    pub fn undeclared(name: &str, span: Span) -> Self {
        Self::new(format!("undeclared name `{name}`"), span)
    }

    pub fn not_a_function(name: &str, span: Span) -> Self {
        Self::new(format!("`{name}` is not a declared function"), span)
    }

    pub fn uninitialized(name: &str, span: Span) -> Self {
        Self::new(format!("use of uninitialized variable `{name}`"), span)
    }

    pub fn not_mutable(name: &str, span: Span) -> Self {
        Self::new(format!("cannot assign to `{name}`: not mutable"), span)
    }

    pub fn cannot_infer(name: &str, span: Span) -> Self {
        Self::new(format!("could not infer a type for `{name}`"), span)
    }

    pub fn type_mismatch(expected: &Type, found: &Type, span: Span) -> Self {
        Self::new(format!("type mismatch: expected `{expected}`, found `{found}`"), span)
    }

    pub fn index_out_of_range(index: u64, max: u64, span: Span) -> Self {
        Self::new(
            format!("index {index} out of range [0, {max}]"),
            span,
        )
    }

    pub fn aliasing_conflict(name: &str, span: Span) -> Self {
        Self::new(
            format!("cannot borrow `{name}`: a conflicting reference is still live"),
            span,
        )
    }

    pub fn requires_mutable_binding(name: &str, span: Span) -> Self {
        Self::new(
            format!("cannot borrow `{name}` as mutable: binding is not `mut`"),
            span,
        )
    }

    pub fn bad_lvalue(span: Span) -> Self {
        Self::new("invalid assignment target", span)
    }

    pub fn not_a_reference(found: &Type, span: Span) -> Self {
        Self::new(format!("cannot dereference a value of type `{found}`", ), span)
    }

    pub fn not_indexable(found: &Type, span: Span) -> Self {
        Self::new(format!("type `{found}` cannot be indexed"), span)
    }

    pub fn not_a_tuple(found: &Type, span: Span) -> Self {
        Self::new(format!("type `{found}` has no tuple fields"), span)
    }

    pub fn tuple_field_out_of_range(index: u32, max: usize, span: Span) -> Self {
        Self::new(format!("tuple field `.{index}` out of range [0, {max}]"), span)
    }

    pub fn arity_mismatch(name: &str, expected: usize, found: usize, span: Span) -> Self {
        Self::new(
            format!("function `{name}` expects {expected} argument(s), found {found}"),
            span,
        )
    }

    pub fn break_outside_loop(span: Span) -> Self {
        Self::new("`break` outside of a loop", span)
    }

    pub fn continue_outside_loop(span: Span) -> Self {
        Self::new("`continue` outside of a loop", span)
    }

    pub fn return_type_mismatch(name: &str, expected: &Type, found: &Type, span: Span) -> Self {
        Self::new(
            format!("function `{name}` returns `{expected}`, found `{found}`"),
            span,
        )
    }

    pub fn return_value_not_expected(name: &str, found: &Type, span: Span) -> Self {
        Self::new(
            format!("function `{name}` has no return type, but `return` carries a value of type `{found}`"),
            span,
        )
    }

    pub fn return_value_expected(name: &str, expected: &Type, span: Span) -> Self {
        Self::new(
            format!("function `{name}` must return a value of type `{expected}`"),
            span,
        )
    }
}
