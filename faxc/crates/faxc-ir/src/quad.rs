//! The quadruple: `(op, arg1, arg2, res)`, all string-valued (`§3`, `§4.4`).
//!
//! Each constructor below corresponds to exactly one row of the normative
//! operation table; the column order of the table *is* the field mapping
//! (e.g. `ASTORE | arr, idx, val` stores `arr` in `arg1`, `idx` in `arg2`,
//! and reuses the `res` slot for `val` since a quadruple only has three
//! operand-shaped fields and a store has no result to report).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Quad {
    pub op: String,
    pub arg1: String,
    pub arg2: String,
    pub res: String,
}

impl Quad {
    pub fn new(op: impl Into<String>, arg1: impl Into<String>, arg2: impl Into<String>, res: impl Into<String>) -> Self {
        Self { op: op.into(), arg1: arg1.into(), arg2: arg2.into(), res: res.into() }
    }

    pub fn func(name: &str) -> Self {
        Self::new("FUNC", name, "", "")
    }

    pub fn endfunc(name: &str) -> Self {
        Self::new("ENDFUNC", name, "", "")
    }

    pub fn param(name: &str, ty: &str, index: usize) -> Self {
        Self::new("PARAM", name, ty, index.to_string())
    }

    pub fn let_decl(name: &str, init: &str) -> Self {
        Self::new("LET", name, init, "")
    }

    pub fn copy(dst: &str, src: &str) -> Self {
        Self::new("=", dst, src, "")
    }

    pub fn binary(op: &str, a: &str, b: &str, res: &str) -> Self {
        Self::new(op, a, b, res)
    }

    /// Unary minus, emitted with the binary op symbol `-` and an empty
    /// second argument (`§9` open-question resolution: no separate `-u`).
    pub fn unary_neg(a: &str, res: &str) -> Self {
        Self::new("-", a, "", res)
    }

    pub fn addr(v: &str, res: &str) -> Self {
        Self::new("ADDR", v, "", res)
    }

    pub fn load(p: &str, res: &str) -> Self {
        Self::new("LOAD", p, "", res)
    }

    pub fn pstore(p: &str, val: &str) -> Self {
        Self::new("PSTORE", p, val, "")
    }

    pub fn aload(arr: &str, idx: &str, res: &str) -> Self {
        Self::new("ALOAD", arr, idx, res)
    }

    pub fn astore(arr: &str, idx: &str, val: &str) -> Self {
        Self::new("ASTORE", arr, idx, val)
    }

    pub fn tload(tup: &str, k: &str, res: &str) -> Self {
        Self::new("TLOAD", tup, k, res)
    }

    pub fn tstore(tup: &str, k: &str, val: &str) -> Self {
        Self::new("TSTORE", tup, k, val)
    }

    pub fn array(n: usize, csv: &str, res: &str) -> Self {
        Self::new("ARRAY", n.to_string(), csv, res)
    }

    pub fn tuple(n: usize, csv: &str, res: &str) -> Self {
        Self::new("TUPLE", n.to_string(), csv, res)
    }

    pub fn label(name: &str) -> Self {
        Self::new("LABEL", name, "", "")
    }

    pub fn goto(target: &str) -> Self {
        Self::new("GOTO", target, "", "")
    }

    pub fn ifz(cond: &str, target: &str) -> Self {
        Self::new("IFZ", cond, "", target)
    }

    pub fn ifnz(cond: &str, target: &str) -> Self {
        Self::new("IFNZ", cond, "", target)
    }

    pub fn arg(value: &str, index: usize) -> Self {
        Self::new("ARG", value, "", index.to_string())
    }

    pub fn call(name: &str, argc: usize, res: &str) -> Self {
        Self::new("CALL", name, argc.to_string(), res)
    }

    pub fn ret(value: &str) -> Self {
        Self::new("RET", value, "", "")
    }

    pub fn is_label(&self) -> bool {
        self.op == "LABEL"
    }

    pub fn label_name(&self) -> Option<&str> {
        self.is_label().then_some(self.arg1.as_str())
    }

    /// The label name this op branches to, if it branches at all. `GOTO`
    /// carries its target in `arg1`; `IFZ`/`IFNZ` carry theirs in `res`
    /// (the table's `label` column), matching the constructors above.
    pub fn branch_target(&self) -> Option<&str> {
        match self.op.as_str() {
            "GOTO" => Some(self.arg1.as_str()),
            "IFZ" | "IFNZ" => Some(self.res.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for field in [&self.arg1, &self.arg2, &self.res] {
            if !field.is_empty() {
                write!(f, " {field}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_omits_empty_fields() {
        assert_eq!(Quad::label("L0").to_string(), "LABEL L0");
        assert_eq!(Quad::copy("x", "1").to_string(), "= x 1");
    }

    #[test]
    fn branch_targets_read_from_the_right_field() {
        assert_eq!(Quad::goto("L1").branch_target(), Some("L1"));
        assert_eq!(Quad::ifz("t0", "L2").branch_target(), Some("L2"));
        assert_eq!(Quad::ifnz("t0", "L3").branch_target(), Some("L3"));
        assert_eq!(Quad::copy("x", "1").branch_target(), None);
    }
}
