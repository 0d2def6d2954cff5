//! The checker's resolved type values (distinct from [`faxc_par::Type`],
//! which is just the as-written syntax). Equality is structural: primitives
//! by value, arrays by element type and size, references by mutability and
//! target, tuples by element-wise equality and arity (`§4.3`).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    I32,
    Array { elem: Box<Type>, size: u64 },
    Ref { mutable: bool, to: Box<Type> },
    Tuple(Vec<Type>),
}

impl Type {
    /// Resolves a parsed type expression into its checker-side value.
    pub fn from_ast(ty: &faxc_par::Type) -> Self {
        match ty {
            faxc_par::Type::I32 => Type::I32,
            faxc_par::Type::Ref { mutable, to } => Type::Ref {
                mutable: *mutable,
                to: Box::new(Type::from_ast(to)),
            },
            faxc_par::Type::Array { elem, size } => Type::Array {
                elem: Box::new(Type::from_ast(elem)),
                size: *size,
            },
            faxc_par::Type::Tuple(elems) => {
                Type::Tuple(elems.iter().map(Type::from_ast).collect())
            }
        }
    }

    pub fn is_i32(&self) -> bool {
        matches!(self, Type::I32)
    }

    /// The empty tuple doubles as this checker's unit type: a function with
    /// no declared return type, a block with no tail expression, and a
    /// `loop` whose `break`s never carry a value all resolve to it.
    pub fn unit() -> Self {
        Type::Tuple(Vec::new())
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Type::Tuple(elems) if elems.is_empty())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::I32 => write!(f, "i32"),
            Type::Array { elem, size } => write!(f, "[{elem}; {size}]"),
            Type::Ref { mutable: true, to } => write!(f, "&mut {to}"),
            Type::Ref { mutable: false, to } => write!(f, "&{to}"),
            Type::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_equal_by_value() {
        assert_eq!(Type::I32, Type::I32);
    }

    #[test]
    fn arrays_require_both_element_and_size_equality() {
        let a = Type::Array { elem: Box::new(Type::I32), size: 3 };
        let b = Type::Array { elem: Box::new(Type::I32), size: 3 };
        let c = Type::Array { elem: Box::new(Type::I32), size: 4 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn references_require_matching_mutability() {
        let imm = Type::Ref { mutable: false, to: Box::new(Type::I32) };
        let mutb = Type::Ref { mutable: true, to: Box::new(Type::I32) };
        assert_ne!(imm, mutb);
    }

    #[test]
    fn tuples_compare_elementwise_and_by_arity() {
        let a = Type::Tuple(vec![Type::I32, Type::I32]);
        let b = Type::Tuple(vec![Type::I32, Type::I32]);
        let c = Type::Tuple(vec![Type::I32]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_renders_readable_forms() {
        let ty = Type::Array {
            elem: Box::new(Type::Ref { mutable: true, to: Box::new(Type::I32) }),
            size: 2,
        };
        assert_eq!(ty.to_string(), "[&mut i32; 2]");
    }

    /// `§8` property 5: reflexivity, symmetry, and structural closure of
    /// type equality, exercised across every `Type` shape rather than the
    /// single-form checks above. Plain unit test, not a property test —
    /// `faxc-sem` declares no property-testing dev-dependency (mirroring
    /// `faxc-par`'s property 4 test, for the same reason).
    #[test]
    fn equality_is_reflexive_symmetric_and_structural_across_every_shape() {
        let samples = vec![
            Type::I32,
            Type::unit(),
            Type::Array { elem: Box::new(Type::I32), size: 3 },
            Type::Ref { mutable: false, to: Box::new(Type::I32) },
            Type::Ref { mutable: true, to: Box::new(Type::I32) },
            Type::Tuple(vec![Type::I32, Type::I32]),
            Type::Array {
                elem: Box::new(Type::Ref { mutable: true, to: Box::new(Type::I32) }),
                size: 2,
            },
        ];

        for a in &samples {
            assert_eq!(a, a, "reflexivity failed for {a}");
        }

        for a in &samples {
            for b in &samples {
                assert_eq!(a == b, b == a, "symmetry failed for {a} vs {b}");
            }
        }

        // Structural closure: a clone built from the same fields compares
        // equal, and changing any one field breaks equality.
        let base = Type::Array { elem: Box::new(Type::I32), size: 3 };
        assert_eq!(base.clone(), base);
        assert_ne!(base, Type::Array { elem: Box::new(Type::I32), size: 4 });
        assert_ne!(
            base,
            Type::Array { elem: Box::new(Type::Ref { mutable: false, to: Box::new(Type::I32) }), size: 3 }
        );
    }

    #[test]
    fn from_ast_resolves_every_shape() {
        let ast_ty = faxc_par::Type::Tuple(vec![
            faxc_par::Type::I32,
            faxc_par::Type::Ref { mutable: false, to: Box::new(faxc_par::Type::I32) },
        ]);
        let ty = Type::from_ast(&ast_ty);
        assert_eq!(
            ty,
            Type::Tuple(vec![
                Type::I32,
                Type::Ref { mutable: false, to: Box::new(Type::I32) },
            ])
        );
    }
}
