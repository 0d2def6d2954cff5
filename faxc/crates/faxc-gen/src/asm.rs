//! Naive x86-like textual assembly emission.
//!
//! This is the "external collaborator" `§1` scopes out of the core: a
//! mostly mechanical one-to-one mapping of `faxc_ir::Quad` quadruples to
//! assembly-text lines, specified only at its input contract (an ordered
//! `&[Quad]`). No register allocation, no peephole optimization, no
//! calling-convention correctness beyond "push args, call, read `eax`" —
//! a real backend would replace this wholesale.

use crate::error::{GenError, GenResult};
use faxc_ir::Quad;

pub struct Emitter {
    out: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn into_asm(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn instr(&mut self, text: impl AsRef<str>) {
        self.out.push_str("    ");
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub fn emit_quad(&mut self, q: &Quad) -> GenResult<()> {
        match q.op.as_str() {
            "FUNC" => self.line(format!("{}:", q.arg1)),
            "ENDFUNC" => self.instr(format!("; end {}", q.arg1)),
            "PARAM" => self.instr(format!("; param {} : {} @ {}", q.arg1, q.arg2, q.res)),
            "LET" => {
                if q.arg2.is_empty() {
                    self.instr(format!("; let {}", q.arg1));
                } else {
                    self.instr(format!("mov {}, {}", q.arg1, q.arg2));
                }
            }
            "=" => self.instr(format!("mov {}, {}", q.arg1, q.arg2)),
            "+" => {
                self.instr(format!("mov {}, {}", q.res, q.arg1));
                self.instr(format!("add {}, {}", q.res, q.arg2));
            }
            "-" if !q.arg2.is_empty() => {
                self.instr(format!("mov {}, {}", q.res, q.arg1));
                self.instr(format!("sub {}, {}", q.res, q.arg2));
            }
            "-" => {
                // unary minus: §9 resolves the open question by keeping the
                // binary op symbol with an empty second argument rather
                // than a separate `-u` mnemonic.
                self.instr(format!("mov {}, {}", q.res, q.arg1));
                self.instr(format!("neg {}", q.res));
            }
            "*" => {
                self.instr(format!("mov {}, {}", q.res, q.arg1));
                self.instr(format!("imul {}, {}", q.res, q.arg2));
            }
            "/" => {
                self.instr(format!("mov eax, {}", q.arg1));
                self.instr("cdq");
                self.instr(format!("idiv {}", q.arg2));
                self.instr(format!("mov {}, eax", q.res));
            }
            "==" | "!=" | "<" | ">" | "<=" | ">=" => {
                self.instr(format!("cmp {}, {}", q.arg1, q.arg2));
                self.instr(format!("{} al", set_mnemonic(q.op.as_str())));
                self.instr(format!("movzx {}, al", q.res));
            }
            "ADDR" => self.instr(format!("lea {}, [{}]", q.res, q.arg1)),
            "LOAD" => self.instr(format!("mov {}, [{}]", q.res, q.arg1)),
            "PSTORE" => self.instr(format!("mov [{}], {}", q.arg1, q.arg2)),
            "ALOAD" => self.instr(format!("mov {}, [{} + {} * 4]", q.res, q.arg1, q.arg2)),
            "ASTORE" => self.instr(format!("mov [{} + {} * 4], {}", q.arg1, q.arg2, q.res)),
            "TLOAD" => self.instr(format!("mov {}, [{} + {} * 4]", q.res, q.arg1, q.arg2)),
            "TSTORE" => self.instr(format!("mov [{} + {} * 4], {}", q.arg1, q.arg2, q.res)),
            "ARRAY" | "TUPLE" => {
                for (i, elem) in q.arg2.split(',').filter(|s| !s.is_empty()).enumerate() {
                    self.instr(format!("mov [{} + {} * 4], {}", q.res, i, elem));
                }
            }
            "LABEL" => self.line(format!("{}:", q.arg1)),
            "GOTO" => self.instr(format!("jmp {}", q.arg1)),
            "IFZ" => {
                self.instr(format!("cmp {}, 0", q.arg1));
                self.instr(format!("je {}", q.res));
            }
            "IFNZ" => {
                self.instr(format!("cmp {}, 0", q.arg1));
                self.instr(format!("jne {}", q.res));
            }
            "ARG" => self.instr(format!("push {}", q.arg1)),
            "CALL" => {
                self.instr(format!("call {}", q.arg1));
                if let Ok(argc) = q.arg2.parse::<u32>() {
                    if argc > 0 {
                        self.instr(format!("add esp, {}", argc * 4));
                    }
                }
                self.instr(format!("mov {}, eax", q.res));
            }
            "RET" => {
                if !q.arg1.is_empty() {
                    self.instr(format!("mov eax, {}", q.arg1));
                }
                self.instr("ret");
            }
            other => return Err(GenError::UnknownOp(other.to_string())),
        }
        Ok(())
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

fn set_mnemonic(op: &str) -> &'static str {
    match op {
        "==" => "sete",
        "!=" => "setne",
        "<" => "setl",
        ">" => "setg",
        "<=" => "setle",
        ">=" => "setge",
        _ => unreachable!("only called for comparison ops"),
    }
}

/// Emits a whole IR program as one assembly-text blob, quadruple by
/// quadruple, in order.
pub fn emit_program(quads: &[Quad]) -> GenResult<String> {
    let mut emitter = Emitter::new();
    for q in quads {
        emitter.emit_quad(q)?;
    }
    Ok(emitter.into_asm())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_par::Parser;
    use faxc_sem::check_program;
    use faxc_util::span::FileId;

    fn asm(source: &str) -> String {
        let program = Parser::parse_source(source, FileId(0)).expect("fixture should parse");
        check_program(&program).expect("fixture should check");
        let quads = faxc_ir::generate_program(&program).expect("fixture should lower");
        emit_program(&quads).expect("fixture should emit")
    }

    #[test]
    fn identity_function_emits_a_label_and_a_ret() {
        let text = asm("fn main() -> i32 { let x: i32 = 1; return x; }");
        assert!(text.contains("main:"));
        assert!(text.contains("mov x, 1"));
        assert!(text.contains("mov eax, x"));
        assert!(text.contains("ret"));
    }

    #[test]
    fn binary_add_emits_mov_then_add() {
        let text = asm("fn f() -> i32 { return 1 + 2; }");
        assert!(text.contains("add"));
    }

    #[test]
    fn comparison_emits_cmp_and_setcc() {
        let text = asm("fn f() -> i32 { return 1 < 2; }");
        assert!(text.contains("cmp"));
        assert!(text.contains("setl"));
    }

    #[test]
    fn unknown_op_is_rejected_rather_than_panicking() {
        let bogus = Quad::new("NOPE", "", "", "");
        let mut emitter = Emitter::new();
        assert!(emitter.emit_quad(&bogus).is_err());
    }
}
