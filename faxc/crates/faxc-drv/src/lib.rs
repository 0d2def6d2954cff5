//! faxc-drv - Compiler driver.
//!
//! Sequences lexer → parser → checker → IR generator → (naive) emitter for
//! one compilation unit (`§2`, `§6`), converting whichever stage fails into
//! a single [`CompileError`] the CLI binary categorizes as "syntax" or
//! "other" and reports. Unlike the front-end library crates, this crate
//! depends on `anyhow` at its own boundary only (`main.rs`); [`compile`]
//! itself returns a typed `Result`.

mod config;
mod error;
mod session;

pub use config::{Config, EmitKind};
pub use error::{CompileError, ErrorCategory};
pub use session::Session;

use faxc_ir::Quad;
use faxc_lex::{Lexer, Token};
use faxc_par::{Parser, Program};
use faxc_util::span::FileId;

/// Every artifact the pipeline produced, regardless of where it stopped.
///
/// `§7`: "a best-effort token list is still returned so downstream tools
/// ... can display lexical progress up to the failure" — `tokens` is always
/// populated (the lexer cannot fail, `§4.1`); the rest are `None` once the
/// stage that would have produced them never ran.
#[derive(Default)]
pub struct CompileArtifacts {
    pub tokens: Vec<Token>,
    pub program: Option<Program>,
    pub ir: Option<Vec<Quad>>,
    pub asm: Option<String>,
}

/// Runs the full pipeline over one source file's contents.
///
/// Fail-fast (`§7`): the first stage to error stops the pipeline, and the
/// artifacts produced by every stage up to and including that point are
/// still returned alongside the error.
pub fn compile(source: &str, file_id: FileId) -> (CompileArtifacts, Result<(), CompileError>) {
    let mut artifacts = CompileArtifacts::default();

    let mut lexer = Lexer::new(source, file_id);
    artifacts.tokens = lexer.drain().to_vec();

    let program = match Parser::parse_source(source, file_id) {
        Ok(program) => program,
        Err(e) => return (artifacts, Err(e.into())),
    };
    artifacts.program = Some(program);
    let program = artifacts.program.as_ref().expect("just set");

    if let Err(e) = faxc_sem::check_program(program) {
        return (artifacts, Err(e.into()));
    }

    let ir = match faxc_ir::generate_program(program) {
        Ok(ir) => ir,
        Err(e) => return (artifacts, Err(e.into())),
    };
    artifacts.ir = Some(ir);
    let ir = artifacts.ir.as_ref().expect("just set");

    let asm = match faxc_gen::emit_program(ir) {
        Ok(asm) => asm,
        Err(e) => return (artifacts, Err(e.into())),
    };
    artifacts.asm = Some(asm);

    (artifacts, Ok(()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_identity_function_compiles_end_to_end() {
        let (artifacts, result) =
            compile("fn main() -> i32 { let x: i32 = 1; return x; }", FileId(0));
        result.expect("should compile");
        assert!(artifacts.asm.unwrap().contains("main:"));
    }

    #[test]
    fn a_syntax_error_still_returns_a_best_effort_token_list() {
        let (artifacts, result) = compile("fn main( { }", FileId(0));
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert!(!artifacts.tokens.is_empty());
        assert!(artifacts.tokens.last().unwrap().is_eof());
        assert!(artifacts.program.is_none());
    }

    #[test]
    fn a_semantic_error_stops_before_ir_generation() {
        let (artifacts, result) = compile("fn main() { let x: i32 = 1; x = 2; }", FileId(0));
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert!(artifacts.program.is_some());
        assert!(artifacts.ir.is_none());
    }
}
