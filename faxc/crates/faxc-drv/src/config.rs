//! CLI configuration (`§6`'s ambient CLI surface, `§10.3`).
//!
//! Parsed by hand from `std::env::args()`, matching the teacher driver's
//! own style: no `clap` dependency was ever pulled into `faxc-drv`, so none
//! is introduced here either.

use std::path::PathBuf;

use anyhow::{bail, Context};

/// Which artifact `faxc-drv` should print for a successful compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    Tokens,
    Ast,
    Ir,
    Asm,
}

impl Default for EmitKind {
    fn default() -> Self {
        EmitKind::Asm
    }
}

impl EmitKind {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "tokens" => Ok(EmitKind::Tokens),
            "ast" => Ok(EmitKind::Ast),
            "ir" => Ok(EmitKind::Ir),
            "asm" => Ok(EmitKind::Asm),
            other => bail!("unknown --emit kind `{other}` (expected tokens, ast, ir, or asm)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input_files: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub emit: EmitKind,
    pub verbose: bool,
}

impl Config {
    /// Parses a `Config` from a raw argument iterator (excluding `argv[0]`).
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut input_files = Vec::new();
        let mut output_file = None;
        let mut emit = EmitKind::default();
        let mut verbose = false;

        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-o" | "--output" => {
                    let path = it.next().context("-o/--output requires a path argument")?;
                    output_file = Some(PathBuf::from(path));
                }
                "-v" | "--verbose" => verbose = true,
                _ if arg.starts_with("--emit=") => {
                    emit = EmitKind::parse(&arg["--emit=".len()..])?;
                }
                "--emit" => {
                    let kind = it.next().context("--emit requires a value")?;
                    emit = EmitKind::parse(&kind)?;
                }
                _ if arg.starts_with('-') && arg != "-" => {
                    bail!("unrecognized flag `{arg}`");
                }
                _ => input_files.push(PathBuf::from(arg)),
            }
        }

        if input_files.is_empty() {
            bail!("no input files given");
        }

        Ok(Config { input_files, output_file, emit, verbose })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn parses_a_bare_input_file_with_asm_default() {
        let cfg = Config::from_args(args("main.fax")).unwrap();
        assert_eq!(cfg.input_files, vec![PathBuf::from("main.fax")]);
        assert_eq!(cfg.emit, EmitKind::Asm);
        assert!(!cfg.verbose);
    }

    #[test]
    fn parses_emit_output_and_verbose_flags() {
        let cfg = Config::from_args(args("main.fax --emit=ir -o out.s -v")).unwrap();
        assert_eq!(cfg.emit, EmitKind::Ir);
        assert_eq!(cfg.output_file, Some(PathBuf::from("out.s")));
        assert!(cfg.verbose);
    }

    #[test]
    fn missing_input_files_is_rejected() {
        assert!(Config::from_args(args("--verbose -v")).is_err());
    }

    #[test]
    fn unknown_emit_kind_is_rejected() {
        assert!(Config::from_args(args("main.fax --emit=bogus")).is_err());
    }

    #[test]
    fn unrecognized_flag_is_rejected() {
        assert!(Config::from_args(args("main.fax --frobnicate")).is_err());
    }
}
