//! `faxc` - the command-line driver binary.
//!
//! Usage: `faxc [--emit=tokens|ast|ir|asm] [-o FILE] [-v] FILE...`. Each
//! input file is compiled independently; the first failure aborts with a
//! non-zero exit code, after every prior file's output has already been
//! written (`§6`, `§7`).

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use faxc_drv::{compile, Config, EmitKind, Session};

fn main() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1)).context("failed to parse arguments")?;
    let mut session = Session::new();

    for path in &config.input_files {
        run_one(&config, &mut session, path)?;
    }

    Ok(())
}

fn run_one(config: &Config, session: &mut Session, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;
    let file_id = session.add_file(path.display().to_string(), source.clone());

    if config.verbose {
        eprintln!("compiling `{}`", path.display());
    }

    let (artifacts, result) = compile(&source, file_id);

    if config.verbose {
        eprintln!("lexed {} token(s)", artifacts.tokens.len());
    }

    if let Err(err) = result {
        let category = match err.category() {
            faxc_drv::ErrorCategory::Syntax => "syntax",
            faxc_drv::ErrorCategory::Other => "other",
        };
        let position = match err.span() {
            Some(span) => format!(" at offset {}", span.start),
            None => String::new(),
        };
        session
            .handler
            .build_error(err.span().unwrap_or_default(), format!("{category} error: {err}{position}"))
            .emit(&session.handler);
        anyhow::bail!("{category} error in `{}`: {err}{position}", path.display());
    }

    let rendered = match config.emit {
        EmitKind::Tokens => artifacts
            .tokens
            .iter()
            .map(|t| format!("{}\t{}\t{:?}", t.pos(), t.tag_name(), t.kind))
            .collect::<Vec<_>>()
            .join("\n"),
        EmitKind::Ast => format!("{:#?}", artifacts.program.expect("compile succeeded")),
        EmitKind::Ir => artifacts
            .ir
            .expect("compile succeeded")
            .iter()
            .map(|q| q.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        EmitKind::Asm => artifacts.asm.expect("compile succeeded"),
    };

    match &config.output_file {
        Some(out) => {
            fs::write(out, rendered.as_bytes())
                .with_context(|| format!("failed to write `{}`", out.display()))?;
        }
        None => {
            std::io::stdout().write_all(rendered.as_bytes())?;
            println!();
        }
    }

    Ok(())
}
