//! faxc-gen - Naive assembly emitter.
//!
//! Consumes the flat `faxc_ir::Quad` list and produces textual x86-like
//! assembly: a mechanical, mostly one-to-one mapping with no register
//! allocation or optimization (`§1`'s "external collaborator", specified
//! only at its input contract).

mod asm;
mod error;

pub use asm::{emit_program, Emitter};
pub use error::{GenError, GenResult};
