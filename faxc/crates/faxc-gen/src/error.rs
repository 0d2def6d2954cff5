//! Error type for the naive textual emitter.
//!
//! The emitter is a mechanical, one-to-one mapping of quadruples to
//! assembly-text lines (`§1`, `§4.4`'s external collaborator): the only
//! way it can fail is a quadruple referencing a form the mapping table
//! doesn't recognize, which `faxc_ir::generate_program` is not supposed to
//! ever produce.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("internal error: unrecognized IR operation `{0}`")]
    UnknownOp(String),
}

pub type GenResult<T> = Result<T, GenError>;
