//! Code generation errors.

use thiserror::Error;

use crate::classfile::EmitError;

/// Errors that can occur during code generation.
///
/// These are resource limit errors of the class file format, or a generator
/// left without an output target. Inference problems never reach this point.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// Every code block opened by the generator has been closed.
    #[error("No open code block to emit into")]
    NoCodeBlock,
}
