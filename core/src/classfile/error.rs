//! Class file emission errors.

use std::io;

use thiserror::Error;

/// Errors that can occur while building or writing a class file.
///
/// Apart from I/O, these are format limits that only very large programs
/// can hit.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("I/O error while writing class file")]
    Io(#[from] io::Error),

    /// Constant pool indices are 16 bits wide.
    #[error("Too many constants (limit: 65534)")]
    ConstantPoolOverflow,

    /// Utf8 constants hold at most 65535 encoded bytes.
    #[error("String constant too long ({len} bytes, limit: 65535)")]
    StringTooLong { len: usize },

    #[error("Code of method '{method}' too large ({len} bytes, limit: 65535)")]
    CodeTooLarge { method: String, len: usize },

    #[error("Attribute too large ({len} bytes)")]
    AttributeTooLarge { len: usize },

    #[error("Too many methods (limit: 65535)")]
    TooManyMethods,
}
