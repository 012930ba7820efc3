//! Public API of the Tiger compiler back end.
//!
//! A [`Compiler`] holds the builtin declarations and the options, and turns
//! program trees into class files.
//!
//! # Example
//!
//! ```
//! use tigerc_core::api::{Compiler, CompilerOptions};
//! use tigerc_core::ast::AstBuilder;
//!
//! let b = AstBuilder::new();
//! let program = b.call("print", vec![b.string("hello")]);
//!
//! let compiler = Compiler::new(CompilerOptions::default());
//! let module = compiler.compile(&program).unwrap();
//! assert_eq!(&module.bytes()[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

pub mod compiler;
pub mod error;
pub mod options;

pub use crate::compiler::CompiledModule;
pub use compiler::Compiler;
pub use error::{Diagnostic, Error, Severity};
pub use options::CompilerOptions;
