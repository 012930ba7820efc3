//! tigerc - middle and back end of a Tiger compiler targeting the JVM
//!
//! # Overview
//!
//! Programs arrive as syntax trees built with [`AstBuilder`]. The compiler
//! resolves the scopes of every node, infers a type for every expression and
//! lowers the tree into the `main` method of a JVM class file.
//!
//! Lowering is staged: string constants and calls to runtime library
//! functions (`print`) produce instructions, every other construct is
//! traversed without emitting anything.
//!
//! # Quick Start
//!
//! ```
//! use tigerc::{AstBuilder, Compiler, CompilerOptions};
//!
//! let b = AstBuilder::new();
//! let program = b.let_in(vec![], vec![b.call("print", vec![b.string("hello")])]);
//!
//! let compiler = Compiler::new(CompilerOptions::default());
//! let module = compiler.compile(&program).unwrap();
//! assert!(module.diagnostics().is_empty());
//! assert_eq!(&module.bytes()[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
//! ```
//!
//! # Diagnostics
//!
//! Unresolved names never fail compilation. They are typed `???` and
//! reported as warnings on the [`CompiledModule`].

// Re-export public API from tigerc_core
pub use tigerc_core::api::{
    CompiledModule, Compiler, CompilerOptions, Diagnostic, Error, Severity,
};

// Re-export the tree model and the passes
pub use tigerc_core::ast::{self, AstBuilder, BinaryOp, Declaration, Expression, LValue, NodeId, Type};
pub use tigerc_core::{analyzer, builtins, classfile, namespace, resolve, visitor};

// Re-export errors
pub use tigerc_core::classfile::EmitError;
pub use tigerc_core::compiler::CompileError;
