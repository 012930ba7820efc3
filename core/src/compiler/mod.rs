//! Code generation for Tiger programs.
//!
//! [`compile`] runs the whole pipeline over a tree: scope resolution, type
//! inference, then a [`CodeGenerator`] pass that lowers the tree into the
//! entry point method of a JVM class.
//!
//! ## Design
//!
//! - Uses the [`ExpressionVisitor`](crate::visitor::ExpressionVisitor)
//!   default traversal; only string constants and library calls are lowered
//! - Values are not pushed when visited but kept as pending
//!   [`Pushable`](crate::classfile::Pushable)s, pushed by the call consuming them
//! - Tracks stack depth exactly for the method's `max_stack`

mod codegen;
mod error;


pub use codegen::CodeGenerator;
pub use error::CompileError;

use std::path::Path;

use tracing::debug;

use crate::analyzer::{TypeTable, infer_types};
use crate::api::{CompilerOptions, Diagnostic};
use crate::ast::Expression;
use crate::builtins::Builtins;
use crate::classfile::{ACC_PUBLIC, ACC_STATIC, Opcode, Program};
use crate::resolve::resolve;

/// Descriptor of the generated entry point: `static void main(String[])`.
pub const ENTRY_POINT_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// A compiled class file with what the passes learned on the way.
#[derive(Debug)]
pub struct CompiledModule {
    bytes: Vec<u8>,
    types: TypeTable,
    diagnostics: Vec<Diagnostic>,
}

impl CompiledModule {
    /// Class file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Inferred type of every expression.
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Resolution diagnostics followed by inference diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

/// Compile `root` into a class whose entry point evaluates it.
pub fn compile(
    root: &Expression,
    builtins: &Builtins,
    options: &CompilerOptions,
) -> Result<CompiledModule, CompileError> {
    let scopes = resolve(root, builtins);
    let analysis = infer_types(root, &scopes);

    let mut diagnostics = scopes.diagnostics().to_vec();
    diagnostics.extend(analysis.diagnostics);

    let mut program = Program::java_program(options);
    let mut generator = CodeGenerator::new(&mut program);
    generator.generate(root)?;
    let mut code = generator.finish()?;
    code.emit(Opcode::Return);

    program.define_function(
        ACC_PUBLIC | ACC_STATIC,
        &options.entry_point,
        ENTRY_POINT_DESCRIPTOR,
        &code,
    )?;

    let mut bytes = Vec::new();
    program.emit(&mut bytes)?;
    debug!(
        "Compiled {}: {} bytes, {} diagnostics",
        options.class_name,
        bytes.len(),
        diagnostics.len()
    );

    Ok(CompiledModule {
        bytes,
        types: analysis.types,
        diagnostics,
    })
}
