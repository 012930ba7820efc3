//! Code generator implementation.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::ast::Expression;
use crate::classfile::{CodeBlock, Invocable, Program, Pushable, is_library_function};
use crate::visitor::{CONTINUE, ExpressionVisitor, Flow, STOP};

use super::CompileError;

/// Lowers an analyzed tree into instructions of a [`Program`].
///
/// The generator keeps two stacks:
/// - open code blocks; instructions go to the innermost one,
/// - pending values, not pushed yet, waiting for the call that consumes them.
pub struct CodeGenerator<'p> {
    program: &'p mut Program,

    /// Open code blocks, innermost last
    code_blocks: Vec<CodeBlock>,

    /// Values waiting to be pushed, most recent last
    pushables: Vec<Box<dyn Pushable>>,

    /// First failure; stops the traversal
    error: Option<CompileError>,
}

impl<'p> CodeGenerator<'p> {
    /// A generator with one open code block.
    pub fn new(program: &'p mut Program) -> Self {
        Self {
            program,
            code_blocks: vec![CodeBlock::new()],
            pushables: Vec::new(),
            error: None,
        }
    }

    /// Open a nested code block; instructions go there until it is closed.
    pub fn open_block(&mut self) {
        self.code_blocks.push(CodeBlock::new());
    }

    /// Close the innermost code block.
    pub fn close_block(&mut self) -> Option<CodeBlock> {
        self.code_blocks.pop()
    }

    /// Number of values waiting to be pushed.
    pub fn pending_values(&self) -> usize {
        self.pushables.len()
    }

    /// Generate code for `root` into the innermost open block.
    pub fn generate(&mut self, root: &Expression) -> Result<(), CompileError> {
        let _ = root.accept(self);
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Close the last code block and return it.
    pub fn finish(mut self) -> Result<CodeBlock, CompileError> {
        if !self.pushables.is_empty() {
            debug!("Dropping {} unused values", self.pushables.len());
        }
        self.code_blocks.pop().ok_or(CompileError::NoCodeBlock)
    }

    fn fail(&mut self, err: impl Into<CompileError>) -> Flow {
        self.error = Some(err.into());
        STOP
    }
}

impl<'ast> ExpressionVisitor<'ast> for CodeGenerator<'_> {
    fn visit_string_constant(&mut self, text: &'ast str) -> Flow {
        match self.program.define_string_constant(text) {
            Ok(constant) => {
                trace!(index = constant.index(), "String constant {text:?}");
                self.pushables.push(Box::new(constant));
                CONTINUE
            }
            Err(err) => self.fail(err),
        }
    }

    fn visit_function_call(&mut self, id: &'ast str, args: &'ast [Rc<Expression>]) -> Flow {
        for arg in args {
            arg.accept(self)?;
        }

        // Only library functions are lowered; other calls are evaluated for
        // their arguments alone.
        if !is_library_function(id) {
            debug!("Call to {id} not lowered");
            return CONTINUE;
        }
        if self.pushables.is_empty() {
            debug!("Call to {id} has no value to push");
            return CONTINUE;
        }

        let function = match self.program.lookup_library_function(id) {
            Ok(Some(function)) => function,
            Ok(None) => return CONTINUE,
            Err(err) => return self.fail(err),
        };
        // The most recent pending value, even if an earlier call left it
        let Some(value) = self.pushables.pop() else {
            return CONTINUE;
        };
        let Some(code) = self.code_blocks.last_mut() else {
            return self.fail(CompileError::NoCodeBlock);
        };

        trace!("Lowering {id}: push {value:?}, invoke {function:?}");
        value.push(code);
        function.invoke(code);
        CONTINUE
    }
}
