//! The compiler facade.

use std::path::Path;

use tracing::debug;

use super::{CompiledModule, CompilerOptions, Error};
use crate::ast::Expression;
use crate::builtins::Builtins;
use crate::compiler;

/// Compiles program trees with a fixed set of builtins and options.
#[derive(Debug, Default)]
pub struct Compiler {
    builtins: Builtins,
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            builtins: Builtins::new(),
            options,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Compile `program` into class file bytes.
    pub fn compile(&self, program: &Expression) -> Result<CompiledModule, Error> {
        Ok(compiler::compile(program, &self.builtins, &self.options)?)
    }

    /// Compile `program` and write the class file to the configured
    /// output path.
    pub fn compile_to_file(&self, program: &Expression) -> Result<CompiledModule, Error> {
        self.compile_to(program, &self.options.output_path)
    }

    /// Compile `program` and write the class file to `path`.
    pub fn compile_to(&self, program: &Expression, path: impl AsRef<Path>) -> Result<CompiledModule, Error> {
        let path = path.as_ref();
        let module = self.compile(program)?;
        module.write_to(path).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Wrote {} bytes to {}", module.bytes().len(), path.display());
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_to_writes_class_file() {
        let b = AstBuilder::new();
        let program = b.call("print", vec![b.string("hello")]);
        let path = std::env::temp_dir().join(format!("tigerc-{}.class", std::process::id()));

        let compiler = Compiler::default();
        let module = compiler.compile_to(&program, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(written, module.bytes());
    }

    #[test]
    fn test_output_error_names_path() {
        let b = AstBuilder::new();
        let program = b.block(vec![]);
        let path = std::env::temp_dir()
            .join("tigerc-missing-dir")
            .join("nested")
            .join("Main.class");

        let err = Compiler::default().compile_to(&program, &path).unwrap_err();
        assert!(matches!(err, Error::Output { ref path, .. } if path.ends_with("Main.class")));
        assert!(err.to_string().starts_with("failed to write"));
    }

    #[test]
    fn test_default_options() {
        let compiler = Compiler::default();
        assert_eq!(compiler.options().class_name, "Main");
        assert_eq!(compiler.options().output_path, Path::new("/tmp/Main.class"));
    }
}
