//! Configuration options for the compiler.

use std::path::PathBuf;

/// Configuration options for compilation.
///
/// Class names use the internal binary form, with `/` separators.
///
/// # Example
///
/// ```
/// use tigerc_core::api::CompilerOptions;
///
/// let options = CompilerOptions {
///     class_name: "Hello".to_string(),
///     ..CompilerOptions::default()
/// };
/// assert_eq!(options.super_class, "java/lang/Object");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Name of the generated class.
    ///
    /// Default: `Main`
    pub class_name: String,

    /// Super class of the generated class.
    ///
    /// Default: `java/lang/Object`
    pub super_class: String,

    /// Class holding the runtime library functions, such as `print`.
    ///
    /// Default: `tiger/Runtime`
    pub library_class: String,

    /// Name of the generated entry point method.
    ///
    /// Default: `main`
    pub entry_point: String,

    /// Where [`Compiler::compile_to_file`](super::Compiler::compile_to_file)
    /// writes the class file.
    ///
    /// Default: `/tmp/Main.class`
    pub output_path: PathBuf,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            class_name: "Main".to_string(),
            super_class: "java/lang/Object".to_string(),
            library_class: "tiger/Runtime".to_string(),
            entry_point: "main".to_string(),
            output_path: PathBuf::from("/tmp/Main.class"),
        }
    }
}
