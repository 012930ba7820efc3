//! Middle and back end of a Tiger compiler.
//!
//! A program tree built with [`ast::AstBuilder`] goes through three passes,
//! each over the whole tree:
//!
//! 1. [`resolve`] records the type and value scopes visible at every node,
//! 2. [`analyzer`] infers a type id for every expression,
//! 3. [`compiler`] generates instructions into a [`classfile::Program`],
//!    which serializes to a JVM class file.
//!
//! [`api::Compiler`] runs the whole pipeline.

pub mod analyzer;
pub mod api;
pub mod ast;
pub mod builtins;
pub mod classfile;
pub mod compiler;
pub mod namespace;
pub mod resolve;
pub mod visitor;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_type_inference() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
