//! Public error types for the compiler API.
//!
//! Internal errors are converted to these public types at API boundaries.
//! Problems the passes can recover from are not errors; they are reported as
//! [`Diagnostic`]s next to the result.

use core::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::ast::NodeId;
use crate::compiler::CompileError;

/// Public error type for all compiler operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Code generation or class file emission failed.
    #[error(transparent)]
    Compilation(#[from] CompileError),

    /// The class file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A diagnostic message produced by a pass, attached to a node when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Expression the diagnostic is about.
    pub node: Option<NodeId>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, node: Option<NodeId>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            node,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(node) = self.node {
            write!(f, " (at {node})")?;
        }
        Ok(())
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - compilation cannot succeed.
    Error,
    /// Warning - suspicious code that might be wrong.
    Warning,
    /// Info - informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}
