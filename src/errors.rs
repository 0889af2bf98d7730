//! Crate-level error handling
//!
//! Per ERRORS.md: subsystems carry their own error types with stable codes
//! and severities; `LineageError` unifies them at the facade so callers
//! match on one type.

use std::fmt;

use thiserror::Error;

use crate::graph::GraphError;
use crate::node::NodeError;
use crate::persist::PersistError;
use crate::update::UpdateError;
use crate::version::VersionError;

/// Severity levels per ERRORS.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation fails; the engine continues.
    Error,
    /// Corruption; callers should halt and investigate.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Unified error for facade-level operations.
#[derive(Debug, Error)]
pub enum LineageError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl LineageError {
    /// Stable string code of the underlying error.
    pub fn code(&self) -> &'static str {
        match self {
            LineageError::Node(e) => e.code(),
            LineageError::Graph(e) => e.code(),
            LineageError::Version(e) => e.code(),
            LineageError::Update(e) => e.code(),
            LineageError::Persist(e) => e.code(),
        }
    }

    /// Severity of the underlying error.
    pub fn severity(&self) -> Severity {
        match self {
            LineageError::Node(e) => e.severity(),
            LineageError::Graph(e) => e.severity(),
            LineageError::Version(e) => e.severity(),
            LineageError::Update(e) => e.severity(),
            LineageError::Persist(e) => e.severity(),
        }
    }
}

/// Result type for facade operations.
pub type LineageResult<T> = Result<T, LineageError>;
