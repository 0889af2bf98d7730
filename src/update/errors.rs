//! Update engine error types
//!
//! An update transaction can fail in any participating subsystem; every
//! failure aborts the whole transaction and nothing partial commits
//! (VERSIONING.md §4.1). `LIN_INGEST_FAILED` covers the ingestion
//! collaborator and always names the file.

use thiserror::Error;

use crate::errors::Severity;
use crate::graph::GraphError;
use crate::node::NodeError;
use crate::version::VersionError;

/// Errors surfaced by build/update transactions.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Version(#[from] VersionError),

    /// The ingestion collaborator failed for a specific file.
    #[error("[ERROR] LIN_INGEST_FAILED: ingestion failed for {uri}: {reason}")]
    Ingest { uri: String, reason: String },
}

impl UpdateError {
    pub fn ingest(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Ingest {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable string code per ERRORS.md.
    pub fn code(&self) -> &'static str {
        match self {
            UpdateError::Node(e) => e.code(),
            UpdateError::Graph(e) => e.code(),
            UpdateError::Version(e) => e.code(),
            UpdateError::Ingest { .. } => "LIN_INGEST_FAILED",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        match self {
            UpdateError::Node(e) => e.severity(),
            UpdateError::Graph(e) => e.severity(),
            UpdateError::Version(e) => e.severity(),
            UpdateError::Ingest { .. } => Severity::Error,
        }
    }
}

/// Result type for update transactions.
pub type UpdateResult<T> = Result<T, UpdateError>;
