//! Node store error types
//!
//! Per ERRORS.md:
//! - LIN_NODE_NOT_FOUND (ERROR severity)
//! - LIN_DATA_CORRUPTION (FATAL severity)

use std::fmt;

use crate::errors::Severity;

use super::record::NodeId;

/// Node store errors. Every variant names the offending node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// Unknown node id.
    NotFound(NodeId),

    /// Stored content hash does not match the hash recomputed from content.
    Corruption {
        id: NodeId,
        expected: String,
        actual: String,
    },
}

impl NodeError {
    /// Returns the stable string code per ERRORS.md.
    pub fn code(&self) -> &'static str {
        match self {
            NodeError::NotFound(_) => "LIN_NODE_NOT_FOUND",
            NodeError::Corruption { .. } => "LIN_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        match self {
            NodeError::NotFound(_) => Severity::Error,
            NodeError::Corruption { .. } => Severity::Fatal,
        }
    }

    /// Returns whether this error is fatal (corruption).
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::NotFound(id) => {
                write!(f, "[{}] {}: unknown node {}", self.severity(), self.code(), id)
            }
            NodeError::Corruption {
                id,
                expected,
                actual,
            } => write!(
                f,
                "[{}] {}: content hash mismatch for {} (stored {}, recomputed {})",
                self.severity(),
                self.code(),
                id,
                expected,
                actual
            ),
        }
    }
}

impl std::error::Error for NodeError {}

/// Result type for node store operations.
pub type NodeResult<T> = Result<T, NodeError>;
