//! Lineage graph error types
//!
//! Per ERRORS.md:
//! - LIN_GRAPH_NODE_UNKNOWN (ERROR severity)
//! - LIN_GRAPH_CYCLE (ERROR severity)
//! - LIN_SNAPSHOT_CHECKSUM (FATAL severity)
//! - LIN_SNAPSHOT_FORMAT (ERROR severity)

use std::fmt;

use crate::errors::Severity;
use crate::node::NodeId;

/// Graph errors. Cycle errors name both endpoints of the rejected edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Edge endpoint or query target is not an active graph node.
    NodeUnknown(NodeId),

    /// Inserting `from -> to` would close a cycle (invariant G1).
    Cycle { from: NodeId, to: NodeId },

    /// Snapshot failed CRC32 verification on import.
    SnapshotChecksum { expected: String, actual: String },

    /// Snapshot could not be decoded.
    SnapshotFormat(String),
}

impl GraphError {
    /// Returns the stable string code per ERRORS.md.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::NodeUnknown(_) => "LIN_GRAPH_NODE_UNKNOWN",
            GraphError::Cycle { .. } => "LIN_GRAPH_CYCLE",
            GraphError::SnapshotChecksum { .. } => "LIN_SNAPSHOT_CHECKSUM",
            GraphError::SnapshotFormat(_) => "LIN_SNAPSHOT_FORMAT",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        match self {
            GraphError::SnapshotChecksum { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NodeUnknown(id) => write!(
                f,
                "[{}] {}: unknown graph node {}",
                self.severity(),
                self.code(),
                id
            ),
            GraphError::Cycle { from, to } => write!(
                f,
                "[{}] {}: edge {} -> {} would close a cycle",
                self.severity(),
                self.code(),
                from,
                to
            ),
            GraphError::SnapshotChecksum { expected, actual } => write!(
                f,
                "[{}] {}: snapshot checksum mismatch (stored {}, recomputed {})",
                self.severity(),
                self.code(),
                expected,
                actual
            ),
            GraphError::SnapshotFormat(msg) => write!(
                f,
                "[{}] {}: {}",
                self.severity(),
                self.code(),
                msg
            ),
        }
    }
}

impl std::error::Error for GraphError {}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
