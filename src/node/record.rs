//! Node identity and the lineage node record
//!
//! Per LINEAGE.md §1. `NodeId` is a deterministic content-derived identity,
//! not an object identity: identical inputs across separate build
//! invocations, processes, or versions map to the same id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::SourceRef;

/// Deterministic lineage node identity.
///
/// Totally ordered and hashable so it can key arenas, manifests, and
/// adjacency structures.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The atomic retrievable unit with complete provenance.
///
/// Per LINEAGE.md §1:
/// - `id` is immutable once derived
/// - `transform_chain` is append-only, never reordered
/// - `content_hash` must always equal the hash recomputed from `content`
///   (invariant L1); a mismatch is corruption, never silently repaired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageNode {
    /// Stable, deterministic identity.
    pub id: NodeId,

    /// The text payload.
    pub content: String,

    /// Precise reference to origin.
    pub source: SourceRef,

    /// Version tag the node was created under.
    pub dataset_version: String,

    /// Ordered transform names applied to reach this content.
    pub transform_chain: Vec<String>,

    /// `sha256:<hex>` over canonical content.
    pub content_hash: String,

    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (UTC). Records are immutable here, so this
    /// always equals `created_at`; the field exists for the wire format.
    pub updated_at: DateTime<Utc>,
}
