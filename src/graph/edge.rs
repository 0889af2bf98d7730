//! Typed graph edges
//!
//! Per LINEAGE.md §2: edges are directed, typed, and may carry an optional
//! JSON metadata payload (e.g. a similarity weight). Tombstoned edges stay
//! in the arena for the historical trail but are excluded from the active
//! view.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Relationship kind between two lineage nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Consecutive chunks of the same source.
    Adjacent,
    /// Semantic similarity link.
    Semantic,
    /// One unit cites or points at another.
    References,
    /// Both units describe the same entity.
    SameEntity,
    /// Content derived from another unit.
    Derived,
    /// Structural containment.
    ParentChild,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Adjacent => "adjacent",
            EdgeKind::Semantic => "semantic",
            EdgeKind::References => "references",
            EdgeKind::SameEntity => "same_entity",
            EdgeKind::Derived => "derived",
            EdgeKind::ParentChild => "parent_child",
        }
    }
}

/// A directed, typed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Tombstone flag, set when either endpoint is retired.
    #[serde(default)]
    pub retired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_kind_canonical_names() {
        assert_eq!(EdgeKind::SameEntity.as_str(), "same_entity");
        assert_eq!(
            serde_json::to_string(&EdgeKind::ParentChild).unwrap(),
            "\"parent_child\""
        );
    }

    #[test]
    fn test_edge_metadata_round_trip() {
        let edge = Edge {
            from: NodeId::new("ln_a"),
            to: NodeId::new("ln_b"),
            kind: EdgeKind::Semantic,
            metadata: Some(serde_json::json!({ "weight": 0.87 })),
            retired: false,
        };
        let json = serde_json::to_string(&edge).unwrap();
        let back: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(edge, back);
    }
}
