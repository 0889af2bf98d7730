//! Content-addressed node registry
//!
//! Per LINEAGE.md §1.1 and §1.2:
//! - creation is idempotent on the derived id (L2): an existing entry is
//!   returned unchanged, no duplicate, no re-timestamping
//! - every verified read recomputes the content hash (L1); a mismatch is
//!   corruption and aborts the read
//!
//! The store owns node lifecycle. It never deletes: retirement is a graph
//! concern, the record stays here so past answers remain auditable.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::errors::{NodeError, NodeResult};
use super::hash::{compute_content_hash, derive_node_id};
use super::record::{LineageNode, NodeId};
use super::source::SourceRef;

/// Content-addressed registry of lineage nodes, keyed by deterministic id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, LineageNode>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node, or returns the existing id if the derived identity
    /// is already registered (invariant L2).
    ///
    /// The node is fully formed before insertion; no partial node is ever
    /// observable.
    pub fn create(
        &mut self,
        source: SourceRef,
        content: impl Into<String>,
        transform_chain: Vec<String>,
        dataset_version: impl Into<String>,
    ) -> NodeId {
        let content = content.into();
        let id = NodeId::new(derive_node_id(&source, &transform_chain, &content));

        if self.nodes.contains_key(&id) {
            return id;
        }

        let now = Utc::now();
        let node = LineageNode {
            id: id.clone(),
            content_hash: compute_content_hash(&content),
            content,
            source,
            dataset_version: dataset_version.into(),
            transform_chain,
            created_at: now,
            updated_at: now,
        };
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Returns the node, without integrity verification.
    pub fn get(&self, id: &NodeId) -> NodeResult<&LineageNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| NodeError::NotFound(id.clone()))
    }

    /// Returns the node after recomputing its content hash (invariant L1).
    ///
    /// A mismatch surfaces as `LIN_DATA_CORRUPTION`, never a repaired read.
    pub fn get_verified(&self, id: &NodeId) -> NodeResult<&LineageNode> {
        let node = self.get(id)?;
        let actual = compute_content_hash(&node.content);
        if actual != node.content_hash {
            return Err(NodeError::Corruption {
                id: id.clone(),
                expected: node.content_hash.clone(),
                actual,
            });
        }
        Ok(node)
    }

    pub fn exists(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Recomputes the content hash and compares against the stored value.
    ///
    /// `Ok(true)` means intact, `Ok(false)` means corrupt. Unknown ids fail
    /// with `LIN_NODE_NOT_FOUND`.
    pub fn verify(&self, id: &NodeId) -> NodeResult<bool> {
        let node = self.get(id)?;
        Ok(compute_content_hash(&node.content) == node.content_hash)
    }

    /// Integrity sweep over the whole registry. Returns the ids of every
    /// corrupt node, in id order.
    pub fn verify_all(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| compute_content_hash(&n.content) != n.content_hash)
            .map(|n| n.id.clone())
            .collect()
    }

    /// All node ids whose source uri matches, in id order.
    pub fn ids_for_uri(&self, uri: &str) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.source.uri == uri)
            .map(|n| n.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineageNode> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(store: &mut NodeStore) -> NodeId {
        store.create(
            SourceRef::file("docs/a.txt"),
            "first chunk",
            vec!["chunk_fixed".to_string()],
            "v1.0",
        )
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut store = NodeStore::new();
        let id1 = sample(&mut store);
        let created_at = store.get(&id1).unwrap().created_at;

        let id2 = sample(&mut store);
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
        // No re-timestamping on duplicate create.
        assert_eq!(store.get(&id2).unwrap().created_at, created_at);
    }

    #[test]
    fn test_timestamps_set_together_at_creation() {
        let mut store = NodeStore::new();
        let id = sample(&mut store);
        let node = store.get(&id).unwrap();
        assert_eq!(node.updated_at, node.created_at);
    }

    #[test]
    fn test_content_hash_matches_content() {
        let mut store = NodeStore::new();
        let id = sample(&mut store);
        assert!(store.verify(&id).unwrap());
        let node = store.get_verified(&id).unwrap();
        assert_eq!(node.content_hash, compute_content_hash(&node.content));
    }

    #[test]
    fn test_get_unknown_fails_not_found() {
        let store = NodeStore::new();
        let err = store.get(&NodeId::new("ln_missing")).unwrap_err();
        assert_eq!(err.code(), "LIN_NODE_NOT_FOUND");
    }

    #[test]
    fn test_corruption_surfaces_never_repairs() {
        let mut store = NodeStore::new();
        let id = sample(&mut store);

        // Corrupt the stored content behind the hash's back.
        store.nodes.get_mut(&id).unwrap().content.push_str(" tampered");

        assert!(!store.verify(&id).unwrap());
        let err = store.get_verified(&id).unwrap_err();
        assert!(err.is_fatal());

        // The stored record is untouched by the failed read.
        assert!(store.get(&id).unwrap().content.ends_with("tampered"));
        assert_eq!(store.verify_all(), vec![id]);
    }

    #[test]
    fn test_ids_for_uri() {
        let mut store = NodeStore::new();
        let a = store.create(SourceRef::file("a.txt"), "one", vec![], "v1.0");
        let _b = store.create(SourceRef::file("b.txt"), "two", vec![], "v1.0");
        let a2 = store.create(SourceRef::file("a.txt"), "three", vec![], "v1.0");

        let mut expected = vec![a, a2];
        expected.sort();
        assert_eq!(store.ids_for_uri("a.txt"), expected);
    }
}
