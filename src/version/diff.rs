//! Change detection between manifests
//!
//! Per VERSIONING.md §3: `diff` is a pure partition of file uris by
//! presence and hash equality. Defined for any two manifests in the chain,
//! not only adjacent ones. The union added ∪ modified ∪ unchanged equals
//! the target's file set; the three are pairwise disjoint.

use serde::{Deserialize, Serialize};

use super::manifest::Manifest;

/// The added / removed / modified / unchanged partition between two
/// manifests. Uri lists are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub from_version: String,
    pub to_version: String,
    /// Uris in `to` but not `from`.
    pub added: Vec<String>,
    /// Uris in `from` but not `to`.
    pub removed: Vec<String>,
    /// Uris in both with differing content hash.
    pub modified: Vec<String>,
    /// Uris in both with identical content hash.
    pub unchanged: Vec<String>,
}

impl ChangeSet {
    /// Computes the partition. Pure and side-effect free.
    pub fn between(from: &Manifest, to: &Manifest) -> Self {
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut modified = Vec::new();
        let mut unchanged = Vec::new();

        for (uri, entry) in &to.files {
            match from.files.get(uri) {
                None => added.push(uri.clone()),
                Some(prev) if prev.content_hash != entry.content_hash => {
                    modified.push(uri.clone())
                }
                Some(_) => unchanged.push(uri.clone()),
            }
        }
        for uri in from.files.keys() {
            if !to.files.contains_key(uri) {
                removed.push(uri.clone());
            }
        }

        // BTreeMap iteration already yields sorted keys; kept explicit for
        // the partition contract.
        Self {
            from_version: from.version.clone(),
            to_version: to.version.clone(),
            added,
            removed,
            modified,
            unchanged,
        }
    }

    /// The change set of a first build: every uri is added, `from_version`
    /// is empty.
    pub fn initial(to: &Manifest) -> Self {
        Self {
            from_version: String::new(),
            to_version: to.version.clone(),
            added: to.files.keys().cloned().collect(),
            removed: Vec::new(),
            modified: Vec::new(),
            unchanged: Vec::new(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// The uris routed to reprocessing: added ∪ modified.
    pub fn reprocess_set(&self) -> Vec<String> {
        let mut uris = self.added.clone();
        uris.extend(self.modified.iter().cloned());
        uris.sort();
        uris
    }
}
