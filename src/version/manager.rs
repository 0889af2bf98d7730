//! The manifest chain and the current-version pointer
//!
//! Per VERSIONING.md §2: builds are all-or-nothing, a duplicate tag is a
//! conflict, and the committed manifest is parent-linked to the prior
//! current manifest. The chain is append-only; exactly one manifest is
//! current.
//!
//! The manager is an explicit instance passed into calls, never ambient
//! global state, so independent lineage stores can coexist and be tested
//! in isolation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::diff::ChangeSet;
use super::errors::{VersionError, VersionResult};
use super::manifest::Manifest;

/// Owns the manifest chain and the "current version" pointer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionManager {
    /// Manifests in commit order. Append-only.
    manifests: Vec<Manifest>,
    /// Tag -> position in `manifests`.
    index: BTreeMap<String, usize>,
    /// The single current tag, if any version has been committed.
    current: Option<String>,
}

impl VersionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `files` and commits a new manifest for `tag`.
    ///
    /// Any unreadable file aborts the whole build with the specific uri and
    /// no manifest is committed. A tag already in the chain aborts with
    /// `LIN_MANIFEST_CONFLICT`.
    pub fn build(
        &mut self,
        tag: impl Into<String>,
        files: &[impl AsRef<Path>],
    ) -> VersionResult<&Manifest> {
        let tag = tag.into();
        if self.index.contains_key(&tag) {
            return Err(VersionError::ManifestConflict(tag));
        }
        let manifest = Manifest::from_files(tag, self.current.clone(), files)?;
        self.commit(manifest)
    }

    /// Commits a fully formed manifest: conflict check, parent link to the
    /// prior current manifest, advance the current pointer.
    pub fn commit(&mut self, mut manifest: Manifest) -> VersionResult<&Manifest> {
        if self.index.contains_key(&manifest.version) {
            return Err(VersionError::ManifestConflict(manifest.version));
        }
        manifest.parent = self.current.clone();

        let pos = self.manifests.len();
        self.index.insert(manifest.version.clone(), pos);
        self.current = Some(manifest.version.clone());
        self.manifests.push(manifest);
        Ok(&self.manifests[pos])
    }

    /// The current manifest, or none before the first build.
    pub fn current(&self) -> Option<&Manifest> {
        self.current.as_deref().and_then(|tag| self.get(tag).ok())
    }

    pub fn current_tag(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn get(&self, tag: &str) -> VersionResult<&Manifest> {
        self.index
            .get(tag)
            .map(|&pos| &self.manifests[pos])
            .ok_or_else(|| VersionError::VersionNotFound(tag.to_string()))
    }

    /// Pure diff between any two versions in the chain.
    pub fn diff(&self, from: &str, to: &str) -> VersionResult<ChangeSet> {
        Ok(ChangeSet::between(self.get(from)?, self.get(to)?))
    }

    /// Walks parent pointers from `tag` back to the chain root. The result
    /// starts with `tag` itself.
    pub fn ancestry(&self, tag: &str) -> VersionResult<Vec<&str>> {
        let mut chain = Vec::new();
        let mut cursor = Some(self.get(tag)?);
        while let Some(manifest) = cursor {
            chain.push(manifest.version.as_str());
            cursor = match &manifest.parent {
                Some(parent) => Some(self.get(parent)?),
                None => None,
            };
        }
        Ok(chain)
    }

    /// Manifests in commit order.
    pub fn chain(&self) -> &[Manifest] {
        &self.manifests
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}
