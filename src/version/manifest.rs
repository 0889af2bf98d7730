//! Dataset version manifests
//!
//! Per VERSIONING.md §1: one manifest per build/update. Version tag, file
//! entries keyed by uri, parent pointer, per-file node-id sets, creation
//! timestamp. The manifest is the authoritative descriptor of what a
//! version contains.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::node::{compute_file_hash, NodeId};

use super::errors::{VersionError, VersionResult};

/// One tracked source file: uri, content hash, mtime, size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub uri: String,
    /// `sha256:<hex>` over the file's raw bytes.
    pub content_hash: String,
    pub mtime: DateTime<Utc>,
    pub size: u64,
}

impl FileEntry {
    /// Hashes and stats a file on disk. An unreadable file fails with
    /// `LIN_VERSION_IO_ERROR` naming this uri.
    pub fn from_path(path: &Path) -> VersionResult<Self> {
        let uri = path.to_string_lossy().into_owned();
        let content_hash =
            compute_file_hash(path).map_err(|e| VersionError::io_error(&uri, e))?;
        let meta = fs::metadata(path).map_err(|e| VersionError::io_error(&uri, e))?;
        let mtime: DateTime<Utc> = meta
            .modified()
            .map_err(|e| VersionError::io_error(&uri, e))?
            .into();
        Ok(Self {
            uri,
            content_hash,
            mtime,
            size: meta.len(),
        })
    }
}

/// A versioned snapshot of tracked source files and the nodes built from
/// them. Manifests form a singly linked chain via `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Version tag, unique across the chain.
    pub version: String,

    /// File entries keyed by uri.
    pub files: BTreeMap<String, FileEntry>,

    /// Previous version tag, or none for the first manifest.
    pub parent: Option<String>,

    /// Node ids created or carried into this version, per source uri.
    pub nodes_by_file: BTreeMap<String, BTreeSet<NodeId>>,

    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    /// Builds a manifest shell from pre-hashed file entries. Node sets are
    /// filled in by the update engine before commit.
    pub fn new(
        version: impl Into<String>,
        parent: Option<String>,
        entries: Vec<FileEntry>,
    ) -> Self {
        let files = entries.into_iter().map(|e| (e.uri.clone(), e)).collect();
        Self {
            version: version.into(),
            files,
            parent,
            nodes_by_file: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Hashes every file FIRST (all-or-nothing per VERSIONING.md §2), then
    /// builds the manifest shell. Any unreadable file aborts the whole
    /// operation; nothing is committed.
    pub fn from_files(
        version: impl Into<String>,
        parent: Option<String>,
        files: &[impl AsRef<Path>],
    ) -> VersionResult<Self> {
        let mut entries = Vec::with_capacity(files.len());
        for path in files {
            entries.push(FileEntry::from_path(path.as_ref())?);
        }
        Ok(Self::new(version, parent, entries))
    }

    /// All node ids in this version, across files.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.nodes_by_file.values().flatten().cloned().collect()
    }

    /// Uris tracked by this version, in key order.
    pub fn uris(&self) -> Vec<&str> {
        self.files.keys().map(|s| s.as_str()).collect()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
