//! Build/update transactions
//!
//! Per VERSIONING.md §4: a transaction hashes the proposed file list
//! (all-or-nothing), diffs against current, routes only added ∪ modified
//! files to the collaborators when `changed_only`, carries forward node ids
//! of unchanged files with zero recomputation, retires nodes of removed
//! files, and commits manifest + node set + graph mutations together.
//!
//! The engine mutates whatever state it is handed. Atomic visibility (V4)
//! is the caller's concern: `LineageStore` runs the engine against a
//! private clone and publishes the result in one swap.

use std::collections::BTreeSet;
use std::path::Path;

use crate::graph::{EdgeKind, LineageGraph};
use crate::node::{NodeId, NodeStore};
use crate::observability::{LogLevel, Logger};
use crate::version::{ChangeSet, Manifest, VersionError, VersionManager};

use super::errors::{UpdateError, UpdateResult};
use super::ingest::{Ingestor, TransformPipeline};

/// Orchestrates one build or update over the three owned subsystems.
pub struct UpdateEngine<'a> {
    ingestor: &'a dyn Ingestor,
    pipeline: &'a dyn TransformPipeline,
}

impl<'a> UpdateEngine<'a> {
    pub fn new(ingestor: &'a dyn Ingestor, pipeline: &'a dyn TransformPipeline) -> Self {
        Self { ingestor, pipeline }
    }

    /// Full build: every file is processed. Equivalent to an update with
    /// `changed_only = false`.
    pub fn build(
        &self,
        nodes: &mut NodeStore,
        graph: &mut LineageGraph,
        versions: &mut VersionManager,
        tag: &str,
        files: &[impl AsRef<Path>],
    ) -> UpdateResult<Manifest> {
        self.run(nodes, graph, versions, tag, files, false)
            .map(|(manifest, _)| manifest)
    }

    /// Incremental update. With `changed_only`, unchanged files contribute
    /// their existing node ids without any recomputation (V5: ids for
    /// unchanged content are bit-identical across versions).
    pub fn update(
        &self,
        nodes: &mut NodeStore,
        graph: &mut LineageGraph,
        versions: &mut VersionManager,
        tag: &str,
        files: &[impl AsRef<Path>],
        changed_only: bool,
    ) -> UpdateResult<(Manifest, ChangeSet)> {
        self.run(nodes, graph, versions, tag, files, changed_only)
    }

    fn run(
        &self,
        nodes: &mut NodeStore,
        graph: &mut LineageGraph,
        versions: &mut VersionManager,
        tag: &str,
        files: &[impl AsRef<Path>],
        changed_only: bool,
    ) -> UpdateResult<(Manifest, ChangeSet)> {
        // Conflict check first so no collaborator work happens for a tag
        // that can never commit.
        if versions.get(tag).is_ok() {
            return Err(VersionError::ManifestConflict(tag.to_string()).into());
        }

        // Hash every proposed file before touching anything (V1).
        let mut proposed = Manifest::from_files(
            tag,
            versions.current_tag().map(str::to_string),
            files,
        )?;

        let current = versions.current().cloned();
        let changeset = match &current {
            Some(cur) => ChangeSet::between(cur, &proposed),
            None => ChangeSet::initial(&proposed),
        };

        let to_process: Vec<String> = if changed_only {
            changeset.reprocess_set()
        } else {
            proposed.files.keys().cloned().collect()
        };

        // Carry forward node ids of unchanged files, untouched (V5).
        if changed_only {
            if let Some(cur) = &current {
                for uri in &changeset.unchanged {
                    if let Some(ids) = cur.nodes_by_file.get(uri) {
                        proposed.nodes_by_file.insert(uri.clone(), ids.clone());
                    }
                }
            }
        }

        // Reprocess added ∪ modified (or everything on a full build).
        for uri in &to_process {
            let created = self.process_file(nodes, graph, uri, tag)?;
            proposed.nodes_by_file.insert(uri.clone(), created);
        }

        // Retire nodes of removed files; records stay in the node store.
        let mut retired = 0usize;
        if let Some(cur) = &current {
            for uri in &changeset.removed {
                if let Some(ids) = cur.nodes_by_file.get(uri) {
                    for id in ids {
                        if graph.contains(id) {
                            graph.retire(id)?;
                            retired += 1;
                        }
                    }
                }
            }
        }

        let committed = versions.commit(proposed)?.clone();

        let reprocessed = to_process.len().to_string();
        let retired = retired.to_string();
        let node_total = nodes.len().to_string();
        Logger::log(
            LogLevel::Info,
            "version_committed",
            &[
                ("version", tag),
                ("files_reprocessed", &reprocessed),
                ("nodes_retired", &retired),
                ("nodes_total", &node_total),
            ],
        );

        Ok((committed, changeset))
    }

    /// Ingests and transforms one file. Consecutive units are linked with
    /// `adjacent` edges; duplicate content within a file dedups to one node.
    fn process_file(
        &self,
        nodes: &mut NodeStore,
        graph: &mut LineageGraph,
        uri: &str,
        tag: &str,
    ) -> UpdateResult<BTreeSet<NodeId>> {
        let mut created = BTreeSet::new();
        for (source, raw) in self.ingestor.ingest(uri)? {
            let mut prev: Option<NodeId> = None;
            for (content, chain) in self.pipeline.apply(&raw) {
                let id = nodes.create(source.clone(), content, chain, tag);
                graph.add_node(id.clone());
                created.insert(id.clone());
                if let Some(prev_id) = &prev {
                    if *prev_id != id && !graph.has_edge(prev_id, &id, EdgeKind::Adjacent) {
                        graph.add_edge(prev_id, &id, EdgeKind::Adjacent, None)?;
                    }
                }
                prev = Some(id);
            }
        }
        Ok(created)
    }
}
