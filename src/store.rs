//! The lineage store facade
//!
//! Composes the node store, lineage graph, and version manager behind a
//! snapshot-isolated interface (VERSIONING.md §4.1/§5):
//!
//! - single-writer discipline: build/update transactions serialize behind
//!   a writer gate; at most one is in flight
//! - copy-on-write commit: a transaction mutates a private clone of the
//!   state and publishes it in one pointer swap
//! - readers grab an `Arc` snapshot and always observe either the
//!   pre-commit or the fully committed post-commit state
//!
//! Multiple independent stores can coexist; nothing here is ambient or
//! global.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::audit::{AnswerRecord, AuditPolicy, AuditReport, Auditor, RiskTaxonomy};
use crate::errors::LineageResult;
use crate::graph::{EdgeKind, ExpandedResultSet, GraphSnapshot, LineageGraph};
use crate::node::{LineageNode, NodeId, NodeStore};
use crate::persist;
use crate::update::{
    ChunkPipeline, Ingestor, PlainTextIngestor, TransformPipeline, UpdateEngine,
};
use crate::version::{ChangeSet, Manifest, VersionManager};

/// The composed, atomically swappable state.
#[derive(Debug, Clone, Default)]
pub struct LineageState {
    pub nodes: NodeStore,
    pub graph: LineageGraph,
    pub versions: VersionManager,
}

/// Snapshot-isolated facade over the four cores.
pub struct LineageStore {
    state: RwLock<Arc<LineageState>>,
    write_gate: Mutex<()>,
    ingestor: Box<dyn Ingestor + Send + Sync>,
    pipeline: Box<dyn TransformPipeline + Send + Sync>,
    taxonomy: RiskTaxonomy,
    policy: AuditPolicy,
}

// Manual impl: the collaborator trait objects have no Debug bound.
impl fmt::Debug for LineageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineageStore")
            .field("state", &self.snapshot())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for LineageStore {
    fn default() -> Self {
        Self::new(
            Box::new(PlainTextIngestor),
            Box::new(ChunkPipeline::default()),
        )
    }
}

impl LineageStore {
    /// Creates an empty store with the given collaborators.
    pub fn new(
        ingestor: Box<dyn Ingestor + Send + Sync>,
        pipeline: Box<dyn TransformPipeline + Send + Sync>,
    ) -> Self {
        Self::with_state(LineageState::default(), ingestor, pipeline)
    }

    fn with_state(
        state: LineageState,
        ingestor: Box<dyn Ingestor + Send + Sync>,
        pipeline: Box<dyn TransformPipeline + Send + Sync>,
    ) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
            write_gate: Mutex::new(()),
            ingestor,
            pipeline,
            taxonomy: RiskTaxonomy::default(),
            policy: AuditPolicy::default(),
        }
    }

    /// Replaces the audit staleness policy.
    pub fn with_policy(mut self, policy: AuditPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the transform risk taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: RiskTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// A stable snapshot of the committed state. Cheap: clones the `Arc`,
    /// not the state.
    pub fn snapshot(&self) -> Arc<LineageState> {
        // A poisoned lock only means a writer panicked between swaps; the
        // committed Arc is still consistent.
        match self.state.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn gate(&self) -> MutexGuard<'_, ()> {
        match self.write_gate.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn publish(&self, next: LineageState) {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(next);
    }

    // ------------------------------------------------------------------
    // Write path (single writer, copy-on-write commit)
    // ------------------------------------------------------------------

    /// Full build of a new version. All files are processed.
    pub fn build(&self, tag: &str, files: &[impl AsRef<Path>]) -> LineageResult<Manifest> {
        let _gate = self.gate();
        let mut staged = (*self.snapshot()).clone();
        let engine = UpdateEngine::new(self.ingestor.as_ref(), self.pipeline.as_ref());
        let manifest = engine.build(
            &mut staged.nodes,
            &mut staged.graph,
            &mut staged.versions,
            tag,
            files,
        )?;
        self.publish(staged);
        Ok(manifest)
    }

    /// Incremental update. See VERSIONING.md §4 for the changed-only
    /// contract.
    pub fn update(
        &self,
        tag: &str,
        files: &[impl AsRef<Path>],
        changed_only: bool,
    ) -> LineageResult<(Manifest, ChangeSet)> {
        let _gate = self.gate();
        let mut staged = (*self.snapshot()).clone();
        let engine = UpdateEngine::new(self.ingestor.as_ref(), self.pipeline.as_ref());
        let result = engine.update(
            &mut staged.nodes,
            &mut staged.graph,
            &mut staged.versions,
            tag,
            files,
            changed_only,
        )?;
        self.publish(staged);
        Ok(result)
    }

    /// Replaces the graph from a checksummed snapshot.
    pub fn graph_import(&self, snapshot: &GraphSnapshot) -> LineageResult<()> {
        let _gate = self.gate();
        let mut staged = (*self.snapshot()).clone();
        staged.graph = LineageGraph::import(snapshot)?;
        self.publish(staged);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read path (concurrent with writers, committed state only)
    // ------------------------------------------------------------------

    /// Pure diff between any two committed versions.
    pub fn diff(&self, from: &str, to: &str) -> LineageResult<ChangeSet> {
        Ok(self.snapshot().versions.diff(from, to)?)
    }

    pub fn current_version(&self) -> Option<String> {
        self.snapshot().versions.current_tag().map(str::to_string)
    }

    /// Fetches a node with hash verification (invariant L1).
    pub fn node_get(&self, id: &NodeId) -> LineageResult<LineageNode> {
        Ok(self.snapshot().nodes.get_verified(id)?.clone())
    }

    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.snapshot().nodes.exists(id)
    }

    /// Graph-walk expansion of a retrieval seed set (LINEAGE.md §5).
    pub fn expand(
        &self,
        seeds: &[(NodeId, f64)],
        depth: usize,
        kinds: Option<&[EdgeKind]>,
    ) -> LineageResult<ExpandedResultSet> {
        Ok(self.snapshot().graph.expand(seeds, depth, kinds)?)
    }

    /// Bounded neighbor query (LINEAGE.md §3).
    pub fn neighbors(
        &self,
        id: &NodeId,
        kinds: Option<&[EdgeKind]>,
        depth: usize,
    ) -> LineageResult<Vec<NodeId>> {
        Ok(self.snapshot().graph.neighbors(id, kinds, depth)?)
    }

    /// Exports the checksummed graph snapshot.
    pub fn graph_export(&self) -> LineageResult<GraphSnapshot> {
        Ok(self.snapshot().graph.export()?)
    }

    /// Audits an answer against the committed state. Total: never fails on
    /// malformed citations (AUDIT.md §5).
    pub fn audit(&self, answer: &AnswerRecord) -> AuditReport {
        let snapshot = self.snapshot();
        Auditor::new(
            &snapshot.nodes,
            &snapshot.versions,
            &self.taxonomy,
            self.policy,
        )
        .audit(answer)
    }

    /// Integrity sweep: ids of corrupt nodes.
    pub fn verify_integrity(&self) -> Vec<NodeId> {
        self.snapshot().nodes.verify_all()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Saves the committed state under `dir` (temp + fsync + rename).
    pub fn save_to_dir(&self, dir: &Path) -> LineageResult<()> {
        let snapshot = self.snapshot();
        persist::save_state(dir, &snapshot.nodes, &snapshot.graph, &snapshot.versions)?;
        Ok(())
    }

    /// Loads a store from `dir` with the given collaborators.
    pub fn load_from_dir(
        dir: &Path,
        ingestor: Box<dyn Ingestor + Send + Sync>,
        pipeline: Box<dyn TransformPipeline + Send + Sync>,
    ) -> LineageResult<Self> {
        let (nodes, graph, versions) = persist::load_state(dir)?;
        Ok(Self::with_state(
            LineageState {
                nodes,
                graph,
                versions,
            },
            ingestor,
            pipeline,
        ))
    }
}
