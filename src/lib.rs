//! lineagedb - A strict, deterministic provenance core for retrieval-augmented answering
//!
//! Five cooperating subsystems over one committed state:
//!
//! - [`node`]: content-addressed lineage nodes with deterministic ids
//! - [`graph`]: the acyclic lineage graph with bounded walks and expansion
//! - [`version`]: the append-only manifest chain and pure diffs
//! - [`update`]: build/update transactions with changed-only reprocessing
//! - [`audit`]: read-only answer auditing against the committed state
//!
//! [`LineageStore`] ties them together behind a snapshot-isolated facade.

pub mod audit;
pub mod errors;
pub mod graph;
pub mod node;
pub mod observability;
pub mod persist;
pub mod store;
pub mod update;
pub mod version;

pub use audit::{AnswerRecord, AuditPolicy, AuditReport, Auditor, Citation, RiskTaxonomy};
pub use errors::{LineageError, LineageResult, Severity};
pub use graph::{EdgeKind, ExpandedResultSet, GraphSnapshot, LineageGraph};
pub use node::{LineageNode, NodeId, NodeStore, SourceRef};
pub use store::{LineageState, LineageStore};
pub use update::{ChunkPipeline, Ingestor, PlainTextIngestor, TransformPipeline, UpdateEngine};
pub use version::{ChangeSet, Manifest, VersionManager};
