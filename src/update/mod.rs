//! Incremental Update Engine subsystem
//!
//! Orchestrates build/update transactions over the node store, lineage
//! graph, and version manager. Per VERSIONING.md §4: changed-only
//! reprocessing, carry-forward of unchanged node ids, retirement of removed
//! files' nodes, and all-or-nothing failure semantics.

mod engine;
mod errors;
mod ingest;

pub use engine::UpdateEngine;
pub use errors::{UpdateError, UpdateResult};
pub use ingest::{ChunkPipeline, Ingestor, PassthroughPipeline, PlainTextIngestor, TransformPipeline};
