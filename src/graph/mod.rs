//! Lineage Graph subsystem
//!
//! DAG of node identifiers linked by typed relationships. Per LINEAGE.md:
//!
//! - G1: acyclic at all times; insertions are reachability-checked
//! - G2: retirement tombstones nodes and touching edges, never deletes
//! - bounded BFS over both directions, deterministic ordering
//! - checksummed export/import with exact round-trip
//! - seed-set expansion with max-score-wins and seed provenance

mod edge;
mod errors;
mod expand;
mod graph;
mod snapshot;

pub use edge::{Edge, EdgeKind};
pub use errors::{GraphError, GraphResult};
pub use expand::{ExpandedResult, ExpandedResultSet};
pub use graph::LineageGraph;
pub use snapshot::{GraphSnapshot, SnapshotNode};
