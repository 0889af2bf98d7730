//! Node Store subsystem
//!
//! Content-addressed registry of lineage nodes. Per LINEAGE.md §1:
//!
//! - Deterministic content-derived identity (id from source + transform
//!   chain + content), so identical inputs across builds map to the same id
//! - Idempotent creation (L2), the dedup mechanism incremental updates
//!   rely on
//! - Hash verification on read (L1): corruption is surfaced, never
//!   repaired

mod errors;
mod hash;
mod record;
mod source;
mod store;

pub use errors::{NodeError, NodeResult};
pub use hash::{canonicalize_content, compute_content_hash, compute_file_hash, derive_node_id};
pub use record::{LineageNode, NodeId};
pub use source::{Locator, SourceKind, SourceRef};
pub use store::NodeStore;
