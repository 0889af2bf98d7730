//! Version Manager subsystem
//!
//! Per VERSIONING.md: an append-only chain of dataset manifests with
//! per-file content hashes, pure diffing between any two versions, and a
//! single current-version pointer. Builds are all-or-nothing (V1); diff is
//! a pure partition (V2).

mod diff;
mod errors;
mod manager;
mod manifest;

pub use diff::ChangeSet;
pub use errors::{VersionError, VersionResult};
pub use manager::VersionManager;
pub use manifest::{FileEntry, Manifest};
