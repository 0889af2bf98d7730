//! On-disk persistence for the lineage state
//!
//! Logical contract, not a storage engine. Each save writes a complete
//! state generation into its own subdirectory:
//!
//! - `gen-N/manifests.json`: the append-only manifest chain + current pointer
//! - `gen-N/graph.json`: the checksummed graph snapshot (LINEAGE.md §6)
//! - `gen-N/nodes.json`: the content-addressed node table
//!
//! A `CURRENT` file at the directory root names the committed generation
//! and is swapped (temp + fsync + rename) only after all three files are
//! durable. The three files commit as a set: a crash at any point leaves
//! `CURRENT` pointing at the previous complete generation, never at a
//! mixed state. Full state is reconstructable from the directory.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::Severity;
use crate::graph::{GraphError, GraphSnapshot, LineageGraph};
use crate::node::NodeStore;
use crate::version::VersionManager;

const MANIFESTS_FILE: &str = "manifests.json";
const GRAPH_FILE: &str = "graph.json";
const NODES_FILE: &str = "nodes.json";
const CURRENT_FILE: &str = "CURRENT";

/// Persistence errors.
#[derive(Debug)]
pub enum PersistError {
    Io { path: String, source: io::Error },
    Encode(String),
    Decode { path: String, reason: String },
    Snapshot(GraphError),
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            PersistError::Io { .. } => "LIN_PERSIST_IO_ERROR",
            PersistError::Encode(_) => "LIN_PERSIST_ENCODE_ERROR",
            PersistError::Decode { .. } => "LIN_PERSIST_DECODE_ERROR",
            PersistError::Snapshot(e) => e.code(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            PersistError::Snapshot(e) => e.severity(),
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io { path, source } => write!(
                f,
                "[{}] {}: {}: {}",
                self.severity(),
                self.code(),
                path,
                source
            ),
            PersistError::Encode(msg) => {
                write!(f, "[{}] {}: {}", self.severity(), self.code(), msg)
            }
            PersistError::Decode { path, reason } => write!(
                f,
                "[{}] {}: {}: {}",
                self.severity(),
                self.code(),
                path,
                reason
            ),
            PersistError::Snapshot(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io { source, .. } => Some(source),
            PersistError::Snapshot(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GraphError> for PersistError {
    fn from(e: GraphError) -> Self {
        PersistError::Snapshot(e)
    }
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

fn io_err(path: &Path, source: io::Error) -> PersistError {
    PersistError::Io {
        path: path.to_string_lossy().into_owned(),
        source,
    }
}

/// Writes a value as JSON via temp file + fsync + rename.
fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> PersistResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| PersistError::Encode(format!("failed to serialize {}: {}", name, e)))?;

    let target = dir.join(name);
    let tmp = dir.join(format!("{}.tmp", name));
    {
        let mut file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| io_err(&tmp, e))?;
        // fsync before rename so the rename publishes complete content.
        file.sync_all().map_err(|e| io_err(&tmp, e))?;
    }
    fs::rename(&tmp, &target).map_err(|e| io_err(&target, e))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> PersistResult<T> {
    let path = dir.join(name);
    let content = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&content).map_err(|e| PersistError::Decode {
        path: path.to_string_lossy().into_owned(),
        reason: e.to_string(),
    })
}

fn parse_generation(name: &str) -> Option<u64> {
    name.strip_prefix("gen-")?.parse().ok()
}

/// Reads the committed generation name, or none before the first save.
fn read_current(dir: &Path) -> PersistResult<Option<String>> {
    let path = dir.join(CURRENT_FILE);
    match fs::read_to_string(&path) {
        Ok(s) => Ok(Some(s.trim().to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(&path, e)),
    }
}

fn write_current(dir: &Path, generation: &str) -> PersistResult<()> {
    let target = dir.join(CURRENT_FILE);
    let tmp = dir.join(format!("{}.tmp", CURRENT_FILE));
    {
        let mut file = File::create(&tmp).map_err(|e| io_err(&tmp, e))?;
        file.write_all(generation.as_bytes())
            .map_err(|e| io_err(&tmp, e))?;
        file.sync_all().map_err(|e| io_err(&tmp, e))?;
    }
    fs::rename(&tmp, &target).map_err(|e| io_err(&target, e))?;
    Ok(())
}

/// The directory holding the committed generation's state files.
///
/// Fails with `LIN_PERSIST_IO_ERROR` naming the `CURRENT` path if nothing
/// was ever saved.
pub fn committed_dir(dir: &Path) -> PersistResult<PathBuf> {
    match read_current(dir)? {
        Some(generation) => Ok(dir.join(generation)),
        None => Err(io_err(
            &dir.join(CURRENT_FILE),
            io::Error::new(io::ErrorKind::NotFound, "no committed state"),
        )),
    }
}

/// Saves the three state files as one generation. The directory is created
/// if absent; the previous generation stays committed until the `CURRENT`
/// swap, then is removed.
pub fn save_state(
    dir: &Path,
    nodes: &NodeStore,
    graph: &LineageGraph,
    versions: &VersionManager,
) -> PersistResult<()> {
    fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let previous = read_current(dir)?;
    let next = previous
        .as_deref()
        .and_then(parse_generation)
        .unwrap_or(0)
        + 1;
    let generation = format!("gen-{:06}", next);
    let staging = dir.join(&generation);
    fs::create_dir_all(&staging).map_err(|e| io_err(&staging, e))?;

    write_json(&staging, NODES_FILE, nodes)?;
    write_json(&staging, GRAPH_FILE, &graph.export()?)?;
    write_json(&staging, MANIFESTS_FILE, versions)?;

    // The set commits here; until this swap, loads still see the previous
    // generation.
    write_current(dir, &generation)?;

    if let Some(old) = previous {
        if old != generation {
            // Cleanup only; the commit already happened.
            let _ = fs::remove_dir_all(dir.join(old));
        }
    }
    Ok(())
}

/// Loads the committed generation. The graph snapshot's checksum is
/// verified on import.
pub fn load_state(dir: &Path) -> PersistResult<(NodeStore, LineageGraph, VersionManager)> {
    let state_dir = committed_dir(dir)?;
    let nodes: NodeStore = read_json(&state_dir, NODES_FILE)?;
    let snapshot: GraphSnapshot = read_json(&state_dir, GRAPH_FILE)?;
    let graph = LineageGraph::import(&snapshot)?;
    let versions: VersionManager = read_json(&state_dir, MANIFESTS_FILE)?;
    Ok((nodes, graph, versions))
}
