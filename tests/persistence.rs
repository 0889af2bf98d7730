//! Persistence Integrity Tests
//!
//! Tests for on-disk state invariants:
//! - Full state round-trips through the data directory
//! - The three state files commit as one generation; an interrupted save
//!   never surfaces a mixed state
//! - Tampered node content is caught by hash verification, never repaired
//! - A tampered graph file fails its checksum on load
//! - Missing state files surface the offending path

use std::fs;
use std::path::PathBuf;

use lineagedb::store::LineageStore;
use lineagedb::update::{PlainTextIngestor, TransformPipeline};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct IdentityPipeline;

impl TransformPipeline for IdentityPipeline {
    fn apply(&self, content: &str) -> Vec<(String, Vec<String>)> {
        vec![(content.to_string(), Vec::new())]
    }
}

fn new_store() -> LineageStore {
    LineageStore::new(Box::new(PlainTextIngestor), Box::new(IdentityPipeline))
}

fn load(dir: &PathBuf) -> Result<LineageStore, lineagedb::errors::LineageError> {
    LineageStore::load_from_dir(dir, Box::new(PlainTextIngestor), Box::new(IdentityPipeline))
}

/// Resolves a state file inside the committed generation.
fn state_file(data_dir: &PathBuf, name: &str) -> PathBuf {
    let generation = fs::read_to_string(data_dir.join("CURRENT")).unwrap();
    data_dir.join(generation.trim()).join(name)
}

/// Builds two versions with a retired file, saves, returns the data dir.
fn populated_data_dir(work: &TempDir) -> PathBuf {
    let f1 = work.path().join("f1.txt");
    let f2 = work.path().join("f2.txt");
    fs::write(&f1, "the kept document").unwrap();
    fs::write(&f2, "the dropped document").unwrap();

    let store = new_store();
    store.build("v1.0", &[&f1, &f2]).unwrap();
    store.update("v1.1", &[&f1], true).unwrap();

    let data_dir = work.path().join("state");
    store.save_to_dir(&data_dir).unwrap();
    data_dir
}

// =============================================================================
// Round-Trip Tests
// =============================================================================

/// Nodes, graph tombstones, and the manifest chain all survive a reload.
#[test]
fn test_full_state_round_trip() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);

    let loaded = load(&data_dir).unwrap();
    let state = loaded.snapshot();

    assert_eq!(loaded.current_version().as_deref(), Some("v1.1"));
    assert_eq!(state.versions.len(), 2);
    assert_eq!(state.nodes.len(), 2);

    // The dropped document's node is still a tombstone after reload.
    let m1 = state.versions.get("v1.0").unwrap();
    let dropped_uri = work.path().join("f2.txt").to_string_lossy().into_owned();
    let dropped_id = m1.nodes_by_file[&dropped_uri].iter().next().unwrap();
    assert!(state.graph.contains(dropped_id));
    assert!(!state.graph.is_active(dropped_id));

    // Diff still works against the reloaded chain.
    let diff = loaded.diff("v1.0", "v1.1").unwrap();
    assert_eq!(diff.removed, vec![dropped_uri]);
}

/// Saving twice into the same directory overwrites cleanly.
#[test]
fn test_save_is_repeatable() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);

    let loaded = load(&data_dir).unwrap();
    loaded.save_to_dir(&data_dir).unwrap();

    let again = load(&data_dir).unwrap();
    assert_eq!(again.current_version().as_deref(), Some("v1.1"));
    assert_eq!(
        again.graph_export().unwrap(),
        loaded.graph_export().unwrap()
    );
}

// =============================================================================
// Commit-As-A-Set Tests
// =============================================================================

/// A save that dies before the CURRENT swap leaves the previous
/// generation committed; the partial files are never paired with it.
#[test]
fn test_interrupted_save_preserves_committed_set() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);
    let committed_graph = fs::read_to_string(state_file(&data_dir, "graph.json")).unwrap();

    // Simulate the partial write: a newer generation directory holding a
    // divergent graph, with no pointer swap.
    let stale = data_dir.join("gen-999999");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("graph.json"), "{\"not\":\"a snapshot\"}").unwrap();

    let loaded = load(&data_dir).unwrap();
    assert_eq!(loaded.current_version().as_deref(), Some("v1.1"));
    assert_eq!(
        fs::read_to_string(state_file(&data_dir, "graph.json")).unwrap(),
        committed_graph
    );
}

// =============================================================================
// Tamper Detection Tests
// =============================================================================

/// Editing node content on disk is caught by hash verification on read.
#[test]
fn test_tampered_node_content_detected() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);

    let nodes_path = state_file(&data_dir, "nodes.json");
    let json = fs::read_to_string(&nodes_path).unwrap();
    fs::write(
        &nodes_path,
        json.replace("the kept document", "a forged document"),
    )
    .unwrap();

    let loaded = load(&data_dir).unwrap();
    let corrupt = loaded.verify_integrity();
    assert_eq!(corrupt.len(), 1);

    let err = loaded.node_get(&corrupt[0]).unwrap_err();
    assert_eq!(err.code(), "LIN_DATA_CORRUPTION");
}

/// Editing the graph file breaks its checksum; load refuses the state.
#[test]
fn test_tampered_graph_fails_checksum() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);

    let graph_path = state_file(&data_dir, "graph.json");
    let json = fs::read_to_string(&graph_path).unwrap();
    assert!(json.contains("\"retired\": true"));
    fs::write(&graph_path, json.replace("\"retired\": true", "\"retired\": false")).unwrap();

    let err = load(&data_dir).err().unwrap();
    assert_eq!(err.code(), "LIN_SNAPSHOT_CHECKSUM");
}

/// A missing state file names its path in the error.
#[test]
fn test_missing_state_file_names_path() {
    let work = TempDir::new().unwrap();
    let data_dir = populated_data_dir(&work);
    fs::remove_file(state_file(&data_dir, "manifests.json")).unwrap();

    let err = load(&data_dir).err().unwrap();
    assert_eq!(err.code(), "LIN_PERSIST_IO_ERROR");
    assert!(err.to_string().contains("manifests.json"));
}
