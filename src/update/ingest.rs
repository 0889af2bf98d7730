//! Ingestion and transform collaborator seams
//!
//! Format-specific parsing, embeddings, and similarity search live outside
//! this crate. The update engine consumes two narrow traits:
//!
//! - `Ingestor` yields (source reference, raw content) pairs per input file
//! - `TransformPipeline` turns raw content into retrievable units, each
//!   with the transform chain that produced it
//!
//! Two small defaults ship for plain-text corpora and tests; anything
//! richer (CSV, PDF, OCR) implements the traits externally.

use std::fs;
use std::path::Path;

use crate::node::SourceRef;

use super::errors::{UpdateError, UpdateResult};

/// Yields raw content units for one input file.
pub trait Ingestor {
    fn ingest(&self, uri: &str) -> UpdateResult<Vec<(SourceRef, String)>>;
}

/// Turns raw content into retrievable units. Each unit carries the ordered
/// transform names that produced it; the engine records the chain verbatim
/// on the created node.
pub trait TransformPipeline {
    fn apply(&self, content: &str) -> Vec<(String, Vec<String>)>;
}

/// Reads the whole file as UTF-8 and yields it as a single unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextIngestor;

impl Ingestor for PlainTextIngestor {
    fn ingest(&self, uri: &str) -> UpdateResult<Vec<(SourceRef, String)>> {
        let content = fs::read_to_string(Path::new(uri))
            .map_err(|e| UpdateError::ingest(uri, e.to_string()))?;
        Ok(vec![(SourceRef::file(uri), content)])
    }
}

/// Fixed-size character chunker with overlap. Chain: `["chunk_fixed"]`.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPipeline {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkPipeline {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl ChunkPipeline {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        debug_assert!(overlap < chunk_size);
        Self {
            chunk_size,
            overlap,
        }
    }
}

impl TransformPipeline for ChunkPipeline {
    fn apply(&self, content: &str) -> Vec<(String, Vec<String>)> {
        let chars: Vec<char> = content.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        let step = self.chunk_size.saturating_sub(self.overlap).max(1);
        let mut units = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            units.push((chunk, vec!["chunk_fixed".to_string()]));
            if end == chars.len() {
                break;
            }
            start += step;
        }
        units
    }
}

/// Passes content through untouched with an empty chain. Useful when the
/// corpus is already unit-sized.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPipeline;

impl TransformPipeline for PassthroughPipeline {
    fn apply(&self, content: &str) -> Vec<(String, Vec<String>)> {
        vec![(content.to_string(), Vec::new())]
    }
}
