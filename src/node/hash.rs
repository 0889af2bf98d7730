//! Content hashing and deterministic node identity
//!
//! Per LINEAGE.md §1:
//! - `content_hash` is SHA-256 over canonical content, `sha256:` prefixed
//! - node ids derive from (source identity, transform chain, content)
//! - identical inputs always derive the identical id
//!
//! Canonicalization folds CRLF to LF and nothing else; stronger
//! normalization belongs to transform steps where it is recorded in the
//! chain.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::source::SourceRef;

/// Folds CRLF line endings to LF.
pub fn canonicalize_content(content: &str) -> String {
    if content.contains('\r') {
        content.replace("\r\n", "\n")
    } else {
        content.to_string()
    }
}

/// Computes the `sha256:<hex>` content hash over canonical content.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_content_hash(content: &str) -> String {
    let canonical = canonicalize_content(content);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Computes the `sha256:<hex>` hash of a file's raw bytes, streamed.
pub fn compute_file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("sha256:{:x}", hasher.finalize()))
}

/// Derives the deterministic node id for (source, transform chain, content).
///
/// Per LINEAGE.md §1: `ln_` + first 16 hex chars of SHA-256 over a
/// length-prefixed field encoding. Length prefixes keep distinct field
/// splits from colliding (`"ab" + "c"` vs `"a" + "bc"`).
pub fn derive_node_id(source: &SourceRef, transform_chain: &[String], content: &str) -> String {
    let mut hasher = Sha256::new();

    let mut feed = |field: &str| {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
    };

    feed(source.kind.as_str());
    feed(&source.uri);
    feed(&source.locator_token());
    for transform in transform_chain {
        feed(transform);
    }
    feed(&canonicalize_content(content));

    let digest = hasher.finalize();
    let hex: String = digest
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("ln_{}", hex)
}
