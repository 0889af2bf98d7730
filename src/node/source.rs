//! Source references: where a lineage node's content came from
//!
//! Per LINEAGE.md §1: a source reference is a kind (file / row / page /
//! url), a uri, and an optional locator narrowing the position inside the
//! resource (page number, row index, section, line range).

use serde::{Deserialize, Serialize};

/// The kind of resource a node was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    File,
    Row,
    Page,
    Url,
}

impl SourceKind {
    /// Returns the canonical string form, used in id derivation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Row => "row",
            SourceKind::Page => "page",
            SourceKind::Url => "url",
        }
    }
}

/// Position inside the referenced resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    /// Page number (1-indexed).
    Page(u32),
    /// Row index (0-indexed).
    Row(u64),
    /// Named section.
    Section(String),
    /// Inclusive line range.
    Lines { start: u32, end: u32 },
}

/// Precise reference to the origin of a node's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<Locator>,
}

impl SourceRef {
    /// A whole-file source.
    pub fn file(uri: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::File,
            uri: uri.into(),
            locator: None,
        }
    }

    /// A tabular-row source.
    pub fn row(uri: impl Into<String>, row: u64) -> Self {
        Self {
            kind: SourceKind::Row,
            uri: uri.into(),
            locator: Some(Locator::Row(row)),
        }
    }

    /// A document-page source.
    pub fn page(uri: impl Into<String>, page: u32) -> Self {
        Self {
            kind: SourceKind::Page,
            uri: uri.into(),
            locator: Some(Locator::Page(page)),
        }
    }

    /// A remote url source.
    pub fn url(uri: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Url,
            uri: uri.into(),
            locator: None,
        }
    }

    /// Attaches a locator to an existing reference.
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Canonical locator token for id derivation. Stable across runs.
    pub(crate) fn locator_token(&self) -> String {
        match &self.locator {
            None => String::new(),
            Some(Locator::Page(p)) => format!("page:{}", p),
            Some(Locator::Row(r)) => format!("row:{}", r),
            Some(Locator::Section(s)) => format!("section:{}", s),
            Some(Locator::Lines { start, end }) => format!("lines:{}-{}", start, end),
        }
    }
}
