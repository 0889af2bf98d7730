//! Audit report structures
//!
//! Per AUDIT.md: verdicts and flags are derived purely from the answer
//! record and persisted state; the report holds no independent state and
//! every flag names the offending node id(s).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::NodeId;

/// Whether all cited nodes share one dataset version (AUDIT.md §2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum VersionConsistency {
    SingleVersion { version: String },
    /// Every distinct version present, sorted.
    MixedVersion { versions: Vec<String> },
    NoCitations,
}

/// Staleness verdict (AUDIT.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum StalenessVerdict {
    Pass,
    /// Out-of-date node ids, sorted.
    Stale { node_ids: Vec<NodeId> },
}

/// Risk categories from the transform taxonomy (AUDIT.md §4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    OcrDerived,
    AggressiveNormalization,
    TranslationDrift,
    SummarizationLoss,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::OcrDerived => "ocr_derived",
            RiskCategory::AggressiveNormalization => "aggressive_normalization",
            RiskCategory::TranslationDrift => "translation_drift",
            RiskCategory::SummarizationLoss => "summarization_loss",
        }
    }
}

/// One transform-risk match: which node, which transform, which category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub node_id: NodeId,
    pub transform: String,
    pub category: RiskCategory,
}

/// Why a citation could not be resolved against the node store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokenLineageReason {
    /// Cited id is absent from the node store.
    Missing,
    /// The stored record failed hash verification.
    HashMismatch,
}

/// A citation the auditor could not fully resolve (AUDIT.md §5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLineageFlag {
    pub node_id: NodeId,
    pub reason: BrokenLineageReason,
}

/// The complete audit verdict for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub answer_id: Uuid,
    pub audited_at: DateTime<Utc>,
    /// Current version at audit time, if any version has been committed.
    pub current_version: Option<String>,
    pub version_consistency: VersionConsistency,
    pub staleness: StalenessVerdict,
    pub risk_flags: Vec<RiskFlag>,
    pub broken_lineage: Vec<BrokenLineageFlag>,
}

impl AuditReport {
    /// Whether the report is entirely clean.
    pub fn is_clean(&self) -> bool {
        matches!(
            self.version_consistency,
            VersionConsistency::SingleVersion { .. } | VersionConsistency::NoCitations
        ) && self.staleness == StalenessVerdict::Pass
            && self.risk_flags.is_empty()
            && self.broken_lineage.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serialization_shape() {
        let verdict = VersionConsistency::MixedVersion {
            versions: vec!["v1.0".into(), "v1.1".into()],
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["verdict"], "mixed_version");
        assert_eq!(json["versions"][1], "v1.1");
    }

    #[test]
    fn test_risk_category_names() {
        assert_eq!(RiskCategory::OcrDerived.as_str(), "ocr_derived");
        assert_eq!(
            serde_json::to_string(&RiskCategory::AggressiveNormalization).unwrap(),
            "\"aggressive_normalization\""
        );
    }
}
