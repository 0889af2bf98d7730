//! The answer auditor
//!
//! Per AUDIT.md §1: `audit` is a pure function of the answer record and the
//! persisted node store / version chain. It never propagates `NotFound` for
//! a cited node (A1: audits are total); unresolvable citations become
//! broken-lineage flags and auditing continues.

use std::collections::BTreeSet;

use chrono::Utc;

use crate::node::{LineageNode, NodeStore};
use crate::version::VersionManager;

use super::answer::AnswerRecord;
use super::report::{
    AuditReport, BrokenLineageFlag, BrokenLineageReason, RiskFlag, StalenessVerdict,
    VersionConsistency,
};
use super::risk::RiskTaxonomy;

/// Staleness policy (AUDIT.md §3).
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditPolicy {
    /// How many parent ancestors of the current version are still treated
    /// as fresh. 0 means only the current version passes.
    pub grace: usize,
}

impl AuditPolicy {
    pub fn with_grace(grace: usize) -> Self {
        Self { grace }
    }
}

/// Read-only auditor over the node store and version chain.
pub struct Auditor<'a> {
    nodes: &'a NodeStore,
    versions: &'a VersionManager,
    taxonomy: &'a RiskTaxonomy,
    policy: AuditPolicy,
}

impl<'a> Auditor<'a> {
    pub fn new(
        nodes: &'a NodeStore,
        versions: &'a VersionManager,
        taxonomy: &'a RiskTaxonomy,
        policy: AuditPolicy,
    ) -> Self {
        Self {
            nodes,
            versions,
            taxonomy,
            policy,
        }
    }

    /// Produces the full audit report for one answer.
    pub fn audit(&self, answer: &AnswerRecord) -> AuditReport {
        let mut resolved: Vec<&LineageNode> = Vec::new();
        let mut broken: Vec<BrokenLineageFlag> = Vec::new();

        for id in answer.cited_ids() {
            match self.nodes.get(id) {
                Err(_) => broken.push(BrokenLineageFlag {
                    node_id: id.clone(),
                    reason: BrokenLineageReason::Missing,
                }),
                Ok(node) => {
                    // Hash mismatch is reported, not propagated; the node
                    // still participates in the remaining checks.
                    if !self.nodes.verify(id).unwrap_or(false) {
                        broken.push(BrokenLineageFlag {
                            node_id: id.clone(),
                            reason: BrokenLineageReason::HashMismatch,
                        });
                    }
                    resolved.push(node);
                }
            }
        }

        AuditReport {
            answer_id: answer.answer_id,
            audited_at: Utc::now(),
            current_version: self.versions.current_tag().map(str::to_string),
            version_consistency: self.version_consistency(&resolved),
            staleness: self.staleness(&resolved),
            risk_flags: self.risk_flags(&resolved),
            broken_lineage: broken,
        }
    }

    fn version_consistency(&self, resolved: &[&LineageNode]) -> VersionConsistency {
        let versions: BTreeSet<&str> = resolved
            .iter()
            .map(|n| n.dataset_version.as_str())
            .collect();
        match versions.len() {
            0 => VersionConsistency::NoCitations,
            1 => VersionConsistency::SingleVersion {
                version: versions.into_iter().next().unwrap_or_default().to_string(),
            },
            _ => VersionConsistency::MixedVersion {
                versions: versions.into_iter().map(str::to_string).collect(),
            },
        }
    }

    fn staleness(&self, resolved: &[&LineageNode]) -> StalenessVerdict {
        let current = match self.versions.current_tag() {
            Some(tag) => tag,
            // Nothing committed yet: nothing can be out of date.
            None => return StalenessVerdict::Pass,
        };

        // Fresh set: current plus the first `grace` ancestors.
        let fresh: BTreeSet<&str> = self
            .versions
            .ancestry(current)
            .unwrap_or_default()
            .into_iter()
            .take(self.policy.grace + 1)
            .collect();

        let mut stale: BTreeSet<_> = BTreeSet::new();
        for node in resolved {
            if !fresh.contains(node.dataset_version.as_str()) {
                stale.insert(node.id.clone());
            }
        }

        if stale.is_empty() {
            StalenessVerdict::Pass
        } else {
            StalenessVerdict::Stale {
                node_ids: stale.into_iter().collect(),
            }
        }
    }

    fn risk_flags(&self, resolved: &[&LineageNode]) -> Vec<RiskFlag> {
        let mut flags = Vec::new();
        for node in resolved {
            for transform in &node.transform_chain {
                if let Some(category) = self.taxonomy.lookup(transform) {
                    flags.push(RiskFlag {
                        node_id: node.id.clone(),
                        transform: transform.clone(),
                        category,
                    });
                }
            }
        }
        flags
    }
}
