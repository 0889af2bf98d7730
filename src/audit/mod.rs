//! Answer Auditor subsystem
//!
//! Read-only consumer of the node store, lineage graph, and version chain.
//! Per AUDIT.md: version consistency, chain-based staleness, transform risk
//! from a static taxonomy, and broken-lineage degradation so that auditing
//! is total over any answer, however malformed its citations.

mod answer;
mod auditor;
mod report;
mod risk;

pub use answer::{AnswerRecord, Citation};
pub use auditor::{AuditPolicy, Auditor};
pub use report::{
    AuditReport, BrokenLineageFlag, BrokenLineageReason, RiskCategory, RiskFlag,
    StalenessVerdict, VersionConsistency,
};
pub use risk::RiskTaxonomy;
