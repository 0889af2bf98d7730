//! Answer records: what a generated answer cited
//!
//! An answer record is the input to auditing: question, answer text, and
//! the (node id, relevance score) citations retrieval produced. The record
//! itself carries no provenance beyond the ids; the auditor reconstructs
//! everything else from persisted state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::NodeId;

/// One cited node with its retrieval score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub node_id: NodeId,
    pub score: f64,
}

impl Citation {
    pub fn new(node_id: impl Into<NodeId>, score: f64) -> Self {
        Self {
            node_id: node_id.into(),
            score,
        }
    }
}

impl From<(NodeId, f64)> for Citation {
    fn from((node_id, score): (NodeId, f64)) -> Self {
        Self { node_id, score }
    }
}

/// A generated answer with its citations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub answer_id: Uuid,
    pub question: String,
    pub answer: String,
    pub citations: Vec<Citation>,
    pub created_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        citations: Vec<Citation>,
    ) -> Self {
        Self {
            answer_id: Uuid::new_v4(),
            question: question.into(),
            answer: answer.into(),
            citations,
            created_at: Utc::now(),
        }
    }

    pub fn cited_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.citations.iter().map(|c| &c.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_record_round_trip() {
        let record = AnswerRecord::new(
            "what changed in v1.1?",
            "two files were modified",
            vec![Citation::new(NodeId::new("ln_a"), 0.9)],
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: AnswerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
        assert_eq!(back.cited_ids().count(), 1);
    }
}
