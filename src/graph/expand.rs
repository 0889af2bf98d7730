//! Graph-walk expansion of retrieval seed sets
//!
//! Per LINEAGE.md §5: each seed's bounded walk is merged into one result
//! set. A node reachable from multiple seeds reports the MAXIMUM
//! contributing seed score (max-score-wins) and retains every contributing
//! seed id for audit. Seeds themselves appear at distance 0 with their own
//! score (LINEAGE.md §4).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

use super::edge::EdgeKind;
use super::errors::GraphResult;
use super::graph::LineageGraph;

/// One expanded retrieval result with seed provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedResult {
    pub id: NodeId,
    /// Maximum score among contributing seeds.
    pub score: f64,
    /// Minimum hop distance from any contributing seed (0 = is a seed).
    pub distance: usize,
    /// Which original seeds led here, in seed order.
    pub seeds: Vec<NodeId>,
}

/// Merged expansion output, ordered by descending score, then distance,
/// then id for determinism.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpandedResultSet {
    pub results: Vec<ExpandedResult>,
}

impl ExpandedResultSet {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&ExpandedResult> {
        self.results.iter().find(|r| r.id == *id)
    }
}

impl LineageGraph {
    /// Expands a seed set of (node id, score) pairs via bounded walks.
    ///
    /// Fails with `LIN_GRAPH_NODE_UNKNOWN` if a seed is not an active node;
    /// retrieval seeds are expected to come from a live index over this
    /// graph.
    pub fn expand(
        &self,
        seeds: &[(NodeId, f64)],
        depth: usize,
        kinds: Option<&[EdgeKind]>,
    ) -> GraphResult<ExpandedResultSet> {
        let mut merged: BTreeMap<NodeId, ExpandedResult> = BTreeMap::new();

        for (seed_id, seed_score) in seeds {
            let mut reached: Vec<(NodeId, usize)> = vec![(seed_id.clone(), 0)];
            reached.extend(self.walk(seed_id, kinds, depth)?);

            for (id, distance) in reached {
                let entry = merged.entry(id.clone()).or_insert_with(|| ExpandedResult {
                    id,
                    score: *seed_score,
                    distance,
                    seeds: Vec::new(),
                });
                if *seed_score > entry.score {
                    entry.score = *seed_score;
                }
                if distance < entry.distance {
                    entry.distance = distance;
                }
                if !entry.seeds.contains(seed_id) {
                    entry.seeds.push(seed_id.clone());
                }
            }
        }

        let mut results: Vec<ExpandedResult> = merged.into_values().collect();
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.distance.cmp(&b.distance))
                .then(a.id.cmp(&b.id))
        });
        Ok(ExpandedResultSet { results })
    }
}
