//! Lineage graph arena
//!
//! Per LINEAGE.md §2 and §3:
//! - arena-of-nodes-by-id plus an edge list; no object-to-object references,
//!   so cycle checks and serialization are purely id-based
//! - acyclic at all times (G1): every insertion is checked via reachability
//!   from `to` back to `from` before commit
//! - retirement tombstones, never deletes (G2): no active edge may reference
//!   a retired node
//! - bounded BFS over both edge directions, ordered by distance, ties by
//!   edge insertion order, deduplicated at minimum distance

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

use super::edge::{Edge, EdgeKind};
use super::errors::{GraphError, GraphResult};

/// Per-node slot: tombstone flag plus adjacency into the edge arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NodeSlot {
    retired: bool,
    /// Indices of outgoing edges, in insertion order.
    out: Vec<usize>,
    /// Indices of incoming edges, in insertion order.
    inc: Vec<usize>,
}

/// Directed acyclic graph of node identifiers with typed edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageGraph {
    /// Node ids in insertion order.
    order: Vec<NodeId>,
    slots: BTreeMap<NodeId, NodeSlot>,
    edges: Vec<Edge>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node id. Idempotent; re-adding an existing id (retired
    /// or not) changes nothing.
    pub fn add_node(&mut self, id: NodeId) {
        if !self.slots.contains_key(&id) {
            self.order.push(id.clone());
            self.slots.insert(id, NodeSlot::default());
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.slots.contains_key(id)
    }

    /// Whether the id is registered and not tombstoned.
    pub fn is_active(&self, id: &NodeId) -> bool {
        self.slots.get(id).map(|s| !s.retired).unwrap_or(false)
    }

    /// Inserts a typed edge after checking invariant G1.
    ///
    /// Fails with `LIN_GRAPH_NODE_UNKNOWN` if either endpoint is not an
    /// active node, and with `LIN_GRAPH_CYCLE` if the edge would close a
    /// cycle (including self-loops). Nothing is committed on failure.
    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: EdgeKind,
        metadata: Option<serde_json::Value>,
    ) -> GraphResult<()> {
        if !self.is_active(from) {
            return Err(GraphError::NodeUnknown(from.clone()));
        }
        if !self.is_active(to) {
            return Err(GraphError::NodeUnknown(to.clone()));
        }
        if from == to || self.reaches(to, from) {
            return Err(GraphError::Cycle {
                from: from.clone(),
                to: to.clone(),
            });
        }

        let idx = self.edges.len();
        self.edges.push(Edge {
            from: from.clone(),
            to: to.clone(),
            kind,
            metadata,
            retired: false,
        });
        if let Some(slot) = self.slots.get_mut(from) {
            slot.out.push(idx);
        }
        if let Some(slot) = self.slots.get_mut(to) {
            slot.inc.push(idx);
        }
        Ok(())
    }

    /// Whether an active edge with this kind already links `from -> to`.
    pub fn has_edge(&self, from: &NodeId, to: &NodeId, kind: EdgeKind) -> bool {
        self.slots
            .get(from)
            .map(|s| {
                s.out.iter().any(|&i| {
                    let e = &self.edges[i];
                    !e.retired && e.to == *to && e.kind == kind
                })
            })
            .unwrap_or(false)
    }

    /// Directed reachability over active edges: can `from` reach `target`?
    fn reaches(&self, from: &NodeId, target: &NodeId) -> bool {
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<&NodeId> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if let Some(slot) = self.slots.get(current) {
                for &idx in &slot.out {
                    let edge = &self.edges[idx];
                    if edge.retired {
                        continue;
                    }
                    if visited.insert(&edge.to) {
                        queue.push_back(&edge.to);
                    }
                }
            }
        }
        false
    }

    /// Bounded breadth-first walk over both edge directions.
    ///
    /// Per LINEAGE.md §3/§4: the queried node is distance 0 and excluded;
    /// results come back as (id, distance), ordered by increasing distance
    /// with ties broken by edge insertion order; a node reachable by
    /// several paths appears once, at its minimum distance. Retired nodes
    /// and edges are invisible.
    pub fn walk(
        &self,
        id: &NodeId,
        kinds: Option<&[EdgeKind]>,
        depth: usize,
    ) -> GraphResult<Vec<(NodeId, usize)>> {
        if !self.is_active(id) {
            return Err(GraphError::NodeUnknown(id.clone()));
        }

        let mut results: Vec<(NodeId, usize)> = Vec::new();
        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(id.clone());
        let mut frontier: Vec<NodeId> = vec![id.clone()];

        for distance in 1..=depth {
            // Candidate edges from the whole frontier, globally ordered by
            // edge insertion index so ties resolve deterministically.
            let mut candidates: Vec<(usize, NodeId)> = Vec::new();
            for node in &frontier {
                let slot = match self.slots.get(node) {
                    Some(s) => s,
                    None => continue,
                };
                for &idx in slot.out.iter().chain(slot.inc.iter()) {
                    let edge = &self.edges[idx];
                    if edge.retired || !Self::kind_allowed(edge.kind, kinds) {
                        continue;
                    }
                    let other = if edge.from == *node { &edge.to } else { &edge.from };
                    if self.is_active(other) {
                        candidates.push((idx, other.clone()));
                    }
                }
            }
            candidates.sort_by_key(|(idx, _)| *idx);

            let mut next: Vec<NodeId> = Vec::new();
            for (_, other) in candidates {
                if visited.insert(other.clone()) {
                    results.push((other.clone(), distance));
                    next.push(other);
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(results)
    }

    /// Neighbor ids up to `depth` hops, restricted to `kinds`.
    pub fn neighbors(
        &self,
        id: &NodeId,
        kinds: Option<&[EdgeKind]>,
        depth: usize,
    ) -> GraphResult<Vec<NodeId>> {
        Ok(self
            .walk(id, kinds, depth)?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Tombstones a node and every edge touching it (invariant G2).
    ///
    /// Idempotent on already-retired nodes. Fails with
    /// `LIN_GRAPH_NODE_UNKNOWN` if the id was never registered.
    pub fn retire(&mut self, id: &NodeId) -> GraphResult<()> {
        let slot = self
            .slots
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeUnknown(id.clone()))?;
        slot.retired = true;
        let touching: Vec<usize> = slot.out.iter().chain(slot.inc.iter()).copied().collect();
        for idx in touching {
            self.edges[idx].retired = true;
        }
        Ok(())
    }

    /// Active node ids, in insertion order.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .filter(|id| self.is_active(id))
            .cloned()
            .collect()
    }

    /// Active edges, in insertion order.
    pub fn active_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.retired)
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn kind_allowed(kind: EdgeKind, filter: Option<&[EdgeKind]>) -> bool {
        match filter {
            None => true,
            Some(kinds) => kinds.contains(&kind),
        }
    }

    pub(super) fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub(super) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(super) fn slot_retired(&self, id: &NodeId) -> bool {
        self.slots.get(id).map(|s| s.retired).unwrap_or(false)
    }

    /// Kahn's algorithm over active edges. Invariant G1 must hold for
    /// imported structure too, not only for edges inserted through
    /// `add_edge`.
    fn verify_acyclic(&self) -> GraphResult<()> {
        let mut indegree: BTreeMap<&NodeId, usize> =
            self.order.iter().map(|id| (id, 0)).collect();
        for edge in self.edges.iter().filter(|e| !e.retired) {
            if let Some(d) = indegree.get_mut(&edge.to) {
                *d += 1;
            }
        }

        let mut queue: VecDeque<&NodeId> = indegree
            .iter()
            .filter(|(_, &d)| d == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut seen = 0usize;
        while let Some(current) = queue.pop_front() {
            seen += 1;
            if let Some(slot) = self.slots.get(current) {
                for &idx in &slot.out {
                    let edge = &self.edges[idx];
                    if edge.retired {
                        continue;
                    }
                    if let Some(d) = indegree.get_mut(&edge.to) {
                        *d -= 1;
                        if *d == 0 {
                            queue.push_back(&edge.to);
                        }
                    }
                }
            }
        }

        if seen < self.order.len() {
            return Err(GraphError::SnapshotFormat(
                "active edge set contains a cycle".to_string(),
            ));
        }
        Ok(())
    }

    /// Rebuilds a graph from raw node and edge lists. Used by snapshot
    /// import; adjacency is reconstructed, tombstones preserved, and the
    /// active edge set is re-checked for cycles (G1).
    pub(super) fn rebuild(
        nodes: Vec<(NodeId, bool)>,
        edges: Vec<Edge>,
    ) -> GraphResult<Self> {
        let mut graph = Self::new();
        for (id, retired) in nodes {
            graph.add_node(id.clone());
            if retired {
                if let Some(slot) = graph.slots.get_mut(&id) {
                    slot.retired = true;
                }
            }
        }
        for edge in edges {
            if !graph.contains(&edge.from) {
                return Err(GraphError::SnapshotFormat(format!(
                    "edge references unknown node {}",
                    edge.from
                )));
            }
            if !graph.contains(&edge.to) {
                return Err(GraphError::SnapshotFormat(format!(
                    "edge references unknown node {}",
                    edge.to
                )));
            }
            let idx = graph.edges.len();
            graph.edges.push(edge.clone());
            if let Some(slot) = graph.slots.get_mut(&edge.from) {
                slot.out.push(idx);
            }
            if let Some(slot) = graph.slots.get_mut(&edge.to) {
                slot.inc.push(idx);
            }
        }
        graph.verify_acyclic()?;
        Ok(graph)
    }
}
