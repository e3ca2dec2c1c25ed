//! Relation index: id and parent/child lookups derived from the flat records.
//!
//! Nodes are addressed by their position in the flat record slice the index
//! was built from. Only the canonical record of an id (the last one seen)
//! takes part in relations; earlier duplicates are superseded.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, instrument};

use crate::domain::entities::{Node, NodeId};
use crate::domain::error::Anomaly;

#[derive(Debug, Default, Clone)]
pub struct RelationIndex {
    /// id -> position of the canonical record
    node_map: HashMap<NodeId, usize>,
    /// parent id -> positions of canonical children, in input order
    children_map: HashMap<NodeId, Vec<usize>>,
    /// position -> position of the parent record, when it exists
    parents: Vec<Option<usize>>,
    canonical: Vec<bool>,
    roots: Vec<usize>,
    /// canonical positions reachable from the roots, breadth-first
    breadth_first: Vec<usize>,
    anomalies: Vec<Anomaly>,
}

impl RelationIndex {
    /// Build all maps in full from `flat`.
    #[instrument(level = "debug", skip(flat), fields(records = flat.len()))]
    pub fn build(flat: &[Node]) -> Self {
        let mut anomalies = Vec::new();

        let mut node_map: HashMap<NodeId, usize> = HashMap::with_capacity(flat.len());
        for (pos, node) in flat.iter().enumerate() {
            if let Some(superseded) = node_map.insert(node.id.clone(), pos) {
                anomalies.push(Anomaly::DuplicateId {
                    id: node.id.clone(),
                    superseded,
                    kept: pos,
                });
            }
        }

        let mut canonical = vec![false; flat.len()];
        for &pos in node_map.values() {
            canonical[pos] = true;
        }

        let mut children_map: HashMap<NodeId, Vec<usize>> = HashMap::new();
        let mut parents = vec![None; flat.len()];
        let mut roots = Vec::new();
        for (pos, node) in flat.iter().enumerate() {
            if !canonical[pos] {
                continue;
            }
            match &node.parent_id {
                None => roots.push(pos),
                Some(parent_id) => {
                    children_map.entry(parent_id.clone()).or_default().push(pos);
                    match node_map.get(parent_id) {
                        Some(&parent_pos) => parents[pos] = Some(parent_pos),
                        None => {
                            anomalies.push(Anomaly::MissingParent {
                                id: node.id.clone(),
                                parent_id: parent_id.clone(),
                            });
                            roots.push(pos);
                        }
                    }
                }
            }
        }

        let mut index = Self {
            node_map,
            children_map,
            parents,
            canonical,
            roots,
            breadth_first: Vec::new(),
            anomalies,
        };
        index.breadth_first = index.walk_breadth_first(flat);

        if index.breadth_first.len() < index.node_map.len() {
            let mut reached = vec![false; flat.len()];
            for &pos in &index.breadth_first {
                reached[pos] = true;
            }
            for (pos, node) in flat.iter().enumerate() {
                if index.canonical[pos] && !reached[pos] {
                    index.anomalies.push(Anomaly::Unreachable {
                        id: node.id.clone(),
                    });
                }
            }
        }

        debug!(
            anomalies = index.anomalies.len(),
            nodes = index.node_map.len(),
            roots = index.roots.len(),
            parents = index.children_map.len(),
            "relation index built"
        );
        index
    }

    fn walk_breadth_first(&self, flat: &[Node]) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.node_map.len());
        let mut queue: VecDeque<usize> = self.roots.iter().copied().collect();
        while let Some(pos) = queue.pop_front() {
            order.push(pos);
            // roots are the only entry points and every child has one parent
            // record, so each position is queued at most once
            queue.extend(self.children(&flat[pos].id).iter().copied());
        }
        order
    }

    /// Position of the canonical record for `id`.
    pub fn position(&self, id: &NodeId) -> Option<usize> {
        self.node_map.get(id).copied()
    }

    /// Positions of the direct children of `id`, in input order.
    pub fn children(&self, id: &NodeId) -> &[usize] {
        self.children_map
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn parent(&self, pos: usize) -> Option<usize> {
        self.parents.get(pos).copied().flatten()
    }

    pub fn is_canonical(&self, pos: usize) -> bool {
        self.canonical.get(pos).copied().unwrap_or(false)
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Canonical positions reachable from a root, parents before children.
    pub fn breadth_first(&self) -> &[usize] {
        &self.breadth_first
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}
