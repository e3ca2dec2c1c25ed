//! Conversion between the flat and the nested representation of a dataset.

use tracing::instrument;

use crate::domain::entities::{forest_iter, Node, TreeNode};
use crate::domain::error::Anomaly;
use crate::domain::relations::RelationIndex;

/// Forest built from flat records, plus what was wrong with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub forest: Vec<TreeNode>,
    pub anomalies: Vec<Anomaly>,
}

/// Nest flat records into a forest.
///
/// Children keep the order in which they appear in `flat`, and so do roots.
/// Records with a dangling parent reference become roots; records caught in a
/// parent cycle are left out.
pub fn to_tree(flat: &[Node]) -> Vec<TreeNode> {
    build_forest(flat).forest
}

/// Like [`to_tree`], also returning the anomalies found on the way.
pub fn build_forest(flat: &[Node]) -> Conversion {
    let relations = RelationIndex::build(flat);
    Conversion {
        forest: assemble(flat, &relations),
        anomalies: relations.anomalies().to_vec(),
    }
}

/// Build the nested forest from an already computed relation index.
///
/// Works bottom-up over the breadth-first order so deep chains need no
/// recursion.
#[instrument(level = "debug", skip_all, fields(records = flat.len()))]
pub(crate) fn assemble(flat: &[Node], relations: &RelationIndex) -> Vec<TreeNode> {
    let mut built: Vec<Option<TreeNode>> = vec![None; flat.len()];
    for &pos in relations.breadth_first().iter().rev() {
        let children = relations
            .children(&flat[pos].id)
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[pos] = Some(TreeNode {
            node: flat[pos].clone(),
            children,
        });
    }
    relations
        .roots()
        .iter()
        .filter_map(|&root| built[root].take())
        .collect()
}

/// Flatten a forest depth-first, pre-order.
pub fn to_flat(forest: &[TreeNode]) -> Vec<Node> {
    forest_iter(forest).map(|tree| tree.node.clone()).collect()
}
