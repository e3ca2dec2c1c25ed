//! Deterministic synthetic datasets for tests and benchmarks.

use tracing::instrument;

use crate::domain::entities::Node;

/// Single-root dataset of `count` nodes with ids `1..=count`.
///
/// Node 1 is the root. The remaining ids are handed out breadth-first: each
/// node, in id order, receives up to `children_per_node` children until the
/// ids run out. Labels are `root` and `node-<id>`, values equal the id.
#[instrument(level = "debug")]
pub fn generate(count: usize, children_per_node: usize) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(count);
    if count == 0 {
        return nodes;
    }
    nodes.push(Node::new(1, "root", None).with_value(1));

    let mut next_id: usize = 2;
    let mut parent_index = 0;
    while next_id <= count && parent_index < nodes.len() && children_per_node > 0 {
        let parent_id = nodes[parent_index].id.clone();
        for _ in 0..children_per_node {
            if next_id > count {
                break;
            }
            let id = next_id as i64;
            nodes.push(
                Node::new(id, format!("node-{id}"), Some(parent_id.clone())).with_value(id),
            );
            next_id += 1;
        }
        parent_index += 1;
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeId;
    use rstest::rstest;

    fn parent_ids(nodes: &[Node]) -> Vec<Option<NodeId>> {
        nodes.iter().map(|n| n.parent_id.clone()).collect()
    }

    #[test]
    fn given_seven_nodes_two_children_when_generating_then_fills_breadth_first() {
        let nodes = generate(7, 2);

        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, (1..=7i64).map(NodeId::from).collect::<Vec<_>>());
        assert_eq!(
            parent_ids(&nodes),
            vec![
                None,
                Some(1.into()),
                Some(1.into()),
                Some(2.into()),
                Some(2.into()),
                Some(3.into()),
                Some(3.into()),
            ]
        );
        assert_eq!(nodes[0].label, "root");
        assert_eq!(nodes[6].label, "node-7");
    }

    #[rstest]
    #[case(0, 3, 0)]
    #[case(1, 3, 1)]
    #[case(5, 0, 1)]
    #[case(10, 3, 10)]
    fn given_edge_sizes_when_generating_then_node_count_matches(
        #[case] count: usize,
        #[case] children: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(generate(count, children).len(), expected);
    }

    #[test]
    fn given_same_arguments_when_generating_twice_then_identical() {
        assert_eq!(generate(500, 4), generate(500, 4));
    }
}
