//! Tree drawings of forests via termtree

use termtree::Tree;

use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::TreeNode;

/// Deepest tree drawn; drawings are built and freed recursively.
pub const MAX_DRAW_DEPTH: usize = 256;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(node_line(self)).with_leaves(leaves)
    }
}

/// `label [id]`, with a marker for hidden nodes.
fn node_line(tree: &TreeNode) -> String {
    let node = &tree.node;
    if node.is_hidden {
        format!("{} [{}] (hidden)", node.label, node.id)
    } else {
        format!("{} [{}]", node.label, node.id)
    }
}

/// Print every tree of the forest, roots in order.
pub fn print_forest(forest: &[TreeNode]) -> CliResult<()> {
    check_depth(forest)?;
    for tree in forest {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

fn check_depth(forest: &[TreeNode]) -> CliResult<()> {
    let depth = forest.iter().map(TreeNode::depth).max().unwrap_or(0);
    if depth > MAX_DRAW_DEPTH {
        return Err(CliError::TooDeep {
            depth,
            limit: MAX_DRAW_DEPTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{generate, to_tree, Node, NodeId};

    #[test]
    fn given_tree_when_rendering_then_draws_children_below_root() {
        let flat = vec![
            Node::new(1, "Root", None),
            Node::new(2, "Alpha", Some(NodeId::from(1))),
            Node::new(3, "Beta", Some(NodeId::from(1))),
        ];
        let forest = to_tree(&flat);
        let drawing = forest[0].to_tree_string().to_string();

        let lines: Vec<&str> = drawing.lines().collect();
        assert_eq!(lines[0], "Root [1]");
        assert!(lines[1].ends_with("Alpha [2]"));
        assert!(lines[2].ends_with("Beta [3]"));
    }

    #[test]
    fn given_hidden_node_when_rendering_then_marks_it() {
        let mut node = Node::new("x", "Secret", None);
        node.is_hidden = true;
        let drawing = TreeNode::leaf(node).to_tree_string().to_string();
        assert!(drawing.starts_with("Secret [x] (hidden)"));
    }

    #[test]
    fn given_chain_deeper_than_limit_when_printing_then_refuses() {
        let forest = to_tree(&generate(MAX_DRAW_DEPTH + 1, 1));

        let result = print_forest(&forest);

        assert!(matches!(result, Err(CliError::TooDeep { depth, .. }) if depth == MAX_DRAW_DEPTH + 1));
        assert!(check_depth(&to_tree(&generate(MAX_DRAW_DEPTH, 1))).is_ok());
    }
}
