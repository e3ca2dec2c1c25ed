//! JSON dataset files: reading flat or nested records, writing results.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{Node, NodeId, TreeNode};
use crate::infrastructure::error::{InfraError, InfraResult};

/// Shape of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Array of records carrying `parentId`
    Flat,
    /// Array of roots with nested `children`
    Nested,
}

/// Records read from a dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub records: Vec<Node>,
    pub format: DatasetFormat,
}

/// Read a dataset file, flat or nested.
#[instrument(level = "debug")]
pub fn read_dataset(path: &Path) -> InfraResult<Dataset> {
    let content = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    let dataset = parse_dataset(&content)
        .map_err(|e| InfraError::json(format!("parse {}", path.display()), e))?;
    debug!(
        records = dataset.records.len(),
        format = ?dataset.format,
        "dataset read"
    );
    Ok(dataset)
}

/// Parse dataset JSON.
///
/// Any record with non-empty `children` makes the whole document nested; it
/// is then flattened pre-order and records without `parentId` below the top
/// level get their parent from the nesting.
pub fn parse_dataset(content: &str) -> Result<Dataset, serde_json::Error> {
    let forest: Vec<TreeNode> = serde_json::from_str(content)?;
    if forest.iter().any(|tree| !tree.children.is_empty()) {
        Ok(Dataset {
            records: flatten_nested(forest),
            format: DatasetFormat::Nested,
        })
    } else {
        Ok(Dataset {
            records: forest.into_iter().map(|tree| tree.into_parts().0).collect(),
            format: DatasetFormat::Flat,
        })
    }
}

fn flatten_nested(forest: Vec<TreeNode>) -> Vec<Node> {
    let mut records = Vec::new();
    let mut stack: Vec<(TreeNode, Option<NodeId>)> =
        forest.into_iter().rev().map(|tree| (tree, None)).collect();

    while let Some((tree, parent_id)) = stack.pop() {
        let (mut node, children) = tree.into_parts();
        if node.parent_id.is_none() {
            node.parent_id = parent_id;
        }
        let id = node.id.clone();
        records.push(node);
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, Some(id.clone()))),
        );
    }
    records
}

/// Deepest forest written as nested JSON.
///
/// serde_json reads at most 128 nested containers and every tree level takes
/// two (the node object and its `children` array), so deeper output could
/// not be read back. Serialization also recurses once per level.
pub const MAX_NESTED_DEPTH: usize = 63;

/// Pretty nested JSON of a forest no deeper than [`MAX_NESTED_DEPTH`].
pub fn forest_to_json(forest: &[TreeNode]) -> InfraResult<String> {
    let depth = forest.iter().map(TreeNode::depth).max().unwrap_or(0);
    if depth > MAX_NESTED_DEPTH {
        return Err(InfraError::TooDeep {
            depth,
            limit: MAX_NESTED_DEPTH,
        });
    }
    to_json(forest)
}

/// Pretty JSON of any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> InfraResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| InfraError::json("serialize output", e))
}

/// Write `value` as pretty JSON to `path`.
#[instrument(level = "debug", skip(value))]
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> InfraResult<()> {
    let json = to_json(value)?;
    fs::write(path, json).map_err(|e| InfraError::io(format!("write {}", path.display()), e))
}
