//! Domain entities: node records, nested tree nodes and their identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Identifier of a node, unique within one dataset.
///
/// Datasets coming from JSON use either numbers or strings as ids; both are
/// accepted. `1` and `"1"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Num(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

/// Payload value of a node. Unlike the label it need not be a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for NodeValue {
    /// `Null` renders as the empty string so it contributes nothing to search text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Null => Ok(()),
            NodeValue::Bool(b) => write!(f, "{b}"),
            // whole-valued floats render like integers: 1.0 as "1"
            NodeValue::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < 1e21 => {
                    write!(f, "{}", x as i128)
                }
                _ => write!(f, "{n}"),
            },
            NodeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeValue {
    fn from(n: i64) -> Self {
        NodeValue::Number(n.into())
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::Text(s.to_string())
    }
}

/// Flat record: one node carrying its own parent reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: NodeValue,
    #[serde(default)]
    pub is_hidden: bool,
    /// `None` marks a root
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: NodeValue::Null,
            is_hidden: false,
            parent_id,
        }
    }

    pub fn with_value(mut self, value: impl Into<NodeValue>) -> Self {
        self.value = value.into();
        self
    }

    /// String form of one field, as it contributes to the node's search text.
    pub fn field_text(&self, field: SearchField) -> String {
        match field {
            SearchField::Id => self.id.to_string(),
            SearchField::Label => self.label.clone(),
            SearchField::Value => self.value.to_string(),
            SearchField::IsHidden => self.is_hidden.to_string(),
            SearchField::ParentId => self
                .parent_id
                .as_ref()
                .map(NodeId::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Node fields that can take part in search text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Id,
    Label,
    Value,
    IsHidden,
    ParentId,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::Label => "label",
            SearchField::Value => "value",
            SearchField::IsHidden => "isHidden",
            SearchField::ParentId => "parentId",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SearchField::Id),
            "label" => Ok(SearchField::Label),
            "value" => Ok(SearchField::Value),
            "isHidden" | "is_hidden" => Ok(SearchField::IsHidden),
            "parentId" | "parent_id" => Ok(SearchField::ParentId),
            other => Err(DomainError::UnknownSearchField(other.to_string())),
        }
    }
}

/// Node of the nested representation.
///
/// `Clone`, `PartialEq` and `Drop` walk the tree with an explicit stack, so
/// arbitrarily deep chains are fine. The derived `Serialize` still recurses;
/// writers check the depth first.
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    /// Split into the record and its children.
    pub fn into_parts(mut self) -> (Node, Vec<TreeNode>) {
        let children = std::mem::take(&mut self.children);
        let node = std::mem::replace(&mut self.node, Node::new(0, String::new(), None));
        (node, children)
    }

    /// Pre-order walk over this node and all its descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![self],
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in &node.children {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        let pre_order: Vec<&TreeNode> = self.iter().collect();
        // reversed pre-order finishes every subtree before its parent; the
        // first child's subtree ends up on top of the stack
        let mut built: Vec<TreeNode> = Vec::new();
        for tree in pre_order.into_iter().rev() {
            let at = built.len() - tree.children.len();
            let mut children: Vec<TreeNode> = built.drain(at..).collect();
            children.reverse();
            built.push(TreeNode {
                node: tree.node.clone(),
                children,
            });
        }
        built.pop().unwrap_or_else(|| TreeNode::leaf(self.node.clone()))
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.node != b.node || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for TreeNode {}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut tree) = stack.pop() {
            stack.append(&mut tree.children);
        }
    }
}

/// Pre-order walk over every tree of a forest, roots in order.
pub fn forest_iter(forest: &[TreeNode]) -> PreOrder<'_> {
    PreOrder {
        stack: forest.iter().rev().collect(),
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // reverse push keeps left-to-right order
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}
