//! In-memory index over hierarchical datasets.
//!
//! A dataset is held both as flat records (each with a `parentId`) and as a
//! nested forest. Queries shortlist nodes through a character-level inverted
//! index, confirm them by substring containment and expand the hits to their
//! ancestors and descendants so the result is a connected forest.
//!
//! ```
//! use treeindex::application::TreeIndex;
//! use treeindex::domain::{Node, NodeId, SearchField};
//!
//! let mut index = TreeIndex::with_search_fields([SearchField::Label]);
//! index
//!     .load(vec![
//!         Node::new(1, "Root", None),
//!         Node::new(2, "Alpha", Some(NodeId::from(1))),
//!         Node::new(3, "Beta", Some(NodeId::from(1))),
//!     ])
//!     .unwrap();
//!
//! let forest = index.search("alp");
//! assert_eq!(forest[0].children.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::TreeIndex;
pub use domain::{build_forest, to_flat, to_tree};
