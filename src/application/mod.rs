//! Application layer: the stateful index facade
//!
//! This layer orchestrates the domain algorithms into a load/query lifecycle.

pub mod error;
pub mod tree_index;

pub use error::{ApplicationError, ApplicationResult};
pub use tree_index::{DuplicatePolicy, IndexOptions, LoadReport, TreeIndex};
