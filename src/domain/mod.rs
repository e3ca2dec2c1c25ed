//! Domain layer: entities and indexing algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod convert;
pub mod entities;
pub mod error;
pub mod expand;
pub mod generator;
pub mod relations;
pub mod search;
pub mod search_index;

pub use convert::{build_forest, to_flat, to_tree, Conversion};
pub use entities::*;
pub use error::{Anomaly, DomainError};
pub use generator::generate;
pub use relations::RelationIndex;
pub use search::{find_hits, CandidateFilter};
pub use search_index::SearchIndex;
