//! Infrastructure layer: dataset file I/O
//!
//! This layer reads and writes the JSON documents the index works on.

pub mod dataset;
pub mod error;

pub use dataset::{forest_to_json, read_dataset, write_json, Dataset, DatasetFormat};
pub use error::{InfraError, InfraResult};
