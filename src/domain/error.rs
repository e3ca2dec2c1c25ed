//! Domain-level errors and structural anomalies (no external dependencies)

use std::fmt;

use thiserror::Error;

use crate::domain::entities::NodeId;

/// Domain errors represent business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node id {id} at records {first} and {second}")]
    DuplicateId {
        id: NodeId,
        first: usize,
        second: usize,
    },

    #[error("unknown search field: {0}")]
    UnknownSearchField(String),
}

/// Structural problem found while building the relation index.
///
/// Anomalies never abort a lenient load; they are collected so callers can
/// decide how strict to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Record at `superseded` was replaced in the id map by the record at `kept`.
    DuplicateId {
        id: NodeId,
        superseded: usize,
        kept: usize,
    },
    /// Parent reference points at no known node; the node became a root.
    MissingParent { id: NodeId, parent_id: NodeId },
    /// Node never reaches a root through its parents (parent cycle).
    Unreachable { id: NodeId },
}

impl Anomaly {
    pub fn id(&self) -> &NodeId {
        match self {
            Anomaly::DuplicateId { id, .. }
            | Anomaly::MissingParent { id, .. }
            | Anomaly::Unreachable { id } => id,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::DuplicateId {
                id,
                superseded,
                kept,
            } => write!(
                f,
                "duplicate id {id}: record {superseded} replaced by record {kept}"
            ),
            Anomaly::MissingParent { id, parent_id } => {
                write!(f, "node {id} references missing parent {parent_id}, kept as root")
            }
            Anomaly::Unreachable { id } => {
                write!(f, "node {id} is part of a parent cycle, dropped from tree")
            }
        }
    }
}
