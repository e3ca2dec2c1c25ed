//! Ancestor/descendant closure of a set of hit records.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::entities::Node;
use crate::domain::relations::RelationIndex;

/// Every hit, every ancestor of a hit up to its root and every descendant of
/// a hit, each once, as positions in input order.
///
/// The ancestor walk stops at the first record already in the closure, since
/// its own ancestors are in there too. The descendant walk stops at records
/// whose subtree was already expanded. Both guards also end walks that would
/// otherwise loop on a parent cycle.
#[instrument(level = "debug", skip(flat, relations), fields(hits = hits.len()))]
pub fn expand(flat: &[Node], relations: &RelationIndex, hits: &[usize]) -> Vec<usize> {
    let mut closure: HashSet<usize> = HashSet::with_capacity(hits.len());
    let mut expanded: HashSet<usize> = HashSet::new();
    let mut stack = Vec::new();

    for &hit in hits {
        closure.insert(hit);

        let mut current = relations.parent(hit);
        while let Some(pos) = current {
            if !closure.insert(pos) {
                break;
            }
            current = relations.parent(pos);
        }

        if !expanded.insert(hit) {
            continue;
        }
        stack.push(hit);
        while let Some(pos) = stack.pop() {
            for &child in relations.children(&flat[pos].id) {
                if expanded.insert(child) {
                    closure.insert(child);
                    stack.push(child);
                }
            }
        }
    }

    let mut positions: Vec<usize> = closure.into_iter().collect();
    positions.sort_unstable();
    debug!(closure = positions.len());
    positions
}
