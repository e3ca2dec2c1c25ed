//! Stateful index over one hierarchical dataset.
//!
//! A [`TreeIndex`] starts empty. Every [`TreeIndex::load`] rebuilds the
//! relation index, the nested forest and (when search fields are configured)
//! the search index from scratch; nothing is patched incrementally.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::application::error::ApplicationResult;
use crate::domain::convert::{assemble, to_tree};
use crate::domain::expand::expand;
use crate::domain::{
    find_hits, generate, Anomaly, CandidateFilter, DomainError, Node, NodeId, RelationIndex,
    SearchField, SearchIndex, TreeNode,
};

/// What to do when two records share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later record replaces the earlier one.
    #[default]
    LastWins,
    /// The load fails and the previous state is kept.
    Reject,
}

/// Index settings, also the `[index]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Fields joined into each node's search text; empty disables search
    pub search_fields: Vec<SearchField>,
    pub duplicate_ids: DuplicatePolicy,
    pub candidate_filter: CandidateFilter,
    /// Dataset size from which search texts are built in parallel
    pub parallel_threshold: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            search_fields: vec![SearchField::Label, SearchField::Value],
            duplicate_ids: DuplicatePolicy::default(),
            candidate_filter: CandidateFilter::default(),
            parallel_threshold: 50_000,
        }
    }
}

/// Summary of a (re)load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Records handed in, duplicates included
    pub records: usize,
    /// Distinct ids
    pub nodes: usize,
    pub roots: usize,
    /// Distinct chars in the search index, `None` when search is disabled
    pub indexed_chars: Option<usize>,
    pub anomalies: Vec<Anomaly>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

#[derive(Debug)]
struct Dataset {
    flat: Vec<Node>,
    relations: RelationIndex,
    tree: Vec<TreeNode>,
    search: Option<SearchIndex>,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Empty,
    Loaded(Dataset),
}

#[derive(Debug, Default)]
pub struct TreeIndex {
    options: IndexOptions,
    state: State,
}

impl TreeIndex {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            state: State::Empty,
        }
    }

    /// Index with default options but the given search fields.
    pub fn with_search_fields(fields: impl IntoIterator<Item = SearchField>) -> Self {
        Self::new(IndexOptions {
            search_fields: fields.into_iter().collect(),
            ..IndexOptions::default()
        })
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded(_))
    }

    /// Replace the dataset and rebuild every derived structure.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn load(&mut self, records: Vec<Node>) -> ApplicationResult<LoadReport> {
        let relations = RelationIndex::build(&records);

        if self.options.duplicate_ids == DuplicatePolicy::Reject {
            let duplicate = relations.anomalies().iter().find_map(|anomaly| match anomaly {
                Anomaly::DuplicateId {
                    id,
                    superseded,
                    kept,
                } => Some(DomainError::DuplicateId {
                    id: id.clone(),
                    first: *superseded,
                    second: *kept,
                }),
                _ => None,
            });
            if let Some(err) = duplicate {
                return Err(err.into());
            }
        }
        for anomaly in relations.anomalies() {
            warn!("{}", anomaly);
        }

        let tree = assemble(&records, &relations);
        let search = if self.options.search_fields.is_empty() {
            None
        } else {
            Some(SearchIndex::build(
                &records,
                &relations,
                &self.options.search_fields,
                self.options.parallel_threshold,
            ))
        };

        let report = LoadReport {
            records: records.len(),
            nodes: relations.len(),
            roots: tree.len(),
            indexed_chars: search.as_ref().map(SearchIndex::char_count),
            anomalies: relations.anomalies().to_vec(),
        };
        info!(
            records = report.records,
            nodes = report.nodes,
            roots = report.roots,
            "dataset loaded"
        );

        self.state = State::Loaded(Dataset {
            flat: records,
            relations,
            tree,
            search,
        });
        Ok(report)
    }

    /// Load a synthetic breadth-first dataset, see [`generate`].
    pub fn generate(
        &mut self,
        count: usize,
        children_per_node: usize,
    ) -> ApplicationResult<LoadReport> {
        self.load(generate(count, children_per_node))
    }

    /// Forest of every node matching `query` together with its ancestors and
    /// descendants.
    ///
    /// A blank query, or an index without search fields, returns the whole
    /// current forest unfiltered. Before the first load the result is empty.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> Cow<'_, [TreeNode]> {
        let State::Loaded(data) = &self.state else {
            return Cow::Borrowed(&[]);
        };
        let Some(index) = data.search.as_ref() else {
            return Cow::Borrowed(&data.tree);
        };
        if query.trim().is_empty() {
            return Cow::Borrowed(&data.tree);
        }

        let hits = find_hits(index, query, self.options.candidate_filter);
        if hits.is_empty() {
            return Cow::Owned(Vec::new());
        }
        let closure: Vec<Node> = expand(&data.flat, &data.relations, &hits)
            .into_iter()
            .map(|pos| data.flat[pos].clone())
            .collect();
        info!(hits = hits.len(), closure = closure.len(), "search done");
        Cow::Owned(to_tree(&closure))
    }

    /// Nodes matching `query` directly, without expansion, in input order.
    pub fn search_hits(&self, query: &str) -> Vec<&Node> {
        let State::Loaded(data) = &self.state else {
            return Vec::new();
        };
        let Some(index) = data.search.as_ref() else {
            return Vec::new();
        };
        find_hits(index, query, self.options.candidate_filter)
            .into_iter()
            .map(|pos| &data.flat[pos])
            .collect()
    }

    /// Closure of the given ids over ancestors and descendants, in input
    /// order. Unknown ids are ignored.
    pub fn expand<'a>(&self, ids: impl IntoIterator<Item = &'a NodeId>) -> Vec<&Node> {
        let State::Loaded(data) = &self.state else {
            return Vec::new();
        };
        let hits: Vec<usize> = ids
            .into_iter()
            .filter_map(|id| data.relations.position(id))
            .collect();
        expand(&data.flat, &data.relations, &hits)
            .into_iter()
            .map(|pos| &data.flat[pos])
            .collect()
    }

    /// Records as loaded, duplicates included.
    pub fn flat_data(&self) -> &[Node] {
        match &self.state {
            State::Loaded(data) => &data.flat,
            State::Empty => &[],
        }
    }

    /// Full nested forest of the current dataset.
    pub fn tree_data(&self) -> &[TreeNode] {
        match &self.state {
            State::Loaded(data) => &data.tree,
            State::Empty => &[],
        }
    }

    /// Canonical record for `id`.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        let State::Loaded(data) = &self.state else {
            return None;
        };
        data.relations.position(id).map(|pos| &data.flat[pos])
    }

    /// Direct children of `id`, in input order.
    pub fn children(&self, id: &NodeId) -> Vec<&Node> {
        let State::Loaded(data) = &self.state else {
            return Vec::new();
        };
        data.relations
            .children(id)
            .iter()
            .map(|&pos| &data.flat[pos])
            .collect()
    }

    /// Search text stored for `id`, if search is enabled.
    pub fn search_text(&self, id: &NodeId) -> Option<&str> {
        let State::Loaded(data) = &self.state else {
            return None;
        };
        let pos = data.relations.position(id)?;
        data.search.as_ref()?.text(pos)
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        match &self.state {
            State::Loaded(data) => data.relations.anomalies(),
            State::Empty => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_index_when_querying_then_everything_is_empty() {
        let index = TreeIndex::with_search_fields([SearchField::Label]);
        assert!(!index.is_loaded());
        assert!(index.search("anything").is_empty());
        assert!(index.search("").is_empty());
        assert!(index.flat_data().is_empty());
        assert!(index.tree_data().is_empty());
        assert!(index.node(&1.into()).is_none());
    }

    #[test]
    fn given_reject_policy_when_loading_duplicates_then_errors_and_keeps_previous_state() {
        let mut index = TreeIndex::new(IndexOptions {
            duplicate_ids: DuplicatePolicy::Reject,
            ..IndexOptions::default()
        });
        index.load(vec![Node::new(1, "kept", None)]).unwrap();

        let result = index.load(vec![Node::new(1, "a", None), Node::new(1, "b", None)]);

        assert!(result.is_err());
        assert_eq!(index.flat_data().len(), 1);
        assert_eq!(index.node(&1.into()).unwrap().label, "kept");
    }

    #[test]
    fn given_default_options_when_created_then_searches_label_and_value() {
        let options = IndexOptions::default();
        assert_eq!(options.search_fields, vec![SearchField::Label, SearchField::Value]);
        assert_eq!(options.candidate_filter, CandidateFilter::LastChar);
        assert_eq!(options.duplicate_ids, DuplicatePolicy::LastWins);
    }

    #[test]
    fn given_search_disabled_when_searching_then_returns_full_forest_and_no_hits() {
        let mut index = TreeIndex::new(IndexOptions {
            search_fields: vec![],
            ..IndexOptions::default()
        });
        let report = index.generate(5, 2).unwrap();

        assert_eq!(report.indexed_chars, None);
        assert!(matches!(index.search("node-4"), Cow::Borrowed(_)));
        assert!(index.search_hits("node-4").is_empty());
    }
}
