//! Character-level inverted index over the configured node fields.
//!
//! Every canonical node gets a lower-cased search text; every distinct char of
//! that text maps back to the node. The index only answers "which nodes
//! contain this char"; it keeps no substrings or positions.

use std::collections::HashMap;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::domain::entities::{Node, SearchField};
use crate::domain::relations::RelationIndex;

#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    /// record position -> search text (empty for superseded duplicates)
    texts: Vec<String>,
    /// char -> ascending record positions whose text contains it
    postings: HashMap<char, Vec<usize>>,
}

/// Search text of a node: the fields' string forms, space-joined, lower-cased.
pub fn search_text(node: &Node, fields: &[SearchField]) -> String {
    fields
        .iter()
        .map(|&field| node.field_text(field))
        .join(" ")
        .to_lowercase()
}

impl SearchIndex {
    /// Index every canonical record of `flat`.
    ///
    /// Search texts are computed in parallel once `flat` holds at least
    /// `parallel_threshold` records. Postings are always filled in record
    /// order.
    #[instrument(level = "debug", skip(flat, relations), fields(records = flat.len()))]
    pub fn build(
        flat: &[Node],
        relations: &RelationIndex,
        fields: &[SearchField],
        parallel_threshold: usize,
    ) -> Self {
        let text_of = |(pos, node): (usize, &Node)| {
            if relations.is_canonical(pos) {
                search_text(node, fields)
            } else {
                String::new()
            }
        };
        let texts: Vec<String> = if flat.len() >= parallel_threshold {
            flat.par_iter().enumerate().map(text_of).collect()
        } else {
            flat.iter().enumerate().map(text_of).collect()
        };

        let mut postings: HashMap<char, Vec<usize>> = HashMap::new();
        for (pos, text) in texts.iter().enumerate() {
            for c in text.chars() {
                let list = postings.entry(c).or_default();
                // positions arrive in ascending order, so a repeat is always last
                if list.last() != Some(&pos) {
                    list.push(pos);
                }
            }
        }

        debug!(chars = postings.len(), "search index built");
        Self { texts, postings }
    }

    /// Search text of the record at `pos`.
    pub fn text(&self, pos: usize) -> Option<&str> {
        self.texts.get(pos).map(String::as_str)
    }

    /// Records whose search text contains `c`.
    pub fn postings(&self, c: char) -> &[usize] {
        self.postings
            .get(&c)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct indexed chars.
    pub fn char_count(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeId;
    use rstest::rstest;

    fn sample() -> Vec<Node> {
        vec![
            Node::new(1, "Root", None).with_value(1),
            Node::new(2, "Alpha", Some(NodeId::from(1))).with_value("A-Value"),
            Node::new(3, "Beta", Some(NodeId::from(1))),
        ]
    }

    #[test]
    fn given_label_and_value_fields_when_building_then_joins_lower_cased() {
        let flat = sample();
        let relations = RelationIndex::build(&flat);
        let index = SearchIndex::build(&flat, &relations, &[SearchField::Label, SearchField::Value], 100);

        assert_eq!(index.text(0), Some("root 1"));
        assert_eq!(index.text(1), Some("alpha a-value"));
        // null value still contributes the separator
        assert_eq!(index.text(2), Some("beta "));
    }

    #[test]
    fn given_repeated_char_in_one_node_when_building_then_posts_node_once() {
        let flat = sample();
        let relations = RelationIndex::build(&flat);
        let index = SearchIndex::build(&flat, &relations, &[SearchField::Label], 100);

        assert_eq!(index.postings('a'), &[1, 2]);
        assert_eq!(index.postings('o'), &[0]);
        assert!(index.postings('z').is_empty());
    }

    #[test]
    fn given_superseded_duplicate_when_building_then_only_canonical_is_indexed() {
        let flat = vec![Node::new(1, "old", None), Node::new(1, "new", None)];
        let relations = RelationIndex::build(&flat);
        let index = SearchIndex::build(&flat, &relations, &[SearchField::Label], 100);

        assert_eq!(index.text(0), Some(""));
        assert!(index.postings('o').is_empty());
        assert_eq!(index.postings('w'), &[1]);
    }

    #[rstest]
    #[case(0)]
    #[case(usize::MAX)]
    fn given_any_threshold_when_building_then_result_is_identical(#[case] threshold: usize) {
        let flat = sample();
        let relations = RelationIndex::build(&flat);
        let index = SearchIndex::build(&flat, &relations, &[SearchField::Label], threshold);

        assert_eq!(index.postings('t'), &[0, 2]);
        assert_eq!(index.char_count(), 9);
    }
}
