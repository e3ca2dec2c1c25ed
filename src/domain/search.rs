//! Substring search over a [`SearchIndex`]: shortlist by char postings, then
//! confirm each candidate by literal containment.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::domain::search_index::SearchIndex;

/// How candidates are shortlisted before the substring check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateFilter {
    /// Postings of the query's last char only.
    #[default]
    LastChar,
    /// Intersection of the postings of every distinct query char.
    AllChars,
}

/// Positions of the records whose search text contains `query`, ascending.
///
/// The query is lower-cased. Candidates come from the trimmed query, while the
/// containment check uses the untrimmed one, so surrounding whitespace in a
/// query must also appear in the text. A blank query yields no hits; callers
/// that treat blank as "no filter" check for it first.
#[instrument(level = "debug", skip(index))]
pub fn find_hits(index: &SearchIndex, query: &str, filter: CandidateFilter) -> Vec<usize> {
    let needle = query.to_lowercase();
    let trimmed = needle.trim();
    let Some(last) = trimmed.chars().last() else {
        return Vec::new();
    };

    let candidates = match filter {
        CandidateFilter::LastChar => index.postings(last).to_vec(),
        CandidateFilter::AllChars => intersect_postings(index, trimmed),
    };
    trace!(candidates = candidates.len());

    candidates
        .into_iter()
        .filter(|&pos| index.text(pos).is_some_and(|text| text.contains(&needle)))
        .collect()
}

fn intersect_postings(index: &SearchIndex, query: &str) -> Vec<usize> {
    let mut lists: Vec<&[usize]> = query
        .chars()
        .collect::<HashSet<_>>()
        .into_iter()
        .map(|c| index.postings(c))
        .collect();
    lists.sort_by_key(|list| list.len());

    let Some((shortest, rest)) = lists.split_first() else {
        return Vec::new();
    };
    shortest
        .iter()
        .copied()
        .filter(|pos| rest.iter().all(|list| list.binary_search(pos).is_ok()))
        .collect()
}
