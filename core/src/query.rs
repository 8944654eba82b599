use crate::index::{DocId, InvertedIndex};
use crate::normalizer::{Normalizer, Stem};
use std::collections::BTreeSet;

/// Documents containing every term. An empty term list or any term missing
/// from the index yields no documents.
pub fn eval_conjunction<T: AsRef<str>>(index: &InvertedIndex, terms: &[T]) -> BTreeSet<DocId> {
    let mut terms = terms.iter();
    let Some(first) = terms.next() else {
        return BTreeSet::new();
    };
    let mut result: BTreeSet<DocId> = match index.postings(first.as_ref()) {
        Some(postings) => postings.keys().copied().collect(),
        None => return BTreeSet::new(),
    };
    for term in terms {
        let Some(postings) = index.postings(term.as_ref()) else {
            return BTreeSet::new();
        };
        result.retain(|doc_id| postings.contains_key(doc_id));
        if result.is_empty() {
            break;
        }
    }
    result
}

/// Union of conjunction results.
pub fn eval_disjunction<I>(results: I) -> BTreeSet<DocId>
where
    I: IntoIterator<Item = BTreeSet<DocId>>,
{
    results.into_iter().fold(BTreeSet::new(), |mut acc, set| {
        acc.extend(set);
        acc
    })
}

/// Normalized terms of one query line, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjunctiveQuery {
    pub terms: Vec<String>,
}

/// One conjunction per input line, combined with OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub lines: Vec<ConjunctiveQuery>,
}

impl Query {
    /// Split every line on whitespace and normalize its words.
    pub fn parse<I, L, S>(lines: I, normalizer: &Normalizer<S>) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
        S: Stem,
    {
        let lines = lines
            .into_iter()
            .map(|line| ConjunctiveQuery { terms: normalizer.normalize(line.as_ref().split_whitespace()) })
            .collect();
        Self { lines }
    }

    /// Matching document ids in ascending order.
    pub fn evaluate(&self, index: &InvertedIndex) -> Vec<DocId> {
        eval_disjunction(self.lines.iter().map(|c| eval_conjunction(index, &c.terms))).into_iter().collect()
    }
}

/// Render ids as a single space-separated line (empty when there are none).
pub fn format_results(ids: &[DocId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
}
