use crate::collection::Collection;
use crate::normalizer::{Normalizer, Stem};
use std::collections::BTreeMap;

pub type DocId = u32;

/// Document id → term frequency.
pub type Postings = BTreeMap<DocId, u32>;

/// Document frequency plus postings for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub df: u32,
    pub postings: Postings,
}

impl TermEntry {
    fn from_postings(postings: Postings) -> Self {
        Self { df: postings.len() as u32, postings }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub terms: usize,
    pub documents: usize,
    pub postings: usize,
}

/// Term-keyed inverted index over the unified title + body field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    terms: BTreeMap<String, TermEntry>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Callers must uphold `df == postings.len()` and `tf >= 1`.
    pub(crate) fn from_entries(terms: BTreeMap<String, TermEntry>) -> Self {
        Self { terms }
    }

    pub fn get(&self, term: &str) -> Option<&TermEntry> {
        self.terms.get(term)
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term).map(|e| &e.postings)
    }

    pub fn df(&self, term: &str) -> u32 {
        self.terms.get(term).map_or(0, |e| e.df)
    }

    pub fn tf(&self, term: &str, doc_id: DocId) -> u32 {
        self.postings(term).and_then(|p| p.get(&doc_id)).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermEntry)> + '_ {
        self.terms.iter().map(|(t, e)| (t.as_str(), e))
    }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub(crate) fn entries(&self) -> &BTreeMap<String, TermEntry> {
        &self.terms
    }

    pub fn stats(&self) -> IndexStats {
        let mut docs = std::collections::BTreeSet::new();
        let mut postings = 0;
        for entry in self.terms.values() {
            postings += entry.postings.len();
            docs.extend(entry.postings.keys().copied());
        }
        IndexStats { terms: self.terms.len(), documents: docs.len(), postings }
    }
}

/// Build an index from per-document title and body terms. Title and body
/// occurrences are counted together.
pub fn build(titles: &BTreeMap<DocId, Vec<String>>, bodies: &BTreeMap<DocId, Vec<String>>) -> InvertedIndex {
    let doc_ids: std::collections::BTreeSet<DocId> = titles.keys().chain(bodies.keys()).copied().collect();

    // Index step: per-document term multisets.
    let per_doc: Vec<(DocId, BTreeMap<&str, u32>)> = doc_ids
        .into_iter()
        .map(|doc_id| {
            let unified = titles.get(&doc_id).into_iter().chain(bodies.get(&doc_id)).flatten();
            let counts = unified.fold(BTreeMap::new(), |mut acc, term| {
                *acc.entry(term.as_str()).or_insert(0u32) += 1;
                acc
            });
            (doc_id, counts)
        })
        .filter(|(_, counts)| !counts.is_empty())
        .collect();

    // Invert step: term -> doc -> tf.
    let inverted = per_doc.into_iter().fold(BTreeMap::<String, Postings>::new(), |mut acc, (doc_id, counts)| {
        for (term, tf) in counts {
            acc.entry(term.to_string()).or_default().insert(doc_id, tf);
        }
        acc
    });

    let terms = inverted.into_iter().map(|(term, postings)| (term, TermEntry::from_postings(postings))).collect();
    InvertedIndex::from_entries(terms)
}

/// Normalize both fields of a parsed collection and build the index.
pub fn build_from_collection<S: Stem>(collection: &Collection, normalizer: &Normalizer<S>) -> InvertedIndex {
    let titles = normalize_field(&collection.titles, normalizer);
    let bodies = normalize_field(&collection.bodies, normalizer);
    let index = build(&titles, &bodies);
    let stats = index.stats();
    tracing::info!(terms = stats.terms, documents = stats.documents, postings = stats.postings, "built inverted index");
    index
}

fn normalize_field<S: Stem>(field: &BTreeMap<DocId, Vec<String>>, normalizer: &Normalizer<S>) -> BTreeMap<DocId, Vec<String>> {
    field.iter().map(|(doc_id, raw)| (*doc_id, normalizer.normalize(raw))).collect()
}
