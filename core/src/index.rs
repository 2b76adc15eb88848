use crate::DocId;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Immutable term -> posting set mapping plus the document universe.
///
/// Built once from the preprocessing output and only read afterwards; share
/// it behind an `Arc` when several queries run concurrently.
#[derive(Debug, Clone)]
pub struct InvertedIndex<D = DocId> {
    postings: HashMap<String, HashSet<D>>,
    universe: HashSet<D>,
}

impl<D> Default for InvertedIndex<D> {
    fn default() -> Self {
        Self { postings: HashMap::new(), universe: HashSet::new() }
    }
}

impl<D: Eq + Hash + Clone> InvertedIndex<D> {
    pub fn new() -> Self { Self::default() }

    /// Build an index from `(term, doc ids)` pairs. Duplicate ids collapse into
    /// one set entry and a term listed twice gets the union of its lists.
    pub fn from_postings<I, T, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<String>,
        P: IntoIterator<Item = D>,
    {
        let mut postings: HashMap<String, HashSet<D>> = HashMap::new();
        for (term, docs) in entries {
            postings.entry(term.into()).or_default().extend(docs);
        }
        // universe is the union of every posting set
        let mut universe = HashSet::new();
        for docs in postings.values() {
            universe.extend(docs.iter().cloned());
        }
        Self { postings, universe }
    }

    /// Posting set of a normalized term, `None` when the term is not indexed.
    pub fn postings(&self, term: &str) -> Option<&HashSet<D>> {
        self.postings.get(term)
    }

    pub fn universe(&self) -> &HashSet<D> { &self.universe }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn num_docs(&self) -> usize { self.universe.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }
}
