use super::{eval, lexer, parser, postfix_to_string, Instruction};
use crate::{DocId, InvertedIndex, QueryError};
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Evaluate a boolean query against `index`.
///
/// A query with no tokens (empty, blank, or only unrecognized characters)
/// matches nothing and is not an error.
pub fn search<D>(query: &str, index: &InvertedIndex<D>) -> Result<HashSet<D>, QueryError>
where
    D: Eq + Hash + Clone,
{
    let tokens = lexer::tokenize(query);
    if tokens.is_empty() {
        return Ok(HashSet::new());
    }
    let program = parser::parse(&tokens)?;
    tracing::debug!(query, postfix = %postfix_to_string(&program), "parsed query");
    let docs = eval::evaluate(&program, index)?;
    tracing::debug!(query, hits = docs.len(), "evaluated query");
    Ok(docs)
}

/// Shareable handle that answers queries over one loaded index.
#[derive(Debug)]
pub struct QueryEngine<D = DocId> {
    index: Arc<InvertedIndex<D>>,
}

impl<D> Clone for QueryEngine<D> {
    fn clone(&self) -> Self {
        Self { index: Arc::clone(&self.index) }
    }
}

impl<D: Eq + Hash + Clone> QueryEngine<D> {
    pub fn new(index: InvertedIndex<D>) -> Self {
        Self { index: Arc::new(index) }
    }

    pub fn from_shared(index: Arc<InvertedIndex<D>>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &InvertedIndex<D> { &self.index }

    pub fn search(&self, query: &str) -> Result<HashSet<D>, QueryError> {
        search(query, &self.index)
    }

    /// Postfix program for `query`, for display. Empty queries give an empty program.
    pub fn explain(&self, query: &str) -> Result<Vec<Instruction>, QueryError> {
        parser::parse(&lexer::tokenize(query))
    }
}

impl<D: Eq + Hash + Clone + Ord> QueryEngine<D> {
    /// Same as [`QueryEngine::search`] with the hits in ascending order.
    pub fn search_sorted(&self, query: &str) -> Result<Vec<D>, QueryError> {
        let mut docs: Vec<D> = self.search(query)?.into_iter().collect();
        docs.sort();
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QueryEngine {
        QueryEngine::new(InvertedIndex::from_postings(vec![
            ("cat", vec![1, 2, 3]),
            ("dog", vec![2, 3, 4]),
            ("bird", vec![5]),
        ]))
    }

    #[test]
    fn sorted_results_for_presentation() {
        assert_eq!(engine().search_sorted("(cat OR dog) AND NOT bird").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn blank_query_is_empty() {
        assert!(engine().search("   ").unwrap().is_empty());
        assert!(engine().search("").unwrap().is_empty());
    }

    #[test]
    fn clones_share_the_index() {
        let a = engine();
        let b = a.clone();
        assert!(std::ptr::eq(a.index(), b.index()));
    }

    #[test]
    fn explain_renders_postfix() {
        let program = engine().explain("cat AND NOT dog").unwrap();
        assert_eq!(postfix_to_string(&program), "cat dog NOT AND");
    }
}
