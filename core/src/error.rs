use thiserror::Error;

/// Failure to turn a query string into a single result set.
///
/// Both kinds are deterministic consequences of the query text, so callers
/// report them and move on to the next query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A `)` without a matching `(`, or a `(` that is never closed.
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    /// The postfix program does not reduce to exactly one set.
    #[error("malformed query: {reason}")]
    MalformedQuery { reason: String },
}

impl QueryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        QueryError::MalformedQuery { reason: reason.into() }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::UnbalancedParentheses => "unbalanced_parentheses",
            QueryError::MalformedQuery { .. } => "malformed_query",
        }
    }
}
