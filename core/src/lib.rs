pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;

pub use error::QueryError;
pub use index::InvertedIndex;
pub use query::engine::{search, QueryEngine};

pub type DocId = u32;
