use super::{Operator, Token};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A parenthesis or a maximal run of word characters. Anything else is skipped.
    static ref QUERY_RE: Regex = Regex::new(r"[()]|[\p{L}\p{N}_-]+").expect("valid regex");
}

/// Split a query into tokens. Operators are matched case-insensitively,
/// terms are lowercased, and unrecognized characters are dropped silently.
pub fn tokenize(query: &str) -> Vec<Token> {
    QUERY_RE
        .find_iter(query)
        .map(|m| match m.as_str() {
            "(" => Token::LParen,
            ")" => Token::RParen,
            word => match Operator::from_keyword(word) {
                Some(op) => Token::Op(op),
                None => Token::Term(word.to_lowercase()),
            },
        })
        .collect()
}
