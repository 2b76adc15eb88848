use super::{Associativity, Instruction, Operator, Token};
use crate::QueryError;

/// Entries waiting on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Op(Operator),
    LParen,
}

/// Convert infix tokens into a postfix program (shunting-yard).
///
/// Only parenthesis balance is checked here. Operand counts are left to the
/// evaluator, so `AND cat` parses fine and fails later.
pub fn parse(tokens: &[Token]) -> Result<Vec<Instruction>, QueryError> {
    let mut output: Vec<Instruction> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::LParen => stack.push(Pending::LParen),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Pending::Op(op)) => output.push(Instruction::Op(op)),
                    Some(Pending::LParen) => break,
                    None => return Err(QueryError::UnbalancedParentheses),
                }
            },
            Token::Op(op) => {
                while let Some(&Pending::Op(top)) = stack.last() {
                    if !yields_to(*op, top) {
                        break;
                    }
                    stack.pop();
                    output.push(Instruction::Op(top));
                }
                stack.push(Pending::Op(*op));
            }
            Token::Term(term) => output.push(Instruction::Term(term.clone())),
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Op(op) => output.push(Instruction::Op(op)),
            Pending::LParen => return Err(QueryError::UnbalancedParentheses),
        }
    }
    Ok(output)
}

/// Whether `top` must be emitted before `incoming` is pushed.
fn yields_to(incoming: Operator, top: Operator) -> bool {
    match incoming.associativity() {
        Associativity::Left => incoming.precedence() <= top.precedence(),
        Associativity::Right => incoming.precedence() < top.precedence(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::lexer::tokenize;
    use crate::query::postfix_to_string;

    fn rpn(query: &str) -> String {
        postfix_to_string(&parse(&tokenize(query)).unwrap())
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(rpn("a OR b AND c"), "a b c AND OR");
        assert_eq!(rpn("a AND b OR c"), "a b AND c OR");
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(rpn("a AND b AND c"), "a b AND c AND");
        assert_eq!(rpn("a OR b OR c"), "a b OR c OR");
    }

    #[test]
    fn not_is_right_associative_and_binds_tightest() {
        assert_eq!(rpn("NOT NOT a"), "a NOT NOT");
        assert_eq!(rpn("NOT a AND b"), "a NOT b AND");
        assert_eq!(rpn("a AND NOT b"), "a b NOT AND");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(rpn("(a OR b) AND c"), "a b OR c AND");
        assert_eq!(rpn("NOT (a OR b)"), "a b OR NOT");
        assert_eq!(rpn("(((a)))"), "a");
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        assert_eq!(parse(&tokenize("(a AND b")), Err(QueryError::UnbalancedParentheses));
        assert_eq!(parse(&tokenize("a AND b)")), Err(QueryError::UnbalancedParentheses));
        assert_eq!(parse(&tokenize(")(")), Err(QueryError::UnbalancedParentheses));
    }

    #[test]
    fn leaves_arity_to_the_evaluator() {
        assert_eq!(rpn("AND a"), "a AND");
        assert_eq!(rpn("a b"), "a b");
        assert_eq!(rpn("()"), "");
    }
}
