//! Boolean query language: lexing, shunting-yard parsing to postfix, and
//! stack evaluation over posting sets.

pub mod engine;
pub mod eval;
pub mod lexer;
pub mod parser;

use std::fmt;

/// Boolean operators of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

impl Operator {
    /// Match an operator keyword, ignoring letter case.
    pub fn from_keyword(word: &str) -> Option<Operator> {
        match word.to_uppercase().as_str() {
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            "NOT" => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Not => 3,
            Operator::And => 2,
            Operator::Or => 1,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            Operator::Not => Associativity::Right,
            Operator::And | Operator::Or => Associativity::Left,
        }
    }

    /// Number of operands popped by the evaluator.
    pub fn arity(self) -> usize {
        match self {
            Operator::Not => 1,
            Operator::And | Operator::Or => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Lexical unit of a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Op(Operator),
    LParen,
    RParen,
    /// Lowercased query word.
    Term(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Op(op) => write!(f, "{op}"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Term(t) => f.write_str(t),
        }
    }
}

/// One step of a postfix program. Parentheses never survive parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Op(Operator),
    Term(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Op(op) => write!(f, "{op}"),
            Instruction::Term(t) => f.write_str(t),
        }
    }
}

/// Render a postfix program as space separated words, e.g. `cat dog AND`.
pub fn postfix_to_string(program: &[Instruction]) -> String {
    program.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
}
