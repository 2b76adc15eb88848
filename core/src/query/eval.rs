use super::{Instruction, Operator};
use crate::{InvertedIndex, QueryError};
use std::borrow::Cow;
use std::collections::HashSet;
use std::hash::Hash;

/// Run a postfix program against the index with a single value stack.
///
/// Unknown terms contribute the empty set. NOT complements against the
/// index's document universe.
pub fn evaluate<D>(program: &[Instruction], index: &InvertedIndex<D>) -> Result<HashSet<D>, QueryError>
where
    D: Eq + Hash + Clone,
{
    let empty = HashSet::new();
    let mut stack: Vec<Cow<'_, HashSet<D>>> = Vec::new();

    for instruction in program {
        match instruction {
            Instruction::Term(term) => {
                let docs = index.postings(term).unwrap_or(&empty);
                stack.push(Cow::Borrowed(docs));
            }
            Instruction::Op(op) => {
                let result = apply(*op, &mut stack, index.universe())?;
                stack.push(Cow::Owned(result));
            }
        }
    }

    let result = stack.pop().ok_or_else(|| QueryError::malformed("no expression to evaluate"))?;
    if !stack.is_empty() {
        return Err(QueryError::malformed(format!(
            "{} operands are not joined by an operator",
            stack.len() + 1
        )));
    }
    Ok(result.into_owned())
}

fn apply<D>(op: Operator, stack: &mut Vec<Cow<'_, HashSet<D>>>, universe: &HashSet<D>) -> Result<HashSet<D>, QueryError>
where
    D: Eq + Hash + Clone,
{
    if stack.len() < op.arity() {
        return Err(QueryError::malformed(format!("{op} is missing an operand")));
    }
    // split_off keeps operand order: operands[0] is the left-hand side
    let operands = stack.split_off(stack.len() - op.arity());
    let set = match (op, operands.as_slice()) {
        (Operator::And, [a, b]) => a.intersection(b).cloned().collect(),
        (Operator::Or, [a, b]) => a.union(b).cloned().collect(),
        (Operator::Not, [a]) => universe.difference(a).cloned().collect(),
        _ => return Err(QueryError::malformed(format!("{op} received the wrong number of operands"))),
    };
    Ok(set)
}
