mod loop_idioms;

use log::debug;
use thiserror::Error;

use crate::ast::*;

/// Errors from the optimiser
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OptimizeError {
    /// A fused run of moves or modifications does not fit in an i64.
    #[error("Count overflow while fusing operations at {span}")]
    CountOverflow { span: Span },
}

/// Run the peephole optimiser.
///
/// Consumes the tree and builds a new one. Runs of `<`/`>` and `+`/`-` are
/// fused, then loops (innermost first) are matched against the known idioms.
/// Nodes that are already optimised pass through unchanged, so running this
/// on its own output is a no-op.
pub fn optimize(ast: Vec<Node>) -> Result<Vec<Node>, OptimizeError> {
    let before = count_nodes(&ast);
    let result = optimize_block(ast)?;
    debug!(
        "Optimised tree from {before} to {} nodes",
        count_nodes(&result)
    );
    Ok(result)
}

/// Optimise one sibling sequence (recursing into loops)
fn optimize_block(ops: Vec<Node>) -> Result<Vec<Node>, OptimizeError> {
    // For sure not longer than ops vector
    let mut result: Vec<Node> = Vec::with_capacity(ops.len());
    for Node { span, opcode } in ops {
        match opcode {
            Opcode::Right => fuse_move(&mut result, Node::new(Opcode::Right, span), 1)?,
            Opcode::Left => fuse_move(&mut result, Node::new(Opcode::Left, span), -1)?,
            Opcode::Increment => fuse_value(&mut result, span, 1)?,
            Opcode::Decrement => fuse_value(&mut result, span, -1)?,
            Opcode::Loop(body) => {
                let body = optimize_block(body)?;
                result.push(loop_idioms::rewrite_loop(body, span));
            }
            opcode => result.push(Node::new(opcode, span)),
        }
    }
    Ok(result)
}

/// Add a single step move to the run we are building, or open a new one.
fn fuse_move(result: &mut Vec<Node>, step: Node, delta: i64) -> Result<(), OptimizeError> {
    if let Some(Node {
        span,
        opcode: Opcode::MoveDelta { count, absorbed },
    }) = result.last_mut()
    {
        *span = span.join(step.span);
        *count = count
            .checked_add(delta)
            .ok_or(OptimizeError::CountOverflow { span: *span })?;
        absorbed.push(step);
        return Ok(());
    }
    let span = step.span;
    result.push(Node::new(
        Opcode::MoveDelta {
            count: delta,
            absorbed: vec![step],
        },
        span,
    ));
    Ok(())
}

/// Add a single step modification to the run we are building, or open a new one.
fn fuse_value(result: &mut Vec<Node>, step: Span, delta: i64) -> Result<(), OptimizeError> {
    if let Some(Node {
        span,
        opcode: Opcode::ValueDelta(value),
    }) = result.last_mut()
    {
        *span = span.join(step);
        *value = value
            .checked_add(delta)
            .ok_or(OptimizeError::CountOverflow { span: *span })?;
        return Ok(());
    }
    result.push(Node::new(Opcode::ValueDelta(delta), step));
    Ok(())
}
