//! Recognise common loop shapes and replace them with direct operations

use log::trace;

use crate::{ast::*, TapeAddr};

/// Rewrite a loop whose body has already been optimised.
///
/// Rules are tried in order: zero reset, zero scan, copy. If nothing
/// matches the loop is kept.
pub(super) fn rewrite_loop(body: Vec<Node>, span: Span) -> Node {
    let opcode = match body.as_slice() {
        [Node {
            opcode: Opcode::ValueDelta(-1),
            ..
        }] => Some(Opcode::ZeroReset),
        [Node {
            opcode: Opcode::MoveDelta { count, .. },
            ..
        }] if *count != 0 => Some(Opcode::ZeroScan((*count).into())),
        _ => copy_targets(&body).map(Opcode::Copy),
    };
    match opcode {
        Some(opcode) => {
            trace!("Rewrote loop at {span} into {opcode:?}");
            Node::new(opcode, span)
        }
        None => Node::new_loop(body, span),
    }
}

/// Match a copy/multiply loop, such as `[->+>++<<]`.
///
/// The body must start with a decrement by one, followed only by moves and
/// modifications, and return to where it started. Modifications of the loop
/// counter itself would change the iteration count, so those are rejected.
fn copy_targets(body: &[Node]) -> Option<Vec<CopyTarget>> {
    let (first, rest) = body.split_first()?;
    // Minimal shape is -, move, modify, move back
    if body.len() < 4 || first.opcode != Opcode::ValueDelta(-1) {
        return None;
    }
    let mut offset: i64 = 0;
    let mut targets = Vec::with_capacity(rest.len() / 2);
    for node in rest {
        match node.opcode {
            Opcode::MoveDelta { count, .. } => offset = offset.checked_add(count)?,
            Opcode::ValueDelta(multiplier) => {
                if offset == 0 {
                    return None;
                }
                targets.push(CopyTarget {
                    offset: TapeAddr::new(offset),
                    multiplier,
                });
            }
            _ => return None,
        }
    }
    if offset != 0 || targets.is_empty() {
        return None;
    }
    Some(targets)
}
