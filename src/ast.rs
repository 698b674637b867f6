//! Types and functions for the instruction tree.
//!
//! Parser output and optimizer output share the same node type. The parser
//! only produces the single step primitives and loops, the optimizer replaces
//! those with coarser derived operations.

use std::fmt::Display;

use crate::TapeAddr;

/// Location of a node in the source code (byte offsets, end exclusive)
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of a single source byte
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Smallest span covering both spans
    pub fn join(self, other: Span) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// One target of a copy/multiply loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct CopyTarget {
    /// Offset relative to the loop entry position
    pub offset: TapeAddr,
    /// Factor the source value is multiplied with (mod 256)
    pub multiplier: i64,
}

/// The operation a node performs
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Opcode {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// Net pointer movement (fused `<`/`>` operations).
    ///
    /// The absorbed single step nodes are kept for diagnostics.
    MoveDelta { count: i64, absorbed: Vec<Node> },
    /// Net cell modification (fused `+`/`-` operations)
    ValueDelta(i64),
    /// `[-]`: Clear the current cell
    ZeroReset,
    /// `[>]` and friends: Move by `leap` until a zero cell is found
    ZeroScan(TapeAddr),
    /// `[->+>++<<]` and friends: Distribute the current cell into others
    Copy(Vec<CopyTarget>),
    /// Write output, one byte
    Output,
    /// Read input, one byte
    Input,
    /// A loop that no rewrite applied to
    Loop(Vec<Node>),
}

impl Opcode {
    pub fn kind(&self) -> OpKind {
        match self {
            Opcode::Right => OpKind::Right,
            Opcode::Left => OpKind::Left,
            Opcode::Increment => OpKind::Increment,
            Opcode::Decrement => OpKind::Decrement,
            Opcode::MoveDelta { .. } => OpKind::MoveDelta,
            Opcode::ValueDelta(_) => OpKind::ValueDelta,
            Opcode::ZeroReset => OpKind::ZeroReset,
            Opcode::ZeroScan(_) => OpKind::ZeroScan,
            Opcode::Copy(_) => OpKind::Copy,
            Opcode::Output => OpKind::Output,
            Opcode::Input => OpKind::Input,
            Opcode::Loop(_) => OpKind::Loop,
        }
    }

    /// Is this one of the operations the parser produces?
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Opcode::Right
                | Opcode::Left
                | Opcode::Increment
                | Opcode::Decrement
                | Opcode::Output
                | Opcode::Input
                | Opcode::Loop(_)
        )
    }
}

/// Fieldless mirror of [`Opcode`], used for instrumentation.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpKind {
    Right,
    Left,
    Increment,
    Decrement,
    MoveDelta,
    ValueDelta,
    ZeroReset,
    ZeroScan,
    Copy,
    Output,
    Input,
    Loop,
}

impl OpKind {
    /// Number of kinds
    pub const COUNT: usize = 12;

    pub const ALL: [OpKind; Self::COUNT] = [
        OpKind::Right,
        OpKind::Left,
        OpKind::Increment,
        OpKind::Decrement,
        OpKind::MoveDelta,
        OpKind::ValueDelta,
        OpKind::ZeroReset,
        OpKind::ZeroScan,
        OpKind::Copy,
        OpKind::Output,
        OpKind::Input,
        OpKind::Loop,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OpKind::Right => "Right",
            OpKind::Left => "Left",
            OpKind::Increment => "Increment",
            OpKind::Decrement => "Decrement",
            OpKind::MoveDelta => "MoveDelta",
            OpKind::ValueDelta => "ValueDelta",
            OpKind::ZeroReset => "ZeroReset",
            OpKind::ZeroScan => "ZeroScan",
            OpKind::Copy => "Copy",
            OpKind::Output => "Output",
            OpKind::Input => "Input",
            OpKind::Loop => "Loop",
        };
        f.pad(name)
    }
}

/// A node in the instruction tree: an opcode and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Node {
    pub span: Span,
    pub opcode: Opcode,
}

impl Node {
    pub fn new(opcode: Opcode, span: Span) -> Self {
        Self { span, opcode }
    }

    /// Create a node without a meaningful source location
    pub fn synth(opcode: Opcode) -> Self {
        Self {
            span: Span::default(),
            opcode,
        }
    }

    /// Create a loop node
    pub fn new_loop(body: Vec<Node>, span: Span) -> Self {
        Self {
            span,
            opcode: Opcode::Loop(body),
        }
    }

    pub fn kind(&self) -> OpKind {
        self.opcode.kind()
    }
}

/// Count all nodes in a tree, including loop bodies (absorbed nodes are not counted).
pub fn count_nodes(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|n| match n.opcode {
            Opcode::Loop(ref body) => 1 + count_nodes(body),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_join() {
        assert_eq!(Span::at(3).join(Span::at(7)), Span::new(3, 8));
        assert_eq!(Span::new(4, 9).join(Span::at(1)), Span::new(1, 9));
    }

    #[test]
    fn test_count_nodes() {
        let tree = vec![
            Node::synth(Opcode::Increment),
            Node::synth(Opcode::Loop(vec![
                Node::synth(Opcode::Decrement),
                Node::synth(Opcode::Loop(vec![])),
            ])),
        ];
        assert_eq!(count_nodes(&tree), 4);
    }

    #[test]
    fn test_kind_index_is_dense() {
        for (i, kind) in OpKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
