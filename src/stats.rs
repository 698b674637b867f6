//! Per run instrumentation

use std::collections::HashMap;
use std::fmt::Display;

use crate::ast::{OpKind, Span};

/// How many loops to list in the report
const HOT_LOOPS: usize = 10;

/// Execution counters for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    dispatched: [u64; OpKind::COUNT],
    loop_iterations: HashMap<Span, u64>,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, kind: OpKind) {
        self.dispatched[kind.index()] += 1;
    }

    pub(crate) fn record_iteration(&mut self, loop_span: Span) {
        *self.loop_iterations.entry(loop_span).or_insert(0) += 1;
    }

    /// Number of times nodes of this kind were dispatched
    pub fn count(&self, kind: OpKind) -> u64 {
        self.dispatched[kind.index()]
    }

    /// Total number of dispatched nodes
    pub fn total(&self) -> u64 {
        self.dispatched.iter().sum()
    }

    /// Body executions of the loop at `loop_span`
    pub fn loop_iterations(&self, loop_span: Span) -> u64 {
        self.loop_iterations.get(&loop_span).copied().unwrap_or(0)
    }

    /// Loops ordered by iteration count, most iterated first.
    pub fn hottest_loops(&self) -> Vec<(Span, u64)> {
        let mut loops: Vec<_> = self.loop_iterations.iter().map(|(s, n)| (*s, *n)).collect();
        loops.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        loops
    }
}

impl Display for ExecutionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dispatched nodes: {}", self.total())?;
        for kind in OpKind::ALL {
            let n = self.count(kind);
            if n != 0 {
                writeln!(f, "  {kind:<12}{n}")?;
            }
        }
        let loops = self.hottest_loops();
        if !loops.is_empty() {
            writeln!(f, "Hottest loops (source span: iterations):")?;
            for (span, n) in loops.into_iter().take(HOT_LOOPS) {
                writeln!(f, "  {span}: {n}")?;
            }
        }
        Ok(())
    }
}
