//! Cooperative cancellation of a running program.
//!
//! The interpreter polls the signal before every node it dispatches. A long
//! running single node (such as a zero scan) is not interrupted.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Something the interpreter can poll to find out if it should stop.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// Cancellation handle that can be triggered from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl CancelSignal for CancelToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Cancels after a fixed number of polls (i.e. dispatched nodes).
///
/// Used to bound programs that might not terminate.
#[derive(Debug)]
pub struct StepLimit {
    remaining: Cell<u64>,
}

impl StepLimit {
    pub fn new(steps: u64) -> Self {
        Self {
            remaining: Cell::new(steps),
        }
    }
}

impl CancelSignal for StepLimit {
    fn is_cancelled(&self) -> bool {
        match self.remaining.get() {
            0 => true,
            n => {
                self.remaining.set(n - 1);
                false
            }
        }
    }
}

/// A signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}
