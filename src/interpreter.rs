use std::io::{self, Read, Write};

use log::{debug, trace};
use thiserror::Error;

use crate::ast::*;
use crate::cancel::CancelSignal;
use crate::settings::InterpreterSettings;
use crate::stats::ExecutionStats;
use crate::tape::{FixedTape, Tape};
use crate::TapeAddr;
use crate::TapeAddrError;

/// Error type for execution
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Pointer about to move past the end of the tape (overflow checking on).
    #[error("Pointer overflow: {addr} to pointer overflow, on {span}")]
    PointerOverflow { addr: TapeAddr, span: Span },
    /// Pointer about to move before the start of the tape (overflow checking on).
    #[error("Pointer underflow: {addr} to pointer underflow, on {span}")]
    PointerUnderflow { addr: TapeAddr, span: Span },
    /// Cell about to go above 255 (overflow checking on).
    #[error("Cell overflow: cell {addr} to memory overflow, on {span}")]
    CellOverflow { addr: TapeAddr, span: Span },
    /// Cell about to go below 0 (overflow checking on).
    #[error("Cell underflow: cell {addr} to memory underflow, on {span}")]
    CellUnderflow { addr: TapeAddr, span: Span },
    /// Input ended while the program wanted more.
    #[error("Input exhausted, on {span}")]
    InputExhausted { span: Span },
    /// A cell outside of the tape was accessed.
    #[error("Tape pointer error: {0}")]
    TapeError(#[from] TapeAddrError),
    /// Io error during program execution.
    #[error("Unexpected IO Error: {0}")]
    IoError(#[from] io::Error),
    /// Stopped by the cancellation signal
    #[error("Execution cancelled")]
    Cancelled,
}

impl PartialEq for ExecutionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::IoError(l0), Self::IoError(r0)) => l0.kind() == r0.kind(),
            (
                Self::PointerOverflow { addr: la, span: ls },
                Self::PointerOverflow { addr: ra, span: rs },
            )
            | (
                Self::PointerUnderflow { addr: la, span: ls },
                Self::PointerUnderflow { addr: ra, span: rs },
            )
            | (
                Self::CellOverflow { addr: la, span: ls },
                Self::CellOverflow { addr: ra, span: rs },
            )
            | (
                Self::CellUnderflow { addr: la, span: ls },
                Self::CellUnderflow { addr: ra, span: rs },
            ) => la == ra && ls == rs,
            (Self::InputExhausted { span: l0 }, Self::InputExhausted { span: r0 }) => l0 == r0,
            (Self::TapeError(l0), Self::TapeError(r0)) => l0 == r0,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

/// Everything a run mutates: the tape, the pointer and the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionState<TapeT: Tape = FixedTape> {
    pub tape: TapeT,
    pub tape_ptr: TapeAddr,
    pub stats: ExecutionStats,
}

impl ExecutionState<FixedTape> {
    /// Fresh state: all zero tape of `tape_size` cells, pointer at 0.
    pub fn new(tape_size: usize) -> Self {
        Self::with_tape(FixedTape::new(tape_size))
    }
}

impl<TapeT: Tape> ExecutionState<TapeT> {
    pub fn with_tape(tape: TapeT) -> Self {
        Self {
            tape,
            tape_ptr: TapeAddr::default(),
            stats: ExecutionStats::new(),
        }
    }
}

/// Run a program on a fresh tape.
///
/// Returns the final state (including the counters) on success.
pub fn run(
    code: &[Node],
    settings: &InterpreterSettings,
    input: &mut impl Read,
    output: &mut impl Write,
    cancel: &impl CancelSignal,
) -> Result<ExecutionState, ExecutionError> {
    let mut state = ExecutionState::new(settings.tape_size);
    execute(code, &mut state, settings, input, output, cancel)?;
    Ok(state)
}

/// Run a program against existing state.
///
/// End of input stops the program successfully unless
/// `raise_on_input_eof` is set.
pub fn execute<TapeT: Tape>(
    code: &[Node],
    state: &mut ExecutionState<TapeT>,
    settings: &InterpreterSettings,
    input: &mut impl Read,
    output: &mut impl Write,
    cancel: &impl CancelSignal,
) -> Result<(), ExecutionError> {
    debug!(
        "Executing {} nodes on a tape of {} cells",
        count_nodes(code),
        state.tape.len()
    );
    let result = execute_block(code, state, settings, input, output, cancel);
    debug!(
        "Execution finished after {} dispatches: {result:?}",
        state.stats.total()
    );
    match result {
        Err(ExecutionError::InputExhausted { .. }) if !settings.raise_on_input_eof => Ok(()),
        other => other,
    }
}

/// Simple recursive interpreter implementation
fn execute_block<TapeT: Tape>(
    code: &[Node],
    state: &mut ExecutionState<TapeT>,
    settings: &InterpreterSettings,
    input: &mut impl Read,
    output: &mut impl Write,
    cancel: &impl CancelSignal,
) -> Result<(), ExecutionError> {
    for node in code {
        if cancel.is_cancelled() {
            return Err(ExecutionError::Cancelled);
        }
        state.stats.record(node.kind());
        let ptr = state.tape_ptr;
        trace!("{} at {} (ptr {ptr})", node.kind(), node.span);
        match node.opcode {
            Opcode::Right => {
                check_not_at_end(state, settings, node.span)?;
                state.tape_ptr += 1.into();
            }
            Opcode::Left => {
                if settings.raise_on_overflow && ptr.is_zero() {
                    return Err(ExecutionError::PointerUnderflow {
                        addr: ptr,
                        span: node.span,
                    });
                }
                state.tape_ptr += (-1).into();
            }
            Opcode::Increment => {
                let value = state.tape.try_get(ptr)?;
                if settings.raise_on_overflow && u8::from(value) == u8::MAX {
                    return Err(ExecutionError::CellOverflow {
                        addr: ptr,
                        span: node.span,
                    });
                }
                state.tape.try_set(ptr, value + 1.into())?;
            }
            Opcode::Decrement => {
                let value = state.tape.try_get(ptr)?;
                if settings.raise_on_overflow && value.is_zero() {
                    return Err(ExecutionError::CellUnderflow {
                        addr: ptr,
                        span: node.span,
                    });
                }
                state.tape.try_set(ptr, value - 1.into())?;
            }
            Opcode::MoveDelta { count, .. } => {
                check_not_at_end(state, settings, node.span)?;
                state.tape_ptr += count.into();
            }
            Opcode::ValueDelta(delta) => {
                check_not_at_end(state, settings, node.span)?;
                let value = i64::from(state.tape.try_get(ptr)?) as i128 + delta as i128;
                // A negative result leaves the cell alone, unlike a chain
                // of single step decrements which would wrap.
                if value >= 0 {
                    state.tape.try_set(ptr, ((value % 256) as i64).into())?;
                }
            }
            Opcode::ZeroReset => {
                check_not_at_end(state, settings, node.span)?;
                state.tape.try_set(ptr, 0.into())?;
            }
            Opcode::ZeroScan(leap) => {
                check_not_at_end(state, settings, node.span)?;
                while !state.tape.try_get(state.tape_ptr)?.is_zero() {
                    state.tape_ptr += leap;
                }
            }
            Opcode::Copy(ref targets) => {
                let value = state.tape.try_get(ptr)?;
                // The loop would not have run, so the targets are not touched
                if value.is_zero() {
                    continue;
                }
                state.tape.try_set(ptr, 0.into())?;
                for target in targets {
                    state
                        .tape
                        .try_modify(ptr + target.offset, value * target.multiplier.into())?;
                }
            }
            Opcode::Output => {
                let tmp: [u8; 1] = [state.tape.try_get(ptr)?.into()];
                output.write_all(&tmp)?;
            }
            Opcode::Input => {
                // We may need to flush output here if there wasn't a newline.
                output.flush()?;
                match read_byte(input)? {
                    Some(byte) => state.tape.try_set(ptr, byte.into())?,
                    None => return Err(ExecutionError::InputExhausted { span: node.span }),
                }
            }
            Opcode::Loop(ref body) => {
                while !state.tape.try_get(state.tape_ptr)?.is_zero() {
                    state.stats.record_iteration(node.span);
                    execute_block(body, state, settings, input, output, cancel)?;
                }
            }
        }
    }
    Ok(())
}

/// With overflow checking on, nothing may move on from the last cell.
fn check_not_at_end<TapeT: Tape>(
    state: &ExecutionState<TapeT>,
    settings: &InterpreterSettings,
    span: Span,
) -> Result<(), ExecutionError> {
    let last = TapeAddr::from(state.tape.len()) - TapeAddr::new(1);
    if settings.raise_on_overflow && state.tape_ptr == last {
        return Err(ExecutionError::PointerOverflow {
            addr: state.tape_ptr,
            span,
        });
    }
    Ok(())
}

/// Read a single byte, `None` on end of input.
fn read_byte(input: &mut impl Read) -> io::Result<Option<u8>> {
    let mut tmp: [u8; 1] = [0; 1];
    loop {
        match input.read(&mut tmp) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(tmp[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}
