//! Settings defining how to run a program

/// Default tape length
pub const DEFAULT_TAPE_SIZE: usize = 30000;

/// Interpreter configuration
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InterpreterSettings {
    /// Number of cells on the tape. Fixed for the whole run.
    pub tape_size: usize,
    /// Fail when the pointer or a cell is about to leave its range, instead
    /// of carrying on.
    pub raise_on_overflow: bool,
    /// Fail on end of input. Otherwise end of input ends the program
    /// successfully.
    pub raise_on_input_eof: bool,
}

impl InterpreterSettings {
    pub fn with_tape_size(tape_size: usize) -> Self {
        Self {
            tape_size,
            ..Default::default()
        }
    }
}

impl Default for InterpreterSettings {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            raise_on_overflow: false,
            raise_on_input_eof: false,
        }
    }
}
