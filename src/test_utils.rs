use crate::{
    ast::*, cancel::StepLimit, settings::InterpreterSettings, ExecutionError, ExecutionState,
};

/// Dispatch budget for test runs, programs may not terminate.
pub const STEP_LIMIT: u64 = 500000;

/// Tape size for test runs
pub const TEST_TAPE_SIZE: usize = 4096;

#[derive(Debug, PartialEq)]
pub struct TestRun {
    pub result: Option<Result<(), ExecutionError>>,
    pub state: ExecutionState,
    pub output: Vec<u8>,
}

impl Default for TestRun {
    fn default() -> Self {
        Self {
            result: None,
            state: ExecutionState::new(TEST_TAPE_SIZE),
            output: Default::default(),
        }
    }
}

/// Settings for the reference (unoptimised) run.
///
/// Fused modifications do not wrap below zero, so the two runs are only
/// comparable when the reference run never needed to wrap. Checking makes
/// the reference run fail instead.
pub fn reference_settings() -> InterpreterSettings {
    InterpreterSettings {
        tape_size: TEST_TAPE_SIZE,
        raise_on_overflow: true,
        raise_on_input_eof: false,
    }
}

/// Settings for the optimised run
pub fn optimised_settings() -> InterpreterSettings {
    InterpreterSettings::with_tape_size(TEST_TAPE_SIZE)
}

/// Compare a checked reference run (`exec1`) with an unchecked optimised run (`exec2`).
pub fn compare_runs(exec1: &TestRun, exec2: &TestRun) {
    match (
        exec1.result.as_ref().unwrap(),
        exec2.result.as_ref().unwrap(),
    ) {
        // The program depends on wrapping or leaves the tape, nothing to compare.
        (
            Err(ExecutionError::PointerOverflow { .. })
            | Err(ExecutionError::PointerUnderflow { .. })
            | Err(ExecutionError::CellOverflow { .. })
            | Err(ExecutionError::CellUnderflow { .. }),
            _,
        ) => (),
        // The optimised program runs a different number of nodes
        (Err(ExecutionError::Cancelled), _) | (_, Err(ExecutionError::Cancelled)) => (),
        (Ok(_), Ok(_)) => {
            assert_eq!(exec1.output, exec2.output);
            assert_eq!(exec1.state.tape_ptr, exec2.state.tape_ptr);
            assert_eq!(exec1.state.tape, exec2.state.tape);
        }
        // IO is ordered, we should fail at the same point at least.
        (Err(_), Err(_)) => {
            assert_eq!(exec1.result, exec2.result);
            assert_eq!(exec1.output, exec2.output);
        }
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => {
            panic!("Results differ after optimisation: {err:?}");
        }
    }
}

/// Run with a bounded number of steps.
pub fn test_execute(
    ast: &[Node],
    settings: &InterpreterSettings,
    input: &mut impl std::io::Read,
) -> TestRun {
    let mut exec = TestRun {
        state: ExecutionState::new(settings.tape_size),
        ..Default::default()
    };
    exec.result = Some(crate::execute(
        ast,
        &mut exec.state,
        settings,
        input,
        &mut exec.output,
        &StepLimit::new(STEP_LIMIT),
    ));
    exec
}
