#![no_main]

use std::io;

use libfuzzer_sys::fuzz_target;
use tapevm::cancel::StepLimit;
use tapevm::settings::InterpreterSettings;
use tapevm::{execute, ExecutionError, ExecutionState};
use tapevm_fuzz::FuzzInputAST;

fuzz_target!(|data: FuzzInputAST| {
    let ast = data.ast;
    let mut input = data.input;

    let settings = InterpreterSettings {
        tape_size: 256,
        raise_on_overflow: ast.len() % 2 == 0,
        raise_on_input_eof: ast.len() % 3 == 0,
    };
    let mut state = ExecutionState::new(settings.tape_size);
    let exec_result = execute(
        &ast,
        &mut state,
        &settings,
        &mut input,
        &mut io::sink(),
        &StepLimit::new(500),
    );
    match exec_result {
        Ok(_) => (),
        Err(err) => match err {
            ExecutionError::PointerOverflow { .. }
            | ExecutionError::PointerUnderflow { .. }
            | ExecutionError::CellOverflow { .. }
            | ExecutionError::CellUnderflow { .. } => assert!(settings.raise_on_overflow),
            ExecutionError::InputExhausted { .. } => assert!(settings.raise_on_input_eof),
            ExecutionError::TapeError(_) => (),
            ExecutionError::IoError(_) => (),
            ExecutionError::Cancelled => (),
        },
    }
});
