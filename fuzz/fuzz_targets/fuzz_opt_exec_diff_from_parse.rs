//! Fuzz comparing execution with and without optimisation

#![no_main]

use tapevm::parse_source;
use tapevm::test_utils::{compare_runs, optimised_settings, reference_settings, test_execute};
use tapevm_fuzz::FuzzInputSrc;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzInputSrc| {
    let res = parse_source(&data.code);
    let ast = if let Ok(v) = res {
        v
    } else {
        return;
    };
    let input = data.input;

    let exec1 = test_execute(&ast, &reference_settings(), &mut input.clone());
    let new_ast = tapevm::optimize(ast).unwrap();
    let exec2 = test_execute(&new_ast, &optimised_settings(), &mut input.clone());
    compare_runs(&exec1, &exec2);
});
