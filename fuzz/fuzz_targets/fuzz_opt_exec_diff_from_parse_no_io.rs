//! Fuzz comparing execution with and without optimisation
//!
//! This version has no input to the program, but can load raw BF source files
//! as tmin (useful to minimise an external program).

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;

use tapevm::parse_source;
use tapevm::test_utils::{compare_runs, optimised_settings, reference_settings, test_execute};

fuzz_target!(|data: &[u8]| {
    let res = parse_source(data);
    let ast = if let Ok(v) = res {
        v
    } else {
        return;
    };
    let input = VecDeque::new();

    let exec1 = test_execute(&ast, &reference_settings(), &mut input.clone());
    let new_ast = tapevm::optimize(ast).unwrap();
    let exec2 = test_execute(&new_ast, &optimised_settings(), &mut input.clone());
    compare_runs(&exec1, &exec2);
});
