//! Property tests for the optimiser.

use std::{collections::VecDeque, io};

use proptest::prelude::*;

use tapevm::{
    ast::{Node, Opcode},
    cancel::NeverCancel,
    execute, optimize, parse_source,
    settings::InterpreterSettings,
    tape::Tape,
    test_utils::{compare_runs, optimised_settings, reference_settings, test_execute},
    ExecutionState,
};

const TAPE_SIZE: usize = 64;

fn step() -> impl Strategy<Value = Opcode> {
    prop_oneof![
        Just(Opcode::Right),
        Just(Opcode::Left),
        Just(Opcode::Increment),
        Just(Opcode::Decrement),
    ]
}

/// Moves and modifications only
fn straight_line() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(step().prop_map(Node::synth), 0..30)
}

/// Any primitive tree
fn program() -> impl Strategy<Value = Vec<Node>> {
    let leaf = prop_oneof![
        4 => step(),
        1 => Just(Opcode::Output),
        1 => Just(Opcode::Input),
    ]
    .prop_map(Node::synth);
    let node = leaf.prop_recursive(4, 64, 8, |inner| {
        prop::collection::vec(inner, 0..8).prop_map(|body| Node::synth(Opcode::Loop(body)))
    });
    prop::collection::vec(node, 0..16)
}

/// Run from the middle of a tape where every cell is `fill`.
fn run_from_middle(code: &[Node], fill: u8) -> ExecutionState {
    let mut state = ExecutionState::new(TAPE_SIZE);
    for i in 0..TAPE_SIZE as i64 {
        state.tape.try_set(i.into(), fill.into()).unwrap();
    }
    state.tape_ptr = (TAPE_SIZE as i64 / 2).into();
    execute(
        code,
        &mut state,
        &InterpreterSettings::with_tape_size(TAPE_SIZE),
        &mut io::empty(),
        &mut io::sink(),
        &NeverCancel,
    )
    .unwrap();
    state
}

proptest! {
    #[test]
    fn fused_runs_match_single_steps(ops in straight_line()) {
        let optimised = optimize(ops.clone()).unwrap();
        // Starting at 128 no cell can leave 0..=255 in 30 steps.
        let plain = run_from_middle(&ops, 128);
        let fused = run_from_middle(&optimised, 128);
        prop_assert_eq!(plain.tape_ptr, fused.tape_ptr);
        prop_assert_eq!(plain.tape, fused.tape);
    }

    #[test]
    fn optimising_twice_changes_nothing(ast in program()) {
        let once = optimize(ast).unwrap();
        let twice = optimize(once.clone()).unwrap();
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn optimised_program_behaves_the_same(ast in program(), input in prop::collection::vec(any::<u8>(), 0..8)) {
        let input: VecDeque<u8> = input.into();
        let exec1 = test_execute(&ast, &reference_settings(), &mut input.clone());
        let optimised = optimize(ast).unwrap();
        let exec2 = test_execute(&optimised, &optimised_settings(), &mut input.clone());
        compare_runs(&exec1, &exec2);
    }
}

#[test]
fn fused_decrement_below_zero_does_not_wrap() {
    let plain = parse_source(b"--").unwrap();
    let fused = optimize(plain.clone()).unwrap();
    assert_eq!(fused.len(), 1);

    // One step at a time wraps around
    let state = run_from_middle(&plain, 1);
    assert_eq!(state.tape.try_get(32.into()), Ok(255.into()));
    // The fused modification would go negative, so the cell is left alone
    let state = run_from_middle(&fused, 1);
    assert_eq!(state.tape.try_get(32.into()), Ok(1.into()));
}

#[test]
fn fused_increment_past_255_wraps_like_single_steps() {
    let plain = parse_source(b"+++").unwrap();
    let fused = optimize(plain.clone()).unwrap();
    let s1 = run_from_middle(&plain, 254);
    let s2 = run_from_middle(&fused, 254);
    assert_eq!(s1.tape, s2.tape);
    assert_eq!(s2.tape.try_get(32.into()), Ok(1.into()));
}
