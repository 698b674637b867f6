//! This test runs all the programs in the regressions directory.

use std::{collections::VecDeque, env, error::Error, path::PathBuf};

use tapevm::{
    optimize, parse_source,
    test_utils::{optimised_settings, reference_settings, test_execute},
};

fn find_regressions() -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut path: PathBuf = env::var("CARGO_MANIFEST_DIR")?.into();
    path.push("tests");
    path.push("regressions");

    let mut results = vec![];
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some("bf") = path.extension().and_then(|x| x.to_str()) {
            results.push(path);
        }
    }
    Ok(results)
}

fn run_reproducer(
    reproducer: &PathBuf,
    input: Option<PathBuf>,
    expected_output: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let src = std::fs::read(reproducer)?;
    let out = std::fs::read(expected_output)?;
    let input: VecDeque<_> = match input {
        Some(f) => std::fs::read(f)?.into(),
        None => VecDeque::new(),
    };
    let ast = parse_source(src.as_slice())?;

    let exec1 = test_execute(&ast, &reference_settings(), &mut input.clone());
    let new_ast = optimize(ast.clone())?;
    let exec2 = test_execute(&new_ast, &optimised_settings(), &mut input.clone());

    assert_eq!(exec1.result, Some(Ok(())));
    assert_eq!(exec2.result, Some(Ok(())));
    assert_eq!(exec1.output, out);
    assert_eq!(exec2.output, out);
    assert_eq!(exec1.state.tape_ptr, exec2.state.tape_ptr);
    assert_eq!(exec1.state.tape, exec2.state.tape);
    // The optimised program never does more work
    assert!(exec2.state.stats.total() <= exec1.state.stats.total());

    Ok(())
}

#[test]
fn test_regressions() {
    let reproducers = find_regressions().unwrap();
    assert!(!reproducers.is_empty());
    for reproducer in reproducers {
        let in_file = reproducer.with_extension("in");
        let in_file = if in_file.exists() {
            Some(in_file)
        } else {
            None
        };
        let out_file = reproducer.with_extension("out");
        match run_reproducer(&reproducer, in_file, out_file) {
            Ok(_) => (),
            Err(err) => panic!("{err:?} {reproducer:?}"),
        }
    }
}
