#![no_main]

use tapevm::ast::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|ast: Vec<Node>| {
    // Huge synthetic counts may not fuse, that is fine.
    if let Ok(once) = tapevm::optimize(ast) {
        let twice = tapevm::optimize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
});
