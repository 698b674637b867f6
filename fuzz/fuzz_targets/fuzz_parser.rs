#![no_main]

use libfuzzer_sys::fuzz_target;

use tapevm::{parse_source, ParseError};

fn check_loop_balance(data: &[u8]) -> Option<ParseError> {
    let mut open = vec![];
    for (pos, v) in data.iter().enumerate() {
        match v {
            b'[' => open.push(pos),
            b']' => {
                if open.pop().is_none() {
                    return Some(ParseError::TooManyEndLoop(pos));
                }
            }
            _ => (),
        }
    }
    open.last().map(|pos| ParseError::TooManyStartLoop(*pos))
}

fuzz_target!(|data: &[u8]| {
    match parse_source(data) {
        Ok(_) => {
            assert_eq!(check_loop_balance(data), None);
        }
        Err(e) => {
            assert_eq!(check_loop_balance(data), Some(e));
        }
    }
});
