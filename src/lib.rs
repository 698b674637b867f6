//! # tapevm - A peephole optimising Brainfuck interpreter
//!
//! The program is parsed into a tree of single step primitives, the
//! optimiser fuses runs and replaces common loop idioms, and the interpreter
//! runs the result on a fixed size tape.
//!
//! **NOTE! This is mainly a command line program. The library API is not
//! stable.**

// Re-export some symbols.
pub use cancel::CancelSignal;
pub use cancel::CancelToken;
pub use interpreter::execute;
pub use interpreter::run;
pub use interpreter::ExecutionError;
pub use interpreter::ExecutionState;
pub use optimizers::optimize;
pub use optimizers::OptimizeError;
pub use parser::parse_source;
pub use parser::ParseError;
pub use types::BfNum;
pub use types::TapeAddr;
pub use types::TapeAddrError;

pub mod ast;
pub mod cancel;
mod interpreter;
mod optimizers;
mod parser;
pub mod settings;
pub mod stats;
pub mod tape;
#[doc(hidden)]
pub mod test_utils;
pub mod types;
