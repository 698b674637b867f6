#[cfg(target_os = "linux")]
use std::os::linux::fs::MetadataExt;

use std::{
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::debug;
use thiserror::Error;

use tapevm::{
    ast::Node,
    cancel::{NeverCancel, StepLimit},
    execute, optimize, parse_source,
    settings::{InterpreterSettings, DEFAULT_TAPE_SIZE},
    CancelSignal, ExecutionError, ExecutionState, OptimizeError, ParseError,
};

#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parsing error: {0}")]
    ParserError(#[from] ParseError),
    #[error("Optimisation error: {0}")]
    OptimizeError(#[from] OptimizeError),
    #[error("Execution error: {0}")]
    ExecutionError(#[from] ExecutionError),
    #[error("Tape size must be at least 1")]
    EmptyTape,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input Brainfuck source file
    input_file: PathBuf,

    /// Run the program exactly as written, without optimisation
    #[arg(long, default_value_t = false)]
    no_optimise: bool,

    /// Number of cells on the tape
    #[arg(short, long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Fail when the pointer or a cell leaves its range instead of carrying on
    #[arg(long, default_value_t = false)]
    raise_on_overflow: bool,

    /// Fail when the program reads past the end of input instead of stopping
    #[arg(long, default_value_t = false)]
    raise_on_eof: bool,

    /// Stop the program after this many dispatched nodes
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print execution statistics to stderr when done
    #[arg(long, default_value_t = false)]
    stats: bool,

    /// Print the tree that is executed to stderr
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn main() -> Result<(), ProgramError> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    debug!("args: {args:?}");

    if args.tape_size == 0 {
        return Err(ProgramError::EmptyTape);
    }

    let mut file = std::fs::File::open(&args.input_file)?;

    #[cfg(target_os = "linux")]
    let mut buf = Vec::with_capacity(file.metadata()?.st_size() as usize);
    #[cfg(not(target_os = "linux"))]
    let mut buf = Vec::new();

    file.read_to_end(&mut buf)?;

    let mut ast = parse_source(buf.as_slice())?;

    if !args.no_optimise {
        ast = optimize(ast)?;
    }

    if args.dump_ast {
        eprintln!("{ast:#?}");
    }

    let settings = InterpreterSettings {
        tape_size: args.tape_size,
        raise_on_overflow: args.raise_on_overflow,
        raise_on_input_eof: args.raise_on_eof,
    };
    let mut state = ExecutionState::new(settings.tape_size);
    let result = match args.max_steps {
        Some(steps) => run_stdio(&ast, &mut state, &settings, &StepLimit::new(steps)),
        None => run_stdio(&ast, &mut state, &settings, &NeverCancel),
    };

    if args.stats {
        eprint!("{}", state.stats);
    }

    Ok(result?)
}

/// Execute against stdin/stdout, flushing whatever was written.
fn run_stdio(
    ast: &[Node],
    state: &mut ExecutionState,
    settings: &InterpreterSettings,
    cancel: &impl CancelSignal,
) -> Result<(), ProgramError> {
    let mut stdout = io::stdout().lock();
    let result = execute(
        ast,
        state,
        settings,
        &mut io::stdin().lock(),
        &mut stdout,
        cancel,
    );
    stdout.flush()?;
    Ok(result?)
}
