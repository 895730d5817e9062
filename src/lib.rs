pub mod util;
pub mod interpreter;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use clap::Parser as ClapParser;
use thiserror::Error;
use tracing::{debug, info};
use crate::interpreter::diagnostic;
use crate::interpreter::evaluator::DEFAULT_MAX_CALL_DEPTH;
use crate::interpreter::interpreter::Interpreter;


#[derive(ClapParser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    #[clap(help = "Script to run; starts an interactive session when omitted")]
    pub input: Option<PathBuf>,

    #[clap(short, long, help = "Print verbose log output")]
    pub verbose: bool,
    #[clap(long, help = "Never color diagnostics")]
    pub no_color: bool,
    #[clap(long, default_value_t = DEFAULT_MAX_CALL_DEPTH, help = "Maximum depth of nested function calls")]
    pub max_call_depth: usize,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to set up the interpreter: {0}")]
    Setup(#[from] interpreter::error::Error),
    /// The script raised an error, which has already been reported.
    #[error("Script failed")]
    ScriptFailed,
}

/// Installs the log subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| if verbose {
        EnvFilter::new("aty_lang=debug")
    } else {
        EnvFilter::new("warn")
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
        .with(filter)
        .try_init();
}

pub fn run(config: Config) -> Result<(), RunError> {
    let colors = !config.no_color && io::stderr().is_terminal();
    let mut interpreter = Interpreter::new(config.max_call_depth)?;

    match &config.input {
        Some(path) => run_file(&mut interpreter, path, colors),
        None => run_repl(&mut interpreter, colors),
    }
}

fn run_file(interpreter: &mut Interpreter, path: &Path, colors: bool) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path)
        .map_err(|source| RunError::Read { path: path.to_owned(), source })?;

    info!(path = %path.display(), "running script");

    match interpreter.run(&source) {
        Ok(value) => {
            debug!(result = ?value, "script finished");
            Ok(())
        },
        Err(err) => {
            eprintln!("{}", diagnostic::render(&err, &source, colors));
            Err(RunError::ScriptFailed)
        },
    }
}

/// Reads one line at a time until an empty line or end of input.
fn run_repl(interpreter: &mut Interpreter, colors: bool) -> Result<(), RunError> {
    let mut stdout = io::stdout();
    let mut line = String::new();

    writeln!(stdout, "Aty programming language")?;
    writeln!(stdout, "-------------------------")?;

    loop {
        write!(stdout, "-> ")?;
        stdout.flush()?;

        line.clear();

        if io::stdin().lock().read_line(&mut line)? == 0 {
            break;
        }

        let source = line.trim_end_matches(['\n', '\r']);

        if source.is_empty() {
            break;
        }

        match interpreter.run(source) {
            Ok(value) => writeln!(stdout, "{:?}", value)?,
            Err(err) => eprintln!("{}", diagnostic::render(&err, source, colors)),
        }
    }

    Ok(())
}
