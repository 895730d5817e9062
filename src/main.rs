use std::process::ExitCode;
use clap::Parser as ClapParser;
use aty_lang::{Config, RunError};

fn main() -> ExitCode {
    let config: Config = Config::parse();
    aty_lang::init_tracing(config.verbose);

    match aty_lang::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::ScriptFailed) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        },
    }
}
