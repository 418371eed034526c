mod cli;

use crate::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI, set up config and logging, then dispatch.
    match Cli::run_from_args() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("rpmirror error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
