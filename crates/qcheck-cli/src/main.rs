use qcheck_core::logging;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    // Log to the state dir when possible, else stderr.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match cli::run_from_args() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("qcheck error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
