//! scorebook - ball-by-ball cricket scoring

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = scorebook::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
