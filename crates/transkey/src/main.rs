//! Command-line entry point for transkey.

use clap::Parser;
use std::process::ExitCode;
use transkey::cli::{Cli, Status, run};

fn main() -> anyhow::Result<ExitCode> {
    transkey::init_logging();
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let status = run(&cli, &mut stdout.lock())?;
    Ok(match status {
        Status::Success => ExitCode::SUCCESS,
        Status::Failed => ExitCode::FAILURE,
    })
}
