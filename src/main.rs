//! Main entry point for ShellGen.
//!
//! Parses the command line, sets up file logging, and runs the request
//! pipeline. The process exit code mirrors the executed command's.

use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;

use shellgen::app;
use shellgen::cli::Cli;
use shellgen::utils;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed.
    let _log_guard = utils::logger::init_logging();

    match app::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
