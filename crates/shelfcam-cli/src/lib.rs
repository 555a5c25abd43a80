pub mod cli;
pub mod diagnostics;
pub mod dispatch;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    let result = dispatch::run(cli, &cwd);
    if let Err(failure) = &result {
        error!("shelfcam exited with error: {failure:#}");
    }
    result
}
