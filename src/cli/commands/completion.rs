//! completion command - Generate shell completion scripts

use crate::cli::args::Cli;
use crate::completion::{generate_script, CompletionShell};
use anyhow::Result;
use clap::CommandFactory;
use std::io::Write;

/// Generate shell completion scripts.
pub fn completion(shell: &str) -> Result<()> {
    let shell: CompletionShell = shell.parse()?;
    let mut cmd = Cli::command();
    let script = generate_script(shell, &mut cmd);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(script.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
