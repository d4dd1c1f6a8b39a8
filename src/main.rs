//! atomix binary entry point.

use std::process::ExitCode;

use atomix_cli::cli::{self, Cli};
use atomix_cli::error::{exit_status, ExitStatus};
use atomix_cli::ui::output;
use clap::Parser;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitStatus::BadArgs.into()
            } else {
                ExitStatus::Success.into()
            };
        }
    };

    match cli::run(cli) {
        Ok(()) => ExitStatus::Success.into(),
        Err(err) => {
            output::error(&err);
            exit_status(&err).into()
        }
    }
}
