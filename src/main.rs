//! pod-source-fix entry point
//!
//! Parses the command line, runs the fix pass and turns any failure into a
//! colored error report with exit status 1. Usage errors also exit with 1;
//! `--help` and `--version` exit with 0.

use anyhow::Result;
use clap::Parser;
use pod_source_fix::cli;
use pod_source_fix::core::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(cli::usage_exit_code(&e));
        }
    };

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
