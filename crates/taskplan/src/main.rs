//! taskplan CLI application

// CLI binary needs to output to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::io;
use taskplan::cli::{Cli, EXIT_OK, OutputFormat, exit_code_for, render_error};
use taskplan::commands;
use taskplan::tracing;

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = Cli::parse();

    if let Err(e) = tracing::init_tracing(cli.tracing_config()) {
        eprintln!("Warning: {e}");
    }

    // Locks are released before errors are rendered
    let result = {
        let mut out = io::stdout().lock();
        let mut diag = io::stderr().lock();
        commands::execute(&cli, &mut out, &mut diag)
    };

    let exit_code = match result {
        Ok(()) => EXIT_OK,
        Err(err) => {
            ::tracing::debug!(error = %err, "Command failed");
            render_error(&err, cli.output == OutputFormat::Json);
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code);
}
