//! Binary crate for the `skyview` command-line weather client.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts for the API key and city
//! - Terminal rendering of the view state

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "skyview_core=debug,skyview=debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_visible_by_default() {
        assert_eq!(default_filter(0), "warn");
        assert!(default_filter(1).contains("skyview_core=debug"));
        assert_eq!(default_filter(3), "trace");
    }
}
