//! IceCanary CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Build file not found
//! - 3: Build file or language data error
//! - 4: Upstream asset error

use std::process::ExitCode;

use canary_core::BuildError;
use clap::Parser;
use console::style;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod build;
mod cli;

use cli::Cli;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const BUILD_FILE_NOT_FOUND: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const UPSTREAM_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directives()));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    match build::execute(&cli).await {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<BuildError>() {
        Some(BuildError::BuildFileNotFound(_)) => ExitCodes::BUILD_FILE_NOT_FOUND,
        Some(err) if err.is_config_error() => ExitCodes::CONFIG_ERROR,
        Some(err) if err.is_upstream_error() => ExitCodes::UPSTREAM_ERROR,
        _ => ExitCodes::GENERAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_categorize_error() {
        let missing = anyhow::Error::from(BuildError::BuildFileNotFound(PathBuf::from("x.yml")));
        assert_eq!(categorize_error(&missing), ExitCodes::BUILD_FILE_NOT_FOUND);

        let format = anyhow::Error::from(BuildError::UnsupportedFormat {
            language: "Meme".into(),
            format: "toml".into(),
        });
        assert_eq!(categorize_error(&format), ExitCodes::CONFIG_ERROR);

        let timeout = anyhow::Error::from(BuildError::MergeTimeout(Duration::from_secs(120)));
        assert_eq!(categorize_error(&timeout), ExitCodes::UPSTREAM_ERROR);

        let other = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }
}
