//! CRAIG CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 5: IaC error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use craig_iac::CraigError;
use craig_spec::SpecError;

mod commands;

use commands::{CliError, Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const IAC_ERROR: u8 = 5;
}

fn log_directives(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "craig=debug,warn"
    } else if quiet {
        "warn"
    } else {
        "craig=info,warn"
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directives(cli.verbose, cli.quiet)));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, cli.quiet),
        Commands::Validate(args) => commands::validate::execute(args, cli.quiet),
        Commands::Print(args) => commands::print::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Pick the exit code from the first library error in the chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<SpecError>() {
            return match err {
                SpecError::ValidationFailed(_) => ExitCodes::VALIDATION_FAILURE,
                SpecError::NotFound(_) | SpecError::InvalidFormat { .. } => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<CraigError>().is_some() {
            return ExitCodes::IAC_ERROR;
        }
        if cause.downcast_ref::<CliError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_validation_failure_exit_code() {
        let err = anyhow::Error::from(SpecError::ValidationFailed("bad".to_string()))
            .context("Configuration craig.json is invalid");
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);
    }

    #[test]
    fn test_missing_input_exit_code() {
        let err = anyhow::Error::from(SpecError::NotFound(PathBuf::from("craig.json")));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_generation_error_exit_code() {
        let result: Result<(), CraigError> = Err(CraigError::DuplicateAddress(
            "resource.ibm_is_vpc.management_vpc".to_string(),
        ));
        let err = result.context("Failed to generate Terraform").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::IAC_ERROR);
    }

    #[test]
    fn test_unknown_error_exit_code() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(categorize_error(&err), ExitCodes::GENERAL_ERROR);
    }

    #[test]
    fn test_log_directives() {
        assert_eq!(log_directives(true, false), "craig=debug,warn");
        assert_eq!(log_directives(false, true), "warn");
        assert_eq!(log_directives(false, false), "craig=info,warn");
    }
}
