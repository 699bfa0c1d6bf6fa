//! Validate command - Validate one configuration or a directory of them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use craig_spec::{CraigReader, CraigValidator, SpecError};

#[derive(Args)]
pub struct ValidateArgs {
    /// Configuration file, or a directory searched recursively
    #[arg(short, long)]
    input: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

/// Outcome for a single file.
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn validate_file(path: &Path) -> Report {
    match CraigReader::read_file(path) {
        Ok(craig) => {
            let result = CraigValidator::validate(&craig);
            Report {
                errors: result.errors,
                warnings: result.warnings,
            }
        }
        Err(e) => Report {
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    }
}

pub fn execute(args: ValidateArgs, quiet: bool) -> Result<()> {
    info!("Validating {}", args.input.display());

    let paths = if args.input.is_dir() {
        CraigReader::find_configs(&args.input)
            .with_context(|| format!("Failed to search {}", args.input.display()))?
    } else {
        vec![args.input.clone()]
    };
    if paths.is_empty() {
        anyhow::bail!("No configuration files found in {}", args.input.display());
    }

    let mut failed = Vec::new();
    for path in &paths {
        let report = validate_file(path);
        let passed = report.errors.is_empty() && !(args.strict && !report.warnings.is_empty());

        if !quiet || !passed {
            let mark = if passed { "✅" } else { "❌" };
            println!("{} {}", mark, path.display());
            for error in &report.errors {
                println!("   - {}", error);
            }
            for warning in &report.warnings {
                println!("   ⚠️  {}", warning);
            }
        }

        if !passed {
            failed.push(path.display().to_string());
        }
    }

    if failed.is_empty() {
        if !quiet {
            println!("\n✅ {} configuration(s) valid", paths.len());
        }
        Ok(())
    } else {
        Err(SpecError::ValidationFailed(format!(
            "{} of {} configuration(s) invalid: {}",
            failed.len(),
            paths.len(),
            failed.join(", ")
        ))
        .into())
    }
}
