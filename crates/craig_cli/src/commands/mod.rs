//! CLI command definitions.
//!
//! Each subcommand loads one configuration (or a directory of them) and
//! either validates it or renders Terraform from it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{debug, warn};

use craig_iac::{cdktf_files, hcl_files, FileMap};
use craig_spec::{Craig, CraigReader, CraigValidator};

pub mod generate;
pub mod print;
pub mod validate;

/// CRAIG - Cloud Resource And Infrastructure-as-code Generator
#[derive(Parser)]
#[command(name = "craig")]
#[command(version, about = "CRAIG - Terraform generator for IBM Cloud environments")]
#[command(long_about = r#"
CRAIG turns a JSON description of an IBM Cloud environment into Terraform.
Every VPC becomes its own module directory next to the root configuration.

COMMANDS:
  generate  → Write the HCL or CDKTF file tree into a directory
  validate  → Check one configuration or a directory of configurations
  print     → Print a single resource family to stdout

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  5 - IaC error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Terraform files from a configuration
    Generate(generate::GenerateArgs),

    /// Validate configurations without generating anything
    Validate(validate::ValidateArgs),

    /// Print one resource family
    Print(print::PrintArgs),
}

/// Output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Terraform HCL (`.tf` files)
    Hcl,
    /// CDKTF JSON (`.tf.json` files)
    Cdktf,
}

/// Errors raised by the CLI itself rather than the libraries.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Unknown family `{name}`; expected one of: {known}")]
    UnknownFamily { name: String, known: String },

    #[error("Output path {0:?} exists and is not a directory")]
    OutputNotDirectory(std::path::PathBuf),
}

/// Read a configuration file.
pub fn load(input: &Path) -> Result<Craig> {
    CraigReader::read_file(input)
        .with_context(|| format!("Failed to read configuration {}", input.display()))
}

/// Validate a configuration, logging warnings and failing on errors.
pub fn check(craig: &Craig, input: &Path) -> Result<()> {
    let result = CraigValidator::validate(craig);
    for warning in &result.warnings {
        warn!("{}: {}", input.display(), warning);
    }
    result
        .into_result()
        .with_context(|| format!("Configuration {} is invalid", input.display()))?;
    Ok(())
}

/// Render every file of a configuration in the requested format.
pub fn render(craig: &Craig, format: Format) -> Result<FileMap> {
    let files = match format {
        Format::Hcl => hcl_files(craig),
        Format::Cdktf => cdktf_files(craig),
    };
    files.context("Failed to generate Terraform")
}

/// Write a file map below `dir`, creating module directories as needed.
pub fn write_files(files: &FileMap, dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::OutputNotDirectory(dir.to_path_buf()).into());
    }

    for (relative, content) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }

    Ok(())
}
