//! Generate command - Write the Terraform file tree of a configuration.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{check, load, render, write_files, Format};

#[derive(Args)]
pub struct GenerateArgs {
    /// Configuration file (JSON or YAML)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving the generated files
    #[arg(short, long, default_value = "terraform")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "hcl")]
    format: Format,

    /// Generate even when the validator reports errors
    #[arg(long)]
    skip_validation: bool,
}

pub fn execute(args: GenerateArgs, quiet: bool) -> Result<()> {
    info!("Generating {:?} from {}", args.format, args.input.display());

    let craig = load(&args.input)?;
    if !args.skip_validation {
        check(&craig, &args.input)?;
    }

    let files = render(&craig, args.format)?;
    write_files(&files, &args.output)?;

    if !quiet {
        println!("✅ Wrote {} files to {}", files.len(), args.output.display());
        for path in files.keys() {
            println!("   {}", path);
        }
    }

    Ok(())
}
