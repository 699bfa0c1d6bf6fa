//! Print command - Render a single resource family to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use tracing::{info, warn};

use craig_iac::cdktf::add_emission;
use craig_iac::terraform::family_tf;
use craig_iac::{families, family, Family};
use craig_spec::Craig;

use super::{load, CliError, Format};

#[derive(Args)]
pub struct PrintArgs {
    /// Configuration file (JSON or YAML)
    #[arg(short, long)]
    input: PathBuf,

    /// Family to print, e.g. `virtual_servers` or `object_storage`
    #[arg(short, long)]
    family: String,

    /// Output format
    #[arg(long, value_enum, default_value = "hcl")]
    format: Format,
}

fn lookup(name: &str) -> Result<&'static Family, CliError> {
    family(name).ok_or_else(|| CliError::UnknownFamily {
        name: name.to_string(),
        known: families().map(|f| f.name).collect::<Vec<_>>().join(", "),
    })
}

/// The family's blocks as a CDKTF fragment.
fn family_cdktf(family: &Family, craig: &Craig) -> Result<Option<String>> {
    let mut tree = Map::new();
    for section in family.build(craig)? {
        for emission in &section.emissions {
            add_emission(&mut tree, emission)?;
        }
    }
    if tree.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string_pretty(&Value::Object(tree))?))
}

/// Render one family; `None` when the configuration declares none of it.
pub fn render_family(craig: &Craig, name: &str, format: Format) -> Result<Option<String>> {
    let family = lookup(name)?;
    let text = match format {
        Format::Hcl => family_tf(family, craig)?,
        Format::Cdktf => family_cdktf(family, craig)?,
    };
    Ok(text)
}

pub fn execute(args: PrintArgs) -> Result<()> {
    info!("Printing {} from {}", args.family, args.input.display());

    let craig = load(&args.input)?;
    let text = render_family(&craig, &args.family, args.format)
        .with_context(|| format!("Failed to render family `{}`", args.family))?;

    match text {
        Some(text) => print!("{}", text),
        None => warn!("Family `{}` is empty for this configuration", args.family),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use craig_spec::CraigReader;

    fn fixture() -> Craig {
        CraigReader::from_json(crate::commands::tests::FIXTURE).unwrap()
    }

    #[test]
    fn test_print_hcl_family() {
        let text = render_family(&fixture(), "ssh_keys", Format::Hcl).unwrap().unwrap();
        assert!(text.contains("resource \"ibm_is_ssh_key\" \"slz_ssh_key\""));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_print_cdktf_family() {
        let text = render_family(&fixture(), "ssh_keys", Format::Cdktf).unwrap().unwrap();
        let tree: Value = serde_json::from_str(&text).unwrap();
        assert!(tree["resource"]["ibm_is_ssh_key"]["slz_ssh_key"].is_object());
    }

    #[test]
    fn test_empty_family_prints_nothing() {
        assert!(render_family(&fixture(), "power_instances", Format::Hcl).unwrap().is_none());
        assert!(render_family(&fixture(), "power_instances", Format::Cdktf).unwrap().is_none());
    }

    #[test]
    fn test_unknown_family_lists_known_ones() {
        let err = render_family(&fixture(), "vsis", Format::Hcl).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown family `vsis`"));
        assert!(message.contains("virtual_servers"));
    }
}
