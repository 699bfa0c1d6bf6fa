//! Terraform HCL text for the root configuration and each VPC module.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use craig_spec::{Craig, Vpc};

use crate::error::{CraigError, CraigResult};
use crate::family::{family, Family, Step, ROOT_STEPS};
use crate::hcl::{hcl_block, tf_block, tf_done};
use crate::provider::{module_terraform_tree, provider_tree, terraform_tree, variables_tree};
use crate::refs::module_name;
use crate::resources::{security_groups, vpc};
use crate::section::Section;

/// Join rendered sections; `None` when there is nothing to render.
pub fn sections_tf(sections: &[Section]) -> Option<String> {
    let text: String = sections
        .iter()
        .filter(|section| !section.is_empty())
        .map(Section::to_hcl)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(tf_done(&text))
    }
}

/// Fail on the first block address emitted twice across `sections`.
pub fn check_unique_addresses<'a>(
    seen: &mut HashSet<String>,
    sections: impl IntoIterator<Item = &'a Section>,
) -> CraigResult<()> {
    for section in sections {
        for emission in &section.emissions {
            let address = format!("{}.{}.{}", emission.kind, emission.tf_type, emission.name);
            if !seen.insert(address.clone()) {
                return Err(CraigError::DuplicateAddress(address));
            }
        }
    }
    Ok(())
}

/// HCL of one root family.
pub fn family_tf(family: &Family, craig: &Craig) -> CraigResult<Option<String>> {
    debug!("Rendering {} family", family.name);
    Ok(sections_tf(&family.build(craig)?))
}

macro_rules! named_family_tf {
    ($($fn_name:ident => $family:literal),* $(,)?) => {
        $(
            #[doc = concat!("HCL of the `", $family, "` family.")]
            pub fn $fn_name(craig: &Craig) -> CraigResult<Option<String>> {
                match family($family) {
                    Some(family) => family_tf(family, craig),
                    None => Ok(None),
                }
            }
        )*
    };
}

named_family_tf! {
    atracker_tf => "atracker",
    clusters_tf => "clusters",
    flow_logs_tf => "flow_logs",
    resource_group_tf => "resource_groups",
    cos_tf => "object_storage",
    kms_tf => "key_management",
    ssh_key_tf => "ssh_keys",
    tgw_tf => "transit_gateways",
    vpe_tf => "virtual_private_endpoints",
    vsi_tf => "virtual_servers",
    vpn_server_tf => "vpn_servers",
    vpn_tf => "vpn_gateways",
    f5_tf => "f5_big_ip",
    event_streams_tf => "event_streams",
    appid_tf => "appid",
    secrets_manager_tf => "secrets_manager",
    scc_tf => "scc",
    lb_tf => "load_balancers",
    iam_account_settings_tf => "iam_account_settings",
    access_groups_tf => "access_groups",
    cbr_tf => "cbr",
    teleport_tf => "teleport_vsi",
    icd_tf => "cloud_databases",
    power_infrastructure_tf => "power_infrastructure",
    power_instances_tf => "power_instances",
    power_volumes_tf => "power_volumes",
}

/// `module` block inputs: the module source followed by its variables.
pub fn module_block(vpc: &Vpc, craig: &Craig) -> CraigResult<Map<String, Value>> {
    let mut block = Map::new();
    block.insert(
        "source".to_string(),
        Value::from(format!("./{}", module_name(&vpc.name))),
    );
    crate::cdktf::transpose(&vpc::module_inputs(vpc, craig)?, &mut block);
    Ok(block)
}

/// `main.tf`: providers followed by one module block per VPC.
pub fn main_tf(craig: &Craig) -> CraigResult<String> {
    let providers = provider_tree(craig);
    let provider_blocks: Vec<String> = providers
        .get("ibm")
        .and_then(Value::as_array)
        .map(|configs| {
            configs
                .iter()
                .filter_map(Value::as_object)
                .map(|config| hcl_block("provider", &["ibm"], config))
                .collect()
        })
        .unwrap_or_default();

    let mut text = tf_block("ibm provider", &provider_blocks.join("\n"));
    for step in ROOT_STEPS {
        if let Step::VpcModules = step {
            for vpc in &craig.vpcs {
                let name = module_name(&vpc.name);
                text.push_str(&tf_block(
                    &format!("{} module", vpc.name),
                    &hcl_block("module", &[name.as_str()], &module_block(vpc, craig)?),
                ));
            }
        }
    }
    Ok(tf_done(&text))
}

fn blocks_tf(keyword: &str, tree: &Map<String, Value>) -> String {
    let blocks: Vec<String> = tree
        .iter()
        .filter_map(|(name, attrs)| attrs.as_object().map(|attrs| hcl_block(keyword, &[name.as_str()], attrs)))
        .collect();
    blocks.join("\n")
}

/// `variables.tf` of the root configuration.
pub fn variables_tf(craig: &Craig) -> String {
    blocks_tf("variable", &variables_tree(craig))
}

/// `versions.tf` of the root configuration.
pub fn versions_tf(craig: &Craig) -> String {
    hcl_block("terraform", &[], &terraform_tree(craig))
}

/// Non-empty sections of a VPC module, network first, then security groups.
pub fn vpc_module_sections(vpc: &Vpc, craig: &Craig) -> CraigResult<(Vec<Section>, Vec<Section>)> {
    let network = vpc::sections(vpc, craig)?;
    let groups = security_groups::sections(vpc, craig)?;
    Ok((network, groups))
}

/// `main.tf` of a VPC module.
pub fn vpc_module_tf(vpc: &Vpc, craig: &Craig) -> CraigResult<Option<String>> {
    debug!("Rendering module for vpc {}", vpc.name);
    Ok(sections_tf(&vpc::sections(vpc, craig)?))
}

/// `security_groups.tf` of a VPC module.
pub fn vpc_module_security_groups_tf(vpc: &Vpc, craig: &Craig) -> CraigResult<Option<String>> {
    Ok(sections_tf(&security_groups::sections(vpc, craig)?))
}

/// `variables.tf` of a VPC module: one ID variable per resource group used.
pub fn vpc_module_variables_tf(vpc: &Vpc, craig: &Craig) -> String {
    blocks_tf("variable", &vpc::module_variables(vpc, craig))
}

/// `outputs.tf` of a VPC module.
pub fn vpc_module_outputs_tf(vpc: &Vpc, craig: &Craig) -> CraigResult<String> {
    Ok(blocks_tf("output", &vpc::module_outputs(vpc, craig)?))
}

/// `versions.tf` of a VPC module.
pub fn vpc_module_versions_tf() -> String {
    hcl_block("terraform", &[], &module_terraform_tree())
}
