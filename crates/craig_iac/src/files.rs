//! File maps: relative path to file content, in write order.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::info;

use craig_spec::Craig;

use crate::assembler::{craig_to_cdktf, craig_to_vpc_module_cdktf};
use crate::error::CraigResult;
use crate::family::families;
use crate::refs::module_name;
use crate::terraform::{
    check_unique_addresses, main_tf, sections_tf, variables_tf, versions_tf, vpc_module_outputs_tf,
    vpc_module_sections, vpc_module_variables_tf, vpc_module_versions_tf,
};

/// Root CDKTF file name.
pub const CDKTF_ROOT_FILE: &str = "craig.tf.json";
/// CDKTF file name inside each module directory.
pub const CDKTF_MODULE_FILE: &str = "module.tf.json";

pub type FileMap = IndexMap<String, String>;

fn module_path(vpc: &str, file: &str) -> String {
    format!("{}/{}", module_name(vpc), file)
}

/// Every HCL file of a configuration.
///
/// Root files come first (`main.tf`, `variables.tf`, `versions.tf`, then one
/// file per non-empty family), followed by each VPC module directory.
pub fn hcl_files(craig: &Craig) -> CraigResult<FileMap> {
    let mut files = FileMap::new();
    files.insert("main.tf".to_string(), main_tf(craig)?);
    files.insert("variables.tf".to_string(), variables_tf(craig));
    files.insert("versions.tf".to_string(), versions_tf(craig));

    let mut seen = HashSet::new();
    for family in families() {
        let sections = family.build(craig)?;
        check_unique_addresses(&mut seen, &sections)?;
        if let Some(text) = sections_tf(&sections) {
            files.insert(family.file_name(), text);
        }
    }

    for vpc in &craig.vpcs {
        let (network, groups) = vpc_module_sections(vpc, craig)?;
        let mut module_seen = HashSet::new();
        check_unique_addresses(&mut module_seen, network.iter().chain(groups.iter()))?;

        if let Some(text) = sections_tf(&network) {
            files.insert(module_path(&vpc.name, "main.tf"), text);
        }
        if let Some(text) = sections_tf(&groups) {
            files.insert(module_path(&vpc.name, "security_groups.tf"), text);
        }
        let variables = vpc_module_variables_tf(vpc, craig);
        if !variables.is_empty() {
            files.insert(module_path(&vpc.name, "variables.tf"), variables);
        }
        files.insert(module_path(&vpc.name, "outputs.tf"), vpc_module_outputs_tf(vpc, craig)?);
        files.insert(module_path(&vpc.name, "versions.tf"), vpc_module_versions_tf());
    }

    info!("Generated {} HCL files", files.len());
    Ok(files)
}

fn json_file(value: &serde_json::Value) -> CraigResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// The root CDKTF file plus one CDKTF file per VPC module.
pub fn cdktf_files(craig: &Craig) -> CraigResult<FileMap> {
    let mut files = FileMap::new();
    files.insert(CDKTF_ROOT_FILE.to_string(), json_file(&craig_to_cdktf(craig)?)?);
    for vpc in &craig.vpcs {
        files.insert(
            module_path(&vpc.name, CDKTF_MODULE_FILE),
            json_file(&craig_to_vpc_module_cdktf(vpc, craig)?)?,
        );
    }

    info!("Generated {} CDKTF files", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz" },
            "resource_groups": [{ "name": "slz-management-rg" }],
            "vpcs": [{
                "name": "management",
                "resource_group": "slz-management-rg",
                "subnets": [{ "name": "vsi-zone-1", "cidr": "10.10.10.0/24" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_hcl_file_order() {
        let files = hcl_files(&craig()).unwrap();
        let paths: Vec<&String> = files.keys().collect();
        assert_eq!(
            paths,
            vec![
                "main.tf",
                "variables.tf",
                "versions.tf",
                "resource_groups.tf",
                "management_vpc/main.tf",
                "management_vpc/variables.tf",
                "management_vpc/outputs.tf",
                "management_vpc/versions.tf",
            ]
        );
    }

    #[test]
    fn test_cdktf_files() {
        let files = cdktf_files(&craig()).unwrap();
        let paths: Vec<&String> = files.keys().collect();
        assert_eq!(paths, vec!["craig.tf.json", "management_vpc/module.tf.json"]);

        let root: serde_json::Value = serde_json::from_str(&files["craig.tf.json"]).unwrap();
        assert_eq!(root["module"]["management_vpc"]["source"], "./management_vpc");
    }

    #[test]
    fn test_duplicate_resource_group_is_rejected() {
        let mut craig = craig();
        craig.resource_groups.push(craig.resource_groups[0].clone());
        assert!(matches!(
            hcl_files(&craig),
            Err(crate::error::CraigError::DuplicateAddress(_))
        ));
        assert!(matches!(
            cdktf_files(&craig),
            Err(crate::error::CraigError::DuplicateAddress(_))
        ));
    }
}
