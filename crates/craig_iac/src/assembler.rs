//! CDKTF JSON trees for the root configuration and each VPC module.

use serde_json::{Map, Value};
use tracing::debug;

use craig_spec::{Craig, Vpc};

use crate::cdktf::{add_emission, cdktf_block};
use crate::error::CraigResult;
use crate::family::{Step, ROOT_STEPS};
use crate::provider::{module_terraform_tree, provider_tree, terraform_tree, variables_tree};
use crate::refs::module_name;
use crate::resources::{security_groups, vpc};
use crate::section::Section;
use crate::terraform::module_block;

/// Top-level keys of a root tree, in output order.
const ROOT_KEYS: &[&str] = &["provider", "terraform", "variable", "resource", "data", "module"];
/// Top-level keys of a module tree, in output order.
const MODULE_KEYS: &[&str] = &["terraform", "variable", "resource", "data", "output"];

fn add_sections(tree: &mut Map<String, Value>, sections: &[Section]) -> CraigResult<()> {
    for section in sections {
        for emission in &section.emissions {
            add_emission(tree, emission)?;
        }
    }
    Ok(())
}

/// Rebuild `tree` with `keys` first, dropping empty top-level entries.
fn ordered(mut tree: Map<String, Value>, keys: &[&str]) -> Value {
    let mut out = Map::new();
    for key in keys {
        if let Some(value) = tree.remove(*key) {
            let empty = matches!(&value, Value::Object(map) if map.is_empty());
            if !empty {
                out.insert(key.to_string(), value);
            }
        }
    }
    Value::Object(out)
}

/// The CDKTF tree of the root configuration.
pub fn craig_to_cdktf(craig: &Craig) -> CraigResult<Value> {
    let mut tree = Map::new();
    tree.insert("provider".to_string(), Value::Object(provider_tree(craig)));
    tree.insert("terraform".to_string(), Value::Object(terraform_tree(craig)));
    tree.insert("variable".to_string(), Value::Object(variables_tree(craig)));

    for step in ROOT_STEPS {
        match step {
            Step::Family(family) => {
                debug!("Assembling {} family", family.name);
                add_sections(&mut tree, &family.build(craig)?)?;
            }
            Step::VpcModules => {
                for vpc in &craig.vpcs {
                    cdktf_block(&mut tree, "module", &module_name(&vpc.name), module_block(vpc, craig)?)?;
                }
            }
        }
    }

    Ok(ordered(tree, ROOT_KEYS))
}

/// The CDKTF tree of one VPC module.
pub fn craig_to_vpc_module_cdktf(vpc: &Vpc, craig: &Craig) -> CraigResult<Value> {
    debug!("Assembling module for vpc {}", vpc.name);
    let mut tree = Map::new();
    tree.insert("terraform".to_string(), Value::Object(module_terraform_tree()));
    tree.insert("variable".to_string(), Value::Object(vpc::module_variables(vpc, craig)));

    add_sections(&mut tree, &vpc::sections(vpc, craig)?)?;
    add_sections(&mut tree, &security_groups::sections(vpc, craig)?)?;
    tree.insert("output".to_string(), Value::Object(vpc::module_outputs(vpc, craig)?));

    Ok(ordered(tree, MODULE_KEYS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south" },
            "resource_groups": [{ "name": "slz-management-rg" }],
            "vpcs": [{
                "name": "management",
                "resource_group": "slz-management-rg",
                "subnets": [{ "name": "vsi-zone-1", "cidr": "10.10.10.0/24" }]
            }],
            "security_groups": [{ "name": "management-vpe", "vpc": "management" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_root_keys_in_order_without_empty_entries() {
        let tree = craig_to_cdktf(&craig()).unwrap();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["provider", "terraform", "variable", "resource", "module"]);
    }

    #[test]
    fn test_module_entry() {
        let tree = craig_to_cdktf(&craig()).unwrap();
        assert_eq!(
            tree["module"]["management_vpc"],
            json!({
                "source": "./management_vpc",
                "slz_management_rg_id": "${ibm_resource_group.slz_management_rg.id}"
            })
        );
    }

    #[test]
    fn test_module_tree() {
        let craig = craig();
        let tree = craig_to_vpc_module_cdktf(&craig.vpcs[0], &craig).unwrap();
        let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["terraform", "variable", "resource", "output"]);
        assert!(tree["resource"]["ibm_is_vpc"]["management_vpc"].is_object());
        assert!(tree["resource"]["ibm_is_security_group"]["management_vpc_management_vpe_sg"].is_object());
        assert_eq!(
            tree["output"]["sg_management_vpe_id"]["value"],
            "${ibm_is_security_group.management_vpc_management_vpe_sg.id}"
        );
    }
}
