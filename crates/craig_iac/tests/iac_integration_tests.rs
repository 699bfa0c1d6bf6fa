//! Integration tests for Terraform and CDKTF generation.

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use serde_json::Value;

use craig_iac::hcl::{tf_block, tf_done};
use craig_iac::{cdktf_files, craig_to_cdktf, craig_to_vpc_module_cdktf, hcl_files, CraigError};
use craig_spec::{Craig, CraigReader};

fn fixture() -> Craig {
    CraigReader::from_json(include_str!("fixtures/slz.json")).unwrap()
}

/// `kind.type.name` of every top-level block in HCL text.
fn hcl_addresses<'a>(texts: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    let mut addresses = BTreeSet::new();
    for text in texts {
        for line in text.lines() {
            let kind = if line.starts_with("resource \"") {
                "resource"
            } else if line.starts_with("data \"") {
                "data"
            } else {
                continue;
            };
            let labels: Vec<&str> = line.split('"').collect();
            addresses.insert(format!("{}.{}.{}", kind, labels[1], labels[3]));
        }
    }
    addresses
}

/// `kind.type.name` of every block in a CDKTF tree.
fn cdktf_addresses(tree: &Value) -> BTreeSet<String> {
    let mut addresses = BTreeSet::new();
    for kind in ["resource", "data"] {
        if let Some(types) = tree.get(kind).and_then(Value::as_object) {
            for (tf_type, names) in types {
                for name in names.as_object().unwrap().keys() {
                    addresses.insert(format!("{}.{}.{}", kind, tf_type, name));
                }
            }
        }
    }
    addresses
}

#[test]
fn test_generation_is_idempotent() {
    let craig = fixture();
    assert_eq!(hcl_files(&craig).unwrap(), hcl_files(&craig).unwrap());
    assert_eq!(cdktf_files(&craig).unwrap(), cdktf_files(&craig).unwrap());
}

#[test]
fn test_hcl_and_cdktf_emit_the_same_blocks() {
    let craig = fixture();
    let files = hcl_files(&craig).unwrap();

    let root_hcl = hcl_addresses(files.iter().filter(|(path, _)| !path.contains('/')).map(|(_, text)| text));
    let root_cdktf = cdktf_addresses(&craig_to_cdktf(&craig).unwrap());
    assert_eq!(root_hcl, root_cdktf);

    for vpc in &craig.vpcs {
        let prefix = format!("{}_vpc/", vpc.name);
        let module_hcl = hcl_addresses(
            files
                .iter()
                .filter(|(path, _)| path.starts_with(&prefix))
                .map(|(_, text)| text),
        );
        let module_cdktf = cdktf_addresses(&craig_to_vpc_module_cdktf(vpc, &craig).unwrap());
        assert_eq!(module_hcl, module_cdktf);
    }
}

#[test]
fn test_use_data_switches_block_kind_and_references() {
    let mut craig = fixture();
    craig.resource_groups[0].use_data = true;
    let tree = craig_to_cdktf(&craig).unwrap();

    assert!(tree["data"]["ibm_resource_group"]["slz_service_rg"].is_object());
    assert!(tree["resource"]["ibm_resource_group"].get("slz_service_rg").is_none());
    assert_eq!(
        tree["resource"]["ibm_resource_instance"]["slz_kms"]["resource_group_id"],
        "${data.ibm_resource_group.slz_service_rg.id}"
    );
}

#[test]
fn test_resource_group_prefix() {
    let mut craig = fixture();
    let tree = craig_to_cdktf(&craig).unwrap();
    assert_eq!(
        tree["resource"]["ibm_resource_group"]["slz_service_rg"]["name"],
        "slz-service-rg"
    );

    craig.resource_groups[0].use_prefix = true;
    let tree = craig_to_cdktf(&craig).unwrap();
    assert_eq!(
        tree["resource"]["ibm_resource_group"]["slz_service_rg"]["name"],
        "slz-slz-service-rg"
    );
}

#[test]
fn test_vsi_deployment_expands_per_subnet() {
    let tree = craig_to_cdktf(&fixture()).unwrap();
    let instances: Vec<&String> = tree["resource"]["ibm_is_instance"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(
        instances,
        vec![
            "management_vpc_management_server_vsi_zone_1_1",
            "management_vpc_management_server_vsi_zone_1_2",
            "management_vpc_management_server_vsi_zone_2_1",
            "management_vpc_management_server_vsi_zone_2_2",
        ]
    );
    assert_eq!(
        tree["resource"]["ibm_is_instance"]["management_vpc_management_server_vsi_zone_2_1"]["name"],
        "slz-management-management-server-vsi-zone-2-1"
    );
}

#[test]
fn test_disabled_atracker_leaves_nothing_behind() {
    let mut craig = fixture();
    assert!(hcl_files(&craig).unwrap().contains_key("atracker.tf"));

    craig.atracker.enabled = false;
    assert!(!hcl_files(&craig).unwrap().contains_key("atracker.tf"));
    let tree = craig_to_cdktf(&craig).unwrap();
    assert!(tree["resource"].get("ibm_atracker_target").is_none());
    assert!(tree["resource"].get("ibm_atracker_route").is_none());
}

#[test]
fn test_icmp_only_security_group_rule() {
    let craig = fixture();
    let tree = craig_to_vpc_module_cdktf(&craig.vpcs[0], &craig).unwrap();
    let rule = &tree["resource"]["ibm_is_security_group_rule"]["management_vpc_management_vsi_sg_rule_allow_ping"];
    assert_eq!(rule["icmp"], serde_json::json!({ "type": 8 }));
    assert!(rule.get("tcp").is_none());
    assert!(rule.get("udp").is_none());
}

#[test]
fn test_duplicate_address_is_rejected() {
    let mut craig = fixture();
    let copy = craig.vsi[0].clone();
    craig.vsi.push(copy);

    assert!(matches!(craig_to_cdktf(&craig), Err(CraigError::DuplicateAddress(_))));
    assert!(matches!(hcl_files(&craig), Err(CraigError::DuplicateAddress(_))));
}

#[test]
fn test_missing_reference_names_the_entity() {
    let mut craig = fixture();
    craig.vsi[0].ssh_keys = vec!["missing-key".to_string()];

    let err = hcl_files(&craig).unwrap_err();
    assert!(err.to_string().contains("ssh key `missing-key`"), "{}", err);
}

#[test]
fn test_files_end_with_single_newline() {
    for (path, text) in hcl_files(&fixture()).unwrap() {
        assert!(text.ends_with('\n'), "{} has no trailing newline", path);
        assert!(!text.ends_with("\n\n"), "{} ends with a blank line", path);
    }
    assert_eq!(tf_done(&tf_block("x", "y")).matches("\n\n").count(), 2);
}

#[test]
fn test_module_layout() {
    let files = hcl_files(&fixture()).unwrap();
    for path in [
        "main.tf",
        "variables.tf",
        "versions.tf",
        "flow_logs.tf",
        "management_vpc/main.tf",
        "management_vpc/security_groups.tf",
        "management_vpc/outputs.tf",
        "workload_vpc/main.tf",
    ] {
        assert!(files.contains_key(path), "missing {}", path);
    }
    assert!(!files.contains_key("workload_vpc/security_groups.tf"));
    assert!(files["variables.tf"].contains("variable \"management_gateway_onprem_preshared_key\""));
}
