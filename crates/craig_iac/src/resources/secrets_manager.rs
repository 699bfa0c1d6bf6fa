//! Secrets Manager instances.

use craig_spec::{Craig, SecretsManager};

use super::iam::AuthPolicy;
use super::{tags, timeouts, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{block_ref, kms_ref, kms_service, optional_encryption_key_ref, rg_id_ref, Scope};
use crate::section::{Formatted, Section};

/// Unnormalized address of a Secrets Manager instance.
pub fn secrets_manager_address(name: &str) -> String {
    format!("{} secrets manager", name)
}

fn policy_address(name: &str, kms: &str) -> String {
    format!("{} secrets manager to {} kms policy", name, kms)
}

pub fn format_secrets_manager_policy(sm: &SecretsManager, kms: &str, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_secrets_manager_policy";
    let instance = craig
        .key_management(kms)
        .ok_or_else(|| CraigError::missing("key management instance", kms, from))?;
    Ok(AuthPolicy {
        address: policy_address(&sm.name, kms),
        description: "Allow Secrets Manager instance to read from KMS instance",
        source_service_name: "secrets-manager",
        source_resource_type: None,
        source_resource_instance_id: None,
        roles: &["Reader"],
        target_service_name: kms_service(instance),
        target_resource_instance_id: kms_ref(craig, kms, Some("guid"), from)?,
    }
    .format())
}

pub fn format_secrets_manager(sm: &SecretsManager, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_secrets_manager";
    let key = optional_encryption_key_ref(craig, sm.kms.as_deref(), sm.encryption_key.as_deref(), from)?;
    let depends_on = sm
        .kms
        .as_deref()
        .filter(|_| key.is_some())
        .map(|kms| vec![block_ref("ibm_iam_authorization_policy", &policy_address(&sm.name, kms))]);

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[&sm.name]))
        .set("location", craig.options.region.as_str())
        .set("plan", sm.plan.as_str())
        .set("service", "secrets-manager")
        .set("resource_group_id", rg_id_ref(craig, sm.resource_group.as_deref(), from, Scope::Root)?)
        .maybe("parameters", key.map(|key| Attrs::new().set("kms_key", key)))
        .set("timeouts", timeouts("1h", "", "1h"))
        .set("tags", tags(craig))
        .maybe("depends_on", depends_on)
        .named(&secrets_manager_address(&sm.name)))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for sm in &craig.secrets_manager {
        let mut section = Section::new(format!("{} secrets manager", sm.name));
        if let (Some(kms), Some(_)) = (sm.kms.as_deref(), sm.encryption_key.as_deref()) {
            section.resource("ibm_iam_authorization_policy", format_secrets_manager_policy(sm, kms, craig)?);
        }
        section.resource("ibm_resource_instance", format_secrets_manager(sm, craig)?);
        sections.push(section);
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south" },
            "resource_groups": [{ "name": "slz-service-rg" }],
            "key_management": [{ "name": "slz-kms", "keys": [{ "name": "slz-sm-key" }] }],
            "secrets_manager": [{
                "name": "secrets-manager",
                "resource_group": "slz-service-rg",
                "kms": "slz-kms",
                "encryption_key": "slz-sm-key"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_encrypted_instance_waits_for_policy() {
        let craig = craig();
        let sm = format_secrets_manager(&craig.secrets_manager[0], &craig).unwrap();
        assert_eq!(sm.name, "secrets_manager_secrets_manager");
        assert_eq!(sm.data["service"], "secrets-manager");
        assert_eq!(
            sm.data["parameters"],
            json!({ "kms_key": "${ibm_kms_key.slz_kms_slz_sm_key_key.crn}" })
        );
        assert_eq!(
            sm.data["depends_on"],
            json!(["${ibm_iam_authorization_policy.secrets_manager_secrets_manager_to_slz_kms_kms_policy}"])
        );
    }

    #[test]
    fn test_unencrypted_instance_has_no_policy() {
        let mut craig = craig();
        craig.secrets_manager[0].kms = None;
        craig.secrets_manager[0].encryption_key = None;
        let sections = sections(&craig).unwrap();
        assert_eq!(sections[0].emissions.len(), 1);
        assert!(sections[0].emissions[0].data.get("depends_on").is_none());
    }
}
