//! Key management instances, key rings, keys and key policies.

use craig_spec::{Craig, KeyManagement, KmsKey};

use super::iam::AuthPolicy;
use super::{tags, Attrs};
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::refs::{kms_key_address, kms_ref, kms_service, resource_or_data, rg_id_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

const BLOCK_STORAGE_DESCRIPTION: &str =
    "Allow block storage volumes to be encrypted by Key Management instance.";

pub fn format_kms_instance(kms: &KeyManagement, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if kms.use_data {
        Attrs::new().set("name", kms.name.as_str())
    } else {
        Attrs::new()
            .set("name", resource_name(craig, &[&kms.name]))
            .set(
                "resource_group_id",
                rg_id_ref(craig, kms.resource_group.as_deref(), "format_kms_instance", Scope::Root)?,
            )
            .set("service", kms_service(kms))
            .set("plan", if kms.use_hs_crypto { "standard" } else { "tiered-pricing" })
            .set("location", craig.options.region.as_str())
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&kms.name))
}

/// Authorization policies letting VPC block storage read keys.
pub fn format_kms_auth_policies(kms: &KeyManagement, craig: &Craig) -> CraigResult<Vec<Formatted>> {
    let guid = kms_ref(craig, &kms.name, Some("guid"), "format_kms_auth_policies")?;
    let server_protect = AuthPolicy {
        address: format!("{} server protect policy", kms.name),
        description: BLOCK_STORAGE_DESCRIPTION,
        source_service_name: "server-protect",
        source_resource_type: None,
        source_resource_instance_id: None,
        roles: &["Reader"],
        target_service_name: kms_service(kms),
        target_resource_instance_id: guid.clone(),
    };
    let block_storage = AuthPolicy {
        address: format!("{} block storage policy", kms.name),
        source_service_name: "is",
        source_resource_type: Some("share"),
        ..server_protect.clone()
    };
    Ok(vec![block_storage.format(), server_protect.format()])
}

fn key_ring_address(kms: &str, ring: &str) -> String {
    format!("{} ring {}", kms, ring)
}

pub fn format_kms_key_ring(kms: &KeyManagement, ring: &str, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set("instance_id", kms_ref(craig, &kms.name, Some("guid"), "format_kms_key_ring")?)
        .set("key_ring_id", resource_name(craig, &[ring]))
        .set("endpoint_type", "private")
        .named(&key_ring_address(&kms.name, ring)))
}

pub fn format_kms_key(kms: &KeyManagement, key: &KmsKey, craig: &Craig) -> CraigResult<Formatted> {
    let ring = key
        .key_ring
        .as_deref()
        .map(|ring| tf_ref("ibm_kms_key_rings", &key_ring_address(&kms.name, ring), Some("key_ring_id"), false));

    Ok(Attrs::new()
        .set("instance_id", kms_ref(craig, &kms.name, Some("guid"), "format_kms_key")?)
        .set("key_name", resource_name(craig, &[&key.name]))
        .set("standard_key", !key.root_key)
        .maybe("key_ring_id", ring)
        .set("force_delete", key.force_delete)
        .set("endpoint_type", key.endpoint.as_deref().unwrap_or("public"))
        .named(&kms_key_address(&kms.name, &key.name)))
}

pub fn format_kms_key_policy(kms: &KeyManagement, key: &KmsKey, craig: &Craig) -> CraigResult<Formatted> {
    let key_address = kms_key_address(&kms.name, &key.name);
    Ok(Attrs::new()
        .set("instance_id", kms_ref(craig, &kms.name, Some("guid"), "format_kms_key_policy")?)
        .set("endpoint_type", key.endpoint.as_deref().unwrap_or("public"))
        .set("key_id", tf_ref("ibm_kms_key", &key_address, Some("key_id"), false))
        .set("rotation", Attrs::new().set("interval_month", key.rotation))
        .set("dual_auth_delete", Attrs::new().set("enabled", key.dual_auth_delete))
        .named(&format!("{} policy", key_address)))
}

/// One section per instance: policies, the instance, rings, then keys.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();

    for kms in &craig.key_management {
        let mut section = Section::new(format!("{} key management", kms.name));

        if kms.authorize_vpc_reader_role {
            for policy in format_kms_auth_policies(kms, craig)? {
                section.resource("ibm_iam_authorization_policy", policy);
            }
        }
        section.push(
            resource_or_data(kms.use_data),
            "ibm_resource_instance",
            format_kms_instance(kms, craig)?,
        );

        let mut rings: Vec<&str> = Vec::new();
        for ring in kms.keys.iter().filter_map(|key| key.key_ring.as_deref()) {
            if !rings.contains(&ring) {
                rings.push(ring);
                section.resource("ibm_kms_key_rings", format_kms_key_ring(kms, ring, craig)?);
            }
        }

        for key in &kms.keys {
            section.resource("ibm_kms_key", format_kms_key(kms, key, craig)?);
            section.resource("ibm_kms_key_policies", format_kms_key_policy(kms, key, craig)?);
        }

        sections.push(section);
    }

    Ok(sections)
}
