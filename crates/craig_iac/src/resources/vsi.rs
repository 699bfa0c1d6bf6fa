//! Virtual server deployments.
//!
//! A deployment expands to `subnets.len() * vsi_per_subnet` instances. Each
//! replica starts from a cloned template whose per-replica keys are
//! placeholders, so attribute order is the same for every replica and no two
//! replicas share a tree.

use serde_json::{Map, Value};

use craig_spec::{Craig, NetworkInterface, Volume, Vsi};

use super::{subnet_zone, tags, zone_name, Attrs};
use crate::cdktf::transpose;
use crate::error::CraigResult;
use crate::naming::{resource_name, snake_case};
use crate::refs::{
    optional_encryption_key_ref, rg_id_ref, sg_ref, ssh_key_ref, subnet_ref, tf_ref, vpc_ref, BlockKind,
    Scope,
};
use crate::section::{Formatted, Section};

/// One expanded instance of a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Replica {
    /// Unnormalized address, `<vpc> vpc <name> vsi zone <zone> <n>`.
    pub address: String,
    /// Value of the `name` attribute.
    pub name: String,
    pub subnet: String,
    pub zone: u32,
}

/// Expand a deployment into its replicas, subnet by subnet.
pub fn replicas(vsi: &Vsi, craig: &Craig) -> CraigResult<Vec<Replica>> {
    let mut replicas = Vec::new();
    for subnet in &vsi.subnets {
        let zone = subnet_zone(subnet, "format_vsi")?;
        for index in 1..=vsi.vsi_per_subnet {
            let (zone_str, index_str) = (zone.to_string(), index.to_string());
            replicas.push(Replica {
                address: format!("{} vpc {} vsi zone {} {}", vsi.vpc, vsi.name, zone, index),
                name: resource_name(
                    craig,
                    &[vsi.vpc.as_str(), &vsi.name, "vsi", "zone", &zone_str, &index_str],
                ),
                subnet: subnet.clone(),
                zone,
            });
        }
    }
    Ok(replicas)
}

/// Snake_case addresses of every instance in a deployment.
pub fn instance_addresses(vsi: &Vsi, craig: &Craig) -> CraigResult<Vec<String>> {
    Ok(replicas(vsi, craig)?
        .iter()
        .map(|replica| snake_case(&replica.address))
        .collect())
}

fn is_local_image(image: &str) -> bool {
    image.contains("local")
}

/// Image reference; images containing `local` are raw expressions.
pub fn image_ref(image: &str) -> String {
    if is_local_image(image) {
        format!("${{{}}}", image)
    } else {
        tf_ref("ibm_is_image", image, None, true)
    }
}

/// Distinct catalog images used by VSI deployments.
pub fn vsi_images(craig: &Craig) -> Vec<&str> {
    let mut images: Vec<&str> = Vec::new();
    for vsi in &craig.vsi {
        let image = vsi.image_name.as_str();
        if !is_local_image(image) && !images.contains(&image) {
            images.push(image);
        }
    }
    images
}

pub fn format_vsi_image(image: &str) -> Formatted {
    Attrs::new().set("name", image).named(image)
}

/// Secondary interfaces; always created with IP spoofing allowed.
pub(crate) fn network_interfaces(
    interfaces: &[NetworkInterface],
    vpc: &str,
    craig: &Craig,
    from: &str,
) -> CraigResult<Value> {
    let mut blocks = Vec::with_capacity(interfaces.len());
    for interface in interfaces {
        blocks.push(Value::from(
            Attrs::new()
                .set("subnet", subnet_ref(craig, vpc, &interface.subnet, None, from, Scope::Root)?)
                .set("allow_ip_spoofing", true)
                .set("security_groups", security_group_refs(&interface.security_groups, vpc, craig, from)?),
        ));
    }
    Ok(Value::Array(blocks))
}

/// Root references to security groups of `vpc`.
pub(crate) fn security_group_refs(
    groups: &[String],
    vpc: &str,
    craig: &Craig,
    from: &str,
) -> CraigResult<Vec<String>> {
    groups
        .iter()
        .map(|sg| sg_ref(craig, vpc, sg, from, Scope::Root))
        .collect()
}

pub(crate) fn ssh_key_refs(keys: &[String], craig: &Craig, from: &str) -> CraigResult<Vec<String>> {
    keys.iter().map(|key| ssh_key_ref(craig, key, from)).collect()
}

fn volume_address(replica: &Replica, volume: &Volume) -> String {
    format!("{} {}", replica.address, volume.name)
}

fn vsi_template(vsi: &Vsi, craig: &Craig) -> CraigResult<Map<String, Value>> {
    let from = "format_vsi";
    let boot_encryption = optional_encryption_key_ref(
        craig,
        vsi.kms.as_deref(),
        vsi.encryption_key.as_deref(),
        from,
    )?;

    Ok(Attrs::new()
        .set("name", Value::Null)
        .set("image", image_ref(&vsi.image_name))
        .set("profile", vsi.profile.as_str())
        .set("resource_group", rg_id_ref(craig, vsi.resource_group.as_deref(), from, Scope::Root)?)
        .set("vpc", vpc_ref(craig, &vsi.vpc, None, from, Scope::Root)?)
        .set("zone", Value::Null)
        .set("tags", tags(craig))
        .set("primary_network_interface", Value::Null)
        .maybe(
            "boot_volume",
            boot_encryption.map(|key| Attrs::new().set("encryption", key)),
        )
        .set("keys", ssh_key_refs(&vsi.ssh_keys, craig, from)?)
        .maybe("user_data", vsi.user_data.clone())
        .set_if(
            !vsi.network_interfaces.is_empty(),
            "network_interfaces",
            network_interfaces(&vsi.network_interfaces, &vsi.vpc, craig, from)?,
        )
        .set_if(!vsi.volumes.is_empty(), "volumes", Value::Null)
        .build())
}

/// Every instance of a deployment.
pub fn format_vsi(vsi: &Vsi, craig: &Craig) -> CraigResult<Vec<Formatted>> {
    let from = "format_vsi";
    let template = vsi_template(vsi, craig)?;
    let security_groups = security_group_refs(&vsi.security_groups, &vsi.vpc, craig, from)?;

    let mut instances = Vec::new();
    for replica in replicas(vsi, craig)? {
        let mut data = Map::new();
        transpose(&template, &mut data);

        data.insert("name".to_string(), Value::from(replica.name.as_str()));
        data.insert("zone".to_string(), Value::from(zone_name(craig, replica.zone)));
        data.insert(
            "primary_network_interface".to_string(),
            Attrs::new()
                .set("subnet", subnet_ref(craig, &vsi.vpc, &replica.subnet, None, from, Scope::Root)?)
                .set("security_groups", security_groups.clone())
                .into(),
        );
        if !vsi.volumes.is_empty() {
            let volumes: Vec<String> = vsi
                .volumes
                .iter()
                .map(|volume| tf_ref("ibm_is_volume", &volume_address(&replica, volume), None, false))
                .collect();
            data.insert("volumes".to_string(), Value::from(volumes));
        }

        instances.push(Formatted {
            name: snake_case(&replica.address),
            data,
        });
    }
    Ok(instances)
}

pub fn format_vsi_volume(vsi: &Vsi, replica: &Replica, volume: &Volume, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_vsi_volume";
    let encryption = optional_encryption_key_ref(
        craig,
        vsi.kms.as_deref(),
        volume.encryption_key.as_deref(),
        from,
    )?;
    Ok(Attrs::new()
        .set("name", format!("{}-{}", replica.name, volume.name))
        .set("profile", volume.profile.as_str())
        .set("zone", zone_name(craig, replica.zone))
        .set("resource_group", rg_id_ref(craig, vsi.resource_group.as_deref(), from, Scope::Root)?)
        .maybe("capacity", volume.capacity)
        .maybe("encryption_key", encryption)
        .set("tags", tags(craig))
        .named(&volume_address(replica, volume)))
}

pub fn format_floating_ip(vsi: &Vsi, replica: &Replica, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set("name", format!("{}-fip", replica.name))
        .set(
            "target",
            tf_ref("ibm_is_instance", &replica.address, Some("primary_network_interface.0.id"), false),
        )
        .set(
            "resource_group",
            rg_id_ref(craig, vsi.resource_group.as_deref(), "format_floating_ip", Scope::Root)?,
        )
        .set("tags", tags(craig))
        .named(&format!("{} fip", replica.address)))
}

/// One section per deployment; each image is emitted once, with its first user.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    let mut emitted_images: Vec<&str> = Vec::new();

    for vsi in &craig.vsi {
        let mut section = Section::new(format!("{} vpc {} deployment", vsi.vpc, vsi.name));

        let image = vsi.image_name.as_str();
        if !is_local_image(image) && !emitted_images.contains(&image) {
            emitted_images.push(image);
            section.push(BlockKind::Data, "ibm_is_image", format_vsi_image(image));
        }

        for instance in format_vsi(vsi, craig)? {
            section.resource("ibm_is_instance", instance);
        }
        for replica in replicas(vsi, craig)? {
            for volume in &vsi.volumes {
                section.resource("ibm_is_volume", format_vsi_volume(vsi, &replica, volume, craig)?);
            }
            if vsi.enable_floating_ip {
                section.resource("ibm_is_floating_ip", format_floating_ip(vsi, &replica, craig)?);
            }
        }

        sections.push(section);
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CraigError;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south", "tags": ["slz"] },
            "resource_groups": [{ "name": "slz-management-rg" }],
            "key_management": [{ "name": "slz-kms", "keys": [{ "name": "slz-vsi-volume-key" }] }],
            "vpcs": [{
                "name": "management",
                "subnets": [
                    { "name": "vsi-zone-1", "cidr": "10.10.10.0/24" },
                    { "name": "vsi-zone-2", "cidr": "10.20.10.0/24" }
                ]
            }],
            "security_groups": [{ "name": "management-vsi", "vpc": "management" }],
            "ssh_keys": [{ "name": "slz-ssh-key", "public_key": "ssh-rsa AAAA" }],
            "vsi": [{
                "name": "management-server",
                "vpc": "management",
                "subnets": ["vsi-zone-1", "vsi-zone-2"],
                "security_groups": ["management-vsi"],
                "ssh_keys": ["slz-ssh-key"],
                "image_name": "ibm-ubuntu-22-04-1-minimal-amd64-1",
                "vsi_per_subnet": 2,
                "resource_group": "slz-management-rg",
                "kms": "slz-kms",
                "encryption_key": "slz-vsi-volume-key",
                "volumes": [{ "name": "data", "capacity": 100, "encryption_key": "slz-vsi-volume-key" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_expansion_produces_one_instance_per_subnet_slot() {
        let craig = craig();
        let instances = format_vsi(&craig.vsi[0], &craig).unwrap();
        let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "management_vpc_management_server_vsi_zone_1_1",
                "management_vpc_management_server_vsi_zone_1_2",
                "management_vpc_management_server_vsi_zone_2_1",
                "management_vpc_management_server_vsi_zone_2_2",
            ]
        );
        assert_eq!(instances[3].data["name"], "slz-management-management-server-vsi-zone-2-2");
        assert_eq!(instances[3].data["zone"], "us-south-2");
    }

    #[test]
    fn test_replicas_keep_template_order_and_differ_per_zone() {
        let craig = craig();
        let instances = format_vsi(&craig.vsi[0], &craig).unwrap();
        let first: Vec<&String> = instances[0].data.keys().collect();
        let last: Vec<&String> = instances[3].data.keys().collect();
        assert_eq!(first, last);
        assert_eq!(first[0], "name");
        assert_eq!(
            instances[0].data["primary_network_interface"]["subnet"],
            "${module.management_vpc.subnet_vsi_zone_1_id}"
        );
        assert_eq!(
            instances[3].data["primary_network_interface"]["subnet"],
            "${module.management_vpc.subnet_vsi_zone_2_id}"
        );
    }

    #[test]
    fn test_instance_references() {
        let craig = craig();
        let instance = &format_vsi(&craig.vsi[0], &craig).unwrap()[0];
        assert_eq!(instance.data["image"], "${data.ibm_is_image.ibm_ubuntu_22_04_1_minimal_amd_64_1.id}");
        assert_eq!(instance.data["keys"], json!(["${ibm_is_ssh_key.slz_ssh_key.id}"]));
        assert_eq!(
            instance.data["boot_volume"],
            json!({ "encryption": "${ibm_kms_key.slz_kms_slz_vsi_volume_key_key.crn}" })
        );
        assert_eq!(
            instance.data["volumes"],
            json!(["${ibm_is_volume.management_vpc_management_server_vsi_zone_1_1_data.id}"])
        );
    }

    #[test]
    fn test_local_image_is_raw_expression() {
        assert_eq!(image_ref("local.custom_image"), "${local.custom_image}");
    }

    #[test]
    fn test_volume() {
        let craig = craig();
        let vsi = &craig.vsi[0];
        let replica = &replicas(vsi, &craig).unwrap()[1];
        let volume = format_vsi_volume(vsi, replica, &vsi.volumes[0], &craig).unwrap();
        assert_eq!(volume.name, "management_vpc_management_server_vsi_zone_1_2_data");
        assert_eq!(volume.data["name"], "slz-management-management-server-vsi-zone-1-2-data");
        assert_eq!(volume.data["capacity"], 100);
        assert_eq!(volume.data["encryption_key"], "${ibm_kms_key.slz_kms_slz_vsi_volume_key_key.crn}");
    }

    #[test]
    fn test_sections_emit_image_once() {
        let mut craig = craig();
        let mut second = craig.vsi[0].clone();
        second.name = "workload-server".to_string();
        craig.vsi.push(second);

        let sections = sections(&craig).unwrap();
        let images = sections
            .iter()
            .flat_map(|s| s.emissions.iter())
            .filter(|e| e.tf_type == "ibm_is_image")
            .count();
        assert_eq!(images, 1);
    }

    #[test]
    fn test_security_group_from_another_vpc_fails() {
        let mut craig = craig();
        craig.vpcs.push(craig_spec::Vpc {
            name: "workload".to_string(),
            ..Default::default()
        });
        craig.security_groups[0].vpc = Some("workload".to_string());

        let err = format_vsi(&craig.vsi[0], &craig).unwrap_err();
        assert!(matches!(err, CraigError::InvalidField { ref field, .. } if field == "security_groups"));
    }
}
