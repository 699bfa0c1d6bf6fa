//! Power Virtual Server workspaces, instances and volumes.
//!
//! Every Power resource is bound to the provider alias of its workspace zone.

use serde_json::Value;

use craig_spec::{
    Craig, PowerCloudConnection, PowerImage, PowerInstance, PowerNetwork, PowerSshKey, PowerVolume,
    PowerWorkspace,
};

use super::{tags, timeouts, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::provider::power_alias;
use crate::refs::{power_workspace_address, power_workspace_ref, resource_or_data, rg_id_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

fn provider_ref(workspace: &PowerWorkspace) -> String {
    format!("${{ibm.{}}}", power_alias(&workspace.zone))
}

fn workspace_of<'a>(craig: &'a Craig, name: &str, from: &str) -> CraigResult<&'a PowerWorkspace> {
    craig
        .power_workspace(name)
        .ok_or_else(|| CraigError::missing("power vs workspace", name, from))
}

/// Attributes shared by every resource inside a workspace.
fn workspace_attrs(workspace: &PowerWorkspace, craig: &Craig, from: &str) -> CraigResult<Attrs> {
    Ok(Attrs::new()
        .set("provider", provider_ref(workspace))
        .set(
            "pi_cloud_instance_id",
            power_workspace_ref(craig, &workspace.name, Some("guid"), from)?,
        ))
}

fn ssh_key_address(workspace: &str, key: &str) -> String {
    format!("power vs ssh key {} {}", workspace, key)
}

fn network_address(workspace: &str, network: &str) -> String {
    format!("power network {} {}", workspace, network)
}

fn image_address(workspace: &str, image: &str) -> String {
    format!("power image {} {}", workspace, image)
}

fn instance_address(instance: &str) -> String {
    format!("power instance {}", instance)
}

fn volume_address(volume: &str) -> String {
    format!("power volume {}", volume)
}

pub fn format_power_workspace(workspace: &PowerWorkspace, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if workspace.use_data {
        Attrs::new()
            .set("provider", provider_ref(workspace))
            .set("name", workspace.name.as_str())
            .set("service", "power-iaas")
    } else {
        Attrs::new()
            .set("provider", provider_ref(workspace))
            .set("name", resource_name(craig, &["power-workspace", workspace.name.as_str()]))
            .set("service", "power-iaas")
            .set("plan", "power-virtual-server-group")
            .set("location", workspace.zone.as_str())
            .set(
                "resource_group_id",
                rg_id_ref(
                    craig,
                    workspace.resource_group.as_deref(),
                    "format_power_workspace",
                    Scope::Root,
                )?,
            )
            .set("tags", tags(craig))
            .set("timeouts", timeouts("6m", "", "5m"))
    };
    Ok(attrs.named(&power_workspace_address(&workspace.name)))
}

pub fn format_power_ssh_key(workspace: &PowerWorkspace, key: &PowerSshKey, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = workspace_attrs(workspace, craig, "format_power_ssh_key")?;
    let attrs = if key.use_data {
        attrs.set("pi_key_name", key.name.as_str())
    } else {
        attrs
            .set("pi_key_name", resource_name(craig, &[workspace.name.as_str(), &key.name]))
            .set("pi_ssh_key", key.public_key.as_str())
    };
    Ok(attrs.named(&ssh_key_address(&workspace.name, &key.name)))
}

pub fn format_power_network(
    workspace: &PowerWorkspace,
    network: &PowerNetwork,
    craig: &Craig,
) -> CraigResult<Formatted> {
    Ok(workspace_attrs(workspace, craig, "format_power_network")?
        .set(
            "pi_network_name",
            resource_name(craig, &[workspace.name.as_str(), &network.name]),
        )
        .set("pi_cidr", network.pi_cidr.as_str())
        .set("pi_dns", network.pi_dns.clone())
        .set("pi_network_type", network.pi_network_type.as_str())
        .set("pi_network_jumbo", network.pi_network_jumbo)
        .named(&network_address(&workspace.name, &network.name)))
}

pub fn format_power_cloud_connection(
    workspace: &PowerWorkspace,
    connection: &PowerCloudConnection,
    craig: &Craig,
) -> CraigResult<Formatted> {
    let from = "format_power_cloud_connection";
    for tgw in &connection.transit_gateways {
        craig
            .transit_gateway(tgw)
            .ok_or_else(|| CraigError::missing("transit gateway", tgw.as_str(), from))?;
    }
    Ok(workspace_attrs(workspace, craig, from)?
        .set(
            "pi_cloud_connection_name",
            resource_name(craig, &[workspace.name.as_str(), &connection.name]),
        )
        .set("pi_cloud_connection_speed", connection.pi_cloud_connection_speed)
        .set(
            "pi_cloud_connection_global_routing",
            connection.pi_cloud_connection_global_routing,
        )
        .set("pi_cloud_connection_metered", connection.pi_cloud_connection_metered)
        .set(
            "pi_cloud_connection_transit_enabled",
            connection.pi_cloud_connection_transit_enabled,
        )
        .named(&format!("{} cloud connection {}", workspace.name, connection.name)))
}

pub fn format_power_image(workspace: &PowerWorkspace, image: &PowerImage, craig: &Craig) -> CraigResult<Formatted> {
    Ok(workspace_attrs(workspace, craig, "format_power_image")?
        .set("pi_image_id", image.pi_image_id.as_str())
        .set("pi_image_name", image.name.as_str())
        .set("timeouts", timeouts("9m", "", ""))
        .named(&image_address(&workspace.name, &image.name)))
}

pub fn format_power_instance(instance: &PowerInstance, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_power_instance";
    let workspace = workspace_of(craig, &instance.workspace, from)?;

    workspace.image(&instance.image).ok_or_else(|| {
        CraigError::missing("power vs image", format!("{}/{}", workspace.name, instance.image), from)
    })?;
    let key = workspace.ssh_key(&instance.ssh_key).ok_or_else(|| {
        CraigError::missing("power vs ssh key", format!("{}/{}", workspace.name, instance.ssh_key), from)
    })?;

    let mut networks = Vec::with_capacity(instance.network.len());
    for network in &instance.network {
        workspace.network(&network.name).ok_or_else(|| {
            CraigError::missing("power vs network", format!("{}/{}", workspace.name, network.name), from)
        })?;
        networks.push(Value::from(
            Attrs::new()
                .set(
                    "network_id",
                    tf_ref(
                        "ibm_pi_network",
                        &network_address(&workspace.name, &network.name),
                        Some("network_id"),
                        false,
                    ),
                )
                .maybe("ip_address", network.ip_address.clone()),
        ));
    }

    Ok(workspace_attrs(workspace, craig, from)?
        .set("pi_instance_name", resource_name(craig, &[&instance.name]))
        .set(
            "pi_image_id",
            tf_ref(
                "ibm_pi_image",
                &image_address(&workspace.name, &instance.image),
                Some("image_id"),
                false,
            ),
        )
        .set(
            "pi_key_pair_name",
            tf_ref(
                "ibm_pi_key",
                &ssh_key_address(&workspace.name, &key.name),
                Some("pi_key_name"),
                key.use_data,
            ),
        )
        .set("pi_sys_type", instance.pi_sys_type.as_str())
        .set("pi_proc_type", instance.pi_proc_type.as_str())
        .set("pi_processors", instance.pi_processors.as_str())
        .set("pi_memory", instance.pi_memory.as_str())
        .set("pi_storage_type", instance.pi_storage_type.as_str())
        .set("pi_health_status", instance.pi_health_status.as_str())
        .set("pi_network", networks)
        .set("timeouts", timeouts("6h", "", ""))
        .named(&instance_address(&instance.name)))
}

pub fn format_power_volume(volume: &PowerVolume, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_power_volume";
    let workspace = workspace_of(craig, &volume.workspace, from)?;
    Ok(workspace_attrs(workspace, craig, from)?
        .set("pi_volume_name", resource_name(craig, &[&volume.name]))
        .set("pi_volume_size", volume.pi_volume_size)
        .set("pi_volume_type", volume.pi_volume_type.as_str())
        .set("pi_volume_shareable", volume.pi_volume_shareable)
        .set("pi_replication_enabled", volume.pi_replication_enabled)
        .set("timeouts", timeouts("4m", "", ""))
        .named(&volume_address(&volume.name)))
}

/// Attach a volume to an instance of the same workspace.
pub fn format_power_volume_attachment(volume: &PowerVolume, instance: &str, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_power_volume_attachment";
    let workspace = workspace_of(craig, &volume.workspace, from)?;
    let target = craig
        .power_instance(instance)
        .ok_or_else(|| CraigError::missing("power vs instance", instance, from))?;
    if target.workspace != volume.workspace {
        return Err(CraigError::invalid(
            from,
            "attachments",
            format!(
                "instance `{}` is not in workspace `{}`",
                instance, volume.workspace
            ),
        ));
    }

    Ok(workspace_attrs(workspace, craig, from)?
        .set(
            "pi_volume_id",
            tf_ref("ibm_pi_volume", &volume_address(&volume.name), Some("volume_id"), false),
        )
        .set(
            "pi_instance_id",
            tf_ref("ibm_pi_instance", &instance_address(instance), Some("instance_id"), false),
        )
        .named(&format!("{} attach {}", volume.name, instance)))
}

/// One section per workspace: the workspace, keys, networks, connections, images.
pub fn infrastructure_sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for workspace in &craig.power {
        let mut section = Section::new(format!("power vs workspace {}", workspace.name));
        section.push(
            resource_or_data(workspace.use_data),
            "ibm_resource_instance",
            format_power_workspace(workspace, craig)?,
        );
        for key in &workspace.ssh_keys {
            section.push(
                resource_or_data(key.use_data),
                "ibm_pi_key",
                format_power_ssh_key(workspace, key, craig)?,
            );
        }
        for network in &workspace.network {
            section.resource("ibm_pi_network", format_power_network(workspace, network, craig)?);
        }
        for connection in &workspace.cloud_connections {
            section.resource(
                "ibm_pi_cloud_connection",
                format_power_cloud_connection(workspace, connection, craig)?,
            );
        }
        for image in &workspace.images {
            section.resource("ibm_pi_image", format_power_image(workspace, image, craig)?);
        }
        sections.push(section);
    }
    Ok(sections)
}

pub fn instance_sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("power vs instances");
    for instance in &craig.power_instances {
        section.resource("ibm_pi_instance", format_power_instance(instance, craig)?);
    }
    Ok(vec![section])
}

pub fn volume_sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("power vs volumes");
    for volume in &craig.power_volumes {
        section.resource("ibm_pi_volume", format_power_volume(volume, craig)?);
        for instance in &volume.attachments {
            section.resource(
                "ibm_pi_volume_attach",
                format_power_volume_attachment(volume, instance, craig)?,
            );
        }
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "enable_power_vs": true },
            "resource_groups": [{ "name": "slz-power-rg" }],
            "power": [{
                "name": "oracle",
                "zone": "dal10",
                "resource_group": "slz-power-rg",
                "ssh_keys": [{ "name": "power-key", "public_key": "ssh-rsa AAAA" }],
                "network": [{ "name": "oracle-public", "pi_cidr": "172.40.10.0/24" }],
                "images": [{ "name": "SLES15-SP3-SAP", "pi_image_id": "abc-123" }]
            }],
            "power_instances": [{
                "name": "oracle-1",
                "workspace": "oracle",
                "image": "SLES15-SP3-SAP",
                "ssh_key": "power-key",
                "network": [{ "name": "oracle-public", "ip_address": "172.40.10.5" }]
            }],
            "power_volumes": [{ "name": "oracle-data", "workspace": "oracle", "attachments": ["oracle-1"] }]
        }))
        .unwrap()
    }

    #[test]
    fn test_workspace_uses_zone_provider() {
        let craig = craig();
        let workspace = format_power_workspace(&craig.power[0], &craig).unwrap();
        assert_eq!(workspace.name, "power_vs_workspace_oracle");
        assert_eq!(workspace.data["provider"], "${ibm.power_vs_dal10}");
        assert_eq!(workspace.data["location"], "dal10");
        assert_eq!(workspace.data["name"], "slz-power-workspace-oracle");
    }

    #[test]
    fn test_instance_references_workspace_resources() {
        let craig = craig();
        let instance = format_power_instance(&craig.power_instances[0], &craig).unwrap();
        assert_eq!(
            instance.data["pi_cloud_instance_id"],
            "${ibm_resource_instance.power_vs_workspace_oracle.guid}"
        );
        assert_eq!(
            instance.data["pi_key_pair_name"],
            "${ibm_pi_key.power_vs_ssh_key_oracle_power_key.pi_key_name}"
        );
        assert_eq!(
            instance.data["pi_network"],
            json!([{
                "network_id": "${ibm_pi_network.power_network_oracle_oracle_public.network_id}",
                "ip_address": "172.40.10.5"
            }])
        );
    }

    #[test]
    fn test_instance_with_unknown_image_fails() {
        let mut craig = craig();
        craig.power_instances[0].image = "missing".to_string();
        let err = format_power_instance(&craig.power_instances[0], &craig).unwrap_err();
        assert!(matches!(err, CraigError::MissingReference { kind: "power vs image", .. }));
    }

    #[test]
    fn test_volume_attachment() {
        let craig = craig();
        let attachment = format_power_volume_attachment(&craig.power_volumes[0], "oracle-1", &craig).unwrap();
        assert_eq!(attachment.name, "oracle_data_attach_oracle_1");
        assert_eq!(
            attachment.data["pi_instance_id"],
            "${ibm_pi_instance.power_instance_oracle_1.instance_id}"
        );
    }
}
