//! Virtual private endpoint gateways with one reserved IP per subnet.

use craig_spec::{Craig, Vpe};

use super::secrets_manager::secrets_manager_address;
use super::vsi::security_group_refs;
use super::{tags, Attrs};
use crate::error::{required, CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{rg_id_ref, subnet_ref, tf_ref, vpc_ref, Scope};
use crate::section::{Formatted, Section};

fn gateway_address(vpe: &Vpe) -> String {
    format!("{} {} vpe", vpe.vpc, vpe.name)
}

fn reserved_ip_address(vpe: &Vpe, subnet: &str) -> String {
    format!("{} {} vpe {} ip", vpe.vpc, vpe.name, subnet)
}

/// Target CRN of the endpoint's service.
fn target_crn(vpe: &Vpe, craig: &Craig, from: &str) -> CraigResult<String> {
    match vpe.service.as_str() {
        "cos" => Ok(format!(
            "crn:v1:bluemix:public:cloud-object-storage:global:::endpoint:s3.direct.{}.cloud-object-storage.appdomain.cloud",
            craig.options.region
        )),
        "secrets-manager" => {
            let instance = required(&vpe.instance, from, "instance")?;
            craig
                .secrets_manager_instance(instance)
                .ok_or_else(|| CraigError::missing("secrets manager instance", instance, from))?;
            Ok(tf_ref(
                "ibm_resource_instance",
                &secrets_manager_address(instance),
                Some("crn"),
                false,
            ))
        }
        other => Err(CraigError::invalid(
            from,
            "service",
            format!("unsupported endpoint service `{}`", other),
        )),
    }
}

pub fn format_reserved_ip(vpe: &Vpe, subnet: &str, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set(
            "subnet",
            subnet_ref(craig, &vpe.vpc, subnet, None, "format_reserved_ip", Scope::Root)?,
        )
        .named(&reserved_ip_address(vpe, subnet)))
}

pub fn format_vpe(vpe: &Vpe, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_vpe";
    let resource_type = if vpe.service == "cos" {
        "provider_cloud_service"
    } else {
        "provider_infrastructure_service"
    };

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[vpe.vpc.as_str(), &vpe.name, "vpe"]))
        .set("vpc", vpc_ref(craig, &vpe.vpc, None, from, Scope::Root)?)
        .set("resource_group", rg_id_ref(craig, vpe.resource_group.as_deref(), from, Scope::Root)?)
        .set("tags", tags(craig))
        .set("security_groups", security_group_refs(&vpe.security_groups, &vpe.vpc, craig, from)?)
        .set(
            "target",
            Attrs::new()
                .set("crn", target_crn(vpe, craig, from)?)
                .set("resource_type", resource_type),
        )
        .named(&gateway_address(vpe)))
}

pub fn format_vpe_ip(vpe: &Vpe, subnet: &str) -> Formatted {
    Attrs::new()
        .set("gateway", tf_ref("ibm_is_virtual_endpoint_gateway", &gateway_address(vpe), None, false))
        .set(
            "reserved_ip",
            tf_ref(
                "ibm_is_subnet_reserved_ip",
                &reserved_ip_address(vpe, subnet),
                Some("reserved_ip"),
                false,
            ),
        )
        .named(&format!("{} gateway {} ip", gateway_address(vpe), subnet))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for vpe in &craig.virtual_private_endpoints {
        let mut section = Section::new(format!("{} {} vpe", vpe.vpc, vpe.name));
        for subnet in &vpe.subnets {
            section.resource("ibm_is_subnet_reserved_ip", format_reserved_ip(vpe, subnet, craig)?);
        }
        section.resource("ibm_is_virtual_endpoint_gateway", format_vpe(vpe, craig)?);
        for subnet in &vpe.subnets {
            section.resource("ibm_is_virtual_endpoint_gateway_ip", format_vpe_ip(vpe, subnet));
        }
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
            "resource_groups": [{ "name": "slz-management-rg" }],
            "vpcs": [{ "name": "management", "subnets": [{ "name": "vpe-zone-1", "cidr": "10.10.20.0/24" }] }],
            "security_groups": [{ "name": "management-vpe", "vpc": "management" }],
            "virtual_private_endpoints": [{
                "name": "cos",
                "vpc": "management",
                "resource_group": "slz-management-rg",
                "security_groups": ["management-vpe"],
                "subnets": ["vpe-zone-1"]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_cos_endpoint_gateway() {
        let craig = craig();
        let vpe = format_vpe(&craig.virtual_private_endpoints[0], &craig).unwrap();
        assert_eq!(vpe.name, "management_cos_vpe");
        assert_eq!(
            vpe.data["target"],
            json!({
                "crn": "crn:v1:bluemix:public:cloud-object-storage:global:::endpoint:s3.direct.us-south.cloud-object-storage.appdomain.cloud",
                "resource_type": "provider_cloud_service"
            })
        );
    }

    #[test]
    fn test_gateway_ip_binds_reserved_ip() {
        let craig = craig();
        let ip = format_vpe_ip(&craig.virtual_private_endpoints[0], "vpe-zone-1");
        assert_eq!(ip.name, "management_cos_vpe_gateway_vpe_zone_1_ip");
        assert_eq!(
            ip.data["reserved_ip"],
            "${ibm_is_subnet_reserved_ip.management_cos_vpe_vpe_zone_1_ip.reserved_ip}"
        );
    }

    #[test]
    fn test_secrets_manager_endpoint_requires_instance() {
        let mut craig = craig();
        craig.virtual_private_endpoints[0].service = "secrets-manager".to_string();
        assert!(format_vpe(&craig.virtual_private_endpoints[0], &craig).is_err());
    }
}
