//! VPN gateways and their connections.

use craig_spec::{Craig, VpnConnection, VpnGateway};

use super::{tags, timeouts, Attrs};
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::provider::preshared_key_variable;
use crate::refs::{rg_id_ref, subnet_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

fn gateway_address(gateway: &str) -> String {
    format!("{} vpn gw", gateway)
}

pub fn format_vpn_gateway(gateway: &VpnGateway, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_vpn_gateway";
    Ok(Attrs::new()
        .set("name", resource_name(craig, &[gateway.name.as_str(), "vpn-gw"]))
        .set(
            "subnet",
            subnet_ref(craig, &gateway.vpc, &gateway.subnet, None, from, Scope::Root)?,
        )
        .set(
            "resource_group",
            rg_id_ref(craig, gateway.resource_group.as_deref(), from, Scope::Root)?,
        )
        .set("tags", tags(craig))
        .set("timeouts", timeouts("", "", "1h"))
        .named(&gateway_address(&gateway.name)))
}

/// A connection; its preshared key is read from a sensitive variable.
pub fn format_vpn_gateway_connection(
    gateway: &VpnGateway,
    connection: &VpnConnection,
    craig: &Craig,
) -> Formatted {
    Attrs::new()
        .set("name", resource_name(craig, &[gateway.name.as_str(), &connection.name]))
        .set("vpn_gateway", tf_ref("ibm_is_vpn_gateway", &gateway_address(&gateway.name), None, false))
        .set("peer_address", connection.peer_address.as_str())
        .set(
            "preshared_key",
            format!("${{var.{}}}", preshared_key_variable(&gateway.name, &connection.name)),
        )
        .set("local_cidrs", connection.local_cidrs.clone())
        .set("peer_cidrs", connection.peer_cidrs.clone())
        .set("timeouts", timeouts("", "", "1h"))
        .named(&format!("{} vpn gw connection {}", gateway.name, connection.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for gateway in &craig.vpn_gateways {
        let mut section = Section::new(format!("{} vpn gateway", gateway.name));
        section.resource("ibm_is_vpn_gateway", format_vpn_gateway(gateway, craig)?);
        for connection in &gateway.connections {
            section.resource(
                "ibm_is_vpn_gateway_connection",
                format_vpn_gateway_connection(gateway, connection, craig),
            );
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
            "_options": { "prefix": "slz" },
            "resource_groups": [{ "name": "slz-management-rg" }],
            "vpcs": [{ "name": "management", "subnets": [{ "name": "vpn-zone-1", "cidr": "10.10.30.0/24" }] }],
            "vpn_gateways": [{
                "name": "management-gateway",
                "resource_group": "slz-management-rg",
                "vpc": "management",
                "subnet": "vpn-zone-1",
                "connections": [{
                    "name": "on-prem",
                    "peer_address": "169.61.1.1",
                    "local_cidrs": ["10.10.10.0/24"],
                    "peer_cidrs": ["192.168.0.0/24"]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_vpn_gateway() {
        let craig = craig();
        let gateway = format_vpn_gateway(&craig.vpn_gateways[0], &craig).unwrap();
        assert_eq!(gateway.name, "management_gateway_vpn_gw");
        assert_eq!(gateway.data["subnet"], "${module.management_vpc.subnet_vpn_zone_1_id}");
        assert_eq!(gateway.data["timeouts"], json!({ "delete": "1h" }));
    }

    #[test]
    fn test_connection_reads_preshared_key_variable() {
        let craig = craig();
        let gateway = &craig.vpn_gateways[0];
        let connection = format_vpn_gateway_connection(gateway, &gateway.connections[0], &craig);
        assert_eq!(connection.name, "management_gateway_vpn_gw_connection_on_prem");
        assert_eq!(
            connection.data["preshared_key"],
            "${var.management_gateway_on_prem_preshared_key}"
        );
        assert_eq!(
            connection.data["vpn_gateway"],
            "${ibm_is_vpn_gateway.management_gateway_vpn_gw.id}"
        );
    }
}
