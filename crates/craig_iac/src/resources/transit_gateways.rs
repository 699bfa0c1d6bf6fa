//! Transit gateways and their VPC and Power VS connections.

use craig_spec::{Craig, TgwConnection, TransitGateway};

use super::{tags, timeouts, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{power_workspace_ref, resource_or_data, rg_id_ref, tf_ref, vpc_ref, Scope};
use crate::section::{Formatted, Section};

pub fn format_transit_gateway(tgw: &TransitGateway, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if tgw.use_data {
        Attrs::new().set("name", tgw.name.as_str())
    } else {
        Attrs::new()
            .set("name", resource_name(craig, &[&tgw.name]))
            .set("location", craig.options.region.as_str())
            .set("global", tgw.global)
            .set(
                "resource_group",
                rg_id_ref(craig, tgw.resource_group.as_deref(), "format_transit_gateway", Scope::Root)?,
            )
            .set("tags", tags(craig))
            .set("timeouts", timeouts("30m", "", "30m"))
    };
    Ok(attrs.named(&tgw.name))
}

pub fn format_tgw_connection(
    tgw: &TransitGateway,
    connection: &TgwConnection,
    craig: &Craig,
) -> CraigResult<Formatted> {
    let from = "format_tgw_connection";
    let (target, network_type, network_id) = match (connection.vpc.as_deref(), connection.power.as_deref()) {
        (Some(vpc), None) => (vpc, "vpc", vpc_ref(craig, vpc, Some("crn"), from, Scope::Root)?),
        (None, Some(power)) => (
            power,
            "power_virtual_server",
            power_workspace_ref(craig, power, Some("resource_crn"), from)?,
        ),
        _ => {
            return Err(CraigError::invalid(
                from,
                "connections",
                format!("transit gateway `{}` connections need exactly one of vpc or power", tgw.name),
            ))
        }
    };

    Ok(Attrs::new()
        .set("gateway", tf_ref("ibm_tg_gateway", &tgw.name, None, tgw.use_data))
        .set("network_type", network_type)
        .set("name", resource_name(craig, &[tgw.name.as_str(), target, "hub-connection"]))
        .set("network_id", network_id)
        .set("timeouts", timeouts("30m", "", "30m"))
        .named(&format!("{} connection {}", tgw.name, target)))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for tgw in &craig.transit_gateways {
        let mut section = Section::new(format!("{} transit gateway", tgw.name));
        section.push(
            resource_or_data(tgw.use_data),
            "ibm_tg_gateway",
            format_transit_gateway(tgw, craig)?,
        );
        for connection in &tgw.connections {
            section.resource("ibm_tg_connection", format_tgw_connection(tgw, connection, craig)?);
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
            "resource_groups": [{ "name": "slz-service-rg" }],
            "vpcs": [{ "name": "management" }],
            "power": [{ "name": "oracle", "zone": "dal10" }],
            "transit_gateways": [{
                "name": "transit-gateway",
                "resource_group": "slz-service-rg",
                "connections": [
                    { "tgw": "transit-gateway", "vpc": "management" },
                    { "tgw": "transit-gateway", "power": "oracle" }
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_transit_gateway() {
        let craig = craig();
        let tgw = format_transit_gateway(&craig.transit_gateways[0], &craig).unwrap();
        assert_eq!(tgw.name, "transit_gateway");
        assert_eq!(tgw.data["location"], "us-south");
        assert_eq!(tgw.data["timeouts"], json!({ "create": "30m", "delete": "30m" }));
    }

    #[test]
    fn test_vpc_and_power_connections() {
        let craig = craig();
        let tgw = &craig.transit_gateways[0];
        let vpc = format_tgw_connection(tgw, &tgw.connections[0], &craig).unwrap();
        assert_eq!(vpc.name, "transit_gateway_connection_management");
        assert_eq!(vpc.data["network_id"], "${module.management_vpc.crn}");
        assert_eq!(vpc.data["name"], "slz-transit-gateway-management-hub-connection");

        let power = format_tgw_connection(tgw, &tgw.connections[1], &craig).unwrap();
        assert_eq!(power.data["network_type"], "power_virtual_server");
        assert_eq!(
            power.data["network_id"],
            "${ibm_resource_instance.power_vs_workspace_oracle.resource_crn}"
        );
    }

    #[test]
    fn test_connection_without_target_is_invalid() {
        let craig = craig();
        let tgw = &craig.transit_gateways[0];
        let empty = TgwConnection::default();
        assert!(matches!(
            format_tgw_connection(tgw, &empty, &craig),
            Err(CraigError::InvalidField { .. })
        ));
    }
}
