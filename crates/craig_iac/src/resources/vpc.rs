//! VPC module contents: the VPC, address prefixes, public gateways, network
//! ACLs and subnets, plus the module's variables, outputs and inputs.

use serde_json::{Map, Value};

use craig_spec::{Acl, AclRule, AddressPrefix, Craig, Icmp, PortRange, Subnet, Vpc};

use super::{subnet_zone, tags, zone_name, Attrs};
use crate::error::{required, CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{
    block_ref, resource_or_data, rg_id_ref, rg_variable, sg_output, sg_ref, subnet_address,
    subnet_output, subnet_ref, tf_ref, vpc_address, vpc_ref, Scope,
};
use crate::section::{Formatted, Section};

fn acl_address(vpc: &str, acl: &str) -> String {
    format!("{} {} acl", vpc, acl)
}

fn gateway_address(vpc: &str, zone: u32) -> String {
    format!("{} gateway zone {}", vpc, zone)
}

fn prefix_address(vpc: &str, prefix: &str) -> String {
    format!("{} {} prefix", vpc, prefix)
}

/// Append the protocol block (`icmp`, `tcp` or `udp`) of a rule.
///
/// Security group rules only carry destination ports, so source ports are
/// dropped unless `source_ports` is set.
pub(crate) fn protocol_blocks(
    mut attrs: Attrs,
    icmp: &Option<Icmp>,
    tcp: &Option<PortRange>,
    udp: &Option<PortRange>,
    source_ports: bool,
) -> Attrs {
    if let Some(icmp) = icmp.as_ref().filter(|icmp| icmp.is_set()) {
        attrs = attrs.set(
            "icmp",
            Attrs::new()
                .maybe("type", icmp.icmp_type)
                .maybe("code", icmp.code),
        );
    }
    for (protocol, ports) in [("tcp", tcp), ("udp", udp)] {
        if let Some(ports) = ports.as_ref().filter(|ports| ports.is_set()) {
            let mut block = Attrs::new()
                .maybe("port_min", ports.port_min)
                .maybe("port_max", ports.port_max);
            if source_ports {
                block = block
                    .maybe("source_port_min", ports.source_port_min)
                    .maybe("source_port_max", ports.source_port_max);
            }
            attrs = attrs.set(protocol, block);
        }
    }
    attrs
}

pub fn format_vpc(vpc: &Vpc, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if vpc.use_data {
        Attrs::new().set("name", vpc.name.as_str())
    } else {
        Attrs::new()
            .set("name", resource_name(craig, &[vpc.name.as_str(), "vpc"]))
            .set(
                "resource_group",
                rg_id_ref(craig, vpc.resource_group.as_deref(), "format_vpc", Scope::VpcModule)?,
            )
            .set("classic_access", vpc.classic_access)
            .set(
                "address_prefix_management",
                if vpc.manual_address_prefix_management { "manual" } else { "auto" },
            )
            .maybe("default_network_acl_name", vpc.default_network_acl_name.clone())
            .maybe("default_security_group_name", vpc.default_security_group_name.clone())
            .maybe("default_routing_table_name", vpc.default_routing_table_name.clone())
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&vpc_address(&vpc.name)))
}

pub fn format_address_prefix(vpc: &Vpc, prefix: &AddressPrefix, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set("name", resource_name(craig, &[vpc.name.as_str(), &prefix.name]))
        .set("vpc", vpc_ref(craig, &vpc.name, None, "format_address_prefix", Scope::VpcModule)?)
        .set("zone", zone_name(craig, prefix.zone.into()))
        .set("cidr", prefix.cidr.as_str())
        .named(&prefix_address(&vpc.name, &prefix.name)))
}

pub fn format_public_gateway(vpc: &Vpc, zone: u32, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_public_gateway";
    Ok(Attrs::new()
        .set(
            "name",
            resource_name(craig, &[vpc.name.as_str(), "public-gateway-zone", &zone.to_string()]),
        )
        .set("vpc", vpc_ref(craig, &vpc.name, None, from, Scope::VpcModule)?)
        .set(
            "resource_group",
            rg_id_ref(craig, vpc.resource_group.as_deref(), from, Scope::VpcModule)?,
        )
        .set("zone", zone_name(craig, zone))
        .set("tags", tags(craig))
        .named(&gateway_address(&vpc.name, zone)))
}

fn subnet_zone_number(subnet: &Subnet, from: &str) -> CraigResult<u32> {
    if subnet.zone > 0 {
        Ok(subnet.zone.into())
    } else {
        subnet_zone(&subnet.name, from)
    }
}

pub fn format_subnet(vpc: &Vpc, subnet: &Subnet, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_subnet";
    let address = subnet_address(&vpc.name, &subnet.name);
    if subnet.use_data {
        return Ok(Attrs::new().set("name", subnet.name.as_str()).named(&address));
    }

    let zone = subnet_zone_number(subnet, from)?;
    let network_acl = match subnet.network_acl.as_deref() {
        Some(acl) => {
            vpc.acl(acl)
                .ok_or_else(|| CraigError::missing("network acl", format!("{}/{}", vpc.name, acl), from))?;
            Some(tf_ref("ibm_is_network_acl", &acl_address(&vpc.name, acl), None, false))
        }
        None => None,
    };
    let public_gateway = if subnet.public_gateway {
        if !vpc.public_gateways.iter().any(|z| u32::from(*z) == zone) {
            return Err(CraigError::invalid(
                from,
                "public_gateway",
                format!("vpc `{}` has no public gateway in zone {}", vpc.name, zone),
            ));
        }
        Some(tf_ref("ibm_is_public_gateway", &gateway_address(&vpc.name, zone), None, false))
    } else {
        None
    };
    let prefixes: Vec<String> = vpc
        .address_prefixes
        .iter()
        .filter(|prefix| u32::from(prefix.zone) == zone)
        .map(|prefix| block_ref("ibm_is_vpc_address_prefix", &prefix_address(&vpc.name, &prefix.name)))
        .collect();

    Ok(Attrs::new()
        .set("vpc", vpc_ref(craig, &vpc.name, None, from, Scope::VpcModule)?)
        .set("name", resource_name(craig, &[vpc.name.as_str(), &subnet.name]))
        .set("zone", zone_name(craig, zone))
        .set(
            "resource_group",
            rg_id_ref(craig, vpc.resource_group.as_deref(), from, Scope::VpcModule)?,
        )
        .set("tags", tags(craig))
        .set("ipv4_cidr_block", required(&subnet.cidr, from, "cidr")?)
        .maybe("network_acl", network_acl)
        .maybe("public_gateway", public_gateway)
        .set_if(
            vpc.manual_address_prefix_management && !prefixes.is_empty(),
            "depends_on",
            prefixes,
        )
        .named(&address))
}

/// Rules managed clusters need to reach IBM Cloud private services.
pub fn cluster_rules() -> Vec<AclRule> {
    let rule = |name: &str, direction: &str, source: &str, destination: &str| AclRule {
        name: name.to_string(),
        action: "allow".to_string(),
        direction: direction.to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
        icmp: None,
        tcp: None,
        udp: None,
    };
    let ports = |port_min: u32, port_max: u32| PortRange {
        port_min: Some(port_min),
        port_max: Some(port_max),
        source_port_min: None,
        source_port_max: None,
    };
    let source_ports = |port_min: u32, port_max: u32| PortRange {
        port_min: None,
        port_max: None,
        source_port_min: Some(port_min),
        source_port_max: Some(port_max),
    };

    vec![
        rule("roks-create-worker-nodes-inbound", "inbound", "161.26.0.0/16", "10.0.0.0/8"),
        rule("roks-create-worker-nodes-outbound", "outbound", "10.0.0.0/8", "161.26.0.0/16"),
        rule("roks-nodes-to-service-inbound", "inbound", "166.8.0.0/14", "10.0.0.0/8"),
        rule("roks-nodes-to-service-outbound", "outbound", "10.0.0.0/8", "166.8.0.0/14"),
        AclRule {
            tcp: Some(source_ports(30000, 32767)),
            ..rule("allow-app-incoming-traffic-requests", "inbound", "10.0.0.0/8", "10.0.0.0/8")
        },
        AclRule {
            tcp: Some(ports(30000, 32767)),
            ..rule("allow-app-outgoing-traffic-requests", "outbound", "10.0.0.0/8", "10.0.0.0/8")
        },
        AclRule {
            tcp: Some(ports(443, 443)),
            ..rule("allow-lb-incoming-traffic-requests", "inbound", "10.0.0.0/8", "10.0.0.0/8")
        },
        AclRule {
            tcp: Some(source_ports(443, 443)),
            ..rule("allow-lb-outgoing-traffic-requests", "outbound", "10.0.0.0/8", "10.0.0.0/8")
        },
    ]
}

/// An inline `rules` entry of a network ACL.
pub fn format_acl_rule(rule: &AclRule) -> Attrs {
    let attrs = Attrs::new()
        .set("source", rule.source.as_str())
        .set("action", rule.action.as_str())
        .set("destination", rule.destination.as_str())
        .set("direction", rule.direction.as_str())
        .set("name", rule.name.as_str());
    protocol_blocks(attrs, &rule.icmp, &rule.tcp, &rule.udp, true)
}

pub fn format_acl(vpc: &Vpc, acl: &Acl, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_acl";
    let rg = acl.resource_group.as_deref().or(vpc.resource_group.as_deref());

    let mut rules: Vec<Value> = acl.rules.iter().map(|rule| format_acl_rule(rule).into()).collect();
    if acl.add_cluster_rules {
        rules.extend(cluster_rules().iter().map(|rule| Value::from(format_acl_rule(rule))));
    }

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[vpc.name.as_str(), &acl.name]))
        .set("vpc", vpc_ref(craig, &vpc.name, None, from, Scope::VpcModule)?)
        .set("resource_group", rg_id_ref(craig, rg, from, Scope::VpcModule)?)
        .set("tags", tags(craig))
        .set("rules", rules)
        .named(&acl_address(&vpc.name, &acl.name)))
}

/// Resource groups referenced inside the module, in first-use order.
pub fn module_resource_groups<'a>(vpc: &'a Vpc, craig: &'a Craig) -> Vec<&'a str> {
    let mut groups: Vec<&str> = Vec::new();
    let vpc_rg = vpc.resource_group.as_deref();
    let candidates = vpc_rg
        .into_iter()
        .chain(vpc.acls.iter().filter_map(|acl| acl.resource_group.as_deref().or(vpc_rg)))
        .chain(
            craig
                .security_groups_for_vpc(&vpc.name)
                .filter_map(|sg| sg.resource_group.as_deref().or(vpc_rg)),
        );
    for rg in candidates {
        if !groups.contains(&rg) {
            groups.push(rg);
        }
    }
    groups
}

/// Module `variable` entries, one per referenced resource group.
pub fn module_variables(vpc: &Vpc, craig: &Craig) -> Map<String, Value> {
    module_resource_groups(vpc, craig)
        .into_iter()
        .map(|rg| {
            (
                rg_variable(rg),
                Attrs::new()
                    .set("description", format!("ID for the resource group {}", rg))
                    .set("type", "string")
                    .into(),
            )
        })
        .collect()
}

/// Arguments passed to the module block from the root.
pub fn module_inputs(vpc: &Vpc, craig: &Craig) -> CraigResult<Map<String, Value>> {
    let mut inputs = Map::new();
    for rg in module_resource_groups(vpc, craig) {
        inputs.insert(
            rg_variable(rg),
            Value::from(rg_id_ref(craig, Some(rg), "module_inputs", Scope::Root)?),
        );
    }
    Ok(inputs)
}

/// Module `output` entries read by root references.
pub fn module_outputs(vpc: &Vpc, craig: &Craig) -> CraigResult<Map<String, Value>> {
    let from = "module_outputs";
    let output = |value: String| -> Value { Attrs::new().set("value", value).into() };

    let mut outputs = Map::new();
    for attribute in ["id", "crn", "name"] {
        outputs.insert(
            attribute.to_string(),
            output(vpc_ref(craig, &vpc.name, Some(attribute), from, Scope::VpcModule)?),
        );
    }
    for subnet in &vpc.subnets {
        for attribute in ["id", "crn"] {
            outputs.insert(
                subnet_output(&subnet.name, attribute),
                output(subnet_ref(craig, &vpc.name, &subnet.name, Some(attribute), from, Scope::VpcModule)?),
            );
        }
    }
    for sg in craig.security_groups_for_vpc(&vpc.name) {
        outputs.insert(
            sg_output(&sg.name),
            output(sg_ref(craig, &vpc.name, &sg.name, from, Scope::VpcModule)?),
        );
    }
    Ok(outputs)
}

/// Sections of the module's `main.tf`.
pub fn sections(vpc: &Vpc, craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut network = Section::new(format!("{} vpc", vpc.name));
    network.push(resource_or_data(vpc.use_data), "ibm_is_vpc", format_vpc(vpc, craig)?);
    for prefix in &vpc.address_prefixes {
        network.resource("ibm_is_vpc_address_prefix", format_address_prefix(vpc, prefix, craig)?);
    }
    for zone in &vpc.public_gateways {
        network.resource("ibm_is_public_gateway", format_public_gateway(vpc, (*zone).into(), craig)?);
    }

    let mut acls = Section::new(format!("{} network acls", vpc.name));
    for acl in &vpc.acls {
        acls.resource("ibm_is_network_acl", format_acl(vpc, acl, craig)?);
    }

    let mut subnets = Section::new(format!("{} subnets", vpc.name));
    for subnet in &vpc.subnets {
        subnets.push(resource_or_data(subnet.use_data), "ibm_is_subnet", format_subnet(vpc, subnet, craig)?);
    }

    Ok([network, acls, subnets]
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect())
}
