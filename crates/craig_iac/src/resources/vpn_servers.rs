//! Client-to-site VPN servers and routes.

use craig_spec::{Craig, VpnServer, VpnServerRoute};

use super::vsi::security_group_refs;
use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{rg_id_ref, subnet_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

fn server_address(server: &str) -> String {
    format!("{} vpn server", server)
}

fn client_authentication(server: &VpnServer, from: &str) -> CraigResult<Attrs> {
    let attrs = Attrs::new().set("method", server.method.as_str());
    match server.method.as_str() {
        "certificate" => Ok(attrs.set(
            "client_ca_crn",
            server.client_ca_crn.clone().ok_or_else(|| {
                CraigError::invalid(from, "client_ca_crn", "is required for certificate authentication")
            })?,
        )),
        "username" => Ok(attrs.set("identity_provider", "iam")),
        other => Err(CraigError::invalid(
            from,
            "method",
            format!("unknown authentication method `{}`", other),
        )),
    }
}

pub fn format_vpn_server(server: &VpnServer, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_vpn_server";
    let subnets = server
        .subnets
        .iter()
        .map(|subnet| subnet_ref(craig, &server.vpc, subnet, None, from, Scope::Root))
        .collect::<CraigResult<Vec<_>>>()?;

    Ok(Attrs::new()
        .set("certificate_crn", server.certificate_crn.as_str())
        .set("client_authentication", client_authentication(server, from)?)
        .set("client_ip_pool", server.client_ip_pool.as_str())
        .set_if(
            !server.client_dns_server_ips.is_empty(),
            "client_dns_server_ips",
            server.client_dns_server_ips.clone(),
        )
        .maybe("client_idle_timeout", server.client_idle_timeout)
        .set("enable_split_tunneling", server.enable_split_tunneling)
        .set("name", resource_name(craig, &[server.name.as_str(), "server"]))
        .set("port", server.port)
        .set("protocol", server.protocol.as_str())
        .set(
            "resource_group",
            rg_id_ref(craig, server.resource_group.as_deref(), from, Scope::Root)?,
        )
        .set("subnets", subnets)
        .set("security_groups", security_group_refs(&server.security_groups, &server.vpc, craig, from)?)
        .set("tags", tags(craig))
        .named(&server_address(&server.name)))
}

pub fn format_vpn_server_route(server: &VpnServer, route: &VpnServerRoute, craig: &Craig) -> Formatted {
    Attrs::new()
        .set("name", resource_name(craig, &[server.name.as_str(), &route.name]))
        .set("vpn_server", tf_ref("ibm_is_vpn_server", &server_address(&server.name), None, false))
        .set("destination", route.destination.as_str())
        .set("action", route.action.as_str())
        .named(&format!("{} route {}", server_address(&server.name), route.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for server in &craig.vpn_servers {
        let mut section = Section::new(format!("{} vpn server", server.name));
        section.resource("ibm_is_vpn_server", format_vpn_server(server, craig)?);
        for route in &server.routes {
            section.resource("ibm_is_vpn_server_route", format_vpn_server_route(server, route, craig));
        }
        sections.push(section);
    }
    Ok(sections)
}
