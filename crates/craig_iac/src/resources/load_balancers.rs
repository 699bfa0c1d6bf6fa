//! VPC load balancers: the balancer, its pool, pool members and listener.

use craig_spec::{Craig, LoadBalancer};

use super::vsi::{instance_addresses, security_group_refs};
use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::{resource_name, snake_case};
use crate::refs::{block_ref, cdktf_ref, rg_id_ref, subnet_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

fn lb_address(lb: &str) -> String {
    format!("{} load balancer", lb)
}

fn pool_address(lb: &str) -> String {
    format!("{} load balancer pool", lb)
}

fn member_address(lb: &str, instance: &str) -> String {
    format!("{} {} lb member", lb, instance)
}

pub fn format_lb(lb: &LoadBalancer, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_lb";
    let subnets = lb
        .subnets
        .iter()
        .map(|subnet| subnet_ref(craig, &lb.vpc, subnet, None, from, Scope::Root))
        .collect::<CraigResult<Vec<_>>>()?;

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[lb.name.as_str(), "lb"]))
        .set("type", lb.lb_type.as_str())
        .set("subnets", subnets)
        .set("resource_group", rg_id_ref(craig, lb.resource_group.as_deref(), from, Scope::Root)?)
        .set("security_groups", security_group_refs(&lb.security_groups, &lb.vpc, craig, from)?)
        .set("tags", tags(craig))
        .named(&lb_address(&lb.name)))
}

pub fn format_lb_pool(lb: &LoadBalancer, craig: &Craig) -> Formatted {
    Attrs::new()
        .set("lb", tf_ref("ibm_is_lb", &lb_address(&lb.name), None, false))
        .set("name", resource_name(craig, &[lb.name.as_str(), "lb-pool"]))
        .set("algorithm", lb.algorithm.as_str())
        .set("protocol", lb.protocol.as_str())
        .set("health_delay", lb.health_delay)
        .set("health_retries", lb.health_retries)
        .set("health_timeout", lb.health_timeout)
        .set("health_type", lb.health_type.as_str())
        .maybe("proxy_protocol", lb.proxy_protocol.clone())
        .maybe("session_persistence_type", lb.session_persistence_type.clone())
        .maybe(
            "session_persistence_app_cookie_name",
            lb.session_persistence_app_cookie_name.clone(),
        )
        .named(&pool_address(&lb.name))
}

/// Pool members for every instance of every target deployment.
pub fn format_lb_pool_members(lb: &LoadBalancer, craig: &Craig) -> CraigResult<Vec<Formatted>> {
    let from = "format_lb_pool_members";
    let pool = cdktf_ref(&format!(
        "element(split(\"/\", ibm_is_lb_pool.{}.id), 1)",
        snake_case(&pool_address(&lb.name))
    ));

    let mut members = Vec::new();
    for target in &lb.target_vsi {
        let vsi = craig
            .vsi_deployment(target)
            .ok_or_else(|| CraigError::missing("vsi deployment", target.as_str(), from))?;
        for instance in instance_addresses(vsi, craig)? {
            members.push(
                Attrs::new()
                    .set("port", lb.port)
                    .set("lb", tf_ref("ibm_is_lb", &lb_address(&lb.name), None, false))
                    .set("pool", pool.as_str())
                    .set(
                        "target_address",
                        tf_ref(
                            "ibm_is_instance",
                            &instance,
                            Some("primary_network_interface.0.primary_ip.0.address"),
                            false,
                        ),
                    )
                    .named(&member_address(&lb.name, &instance)),
            );
        }
    }
    Ok(members)
}

pub fn format_lb_listener(lb: &LoadBalancer, members: &[Formatted]) -> Formatted {
    let depends_on: Vec<String> = members
        .iter()
        .map(|member| block_ref("ibm_is_lb_pool_member", &member.name))
        .collect();
    Attrs::new()
        .set("lb", tf_ref("ibm_is_lb", &lb_address(&lb.name), None, false))
        .set("default_pool", tf_ref("ibm_is_lb_pool", &pool_address(&lb.name), None, false))
        .set("port", lb.listener_port)
        .set("protocol", lb.listener_protocol.as_str())
        .maybe("connection_limit", lb.connection_limit)
        .set_if(!depends_on.is_empty(), "depends_on", depends_on)
        .named(&format!("{} listener", lb.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for lb in &craig.load_balancers {
        let mut section = Section::new(format!("{} load balancer", lb.name));
        section.resource("ibm_is_lb", format_lb(lb, craig)?);
        section.resource("ibm_is_lb_pool", format_lb_pool(lb, craig));
        let members = format_lb_pool_members(lb, craig)?;
        let listener = format_lb_listener(lb, &members);
        for member in members {
            section.resource("ibm_is_lb_pool_member", member);
        }
        section.resource("ibm_is_lb_listener", listener);
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
            "resource_groups": [{ "name": "slz-workload-rg" }],
            "vpcs": [{
                "name": "workload",
                "subnets": [{ "name": "vsi-zone-1", "cidr": "10.40.10.0/24" }, { "name": "vsi-zone-2", "cidr": "10.50.20.0/24" }]
            }],
            "security_groups": [{ "name": "workload-lb", "vpc": "workload" }],
            "vsi": [{ "name": "app", "vpc": "workload", "subnets": ["vsi-zone-1", "vsi-zone-2"], "image_name": "ibm-centos" }],
            "load_balancers": [{
                "name": "lb-1",
                "vpc": "workload",
                "subnets": ["vsi-zone-1", "vsi-zone-2"],
                "security_groups": ["workload-lb"],
                "resource_group": "slz-workload-rg",
                "target_vsi": ["app"],
                "connection_limit": 2
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_load_balancer() {
        let craig = craig();
        let lb = format_lb(&craig.load_balancers[0], &craig).unwrap();
        assert_eq!(lb.name, "lb_1_load_balancer");
        assert_eq!(lb.data["name"], "slz-lb-1-lb");
        assert_eq!(
            lb.data["subnets"],
            json!([
                "${module.workload_vpc.subnet_vsi_zone_1_id}",
                "${module.workload_vpc.subnet_vsi_zone_2_id}"
            ])
        );
    }

    #[test]
    fn test_members_follow_vsi_expansion() {
        let craig = craig();
        let members = format_lb_pool_members(&craig.load_balancers[0], &craig).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "lb_1_workload_vpc_app_vsi_zone_1_1_lb_member");
        assert_eq!(
            members[0].data["pool"],
            "${element(split(\"/\", ibm_is_lb_pool.lb_1_load_balancer_pool.id), 1)}"
        );
        assert_eq!(
            members[1].data["target_address"],
            "${ibm_is_instance.workload_vpc_app_vsi_zone_2_1.primary_network_interface.0.primary_ip.0.address}"
        );
    }

    #[test]
    fn test_listener_depends_on_members() {
        let craig = craig();
        let lb = &craig.load_balancers[0];
        let members = format_lb_pool_members(lb, &craig).unwrap();
        let listener = format_lb_listener(lb, &members);
        assert_eq!(listener.data["default_pool"], "${ibm_is_lb_pool.lb_1_load_balancer_pool.id}");
        assert_eq!(listener.data["connection_limit"], 2);
        assert_eq!(listener.data["depends_on"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_target_vsi_is_fatal() {
        let mut craig = craig();
        craig.load_balancers[0].target_vsi = vec!["missing".to_string()];
        let err = format_lb_pool_members(&craig.load_balancers[0], &craig).unwrap_err();
        assert!(matches!(err, CraigError::MissingReference { kind: "vsi deployment", .. }));
    }
}
