//! Security groups and their rules, emitted inside the owning VPC module.

use craig_spec::{Craig, SecurityGroup, SgRule, Vpc};

use super::vpc::protocol_blocks;
use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{resource_or_data, rg_id_ref, sg_address, sg_ref, vpc_ref, Scope};
use crate::section::{Formatted, Section};

fn owning_vpc<'a>(sg: &'a SecurityGroup, from: &str) -> CraigResult<&'a str> {
    sg.vpc
        .as_deref()
        .ok_or_else(|| CraigError::invalid(from, "vpc", format!("security group `{}` has no vpc", sg.name)))
}

pub fn format_security_group(sg: &SecurityGroup, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_security_group";
    let vpc_name = owning_vpc(sg, from)?;
    let vpc = craig
        .vpc(vpc_name)
        .ok_or_else(|| CraigError::missing("vpc", vpc_name, from))?;

    let attrs = if sg.use_data {
        Attrs::new().set("name", sg.name.as_str())
    } else {
        let rg = sg.resource_group.as_deref().or(vpc.resource_group.as_deref());
        Attrs::new()
            .set("name", resource_name(craig, &[sg.name.as_str(), "sg"]))
            .set("vpc", vpc_ref(craig, vpc_name, None, from, Scope::VpcModule)?)
            .set("resource_group", rg_id_ref(craig, rg, from, Scope::VpcModule)?)
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&sg_address(vpc_name, &sg.name)))
}

pub fn format_security_group_rule(sg: &SecurityGroup, rule: &SgRule, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_security_group_rule";
    let vpc_name = owning_vpc(sg, from)?;
    let attrs = Attrs::new()
        .set("group", sg_ref(craig, vpc_name, &sg.name, from, Scope::VpcModule)?)
        .set("remote", rule.source.as_str())
        .set("direction", rule.direction.as_str());
    Ok(protocol_blocks(attrs, &rule.icmp, &rule.tcp, &rule.udp, false)
        .named(&format!("{} rule {}", sg_address(vpc_name, &sg.name), rule.name)))
}

/// Security groups of one VPC, each followed by its rules.
pub fn sections(vpc: &Vpc, craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new(format!("{} security groups", vpc.name));
    for sg in craig.security_groups_for_vpc(&vpc.name) {
        section.push(
            resource_or_data(sg.use_data),
            "ibm_is_security_group",
            format_security_group(sg, craig)?,
        );
        for rule in &sg.rules {
            section.resource("ibm_is_security_group_rule", format_security_group_rule(sg, rule, craig)?);
        }
    }
    Ok(if section.is_empty() { Vec::new() } else { vec![section] })
}
