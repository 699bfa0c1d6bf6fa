//! VPC flow log collectors and the policies letting them write to object storage.

use craig_spec::{Craig, Vpc};

use super::iam::AuthPolicy;
use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{block_ref, bucket_ref, cos_ref, rg_id_ref, vpc_ref, Scope};
use crate::section::{Formatted, Section};

const POLICY_TYPE: &str = "ibm_iam_authorization_policy";

fn policy_address(cos: &str) -> String {
    format!("flow logs to {} object storage policy", cos)
}

/// VPCs that ship flow logs, paired with their object storage instance.
fn collecting_vpcs(craig: &Craig) -> impl Iterator<Item = (&Vpc, &str)> {
    craig
        .vpcs
        .iter()
        .filter(|vpc| vpc.bucket.is_some())
        .filter_map(|vpc| vpc.cos.as_deref().map(|cos| (vpc, cos)))
}

pub fn format_flow_logs_policy(cos: &str, craig: &Craig) -> CraigResult<Formatted> {
    Ok(AuthPolicy {
        address: policy_address(cos),
        description: "Allow flow logs write access cloud object storage instance",
        source_service_name: "is",
        source_resource_type: Some("flow-log-collector"),
        source_resource_instance_id: None,
        roles: &["Writer"],
        target_service_name: "cloud-object-storage",
        target_resource_instance_id: cos_ref(craig, cos, Some("guid"), "format_flow_logs_policy")?,
    }
    .format())
}

pub fn format_flow_logs(vpc: &Vpc, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_flow_logs";
    let cos = vpc
        .cos
        .as_deref()
        .ok_or_else(|| CraigError::invalid(from, "cos", format!("vpc `{}` has no object storage", vpc.name)))?;
    let bucket = vpc
        .bucket
        .as_deref()
        .ok_or_else(|| CraigError::invalid(from, "bucket", format!("vpc `{}` has no bucket", vpc.name)))?;

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[vpc.name.as_str(), "vpc-logs"]))
        .set("target", vpc_ref(craig, &vpc.name, None, from, Scope::Root)?)
        .set("active", true)
        .set("storage_bucket", bucket_ref(craig, cos, bucket, None, from)?)
        .set(
            "resource_group",
            rg_id_ref(craig, vpc.resource_group.as_deref(), from, Scope::Root)?,
        )
        .set("tags", tags(craig))
        .set("depends_on", vec![block_ref(POLICY_TYPE, &policy_address(cos))])
        .named(&format!("{} flow log collector", vpc.name)))
}

/// Policies first, one per distinct object storage instance, then collectors.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("flow logs");

    let mut instances: Vec<&str> = Vec::new();
    for (_, cos) in collecting_vpcs(craig) {
        if !instances.contains(&cos) {
            instances.push(cos);
            section.resource(POLICY_TYPE, format_flow_logs_policy(cos, craig)?);
        }
    }
    for (vpc, _) in collecting_vpcs(craig) {
        section.resource("ibm_is_flow_log", format_flow_logs(vpc, craig)?);
    }

    Ok(vec![section])
}
