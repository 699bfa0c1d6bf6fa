//! Managed OpenShift and IKS clusters with their worker pools.

use serde_json::Value;

use craig_spec::{Cluster, Craig, WorkerPool};

use super::{subnet_zone, tags, timeouts, zone_name, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{cos_ref, encryption_key_ref, kms_ref, rg_id_ref, subnet_ref, tf_ref, vpc_ref, Scope};
use crate::section::{Formatted, Section};

fn cluster_address(cluster: &Cluster) -> String {
    format!("{} vpc {} cluster", cluster.vpc, cluster.name)
}

/// `zones` blocks, one per subnet.
fn cluster_zones(cluster: &Cluster, subnets: &[String], craig: &Craig, from: &str) -> CraigResult<Vec<Value>> {
    let mut zones = Vec::with_capacity(subnets.len());
    for subnet in subnets {
        zones.push(Value::from(
            Attrs::new()
                .set("name", zone_name(craig, subnet_zone(subnet, from)?))
                .set("subnet_id", subnet_ref(craig, &cluster.vpc, subnet, None, from, Scope::Root)?),
        ));
    }
    Ok(zones)
}

fn kms_config(cluster: &Cluster, craig: &Craig, from: &str) -> CraigResult<Option<Attrs>> {
    match (cluster.kms.as_deref(), cluster.encryption_key.as_deref()) {
        (Some(kms), Some(key)) => Ok(Some(
            Attrs::new()
                .set("crk_id", encryption_key_ref(craig, kms, key, Some("key_id"), from)?)
                .set("instance_id", kms_ref(craig, kms, Some("guid"), from)?)
                .set("private_endpoint", true),
        )),
        (None, Some(_)) => Err(CraigError::invalid(from, "kms", "is required with encryption_key")),
        _ => Ok(None),
    }
}

pub fn format_cluster(cluster: &Cluster, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_cluster";
    let cos_instance_crn = match (cluster.kube_type.as_str(), cluster.cos.as_deref()) {
        (_, Some(cos)) => Some(cos_ref(craig, cos, Some("crn"), from)?),
        ("openshift", None) => {
            return Err(CraigError::invalid(from, "cos", "openshift clusters need an object storage instance"))
        }
        _ => None,
    };

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[&cluster.name]))
        .set("vpc_id", vpc_ref(craig, &cluster.vpc, None, from, Scope::Root)?)
        .set(
            "resource_group_id",
            rg_id_ref(craig, cluster.resource_group.as_deref(), from, Scope::Root)?,
        )
        .set("flavor", cluster.flavor.as_str())
        .set("worker_count", cluster.workers_per_subnet)
        .set_if(cluster.kube_version != "default", "kube_version", cluster.kube_version.as_str())
        .maybe("entitlement", cluster.entitlement.clone())
        .maybe("cos_instance_crn", cos_instance_crn)
        .set("update_all_workers", cluster.update_all_workers)
        .set("wait_till", "IngressReady")
        .set("disable_public_service_endpoint", cluster.private_endpoint)
        .set("tags", tags(craig))
        .set("zones", cluster_zones(cluster, &cluster.subnets, craig, from)?)
        .maybe("kms_config", kms_config(cluster, craig, from)?)
        .set("timeouts", timeouts("3h", "3h", "2h"))
        .named(&cluster_address(cluster)))
}

pub fn format_worker_pool(cluster: &Cluster, pool: &WorkerPool, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_worker_pool";
    Ok(Attrs::new()
        .set("cluster", tf_ref("ibm_container_vpc_cluster", &cluster_address(cluster), None, false))
        .set(
            "resource_group_id",
            rg_id_ref(craig, cluster.resource_group.as_deref(), from, Scope::Root)?,
        )
        .maybe("entitlement", pool.entitlement.clone())
        .set("flavor", pool.flavor.as_str())
        .set("vpc_id", vpc_ref(craig, &cluster.vpc, None, from, Scope::Root)?)
        .set("worker_count", pool.workers_per_subnet)
        .set("worker_pool_name", resource_name(craig, &[cluster.name.as_str(), &pool.name]))
        .set("zones", cluster_zones(cluster, &pool.subnets, craig, from)?)
        .named(&format!("{} {} pool", cluster_address(cluster), pool.name)))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for cluster in &craig.clusters {
        let mut section = Section::new(format!("{} vpc {} cluster", cluster.vpc, cluster.name));
        section.resource("ibm_container_vpc_cluster", format_cluster(cluster, craig)?);
        for pool in &cluster.worker_pools {
            section.resource("ibm_container_vpc_worker_pool", format_worker_pool(cluster, pool, craig)?);
        }
        sections.push(section);
    }
    Ok(sections)
}
