//! The ordered registry of root resource families.
//!
//! Both renderers walk `ROOT_STEPS` in order, so resource order inside each
//! block type is the same in HCL and CDKTF output.

use craig_spec::Craig;

use crate::error::CraigResult;
use crate::resources::{
    access_groups, appid, atracker, cbr, clusters, event_streams, f5, flow_logs, iam, icd, key_management,
    load_balancers, object_storage, power_vs, resource_groups, scc, secrets_manager, ssh_keys, teleport,
    transit_gateways, vpe, vpn_gateways, vpn_servers, vsi,
};
use crate::section::Section;

/// Builds every section of one family from the whole configuration.
pub type SectionBuilder = fn(&Craig) -> CraigResult<Vec<Section>>;

/// A root family: its HCL file stem and its section builder.
#[derive(Clone, Copy)]
pub struct Family {
    pub name: &'static str,
    pub sections: SectionBuilder,
}

impl Family {
    const fn new(name: &'static str, sections: SectionBuilder) -> Self {
        Self { name, sections }
    }

    /// File holding the family's HCL, e.g. `object_storage.tf`.
    pub fn file_name(&self) -> String {
        format!("{}.tf", self.name)
    }

    /// Non-empty sections of the family.
    pub fn build(&self, craig: &Craig) -> CraigResult<Vec<Section>> {
        Ok((self.sections)(craig)?
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect())
    }
}

impl std::fmt::Debug for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Family").field("name", &self.name).finish()
    }
}

/// One step of root assembly.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Family(Family),
    /// A `module` block per VPC.
    VpcModules,
}

pub const ROOT_STEPS: &[Step] = &[
    Step::Family(Family::new("atracker", atracker::sections)),
    Step::Family(Family::new("clusters", clusters::sections)),
    Step::Family(Family::new("flow_logs", flow_logs::sections)),
    Step::VpcModules,
    Step::Family(Family::new("resource_groups", resource_groups::sections)),
    Step::Family(Family::new("object_storage", object_storage::sections)),
    Step::Family(Family::new("key_management", key_management::sections)),
    Step::Family(Family::new("ssh_keys", ssh_keys::sections)),
    Step::Family(Family::new("transit_gateways", transit_gateways::sections)),
    Step::Family(Family::new("virtual_private_endpoints", vpe::sections)),
    Step::Family(Family::new("virtual_servers", vsi::sections)),
    Step::Family(Family::new("vpn_servers", vpn_servers::sections)),
    Step::Family(Family::new("vpn_gateways", vpn_gateways::sections)),
    Step::Family(Family::new("f5_big_ip", f5::sections)),
    Step::Family(Family::new("event_streams", event_streams::sections)),
    Step::Family(Family::new("appid", appid::sections)),
    Step::Family(Family::new("secrets_manager", secrets_manager::sections)),
    Step::Family(Family::new("scc", scc::sections)),
    Step::Family(Family::new("load_balancers", load_balancers::sections)),
    Step::Family(Family::new("iam_account_settings", iam::sections)),
    Step::Family(Family::new("access_groups", access_groups::sections)),
    Step::Family(Family::new("cbr", cbr::sections)),
    Step::Family(Family::new("teleport_vsi", teleport::sections)),
    Step::Family(Family::new("cloud_databases", icd::sections)),
    Step::Family(Family::new("power_infrastructure", power_vs::infrastructure_sections)),
    Step::Family(Family::new("power_instances", power_vs::instance_sections)),
    Step::Family(Family::new("power_volumes", power_vs::volume_sections)),
];

/// Root families in assembly order.
pub fn families() -> impl Iterator<Item = &'static Family> {
    ROOT_STEPS.iter().filter_map(|step| match step {
        Step::Family(family) => Some(family),
        Step::VpcModules => None,
    })
}

/// Look a family up by its file stem.
pub fn family(name: &str) -> Option<&'static Family> {
    families().find(|family| family.name == name)
}
