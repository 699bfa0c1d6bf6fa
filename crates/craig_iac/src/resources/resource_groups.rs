//! Resource groups.

use craig_spec::{Craig, ResourceGroup};

use super::{tags, Attrs};
use crate::error::CraigResult;
use crate::naming::prefixed_name;
use crate::refs::resource_or_data;
use crate::section::{Formatted, Section};

/// Format a resource group; data sources are looked up by their literal name.
pub fn format_resource_group(rg: &ResourceGroup, craig: &Craig) -> Formatted {
    let attrs = if rg.use_data {
        Attrs::new().set("name", rg.name.as_str())
    } else {
        Attrs::new()
            .set("name", prefixed_name(craig, rg.use_prefix, &rg.name))
            .set("tags", tags(craig))
    };
    attrs.named(&rg.name)
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("resource groups");
    for rg in &craig.resource_groups {
        section.push(
            resource_or_data(rg.use_data),
            "ibm_resource_group",
            format_resource_group(rg, craig),
        );
    }
    Ok(vec![section])
}
