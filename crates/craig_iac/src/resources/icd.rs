//! Cloud Databases deployments.

use craig_spec::{Craig, Icd};

use super::{tags, timeouts, Attrs};
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::refs::{optional_encryption_key_ref, resource_or_data, rg_id_ref, Scope};
use crate::section::{Formatted, Section};

pub fn format_icd(icd: &Icd, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_icd";
    let attrs = if icd.use_data {
        Attrs::new().set("name", icd.name.as_str())
    } else {
        let encryption = optional_encryption_key_ref(
            craig,
            icd.kms.as_deref(),
            icd.encryption_key.as_deref(),
            from,
        )?;
        let has_allocation = icd.memory.is_some() || icd.disk.is_some() || icd.cpu.is_some();
        let group = Attrs::new()
            .set("group_id", icd.group_id.as_str())
            .maybe("memory", icd.memory.map(|mb| Attrs::new().set("allocation_mb", mb)))
            .maybe("disk", icd.disk.map(|mb| Attrs::new().set("allocation_mb", mb)))
            .maybe("cpu", icd.cpu.map(|count| Attrs::new().set("allocation_count", count)));

        Attrs::new()
            .set("name", resource_name(craig, &[&icd.name]))
            .set("service", icd.service.as_str())
            .set("plan", icd.plan.as_str())
            .set("location", craig.options.region.as_str())
            .set("resource_group_id", rg_id_ref(craig, icd.resource_group.as_deref(), from, Scope::Root)?)
            .set("service_endpoints", craig.options.endpoints.as_str())
            .maybe("key_protect_key", encryption)
            .set_if(has_allocation, "group", group)
            .set("tags", tags(craig))
            .set("timeouts", timeouts("120m", "120m", "15m"))
    };
    Ok(attrs.named(&icd.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("cloud databases");
    for icd in &craig.icd {
        section.push(resource_or_data(icd.use_data), "ibm_database", format_icd(icd, craig)?);
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south", "endpoints": "private" },
            "resource_groups": [{ "name": "slz-service-rg" }],
            "key_management": [{ "name": "slz-kms", "keys": [{ "name": "slz-icd-key" }] }],
            "icd": [{
                "name": "postgres",
                "resource_group": "slz-service-rg",
                "kms": "slz-kms",
                "encryption_key": "slz-icd-key",
                "memory": 4096,
                "cpu": 3
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_database_with_allocations() {
        let craig = craig();
        let icd = format_icd(&craig.icd[0], &craig).unwrap();
        assert_eq!(icd.name, "postgres");
        assert_eq!(icd.data["service"], "databases-for-postgresql");
        assert_eq!(icd.data["key_protect_key"], "${ibm_kms_key.slz_kms_slz_icd_key_key.crn}");
        assert_eq!(
            icd.data["group"],
            json!({
                "group_id": "member",
                "memory": { "allocation_mb": 4096 },
                "cpu": { "allocation_count": 3 }
            })
        );
    }

    #[test]
    fn test_database_without_allocations_has_no_group() {
        let mut craig = craig();
        craig.icd[0].memory = None;
        craig.icd[0].cpu = None;
        let icd = format_icd(&craig.icd[0], &craig).unwrap();
        assert!(icd.data.get("group").is_none());
    }
}
