//! Security and Compliance Center posture management.

use craig_spec::{Craig, Scc};

use super::Attrs;
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::refs::tf_ref;
use crate::section::{Formatted, Section};

pub fn format_scc_account_settings(scc: &Scc) -> Formatted {
    Attrs::new()
        .set("location", Attrs::new().set("location_id", scc.location.as_str()))
        .named("scc account settings")
}

pub fn format_scc_collector(scc: &Scc, craig: &Craig) -> Formatted {
    Attrs::new()
        .set("description", scc.collector_description.as_str())
        .set("is_public", scc.is_public)
        .set("managed_by", "ibm")
        .set("name", resource_name(craig, &[scc.name.as_str(), "collector"]))
        .named(&format!("{} collector", scc.name))
}

pub fn format_scc_scope(scc: &Scc, craig: &Craig) -> Formatted {
    let collector = tf_ref(
        "ibm_scc_posture_collector",
        &format!("{} collector", scc.name),
        Some("collector_id"),
        false,
    );
    Attrs::new()
        .set("collector_ids", vec![collector])
        .set("credential_id", "${var.scc_scope_credential_id}")
        .set("credential_type", "ibm")
        .set("description", scc.scope_description.as_str())
        .set("name", resource_name(craig, &[scc.name.as_str(), "scope"]))
        .named(&format!("{} scope", scc.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let scc = &craig.scc;
    let mut section = Section::new("security and compliance center");
    if scc.enable {
        section.resource("ibm_scc_account_settings", format_scc_account_settings(scc));
        section.resource("ibm_scc_posture_collector", format_scc_collector(scc, craig));
        section.resource("ibm_scc_posture_scope", format_scc_scope(scc, craig));
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_scc_is_empty() {
        let craig = Craig::default();
        assert!(sections(&craig).unwrap()[0].is_empty());
    }

    #[test]
    fn test_scope_reads_collector_and_credential() {
        let craig: Craig = serde_json::from_value(json!({
            "_options": { "prefix": "slz" },
            "scc": { "enable": true, "name": "scc", "location": "eu" }
        }))
        .unwrap();

        let sections = sections(&craig).unwrap();
        assert_eq!(sections[0].emissions.len(), 3);

        let scope = format_scc_scope(&craig.scc, &craig);
        assert_eq!(
            scope.data["collector_ids"],
            json!(["${ibm_scc_posture_collector.scc_collector.collector_id}"])
        );
        assert_eq!(scope.data["credential_id"], "${var.scc_scope_credential_id}");
        assert_eq!(
            format_scc_account_settings(&craig.scc).data["location"],
            json!({ "location_id": "eu" })
        );
    }
}
