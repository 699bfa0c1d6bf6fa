//! Activity tracker target and route.

use serde_json::Value;

use craig_spec::{Atracker, Craig};

use super::Attrs;
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{bucket_ref, cos_key_ref, cos_ref, tf_ref};
use crate::section::{Formatted, Section};

fn target_address(atracker: &Atracker) -> String {
    format!("{} target", atracker.name)
}

pub fn format_atracker_target(atracker: &Atracker, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_atracker_target";
    let (cos, _) = craig
        .bucket(&atracker.bucket)
        .ok_or_else(|| CraigError::missing("bucket", atracker.bucket.as_str(), from))?;

    let endpoint = Attrs::new()
        .set(
            "endpoint",
            format!("s3.private.{}.cloud-object-storage.appdomain.cloud", craig.options.region),
        )
        .set("target_crn", cos_ref(craig, &cos.name, Some("crn"), from)?)
        .set("bucket", bucket_ref(craig, &cos.name, &atracker.bucket, None, from)?)
        .set(
            "api_key",
            cos_key_ref(craig, &cos.name, &atracker.cos_key, "credentials[\"apikey\"]", from)?,
        );

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[atracker.name.as_str()]))
        .set("target_type", "cloud_object_storage")
        .set("region", craig.options.region.as_str())
        .set("cos_endpoint", endpoint)
        .named(&target_address(atracker)))
}

pub fn format_atracker_route(atracker: &Atracker, craig: &Craig) -> Formatted {
    let target = tf_ref("ibm_atracker_target", &target_address(atracker), None, false);
    Attrs::new()
        .set("name", resource_name(craig, &[atracker.name.as_str(), "route"]))
        .set(
            "rules",
            vec![Value::from(
                Attrs::new()
                    .set("target_ids", vec![target])
                    .set("locations", atracker.locations.clone()),
            )],
        )
        .named(&format!("{} route", atracker.name))
}

/// Nothing is emitted unless activity tracking is enabled.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let atracker = &craig.atracker;
    let mut section = Section::new("atracker");
    if atracker.enabled {
        section.resource("ibm_atracker_target", format_atracker_target(atracker, craig)?);
        if atracker.add_route {
            section.resource("ibm_atracker_route", format_atracker_route(atracker, craig));
        }
    }
    Ok(vec![section])
}
