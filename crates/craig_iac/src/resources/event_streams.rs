//! Event Streams instances.

use craig_spec::{Craig, EventStreams};

use super::{tags, timeouts, Attrs};
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::refs::{rg_id_ref, Scope};
use crate::section::{Formatted, Section};

pub fn format_event_streams(es: &EventStreams, craig: &Craig) -> CraigResult<Formatted> {
    let parameters = Attrs::new()
        .set("service-endpoints", es.endpoints.as_str())
        .set_if(
            !es.private_ip_allowlist.is_empty(),
            "private_ip_allowlist",
            format!("[{}]", es.private_ip_allowlist.join(",")),
        )
        .maybe("throughput", es.throughput.clone())
        .maybe("storage_size", es.storage_size.clone());

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[&es.name]))
        .set("service", "messagehub")
        .set("plan", es.plan.as_str())
        .set("location", craig.options.region.as_str())
        .set(
            "resource_group_id",
            rg_id_ref(craig, es.resource_group.as_deref(), "format_event_streams", Scope::Root)?,
        )
        .set("parameters", parameters)
        .set("timeouts", timeouts("3h", "1h", "1h"))
        .set("tags", tags(craig))
        .named(&format!("{} event streams", es.name)))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("event streams");
    for es in &craig.event_streams {
        section.resource("ibm_resource_instance", format_event_streams(es, craig)?);
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_streams_parameters() {
        let craig: Craig = serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south" },
            "resource_groups": [{ "name": "slz-service-rg" }],
            "event_streams": [{
                "name": "event-streams",
                "resource_group": "slz-service-rg",
                "private_ip_allowlist": ["10.0.0.0/32", "10.0.0.1/32"],
                "throughput": "150MB/s",
                "storage_size": "2048GB"
            }]
        }))
        .unwrap();

        let es = format_event_streams(&craig.event_streams[0], &craig).unwrap();
        assert_eq!(es.name, "event_streams_event_streams");
        assert_eq!(
            es.data["parameters"],
            json!({
                "service-endpoints": "private",
                "private_ip_allowlist": "[10.0.0.0/32,10.0.0.1/32]",
                "throughput": "150MB/s",
                "storage_size": "2048GB"
            })
        );
        assert_eq!(es.data["timeouts"], json!({ "create": "3h", "update": "1h", "delete": "1h" }));
    }
}
