//! Context-based restriction zones and rules.

use serde_json::Value;

use craig_spec::{CbrAddress, CbrAttribute, CbrRule, CbrZone, Craig};

use super::Attrs;
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::tf_ref;
use crate::section::{Formatted, Section};

/// Context attribute whose value names a declared zone.
const NETWORK_ZONE_ID: &str = "networkZoneId";

fn zone_address(zone: &str) -> String {
    format!("{} zone", zone)
}

fn format_cbr_address(address: &CbrAddress) -> Value {
    let attrs = Attrs::new().set("type", address.address_type.as_str());
    if address.address_type == "serviceRef" {
        attrs
            .set(
                "ref",
                Attrs::new()
                    .maybe("account_id", address.account_id.clone())
                    .maybe("location", address.location.clone())
                    .maybe("service_instance", address.service_instance.clone())
                    .maybe("service_name", address.service_name.clone())
                    .maybe("service_type", address.service_type.clone()),
            )
            .into()
    } else {
        attrs.maybe("value", address.value.clone()).into()
    }
}

pub fn format_cbr_zone(zone: &CbrZone, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_cbr_zone";
    let account_id = zone
        .account_id
        .clone()
        .or_else(|| craig.options.account_id.clone())
        .ok_or_else(|| CraigError::invalid(from, "account_id", "is required"))?;

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[&zone.name]))
        .set("account_id", account_id)
        .set("description", zone.description.as_str())
        .set_if(
            !zone.addresses.is_empty(),
            "addresses",
            zone.addresses.iter().map(format_cbr_address).collect::<Vec<_>>(),
        )
        .set_if(
            !zone.exclusions.is_empty(),
            "excluded",
            zone.exclusions.iter().map(format_cbr_address).collect::<Vec<_>>(),
        )
        .named(&zone_address(&zone.name)))
}

fn format_cbr_attribute(attribute: &CbrAttribute, craig: &Craig, from: &str) -> CraigResult<Value> {
    let value = if attribute.name == NETWORK_ZONE_ID {
        craig
            .cbr_zone(&attribute.value)
            .ok_or_else(|| CraigError::missing("cbr zone", attribute.value.as_str(), from))?;
        tf_ref("ibm_cbr_zone", &zone_address(&attribute.value), None, false)
    } else {
        attribute.value.clone()
    };
    Ok(Attrs::new()
        .set("name", attribute.name.as_str())
        .set("value", value)
        .into())
}

pub fn format_cbr_rule(rule: &CbrRule, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_cbr_rule";

    let mut contexts = Vec::new();
    for context in &rule.contexts {
        let attributes = context
            .attributes
            .iter()
            .map(|attribute| format_cbr_attribute(attribute, craig, from))
            .collect::<CraigResult<Vec<_>>>()?;
        contexts.push(Value::from(Attrs::new().set_if(!attributes.is_empty(), "attributes", attributes)));
    }

    let attributes = rule
        .resource_attributes
        .iter()
        .map(|attribute| format_cbr_attribute(attribute, craig, from))
        .collect::<CraigResult<Vec<_>>>()?;
    let tags: Vec<Value> = rule
        .tags
        .iter()
        .map(|tag| {
            Attrs::new()
                .set("name", tag.name.as_str())
                .maybe("operator", tag.operator.clone())
                .set("value", tag.value.as_str())
                .into()
        })
        .collect();
    let resources = Attrs::new()
        .set_if(!attributes.is_empty(), "attributes", attributes)
        .set_if(!tags.is_empty(), "tags", tags);

    let operations = rule.api_type_id.as_deref().map(|api_type_id| {
        vec![Value::from(
            Attrs::new().set("api_types", vec![Value::from(Attrs::new().set("api_type_id", api_type_id))]),
        )]
    });

    Ok(Attrs::new()
        .set("description", rule.description.as_str())
        .set("enforcement_mode", rule.enforcement_mode.as_str())
        .set_if(!contexts.is_empty(), "contexts", contexts)
        .set("resources", vec![Value::from(resources)])
        .maybe("operations", operations)
        .named(&format!("{} rule", rule.name)))
}

/// Zones first so rules can reference them.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut zones = Section::new("cbr zones");
    for zone in &craig.cbr_zones {
        zones.resource("ibm_cbr_zone", format_cbr_zone(zone, craig)?);
    }
    let mut rules = Section::new("cbr rules");
    for rule in &craig.cbr_rules {
        rules.resource("ibm_cbr_rule", format_cbr_rule(rule, craig)?);
    }
    Ok(vec![zones, rules])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcl::hcl_block;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "account_id": "abc123" },
            "cbr_zones": [{
                "name": "home",
                "description": "Office network",
                "addresses": [
                    { "type": "ipAddress", "value": "169.23.56.234" },
                    { "type": "serviceRef", "service_name": "secrets-manager", "account_id": "abc123" }
                ],
                "exclusions": [{ "type": "ipAddress", "value": "169.23.22.127" }]
            }],
            "cbr_rules": [{
                "name": "kms-access",
                "description": "Restrict kms",
                "api_type_id": "crn:v1:bluemix:public:context-based-restrictions::::api-type:",
                "contexts": [{ "attributes": [{ "name": "networkZoneId", "value": "home" }] }],
                "resource_attributes": [{ "name": "serviceName", "value": "kms" }],
                "tags": [{ "name": "env", "operator": "stringEquals", "value": "prod" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_zone_addresses() {
        let craig = craig();
        let zone = format_cbr_zone(&craig.cbr_zones[0], &craig).unwrap();
        assert_eq!(zone.name, "home_zone");
        assert_eq!(zone.data["account_id"], "abc123");
        assert_eq!(
            zone.data["addresses"],
            json!([
                { "type": "ipAddress", "value": "169.23.56.234" },
                { "type": "serviceRef", "ref": { "account_id": "abc123", "service_name": "secrets-manager" } }
            ])
        );
        assert_eq!(zone.data["excluded"][0]["value"], "169.23.22.127");
    }

    #[test]
    fn test_zone_without_account_is_invalid() {
        let mut craig = craig();
        craig.options.account_id = None;
        assert!(format_cbr_zone(&craig.cbr_zones[0], &craig).is_err());
    }

    #[test]
    fn test_rule_resolves_network_zone() {
        let craig = craig();
        let rule = format_cbr_rule(&craig.cbr_rules[0], &craig).unwrap();
        assert_eq!(rule.name, "kms_access_rule");
        assert_eq!(
            rule.data["contexts"],
            json!([{ "attributes": [{ "name": "networkZoneId", "value": "${ibm_cbr_zone.home_zone.id}" }] }])
        );
        assert_eq!(rule.data["resources"][0]["tags"][0]["operator"], "stringEquals");
        assert_eq!(
            rule.data["operations"][0]["api_types"][0]["api_type_id"],
            "crn:v1:bluemix:public:context-based-restrictions::::api-type:"
        );
    }

    #[test]
    fn test_rule_without_contexts_omits_block() {
        let mut craig = craig();
        craig.cbr_rules[0].contexts.clear();
        let rule = format_cbr_rule(&craig.cbr_rules[0], &craig).unwrap();
        assert!(rule.data.get("contexts").is_none());

        let text = hcl_block("resource", &["ibm_cbr_rule", rule.name.as_str()], &rule.data);
        assert!(!text.contains("contexts"));
        assert!(text.contains("resources {"));
    }

    #[test]
    fn test_rule_with_unknown_zone_fails() {
        let mut craig = craig();
        craig.cbr_zones.clear();
        let err = format_cbr_rule(&craig.cbr_rules[0], &craig).unwrap_err();
        assert!(matches!(err, CraigError::MissingReference { kind: "cbr zone", .. }));
    }
}
