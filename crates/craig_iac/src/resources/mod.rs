//! Per-resource formatters, grouped by family.
//!
//! Each family module exposes `format_*` functions returning `Formatted`
//! values and a `sections` function grouping them for rendering.

pub mod access_groups;
pub mod appid;
pub mod atracker;
pub mod cbr;
pub mod cloud_init;
pub mod clusters;
pub mod event_streams;
pub mod f5;
pub mod flow_logs;
pub mod iam;
pub mod icd;
pub mod key_management;
pub mod load_balancers;
pub mod object_storage;
pub mod power_vs;
pub mod resource_groups;
pub mod scc;
pub mod secrets_manager;
pub mod security_groups;
pub mod ssh_keys;
pub mod teleport;
pub mod transit_gateways;
pub mod vpc;
pub mod vpe;
pub mod vpn_gateways;
pub mod vpn_servers;
pub mod vsi;

use serde_json::{Map, Value};

use craig_spec::Craig;

use crate::error::{CraigError, CraigResult};
use crate::naming::snake_case;
use crate::section::Formatted;

/// Ordered attribute tree builder.
#[derive(Debug, Default, Clone)]
pub struct Attrs(Map<String, Value>);

impl Attrs {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set `key` only when `value` is present.
    pub fn maybe<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub fn set_if(self, condition: bool, key: &str, value: impl Into<Value>) -> Self {
        if condition {
            self.set(key, value)
        } else {
            self
        }
    }

    pub fn build(self) -> Map<String, Value> {
        self.0
    }

    /// Finish the tree under the snake_case form of `address`.
    pub fn named(self, address: &str) -> Formatted {
        Formatted {
            name: snake_case(address),
            data: self.0,
        }
    }
}

impl From<Attrs> for Value {
    fn from(attrs: Attrs) -> Self {
        Value::Object(attrs.0)
    }
}

/// The global tag list.
pub fn tags(craig: &Craig) -> Value {
    Value::from(craig.options.tags.clone())
}

/// `timeouts` block; empty durations are skipped.
pub fn timeouts(create: &str, update: &str, delete: &str) -> Attrs {
    Attrs::new()
        .set_if(!create.is_empty(), "create", create)
        .set_if(!update.is_empty(), "update", update)
        .set_if(!delete.is_empty(), "delete", delete)
}

/// `<region>-<zone>` for a numbered zone.
pub fn zone_name(craig: &Craig, zone: u32) -> String {
    format!("{}-{}", craig.options.region, zone)
}

/// Zone number from the trailing digit of a subnet name.
pub fn subnet_zone(subnet: &str, from: &str) -> CraigResult<u32> {
    subnet
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| {
            CraigError::invalid(
                from,
                "subnets",
                format!("subnet `{}` does not end in a zone number", subnet),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attrs_keeps_insertion_order() {
        let formatted = Attrs::new()
            .set("name", "a")
            .maybe::<String>("skipped", None)
            .maybe("cidr", Some("10.0.0.0/24"))
            .set_if(false, "hidden", true)
            .set("tags", vec!["x"])
            .named("management vpc");

        assert_eq!(formatted.name, "management_vpc");
        assert_eq!(
            Value::Object(formatted.data),
            json!({ "name": "a", "cidr": "10.0.0.0/24", "tags": ["x"] })
        );
    }

    #[test]
    fn test_attrs_does_not_sort_keys() {
        let data = Attrs::new().set("b", 1).set("a", 2).build();
        let keys: Vec<&String> = data.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_subnet_zone() {
        assert_eq!(subnet_zone("vsi-zone-2", "test").unwrap(), 2);
        assert!(subnet_zone("vsi-zone", "test").is_err());
    }
}
