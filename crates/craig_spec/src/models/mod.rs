//! Data models for CRAIG configurations.
//!
//! A configuration is one JSON document: global `_options` plus named
//! collections of entities. Entity names are the join keys used by every
//! cross reference, so lookups here are always by name.

mod compute;
mod iam;
mod network;
mod services;

pub use compute::*;
pub use iam::*;
pub use network::*;
pub use services::*;

use serde::{Deserialize, Serialize};

/// Global settings shared by every generated resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Options {
    /// Prefix prepended to every managed resource name.
    pub prefix: String,
    /// VPC region, e.g. `us-south`.
    pub region: String,
    /// Tags attached to every taggable resource.
    pub tags: Vec<String>,
    /// Number of availability zones in use.
    pub zones: u8,
    /// Service endpoint mode: `private`, `public` or `public-and-private`.
    pub endpoints: String,
    /// Account ID used by context-based restrictions.
    pub account_id: Option<String>,
    /// Whether Power Virtual Server resources are generated.
    pub enable_power_vs: bool,
    /// Power VS zones with a provider alias.
    pub power_vs_zones: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prefix: "iac".to_string(),
            region: "us-south".to_string(),
            tags: Vec::new(),
            zones: 3,
            endpoints: "private".to_string(),
            account_id: None,
            enable_power_vs: false,
            power_vs_zones: Vec::new(),
        }
    }
}

/// Root configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Craig {
    #[serde(rename = "_options")]
    pub options: Options,
    pub resource_groups: Vec<ResourceGroup>,
    pub key_management: Vec<KeyManagement>,
    pub object_storage: Vec<ObjectStorage>,
    pub vpcs: Vec<Vpc>,
    pub security_groups: Vec<SecurityGroup>,
    pub ssh_keys: Vec<SshKey>,
    pub vsi: Vec<Vsi>,
    pub load_balancers: Vec<LoadBalancer>,
    pub transit_gateways: Vec<TransitGateway>,
    pub vpn_gateways: Vec<VpnGateway>,
    pub vpn_servers: Vec<VpnServer>,
    pub appid: Vec<AppId>,
    pub access_groups: Vec<AccessGroup>,
    pub cbr_zones: Vec<CbrZone>,
    pub cbr_rules: Vec<CbrRule>,
    pub scc: Scc,
    pub f5_vsi: Vec<F5Vsi>,
    pub teleport_vsi: Vec<TeleportVsi>,
    pub icd: Vec<Icd>,
    pub power: Vec<PowerWorkspace>,
    pub power_instances: Vec<PowerInstance>,
    pub power_volumes: Vec<PowerVolume>,
    pub atracker: Atracker,
    pub clusters: Vec<Cluster>,
    pub virtual_private_endpoints: Vec<Vpe>,
    pub event_streams: Vec<EventStreams>,
    pub secrets_manager: Vec<SecretsManager>,
    pub iam_account_settings: IamAccountSettings,
}

fn by_name<'a, T, F>(items: &'a [T], name: &str, key: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    items.iter().find(|item| key(item) == name)
}

impl Craig {
    pub fn resource_group(&self, name: &str) -> Option<&ResourceGroup> {
        by_name(&self.resource_groups, name, |rg| rg.name.as_str())
    }

    pub fn key_management(&self, name: &str) -> Option<&KeyManagement> {
        by_name(&self.key_management, name, |kms| kms.name.as_str())
    }

    pub fn object_storage(&self, name: &str) -> Option<&ObjectStorage> {
        by_name(&self.object_storage, name, |cos| cos.name.as_str())
    }

    pub fn vpc(&self, name: &str) -> Option<&Vpc> {
        by_name(&self.vpcs, name, |vpc| vpc.name.as_str())
    }

    pub fn security_group(&self, name: &str) -> Option<&SecurityGroup> {
        by_name(&self.security_groups, name, |sg| sg.name.as_str())
    }

    pub fn ssh_key(&self, name: &str) -> Option<&SshKey> {
        by_name(&self.ssh_keys, name, |key| key.name.as_str())
    }

    pub fn vsi_deployment(&self, name: &str) -> Option<&Vsi> {
        by_name(&self.vsi, name, |vsi| vsi.name.as_str())
    }

    pub fn appid_instance(&self, name: &str) -> Option<&AppId> {
        by_name(&self.appid, name, |appid| appid.name.as_str())
    }

    pub fn cbr_zone(&self, name: &str) -> Option<&CbrZone> {
        by_name(&self.cbr_zones, name, |zone| zone.name.as_str())
    }

    pub fn power_workspace(&self, name: &str) -> Option<&PowerWorkspace> {
        by_name(&self.power, name, |ws| ws.name.as_str())
    }

    pub fn power_instance(&self, name: &str) -> Option<&PowerInstance> {
        by_name(&self.power_instances, name, |instance| instance.name.as_str())
    }

    pub fn secrets_manager_instance(&self, name: &str) -> Option<&SecretsManager> {
        by_name(&self.secrets_manager, name, |sm| sm.name.as_str())
    }

    pub fn transit_gateway(&self, name: &str) -> Option<&TransitGateway> {
        by_name(&self.transit_gateways, name, |tgw| tgw.name.as_str())
    }

    /// Find a bucket by name, returning it with its owning instance.
    pub fn bucket(&self, name: &str) -> Option<(&ObjectStorage, &Bucket)> {
        self.object_storage.iter().find_map(|cos| {
            cos.buckets
                .iter()
                .find(|bucket| bucket.name == name)
                .map(|bucket| (cos, bucket))
        })
    }

    /// Security groups attached to the named VPC, in declaration order.
    pub fn security_groups_for_vpc<'a>(
        &'a self,
        vpc: &'a str,
    ) -> impl Iterator<Item = &'a SecurityGroup> {
        self.security_groups.iter().filter(move |sg| sg.vpc.as_deref() == Some(vpc))
    }
}

impl Vpc {
    pub fn subnet(&self, name: &str) -> Option<&Subnet> {
        by_name(&self.subnets, name, |subnet| subnet.name.as_str())
    }

    pub fn acl(&self, name: &str) -> Option<&Acl> {
        by_name(&self.acls, name, |acl| acl.name.as_str())
    }
}

impl KeyManagement {
    pub fn key(&self, name: &str) -> Option<&KmsKey> {
        by_name(&self.keys, name, |key| key.name.as_str())
    }
}

impl ObjectStorage {
    pub fn key(&self, name: &str) -> Option<&CosKey> {
        by_name(&self.keys, name, |key| key.name.as_str())
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        by_name(&self.buckets, name, |bucket| bucket.name.as_str())
    }
}

impl AppId {
    pub fn key(&self, name: &str) -> Option<&AppIdKey> {
        by_name(&self.keys, name, |key| key.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_when_missing() {
        let craig: Craig = serde_json::from_str("{}").unwrap();
        assert_eq!(craig.options.prefix, "iac");
        assert_eq!(craig.options.region, "us-south");
        assert_eq!(craig.options.zones, 3);
        assert!(craig.vpcs.is_empty());
        assert!(!craig.atracker.enabled);
    }

    #[test]
    fn test_bucket_lookup_returns_owner() {
        let craig: Craig = serde_json::from_value(serde_json::json!({
            "object_storage": [
                { "name": "atracker-cos", "buckets": [{ "name": "atracker-bucket" }] },
                { "name": "cos", "buckets": [{ "name": "management-bucket" }] }
            ]
        }))
        .unwrap();

        let (cos, bucket) = craig.bucket("management-bucket").unwrap();
        assert_eq!(cos.name, "cos");
        assert_eq!(bucket.name, "management-bucket");
        assert!(craig.bucket("missing").is_none());
    }

    #[test]
    fn test_security_groups_for_vpc() {
        let craig: Craig = serde_json::from_value(serde_json::json!({
            "security_groups": [
                { "name": "a", "vpc": "management" },
                { "name": "b", "vpc": "workload" },
                { "name": "c", "vpc": "management" }
            ]
        }))
        .unwrap();

        let names: Vec<_> = craig
            .security_groups_for_vpc("management")
            .map(|sg| sg.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
