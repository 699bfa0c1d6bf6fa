//! Identity and access entities: resource groups, access groups and
//! context-based restrictions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceGroup {
    pub name: String,
    pub use_prefix: bool,
    pub use_data: bool,
}

impl Default for ResourceGroup {
    fn default() -> Self {
        Self {
            name: String::new(),
            use_prefix: true,
            use_data: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyResources {
    pub resource_group: Option<String>,
    pub resource_type: Option<String>,
    pub resource: Option<String>,
    pub service: Option<String>,
    pub resource_instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccessPolicy {
    pub name: String,
    pub roles: Vec<String>,
    pub resources: PolicyResources,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DynamicCondition {
    pub claim: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DynamicPolicy {
    pub name: String,
    pub identity_provider: String,
    /// Hours before the dynamic membership expires.
    pub expiration: u32,
    pub conditions: DynamicCondition,
}

impl Default for DynamicPolicy {
    fn default() -> Self {
        Self {
            name: String::new(),
            identity_provider: String::new(),
            expiration: 1,
            conditions: DynamicCondition::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Invites {
    pub ibm_ids: Vec<String>,
    pub iam_service_ids: Vec<String>,
    pub iam_profile_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccessGroup {
    pub name: String,
    pub description: String,
    pub policies: Vec<AccessPolicy>,
    pub dynamic_policies: Vec<DynamicPolicy>,
    pub has_invites: bool,
    pub invites: Invites,
}

/// A network zone address. `serviceRef` addresses describe a service
/// instead of a literal value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrAddress {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub address_type: String,
    pub value: Option<String>,
    pub account_id: Option<String>,
    pub location: Option<String>,
    pub service_instance: Option<String>,
    pub service_name: Option<String>,
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrZone {
    pub name: String,
    pub description: String,
    pub account_id: Option<String>,
    pub addresses: Vec<CbrAddress>,
    pub exclusions: Vec<CbrAddress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrTag {
    pub name: String,
    pub operator: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrContext {
    pub attributes: Vec<CbrAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CbrRule {
    pub name: String,
    pub description: String,
    /// `enabled`, `disabled` or `report`.
    pub enforcement_mode: String,
    pub api_type_id: Option<String>,
    /// Contexts; a `networkZoneId` attribute value names a declared zone.
    pub contexts: Vec<CbrContext>,
    pub resource_attributes: Vec<CbrAttribute>,
    pub tags: Vec<CbrTag>,
}

impl Default for CbrRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            enforcement_mode: "report".to_string(),
            api_type_id: None,
            contexts: Vec::new(),
            resource_attributes: Vec::new(),
            tags: Vec::new(),
        }
    }
}

/// Account-wide IAM settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IamAccountSettings {
    pub enable: bool,
    pub mfa: String,
    pub allowed_ip_addresses: Option<String>,
    pub include_history: bool,
    pub if_match: Option<String>,
    pub max_sessions_per_identity: Option<u32>,
    pub restrict_create_service_id: String,
    pub restrict_create_platform_apikey: String,
    pub session_expiration_in_seconds: Option<String>,
    pub session_invalidation_in_seconds: Option<String>,
}

impl Default for IamAccountSettings {
    fn default() -> Self {
        Self {
            enable: false,
            mfa: "NONE".to_string(),
            allowed_ip_addresses: None,
            include_history: false,
            if_match: None,
            max_sessions_per_identity: None,
            restrict_create_service_id: "NOT_SET".to_string(),
            restrict_create_platform_apikey: "NOT_SET".to_string(),
            session_expiration_in_seconds: None,
            session_invalidation_in_seconds: None,
        }
    }
}
