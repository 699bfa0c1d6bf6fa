//! Managed service entities: key management, object storage and friends.

use serde::{Deserialize, Serialize};

/// A Key Protect or Hyper Protect Crypto Services instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyManagement {
    pub name: String,
    pub resource_group: Option<String>,
    pub use_hs_crypto: bool,
    pub use_data: bool,
    /// Grant block storage and server protect read access to the instance.
    pub authorize_vpc_reader_role: bool,
    pub keys: Vec<KmsKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KmsKey {
    pub name: String,
    pub root_key: bool,
    pub key_ring: Option<String>,
    pub force_delete: bool,
    pub endpoint: Option<String>,
    /// Rotation interval in months.
    pub rotation: u32,
    pub dual_auth_delete: bool,
}

impl Default for KmsKey {
    fn default() -> Self {
        Self {
            name: String::new(),
            root_key: true,
            key_ring: None,
            force_delete: false,
            endpoint: None,
            rotation: 1,
            dual_auth_delete: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectStorage {
    pub name: String,
    pub use_data: bool,
    pub resource_group: Option<String>,
    pub plan: String,
    pub use_random_suffix: bool,
    /// Key management instance encrypting the buckets.
    pub kms: Option<String>,
    pub buckets: Vec<Bucket>,
    pub keys: Vec<CosKey>,
}

impl Default for ObjectStorage {
    fn default() -> Self {
        Self {
            name: String::new(),
            use_data: false,
            resource_group: None,
            plan: "standard".to_string(),
            use_random_suffix: false,
            kms: None,
            buckets: Vec::new(),
            keys: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Bucket {
    pub name: String,
    pub storage_class: String,
    pub kms_key: Option<String>,
    pub force_delete: bool,
    pub endpoint: Option<String>,
    pub use_data: bool,
}

impl Default for Bucket {
    fn default() -> Self {
        Self {
            name: String::new(),
            storage_class: "standard".to_string(),
            kms_key: None,
            force_delete: false,
            endpoint: None,
            use_data: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CosKey {
    pub name: String,
    pub role: String,
    pub enable_hmac: bool,
}

impl Default for CosKey {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: "Writer".to_string(),
            enable_hmac: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppId {
    pub name: String,
    pub resource_group: Option<String>,
    pub use_data: bool,
    pub keys: Vec<AppIdKey>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppIdKey {
    pub name: String,
}

/// A Cloud Databases deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Icd {
    pub name: String,
    /// Service name, e.g. `databases-for-postgresql`.
    pub service: String,
    pub plan: String,
    pub group_id: String,
    pub memory: Option<u32>,
    pub disk: Option<u32>,
    pub cpu: Option<u32>,
    pub resource_group: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub use_data: bool,
}

impl Default for Icd {
    fn default() -> Self {
        Self {
            name: String::new(),
            service: "databases-for-postgresql".to_string(),
            plan: "standard".to_string(),
            group_id: "member".to_string(),
            memory: None,
            disk: None,
            cpu: None,
            resource_group: None,
            kms: None,
            encryption_key: None,
            use_data: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventStreams {
    pub name: String,
    pub plan: String,
    pub resource_group: Option<String>,
    pub endpoints: String,
    pub private_ip_allowlist: Vec<String>,
    pub throughput: Option<String>,
    pub storage_size: Option<String>,
}

impl Default for EventStreams {
    fn default() -> Self {
        Self {
            name: String::new(),
            plan: "enterprise".to_string(),
            resource_group: None,
            endpoints: "private".to_string(),
            private_ip_allowlist: Vec::new(),
            throughput: None,
            storage_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecretsManager {
    pub name: String,
    pub resource_group: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub plan: String,
}

impl Default for SecretsManager {
    fn default() -> Self {
        Self {
            name: String::new(),
            resource_group: None,
            kms: None,
            encryption_key: None,
            plan: "standard".to_string(),
        }
    }
}

/// Activity tracker routing to an object storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Atracker {
    pub enabled: bool,
    pub name: String,
    pub bucket: String,
    pub add_route: bool,
    /// Object storage key whose API key writes to the bucket.
    pub cos_key: String,
    pub locations: Vec<String>,
}

impl Default for Atracker {
    fn default() -> Self {
        Self {
            enabled: false,
            name: "atracker".to_string(),
            bucket: String::new(),
            add_route: true,
            cos_key: String::new(),
            locations: vec!["global".to_string(), "us-south".to_string()],
        }
    }
}

/// Security and Compliance Center posture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Scc {
    pub enable: bool,
    pub name: String,
    pub location: String,
    pub is_public: bool,
    pub collector_description: String,
    pub scope_description: String,
}

impl Default for Scc {
    fn default() -> Self {
        Self {
            enable: false,
            name: "scc".to_string(),
            location: "us".to_string(),
            is_public: false,
            collector_description: "scc collector".to_string(),
            scope_description: "scc scope".to_string(),
        }
    }
}
