//! Compute entities: VSIs, appliance images, clusters and Power VS.

use serde::{Deserialize, Serialize};

/// A VSI deployment, expanded to `subnets.len() * vsi_per_subnet` instances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vsi {
    pub name: String,
    pub vpc: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub ssh_keys: Vec<String>,
    #[serde(alias = "image")]
    pub image_name: String,
    pub profile: String,
    pub vsi_per_subnet: u32,
    pub resource_group: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub user_data: Option<String>,
    pub enable_floating_ip: bool,
    pub volumes: Vec<Volume>,
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Default for Vsi {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            subnets: Vec::new(),
            security_groups: Vec::new(),
            ssh_keys: Vec::new(),
            image_name: String::new(),
            profile: "cx2-4x8".to_string(),
            vsi_per_subnet: 1,
            resource_group: None,
            kms: None,
            encryption_key: None,
            user_data: None,
            enable_floating_ip: false,
            volumes: Vec::new(),
            network_interfaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Volume {
    pub name: String,
    pub profile: String,
    pub capacity: Option<u32>,
    pub encryption_key: Option<String>,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            name: String::new(),
            profile: "general-purpose".to_string(),
            capacity: None,
            encryption_key: None,
        }
    }
}

/// Secondary network interface; always created with IP spoofing allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkInterface {
    pub subnet: String,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SshKey {
    pub name: String,
    pub public_key: Option<String>,
    pub resource_group: Option<String>,
    pub use_data: bool,
}

/// Settings rendered into the F5 BIG-IP cloud-init document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct F5Template {
    pub hostname: String,
    pub domain: String,
    /// CIDR of the subnet holding the default route; the gateway is its first host.
    pub default_route_gateway_cidr: String,
    pub do_declaration_url: String,
    pub as3_declaration_url: String,
    pub ts_declaration_url: String,
    pub phone_home_url: String,
    pub template_version: String,
    pub template_source: String,
    pub app_id: String,
    pub tgactive_url: String,
    pub tgstandby_url: String,
    pub tgrefresh_url: String,
    /// `none`, `byol`, `regkeypool` or `utilitypool`.
    pub license_type: String,
    pub byol_license_basekey: Option<String>,
    pub license_host: Option<String>,
    pub license_username: Option<String>,
    pub license_pool: Option<String>,
    pub license_sku_keyword_1: Option<String>,
    pub license_sku_keyword_2: Option<String>,
    pub license_unit_of_measure: Option<String>,
}

impl Default for F5Template {
    fn default() -> Self {
        Self {
            hostname: "f5-ve-01".to_string(),
            domain: "local".to_string(),
            default_route_gateway_cidr: "10.10.10.10/24".to_string(),
            do_declaration_url: "null".to_string(),
            as3_declaration_url: "null".to_string(),
            ts_declaration_url: "null".to_string(),
            phone_home_url: "null".to_string(),
            template_version: "20210201".to_string(),
            template_source: "f5devcentral/ibmcloud_schematics_bigip_multinic_declared".to_string(),
            app_id: "null".to_string(),
            tgactive_url: String::new(),
            tgstandby_url: "null".to_string(),
            tgrefresh_url: "null".to_string(),
            license_type: "none".to_string(),
            byol_license_basekey: None,
            license_host: None,
            license_username: None,
            license_pool: None,
            license_sku_keyword_1: None,
            license_sku_keyword_2: None,
            license_unit_of_measure: None,
        }
    }
}

/// A single F5 BIG-IP virtual edition instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct F5Vsi {
    pub name: String,
    pub vpc: String,
    pub zone: u8,
    pub subnet: String,
    pub security_groups: Vec<String>,
    pub ssh_keys: Vec<String>,
    pub image: String,
    pub profile: String,
    pub resource_group: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub network_interfaces: Vec<NetworkInterface>,
    pub template: F5Template,
}

impl Default for F5Vsi {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            zone: 1,
            subnet: String::new(),
            security_groups: Vec::new(),
            ssh_keys: Vec::new(),
            image: "f5-bigip-16-1-2-2-0-0-28-all-1slot".to_string(),
            profile: "cx2-4x8".to_string(),
            resource_group: None,
            kms: None,
            encryption_key: None,
            network_interfaces: Vec::new(),
            template: F5Template::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClaimToRoles {
    pub email: String,
    pub roles: Vec<String>,
}

/// Settings rendered into the Teleport bastion cloud-init document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeleportTemplate {
    pub license: String,
    pub https_cert: String,
    pub https_key: String,
    pub domain: String,
    pub hostname: String,
    /// Session recording bucket.
    pub bucket: String,
    pub cos: String,
    /// HMAC key used to reach the bucket.
    pub cos_key: String,
    /// AppID key used by the OIDC connector.
    pub app_id_key: String,
    pub claims_to_roles: Vec<ClaimToRoles>,
    pub message_of_the_day: String,
    pub version: String,
}

impl Default for TeleportTemplate {
    fn default() -> Self {
        Self {
            license: String::new(),
            https_cert: String::new(),
            https_key: String::new(),
            domain: String::new(),
            hostname: String::new(),
            bucket: String::new(),
            cos: String::new(),
            cos_key: String::new(),
            app_id_key: String::new(),
            claims_to_roles: Vec::new(),
            message_of_the_day: String::new(),
            version: "7.1.0".to_string(),
        }
    }
}

/// A Teleport bastion host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeleportVsi {
    pub name: String,
    pub vpc: String,
    pub subnet: String,
    pub security_groups: Vec<String>,
    pub ssh_keys: Vec<String>,
    pub image: String,
    pub profile: String,
    pub resource_group: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub appid: String,
    pub template: TeleportTemplate,
}

impl Default for TeleportVsi {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            subnet: String::new(),
            security_groups: Vec::new(),
            ssh_keys: Vec::new(),
            image: "ibm-ubuntu-22-04-1-minimal-amd64-1".to_string(),
            profile: "cx2-4x8".to_string(),
            resource_group: None,
            kms: None,
            encryption_key: None,
            appid: String::new(),
            template: TeleportTemplate::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerPool {
    pub name: String,
    pub flavor: String,
    pub subnets: Vec<String>,
    pub workers_per_subnet: u32,
    pub entitlement: Option<String>,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self {
            name: String::new(),
            flavor: "bx2.16x64".to_string(),
            subnets: Vec::new(),
            workers_per_subnet: 1,
            entitlement: None,
        }
    }
}

/// A managed Kubernetes or OpenShift cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cluster {
    pub name: String,
    pub vpc: String,
    pub subnets: Vec<String>,
    pub resource_group: Option<String>,
    /// `openshift` or `iks`.
    pub kube_type: String,
    pub kube_version: String,
    pub flavor: String,
    pub workers_per_subnet: u32,
    /// Object storage instance backing the OpenShift registry.
    pub cos: Option<String>,
    pub entitlement: Option<String>,
    pub kms: Option<String>,
    pub encryption_key: Option<String>,
    pub update_all_workers: bool,
    pub private_endpoint: bool,
    pub worker_pools: Vec<WorkerPool>,
}

impl Default for Cluster {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            subnets: Vec::new(),
            resource_group: None,
            kube_type: "openshift".to_string(),
            kube_version: "default".to_string(),
            flavor: "bx2.16x64".to_string(),
            workers_per_subnet: 1,
            cos: None,
            entitlement: None,
            kms: None,
            encryption_key: None,
            update_all_workers: false,
            private_endpoint: true,
            worker_pools: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerSshKey {
    pub name: String,
    pub public_key: String,
    pub use_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerNetwork {
    pub name: String,
    pub pi_network_type: String,
    pub pi_cidr: String,
    pub pi_dns: Vec<String>,
    pub pi_network_jumbo: bool,
}

impl Default for PowerNetwork {
    fn default() -> Self {
        Self {
            name: String::new(),
            pi_network_type: "vlan".to_string(),
            pi_cidr: String::new(),
            pi_dns: vec!["127.0.0.1".to_string()],
            pi_network_jumbo: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerCloudConnection {
    pub name: String,
    pub pi_cloud_connection_speed: u32,
    pub pi_cloud_connection_global_routing: bool,
    pub pi_cloud_connection_metered: bool,
    pub pi_cloud_connection_transit_enabled: bool,
    pub transit_gateways: Vec<String>,
}

impl Default for PowerCloudConnection {
    fn default() -> Self {
        Self {
            name: String::new(),
            pi_cloud_connection_speed: 50,
            pi_cloud_connection_global_routing: false,
            pi_cloud_connection_metered: false,
            pi_cloud_connection_transit_enabled: true,
            transit_gateways: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerImage {
    pub name: String,
    /// Catalog image ID imported into the workspace.
    pub pi_image_id: String,
}

/// A Power Virtual Server workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerWorkspace {
    pub name: String,
    pub resource_group: Option<String>,
    pub zone: String,
    pub use_data: bool,
    pub ssh_keys: Vec<PowerSshKey>,
    pub network: Vec<PowerNetwork>,
    pub cloud_connections: Vec<PowerCloudConnection>,
    pub images: Vec<PowerImage>,
}

impl PowerWorkspace {
    pub fn image(&self, name: &str) -> Option<&PowerImage> {
        self.images.iter().find(|image| image.name == name)
    }

    pub fn ssh_key(&self, name: &str) -> Option<&PowerSshKey> {
        self.ssh_keys.iter().find(|key| key.name == name)
    }

    pub fn network(&self, name: &str) -> Option<&PowerNetwork> {
        self.network.iter().find(|network| network.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerInstanceNetwork {
    pub name: String,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerInstance {
    pub name: String,
    pub workspace: String,
    pub image: String,
    pub ssh_key: String,
    pub network: Vec<PowerInstanceNetwork>,
    pub pi_sys_type: String,
    pub pi_proc_type: String,
    pub pi_processors: String,
    pub pi_memory: String,
    pub pi_storage_type: String,
    pub pi_health_status: String,
}

impl Default for PowerInstance {
    fn default() -> Self {
        Self {
            name: String::new(),
            workspace: String::new(),
            image: String::new(),
            ssh_key: String::new(),
            network: Vec::new(),
            pi_sys_type: "s922".to_string(),
            pi_proc_type: "shared".to_string(),
            pi_processors: "0.25".to_string(),
            pi_memory: "4".to_string(),
            pi_storage_type: "tier1".to_string(),
            pi_health_status: "WARNING".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PowerVolume {
    pub name: String,
    pub workspace: String,
    pub pi_volume_size: u32,
    pub pi_volume_type: String,
    pub pi_volume_shareable: bool,
    pub pi_replication_enabled: bool,
    /// Power instances the volume is attached to.
    pub attachments: Vec<String>,
}

impl Default for PowerVolume {
    fn default() -> Self {
        Self {
            name: String::new(),
            workspace: String::new(),
            pi_volume_size: 10,
            pi_volume_type: "tier1".to_string(),
            pi_volume_shareable: false,
            pi_replication_enabled: false,
            attachments: Vec::new(),
        }
    }
}
