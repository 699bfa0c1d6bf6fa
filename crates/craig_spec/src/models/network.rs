//! VPC networking entities.

use serde::{Deserialize, Serialize};

/// A VPC and the resources that live inside its module.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vpc {
    pub name: String,
    pub resource_group: Option<String>,
    pub classic_access: bool,
    pub manual_address_prefix_management: bool,
    pub default_network_acl_name: Option<String>,
    pub default_security_group_name: Option<String>,
    pub default_routing_table_name: Option<String>,
    /// Flow log bucket name.
    pub bucket: Option<String>,
    /// Object storage instance owning the flow log bucket.
    pub cos: Option<String>,
    pub use_data: bool,
    /// Zones (1-3) with a public gateway.
    pub public_gateways: Vec<u8>,
    pub address_prefixes: Vec<AddressPrefix>,
    pub subnets: Vec<Subnet>,
    pub acls: Vec<Acl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AddressPrefix {
    pub name: String,
    pub cidr: String,
    pub zone: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Subnet {
    pub name: String,
    pub cidr: Option<String>,
    pub zone: u8,
    pub network_acl: Option<String>,
    pub public_gateway: bool,
    pub use_data: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Acl {
    pub name: String,
    pub resource_group: Option<String>,
    /// Append the rules required by managed clusters.
    pub add_cluster_rules: bool,
    pub rules: Vec<AclRule>,
}

/// ICMP protocol match. Both fields unset means no ICMP block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Icmp {
    #[serde(rename = "type")]
    pub icmp_type: Option<u32>,
    pub code: Option<u32>,
}

impl Icmp {
    pub fn is_set(&self) -> bool {
        self.icmp_type.is_some() || self.code.is_some()
    }
}

/// TCP/UDP port match. All fields unset means no protocol block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortRange {
    pub port_min: Option<u32>,
    pub port_max: Option<u32>,
    pub source_port_min: Option<u32>,
    pub source_port_max: Option<u32>,
}

impl PortRange {
    pub fn is_set(&self) -> bool {
        self.port_min.is_some()
            || self.port_max.is_some()
            || self.source_port_min.is_some()
            || self.source_port_max.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AclRule {
    pub name: String,
    pub action: String,
    pub direction: String,
    pub source: String,
    pub destination: String,
    pub icmp: Option<Icmp>,
    pub tcp: Option<PortRange>,
    pub udp: Option<PortRange>,
}

impl Default for AclRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            action: "allow".to_string(),
            direction: "inbound".to_string(),
            source: "0.0.0.0/0".to_string(),
            destination: "0.0.0.0/0".to_string(),
            icmp: None,
            tcp: None,
            udp: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityGroup {
    pub name: String,
    pub vpc: Option<String>,
    pub resource_group: Option<String>,
    pub use_data: bool,
    pub rules: Vec<SgRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SgRule {
    pub name: String,
    pub direction: String,
    pub source: String,
    pub icmp: Option<Icmp>,
    pub tcp: Option<PortRange>,
    pub udp: Option<PortRange>,
}

impl Default for SgRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            direction: "inbound".to_string(),
            source: "0.0.0.0/0".to_string(),
            icmp: None,
            tcp: None,
            udp: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadBalancer {
    pub name: String,
    pub vpc: String,
    /// `public` or `private`.
    #[serde(rename = "type")]
    pub lb_type: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub resource_group: Option<String>,
    pub algorithm: String,
    pub protocol: String,
    pub health_delay: u32,
    pub health_retries: u32,
    pub health_timeout: u32,
    pub health_type: String,
    pub proxy_protocol: Option<String>,
    pub session_persistence_type: Option<String>,
    pub session_persistence_app_cookie_name: Option<String>,
    /// Pool member port.
    pub port: u32,
    /// VSI deployments whose instances join the pool.
    pub target_vsi: Vec<String>,
    pub listener_port: u32,
    pub listener_protocol: String,
    pub connection_limit: Option<u32>,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            lb_type: "public".to_string(),
            subnets: Vec::new(),
            security_groups: Vec::new(),
            resource_group: None,
            algorithm: "round_robin".to_string(),
            protocol: "http".to_string(),
            health_delay: 60,
            health_retries: 5,
            health_timeout: 30,
            health_type: "http".to_string(),
            proxy_protocol: None,
            session_persistence_type: None,
            session_persistence_app_cookie_name: None,
            port: 80,
            target_vsi: Vec::new(),
            listener_port: 443,
            listener_protocol: "https".to_string(),
            connection_limit: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitGateway {
    pub name: String,
    pub resource_group: Option<String>,
    pub global: bool,
    pub use_data: bool,
    pub connections: Vec<TgwConnection>,
}

/// A transit gateway connection to either a VPC or a Power VS workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TgwConnection {
    pub tgw: Option<String>,
    pub vpc: Option<String>,
    pub power: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VpnGateway {
    pub name: String,
    pub resource_group: Option<String>,
    pub vpc: String,
    pub subnet: String,
    pub connections: Vec<VpnConnection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VpnConnection {
    pub name: String,
    pub peer_address: String,
    pub local_cidrs: Vec<String>,
    pub peer_cidrs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VpnServer {
    pub name: String,
    pub certificate_crn: String,
    /// `certificate` or `username`.
    pub method: String,
    pub client_ca_crn: Option<String>,
    pub client_ip_pool: String,
    pub client_dns_server_ips: Vec<String>,
    pub client_idle_timeout: Option<u32>,
    pub enable_split_tunneling: bool,
    pub port: u32,
    pub protocol: String,
    pub resource_group: Option<String>,
    pub vpc: String,
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub routes: Vec<VpnServerRoute>,
}

impl Default for VpnServer {
    fn default() -> Self {
        Self {
            name: String::new(),
            certificate_crn: String::new(),
            method: "certificate".to_string(),
            client_ca_crn: None,
            client_ip_pool: String::new(),
            client_dns_server_ips: Vec::new(),
            client_idle_timeout: None,
            enable_split_tunneling: false,
            port: 443,
            protocol: "udp".to_string(),
            resource_group: None,
            vpc: String::new(),
            subnets: Vec::new(),
            security_groups: Vec::new(),
            routes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VpnServerRoute {
    pub name: String,
    pub destination: String,
    /// `translate`, `deliver` or `drop`.
    pub action: String,
}

/// A virtual private endpoint gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vpe {
    pub name: String,
    pub vpc: String,
    /// Target service, `cos` or `secrets-manager`.
    pub service: String,
    /// Service instance name for instance-scoped targets.
    pub instance: Option<String>,
    pub resource_group: Option<String>,
    pub security_groups: Vec<String>,
    pub subnets: Vec<String>,
}

impl Default for Vpe {
    fn default() -> Self {
        Self {
            name: String::new(),
            vpc: String::new(),
            service: "cos".to_string(),
            instance: None,
            resource_group: None,
            security_groups: Vec::new(),
            subnets: Vec::new(),
        }
    }
}
