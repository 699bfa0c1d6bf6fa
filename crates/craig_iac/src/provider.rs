//! Provider, terraform and base variable trees.

use serde_json::{json, Map, Value};

use craig_spec::Craig;

/// IBM Cloud provider source.
pub const IBM_PROVIDER_SOURCE: &str = "IBM-Cloud/ibm";
/// IBM Cloud provider version pinned by generated configurations.
pub const IBM_PROVIDER_VERSION: &str = "1.60.0";
/// Random provider source, used for object storage name suffixes.
pub const RANDOM_PROVIDER_SOURCE: &str = "hashicorp/random";
pub const RANDOM_PROVIDER_VERSION: &str = "3.4.3";
/// Minimum Terraform version.
pub const TERRAFORM_VERSION: &str = ">=1.5";
/// Provider timeout in seconds.
pub const IBMCLOUD_TIMEOUT: u32 = 60;

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Provider alias for a Power VS zone.
pub fn power_alias(zone: &str) -> String {
    format!("power_vs_{}", zone.replace('-', "_"))
}

/// Power VS region for a zone, e.g. `dal10` is in `dal`.
pub fn power_region(zone: &str) -> String {
    zone.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
}

/// Zones needing a Power VS provider alias, in first-seen order.
pub fn power_zones(craig: &Craig) -> Vec<String> {
    let mut zones: Vec<String> = Vec::new();
    if craig.options.enable_power_vs {
        zones.extend(craig.options.power_vs_zones.iter().cloned());
    }
    for workspace in &craig.power {
        if !zones.contains(&workspace.zone) {
            zones.push(workspace.zone.clone());
        }
    }
    zones
}

/// `provider` tree: the default IBM provider plus one alias per Power VS zone.
pub fn provider_tree(craig: &Craig) -> Map<String, Value> {
    let mut providers = vec![json!({
        "ibmcloud_api_key": "${var.ibmcloud_api_key}",
        "region": craig.options.region,
        "ibmcloud_timeout": IBMCLOUD_TIMEOUT
    })];
    for zone in power_zones(craig) {
        providers.push(json!({
            "alias": power_alias(&zone),
            "ibmcloud_api_key": "${var.ibmcloud_api_key}",
            "region": power_region(&zone),
            "zone": zone,
            "ibmcloud_timeout": IBMCLOUD_TIMEOUT
        }));
    }

    let mut tree = Map::new();
    tree.insert("ibm".to_string(), Value::Array(providers));
    tree
}

fn uses_random_suffix(craig: &Craig) -> bool {
    craig.object_storage.iter().any(|cos| cos.use_random_suffix)
}

/// `terraform` tree with required providers.
pub fn terraform_tree(craig: &Craig) -> Map<String, Value> {
    let mut providers = Map::new();
    providers.insert(
        "ibm".to_string(),
        json!({ "source": IBM_PROVIDER_SOURCE, "version": IBM_PROVIDER_VERSION }),
    );
    if uses_random_suffix(craig) {
        providers.insert(
            "random".to_string(),
            json!({ "source": RANDOM_PROVIDER_SOURCE, "version": RANDOM_PROVIDER_VERSION }),
        );
    }

    let mut tree = Map::new();
    tree.insert("required_providers".to_string(), Value::Object(providers));
    tree.insert("required_version".to_string(), json!(TERRAFORM_VERSION));
    tree
}

/// `terraform` tree for a VPC module, which only needs the IBM provider.
pub fn module_terraform_tree() -> Map<String, Value> {
    object(json!({
        "required_providers": {
            "ibm": { "source": IBM_PROVIDER_SOURCE, "version": IBM_PROVIDER_VERSION }
        },
        "required_version": TERRAFORM_VERSION
    }))
}

/// Name of the variable holding a VPN connection's preshared key.
pub fn preshared_key_variable(gateway: &str, connection: &str) -> String {
    format!(
        "{}_{}_preshared_key",
        crate::naming::snake_case(gateway),
        crate::naming::snake_case(connection)
    )
}

fn sensitive_string(description: &str) -> Value {
    json!({ "description": description, "type": "string", "sensitive": true })
}

/// `variable` tree: the API key plus secrets required by enabled families.
pub fn variables_tree(craig: &Craig) -> Map<String, Value> {
    let mut tree = Map::new();
    tree.insert(
        "ibmcloud_api_key".to_string(),
        sensitive_string("The IBM Cloud platform API key needed to deploy IAM enabled resources."),
    );

    if !craig.f5_vsi.is_empty() {
        tree.insert(
            "tmos_admin_password".to_string(),
            sensitive_string("F5 TMOS Admin Password"),
        );
    }

    for gateway in &craig.vpn_gateways {
        for connection in &gateway.connections {
            tree.insert(
                preshared_key_variable(&gateway.name, &connection.name),
                sensitive_string(&format!(
                    "Preshared key for VPN Gateway {} connection {}",
                    gateway.name, connection.name
                )),
            );
        }
    }

    if craig.scc.enable {
        tree.insert(
            "scc_scope_credential_id".to_string(),
            json!({
                "description": "ID of the credential used by the Security and Compliance Center scope",
                "type": "string"
            }),
        );
    }

    tree
}
