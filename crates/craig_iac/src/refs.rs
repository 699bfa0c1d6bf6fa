//! Reference builders.
//!
//! Every helper resolves the named entity in the configuration before
//! building an interpolation, so an unknown name fails immediately with
//! `CraigError::MissingReference` instead of producing a dangling reference.

use craig_spec::{Craig, KeyManagement};

use crate::error::{CraigError, CraigResult};
use crate::naming::snake_case;

/// Whether an entity is emitted as a managed resource or a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Resource,
    Data,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Resource => "resource",
            BlockKind::Data => "data",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single resource/data capability check used by every formatter.
pub fn resource_or_data(use_data: bool) -> BlockKind {
    if use_data {
        BlockKind::Data
    } else {
        BlockKind::Resource
    }
}

/// Module boundary a reference is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The root configuration, outside any VPC module.
    Root,
    /// Inside the generated module of a single VPC.
    VpcModule,
}

/// `${[data.]type.address.attribute}`; the attribute defaults to `id`.
pub fn tf_ref(tf_type: &str, address: &str, attribute: Option<&str>, use_data: bool) -> String {
    let data = if use_data { "data." } else { "" };
    format!(
        "${{{}{}.{}.{}}}",
        data,
        tf_type,
        snake_case(address),
        attribute.unwrap_or("id")
    )
}

/// Reference to a whole block, as used in `depends_on`.
pub fn block_ref(tf_type: &str, address: &str) -> String {
    format!("${{{}.{}}}", tf_type, snake_case(address))
}

/// Wrap an already composed expression in interpolation syntax.
pub fn cdktf_ref(expr: &str) -> String {
    format!("${{{}}}", expr)
}

pub fn vpc_address(vpc: &str) -> String {
    format!("{} vpc", vpc)
}

pub fn subnet_address(vpc: &str, subnet: &str) -> String {
    format!("{} {}", vpc, subnet)
}

pub fn sg_address(vpc: &str, sg: &str) -> String {
    format!("{} vpc {} sg", vpc, sg)
}

pub fn kms_key_address(kms: &str, key: &str) -> String {
    format!("{} {} key", kms, key)
}

pub fn cos_address(cos: &str) -> String {
    format!("{} object storage", cos)
}

pub fn bucket_address(cos: &str, bucket: &str) -> String {
    format!("{} object storage {} bucket", cos, bucket)
}

pub fn cos_key_address(cos: &str, key: &str) -> String {
    format!("{} object storage key {}", cos, key)
}

pub fn power_workspace_address(workspace: &str) -> String {
    format!("power vs workspace {}", workspace)
}

/// Label of the module block generated for a VPC.
pub fn module_name(vpc: &str) -> String {
    snake_case(&vpc_address(vpc))
}

/// Name of the module variable carrying a resource group ID.
pub fn rg_variable(rg: &str) -> String {
    format!("{}_id", snake_case(rg))
}

/// Name of the module output for a subnet attribute.
pub fn subnet_output(subnet: &str, attribute: &str) -> String {
    format!("subnet_{}_{}", snake_case(subnet), attribute)
}

/// Name of the module output for a security group ID.
pub fn sg_output(sg: &str) -> String {
    format!("sg_{}_id", snake_case(sg))
}

fn module_output(vpc: &str, output: &str) -> String {
    format!("${{module.{}.{}}}", module_name(vpc), output)
}

/// Resource group ID reference.
pub fn rg_id_ref(craig: &Craig, rg: Option<&str>, from: &str, scope: Scope) -> CraigResult<String> {
    let name = rg
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CraigError::invalid(from, "resource_group", "is required"))?;
    let group = craig
        .resource_group(name)
        .ok_or_else(|| CraigError::missing("resource group", name, from))?;

    Ok(match scope {
        Scope::VpcModule => format!("${{var.{}}}", rg_variable(&group.name)),
        Scope::Root => tf_ref("ibm_resource_group", &group.name, None, group.use_data),
    })
}

/// VPC reference; from the root this reads the VPC module outputs.
pub fn vpc_ref(
    craig: &Craig,
    vpc: &str,
    attribute: Option<&str>,
    from: &str,
    scope: Scope,
) -> CraigResult<String> {
    let found = craig
        .vpc(vpc)
        .ok_or_else(|| CraigError::missing("vpc", vpc, from))?;
    let attribute = attribute.unwrap_or("id");

    Ok(match scope {
        Scope::VpcModule => tf_ref("ibm_is_vpc", &vpc_address(vpc), Some(attribute), found.use_data),
        Scope::Root => module_output(vpc, attribute),
    })
}

/// Subnet reference within a VPC.
pub fn subnet_ref(
    craig: &Craig,
    vpc: &str,
    subnet: &str,
    attribute: Option<&str>,
    from: &str,
    scope: Scope,
) -> CraigResult<String> {
    let found = craig
        .vpc(vpc)
        .ok_or_else(|| CraigError::missing("vpc", vpc, from))?
        .subnet(subnet)
        .ok_or_else(|| CraigError::missing("subnet", format!("{}/{}", vpc, subnet), from))?;
    let attribute = attribute.unwrap_or("id");

    Ok(match scope {
        Scope::VpcModule => tf_ref(
            "ibm_is_subnet",
            &subnet_address(vpc, subnet),
            Some(attribute),
            found.use_data,
        ),
        Scope::Root => module_output(vpc, &subnet_output(subnet, attribute)),
    })
}

/// Security group ID reference; the group must belong to `vpc`.
pub fn sg_ref(craig: &Craig, vpc: &str, sg: &str, from: &str, scope: Scope) -> CraigResult<String> {
    let found = craig
        .security_group(sg)
        .ok_or_else(|| CraigError::missing("security group", sg, from))?;
    let owner = found
        .vpc
        .as_deref()
        .ok_or_else(|| CraigError::invalid(from, "vpc", format!("security group `{}` has no vpc", sg)))?;
    if owner != vpc {
        return Err(CraigError::invalid(
            from,
            "security_groups",
            format!("security group `{}` belongs to vpc `{}`, not `{}`", sg, owner, vpc),
        ));
    }

    Ok(match scope {
        Scope::VpcModule => tf_ref("ibm_is_security_group", &sg_address(vpc, sg), None, found.use_data),
        Scope::Root => module_output(vpc, &sg_output(sg)),
    })
}

/// Terraform service name of a key management instance.
pub fn kms_service(kms: &KeyManagement) -> &'static str {
    if kms.use_hs_crypto {
        "hs-crypto"
    } else {
        "kms"
    }
}

/// Key management instance reference.
pub fn kms_ref(craig: &Craig, kms: &str, attribute: Option<&str>, from: &str) -> CraigResult<String> {
    let found = craig
        .key_management(kms)
        .ok_or_else(|| CraigError::missing("key management instance", kms, from))?;
    Ok(tf_ref("ibm_resource_instance", kms, attribute, found.use_data))
}

/// Encryption key reference; the attribute defaults to `crn`.
pub fn encryption_key_ref(
    craig: &Craig,
    kms: &str,
    key: &str,
    attribute: Option<&str>,
    from: &str,
) -> CraigResult<String> {
    craig
        .key_management(kms)
        .ok_or_else(|| CraigError::missing("key management instance", kms, from))?
        .key(key)
        .ok_or_else(|| CraigError::missing("encryption key", format!("{}/{}", kms, key), from))?;
    Ok(tf_ref(
        "ibm_kms_key",
        &kms_key_address(kms, key),
        Some(attribute.unwrap_or("crn")),
        false,
    ))
}

/// Optional `kms`/`encryption_key` pair; both or neither must be set.
pub fn optional_encryption_key_ref(
    craig: &Craig,
    kms: Option<&str>,
    key: Option<&str>,
    from: &str,
) -> CraigResult<Option<String>> {
    match (kms, key) {
        (Some(kms), Some(key)) => encryption_key_ref(craig, kms, key, None, from).map(Some),
        (None, Some(_)) => Err(CraigError::invalid(from, "kms", "is required with encryption_key")),
        _ => Ok(None),
    }
}

/// Object storage instance reference.
pub fn cos_ref(craig: &Craig, cos: &str, attribute: Option<&str>, from: &str) -> CraigResult<String> {
    let found = craig
        .object_storage(cos)
        .ok_or_else(|| CraigError::missing("object storage instance", cos, from))?;
    Ok(tf_ref("ibm_resource_instance", &cos_address(cos), attribute, found.use_data))
}

/// Bucket reference within an object storage instance; the attribute
/// defaults to `bucket_name`.
pub fn bucket_ref(
    craig: &Craig,
    cos: &str,
    bucket: &str,
    attribute: Option<&str>,
    from: &str,
) -> CraigResult<String> {
    let found = craig
        .object_storage(cos)
        .ok_or_else(|| CraigError::missing("object storage instance", cos, from))?
        .bucket(bucket)
        .ok_or_else(|| CraigError::missing("bucket", format!("{}/{}", cos, bucket), from))?;
    Ok(tf_ref(
        "ibm_cos_bucket",
        &bucket_address(cos, bucket),
        Some(attribute.unwrap_or("bucket_name")),
        found.use_data,
    ))
}

/// Object storage resource key reference.
pub fn cos_key_ref(craig: &Craig, cos: &str, key: &str, attribute: &str, from: &str) -> CraigResult<String> {
    craig
        .object_storage(cos)
        .ok_or_else(|| CraigError::missing("object storage instance", cos, from))?
        .key(key)
        .ok_or_else(|| CraigError::missing("object storage key", format!("{}/{}", cos, key), from))?;
    Ok(tf_ref("ibm_resource_key", &cos_key_address(cos, key), Some(attribute), false))
}

/// SSH key reference honoring the key's own `use_data`.
pub fn ssh_key_ref(craig: &Craig, key: &str, from: &str) -> CraigResult<String> {
    let found = craig
        .ssh_key(key)
        .ok_or_else(|| CraigError::missing("ssh key", key, from))?;
    Ok(tf_ref("ibm_is_ssh_key", key, None, found.use_data))
}

/// AppID instance reference.
pub fn appid_ref(craig: &Craig, appid: &str, attribute: Option<&str>, from: &str) -> CraigResult<String> {
    let found = craig
        .appid_instance(appid)
        .ok_or_else(|| CraigError::missing("appid instance", appid, from))?;
    Ok(tf_ref("ibm_resource_instance", appid, attribute, found.use_data))
}

/// Power VS workspace reference.
pub fn power_workspace_ref(
    craig: &Craig,
    workspace: &str,
    attribute: Option<&str>,
    from: &str,
) -> CraigResult<String> {
    let found = craig
        .power_workspace(workspace)
        .ok_or_else(|| CraigError::missing("power vs workspace", workspace, from))?;
    Ok(tf_ref(
        "ibm_resource_instance",
        &power_workspace_address(workspace),
        attribute,
        found.use_data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "resource_groups": [
                { "name": "slz-management-rg" },
                { "name": "existing-rg", "use_data": true }
            ],
            "key_management": [{ "name": "slz-kms", "keys": [{ "name": "slz-vsi-key" }] }],
            "vpcs": [{
                "name": "management",
                "subnets": [{ "name": "vsi-zone-1", "cidr": "10.10.10.0/24" }]
            }],
            "security_groups": [{ "name": "management-vsi", "vpc": "management" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_tf_ref() {
        assert_eq!(tf_ref("ibm_is_vpc", "management vpc", None, false), "${ibm_is_vpc.management_vpc.id}");
        assert_eq!(
            tf_ref("ibm_is_vpc", "management vpc", Some("crn"), true),
            "${data.ibm_is_vpc.management_vpc.crn}"
        );
    }

    #[test]
    fn test_cdktf_ref() {
        assert_eq!(cdktf_ref("var.prefix"), "${var.prefix}");
    }

    #[test]
    fn test_rg_id_ref_scopes() {
        let craig = craig();
        assert_eq!(
            rg_id_ref(&craig, Some("slz-management-rg"), "test", Scope::Root).unwrap(),
            "${ibm_resource_group.slz_management_rg.id}"
        );
        assert_eq!(
            rg_id_ref(&craig, Some("slz-management-rg"), "test", Scope::VpcModule).unwrap(),
            "${var.slz_management_rg_id}"
        );
        assert_eq!(
            rg_id_ref(&craig, Some("existing-rg"), "test", Scope::Root).unwrap(),
            "${data.ibm_resource_group.existing_rg.id}"
        );
    }

    #[test]
    fn test_missing_resource_group_fails() {
        let err = rg_id_ref(&craig(), Some("nope"), "format_vpc", Scope::Root).unwrap_err();
        assert!(matches!(
            err,
            CraigError::MissingReference { kind: "resource group", ref name, .. } if name == "nope"
        ));
    }

    #[test]
    fn test_vpc_children_from_root_use_module_outputs() {
        let craig = craig();
        assert_eq!(
            subnet_ref(&craig, "management", "vsi-zone-1", None, "test", Scope::Root).unwrap(),
            "${module.management_vpc.subnet_vsi_zone_1_id}"
        );
        assert_eq!(
            subnet_ref(&craig, "management", "vsi-zone-1", None, "test", Scope::VpcModule).unwrap(),
            "${ibm_is_subnet.management_vsi_zone_1.id}"
        );
        assert_eq!(
            sg_ref(&craig, "management", "management-vsi", "test", Scope::Root).unwrap(),
            "${module.management_vpc.sg_management_vsi_id}"
        );
        assert_eq!(
            vpc_ref(&craig, "management", Some("crn"), "test", Scope::Root).unwrap(),
            "${module.management_vpc.crn}"
        );
    }

    #[test]
    fn test_sg_ref_rejects_group_of_another_vpc() {
        let mut craig = craig();
        craig.vpcs.push(craig_spec::Vpc {
            name: "workload".to_string(),
            ..Default::default()
        });
        let err = sg_ref(&craig, "workload", "management-vsi", "format_vsi", Scope::Root).unwrap_err();
        assert!(matches!(
            err,
            CraigError::InvalidField { ref field, ref message, .. }
                if field == "security_groups" && message.contains("belongs to vpc `management`")
        ));
    }

    #[test]
    fn test_bucket_ref_resolves_within_instance() {
        let craig: Craig = serde_json::from_value(json!({
            "object_storage": [
                { "name": "atracker-cos", "buckets": [{ "name": "logs" }] },
                { "name": "cos", "buckets": [{ "name": "logs" }] }
            ]
        }))
        .unwrap();
        assert_eq!(
            bucket_ref(&craig, "cos", "logs", None, "test").unwrap(),
            "${ibm_cos_bucket.cos_object_storage_logs_bucket.bucket_name}"
        );
        assert!(matches!(
            bucket_ref(&craig, "cos", "missing", None, "test").unwrap_err(),
            CraigError::MissingReference { kind: "bucket", .. }
        ));
    }

    #[test]
    fn test_encryption_key_ref_defaults_to_crn() {
        let craig = craig();
        assert_eq!(
            encryption_key_ref(&craig, "slz-kms", "slz-vsi-key", None, "test").unwrap(),
            "${ibm_kms_key.slz_kms_slz_vsi_key_key.crn}"
        );
        assert!(encryption_key_ref(&craig, "slz-kms", "missing", None, "test").is_err());
    }
}
