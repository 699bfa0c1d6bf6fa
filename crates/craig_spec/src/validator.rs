//! Configuration validation utilities.
//!
//! Validation runs before generation and collects every problem at once so
//! a user can fix a configuration in one pass. Generation itself still fails
//! fast on the first unresolved reference.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{SpecError, SpecResult};
use crate::models::Craig;

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert into an error when any check failed.
    pub fn into_result(self) -> SpecResult<ValidationResult> {
        if self.valid {
            Ok(self)
        } else {
            Err(SpecError::ValidationFailed(self.errors.join("; ")))
        }
    }
}

/// Validator for CRAIG configurations.
pub struct CraigValidator;

impl CraigValidator {
    /// Validate an entire configuration.
    pub fn validate(craig: &Craig) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(Self::validate_options(craig));
        result.merge(Self::validate_names(craig));
        result.merge(Self::validate_references(craig));
        result
    }

    /// Validate global options.
    pub fn validate_options(craig: &Craig) -> ValidationResult {
        let mut result = ValidationResult::new();

        if craig.options.prefix.is_empty() {
            result.add_error("Option `prefix` cannot be empty");
        }
        if craig.options.region.is_empty() {
            result.add_error("Option `region` cannot be empty");
        }
        if craig.options.tags.is_empty() {
            result.add_warning("No tags configured; resources will be untagged");
        }

        result
    }

    /// Validate that names are present, unique per collection and well formed.
    pub fn validate_names(craig: &Craig) -> ValidationResult {
        let mut result = ValidationResult::new();
        let pattern = Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").ok();

        let mut check = |collection: &str, names: Vec<&str>| {
            let mut seen = HashSet::new();
            for name in names {
                if name.is_empty() {
                    result.add_error(format!("An entry in `{}` has an empty name", collection));
                    continue;
                }
                if !seen.insert(name) {
                    result.add_error(format!(
                        "Duplicate name `{}` in `{}`",
                        name, collection
                    ));
                }
                if !pattern.as_ref().map_or(true, |re| re.is_match(name)) {
                    result.add_warning(format!(
                        "Name `{}` in `{}` should use lowercase letters, digits and hyphens",
                        name, collection
                    ));
                }
            }
        };

        check("resource_groups", craig.resource_groups.iter().map(|e| e.name.as_str()).collect());
        check("key_management", craig.key_management.iter().map(|e| e.name.as_str()).collect());
        check("object_storage", craig.object_storage.iter().map(|e| e.name.as_str()).collect());
        check("vpcs", craig.vpcs.iter().map(|e| e.name.as_str()).collect());
        check("security_groups", craig.security_groups.iter().map(|e| e.name.as_str()).collect());
        check("ssh_keys", craig.ssh_keys.iter().map(|e| e.name.as_str()).collect());
        check("vsi", craig.vsi.iter().map(|e| e.name.as_str()).collect());
        check("load_balancers", craig.load_balancers.iter().map(|e| e.name.as_str()).collect());
        check("transit_gateways", craig.transit_gateways.iter().map(|e| e.name.as_str()).collect());
        check("vpn_gateways", craig.vpn_gateways.iter().map(|e| e.name.as_str()).collect());
        check("vpn_servers", craig.vpn_servers.iter().map(|e| e.name.as_str()).collect());
        check("appid", craig.appid.iter().map(|e| e.name.as_str()).collect());
        check("access_groups", craig.access_groups.iter().map(|e| e.name.as_str()).collect());
        check("cbr_zones", craig.cbr_zones.iter().map(|e| e.name.as_str()).collect());
        check("cbr_rules", craig.cbr_rules.iter().map(|e| e.name.as_str()).collect());
        check("f5_vsi", craig.f5_vsi.iter().map(|e| e.name.as_str()).collect());
        check("teleport_vsi", craig.teleport_vsi.iter().map(|e| e.name.as_str()).collect());
        check("icd", craig.icd.iter().map(|e| e.name.as_str()).collect());
        check("power", craig.power.iter().map(|e| e.name.as_str()).collect());
        check("power_instances", craig.power_instances.iter().map(|e| e.name.as_str()).collect());
        check("power_volumes", craig.power_volumes.iter().map(|e| e.name.as_str()).collect());
        check("clusters", craig.clusters.iter().map(|e| e.name.as_str()).collect());
        check(
            "virtual_private_endpoints",
            craig.virtual_private_endpoints.iter().map(|e| e.name.as_str()).collect(),
        );
        check("event_streams", craig.event_streams.iter().map(|e| e.name.as_str()).collect());
        check("secrets_manager", craig.secrets_manager.iter().map(|e| e.name.as_str()).collect());

        for vpc in &craig.vpcs {
            check(
                &format!("vpcs.{}.subnets", vpc.name),
                vpc.subnets.iter().map(|e| e.name.as_str()).collect(),
            );
            check(
                &format!("vpcs.{}.acls", vpc.name),
                vpc.acls.iter().map(|e| e.name.as_str()).collect(),
            );
        }
        for kms in &craig.key_management {
            check(
                &format!("key_management.{}.keys", kms.name),
                kms.keys.iter().map(|e| e.name.as_str()).collect(),
            );
        }
        // Bucket names are global, so they must not repeat across instances.
        check(
            "object_storage.buckets",
            craig
                .object_storage
                .iter()
                .flat_map(|cos| cos.buckets.iter().map(|e| e.name.as_str()))
                .collect(),
        );

        result
    }

    /// Validate that every cross reference names a declared entity.
    pub fn validate_references(craig: &Craig) -> ValidationResult {
        let mut result = ValidationResult::new();

        let mut require = |found: bool, owner: String, kind: &str, name: &str| {
            if !found {
                result.add_error(format!(
                    "{} references unknown {} `{}`",
                    owner, kind, name
                ));
            }
        };

        let rg_exists = |name: &Option<String>| {
            name.as_deref().map_or(true, |n| craig.resource_group(n).is_some())
        };
        let key_exists = |kms: &Option<String>, key: &Option<String>| match (kms, key) {
            (Some(kms), Some(key)) => craig
                .key_management(kms)
                .map_or(false, |k| k.key(key).is_some()),
            _ => true,
        };
        let subnet_exists = |vpc: &str, subnet: &str| {
            craig.vpc(vpc).map_or(false, |v| v.subnet(subnet).is_some())
        };

        for vpc in &craig.vpcs {
            let owner = format!("VPC `{}`", vpc.name);
            require(rg_exists(&vpc.resource_group), owner.clone(), "resource group", vpc.resource_group.as_deref().unwrap_or_default());
            if let Some(bucket) = &vpc.bucket {
                let found = vpc
                    .cos
                    .as_deref()
                    .and_then(|cos| craig.object_storage(cos))
                    .map_or(false, |cos| cos.bucket(bucket).is_some());
                require(found, owner.clone(), "bucket", bucket);
            }
            for subnet in &vpc.subnets {
                if let Some(acl) = &subnet.network_acl {
                    require(vpc.acl(acl).is_some(), format!("Subnet `{}`", subnet.name), "network ACL", acl);
                }
            }
        }

        for sg in &craig.security_groups {
            let owner = format!("Security group `{}`", sg.name);
            if let Some(vpc) = &sg.vpc {
                require(craig.vpc(vpc).is_some(), owner.clone(), "VPC", vpc);
            }
            require(rg_exists(&sg.resource_group), owner, "resource group", sg.resource_group.as_deref().unwrap_or_default());
        }

        for cos in &craig.object_storage {
            let owner = format!("Object storage `{}`", cos.name);
            require(rg_exists(&cos.resource_group), owner.clone(), "resource group", cos.resource_group.as_deref().unwrap_or_default());
            if let Some(kms) = &cos.kms {
                require(craig.key_management(kms).is_some(), owner.clone(), "key management", kms);
                for bucket in &cos.buckets {
                    let key = bucket.kms_key.clone();
                    require(
                        key_exists(&cos.kms, &key),
                        format!("Bucket `{}`", bucket.name),
                        "encryption key",
                        key.as_deref().unwrap_or_default(),
                    );
                }
            }
        }

        for vsi in &craig.vsi {
            let owner = format!("VSI deployment `{}`", vsi.name);
            require(craig.vpc(&vsi.vpc).is_some(), owner.clone(), "VPC", &vsi.vpc);
            for subnet in &vsi.subnets {
                require(subnet_exists(&vsi.vpc, subnet), owner.clone(), "subnet", subnet);
            }
            for key in &vsi.ssh_keys {
                require(craig.ssh_key(key).is_some(), owner.clone(), "SSH key", key);
            }
            require(
                key_exists(&vsi.kms, &vsi.encryption_key),
                owner.clone(),
                "encryption key",
                vsi.encryption_key.as_deref().unwrap_or_default(),
            );
        }

        for lb in &craig.load_balancers {
            let owner = format!("Load balancer `{}`", lb.name);
            for target in &lb.target_vsi {
                require(craig.vsi_deployment(target).is_some(), owner.clone(), "VSI deployment", target);
            }
            for subnet in &lb.subnets {
                require(subnet_exists(&lb.vpc, subnet), owner.clone(), "subnet", subnet);
            }
        }

        for tgw in &craig.transit_gateways {
            for connection in &tgw.connections {
                let owner = format!("Transit gateway `{}`", tgw.name);
                if let Some(vpc) = &connection.vpc {
                    require(craig.vpc(vpc).is_some(), owner.clone(), "VPC", vpc);
                }
                if let Some(power) = &connection.power {
                    require(craig.power_workspace(power).is_some(), owner, "Power VS workspace", power);
                }
            }
        }

        for gw in &craig.vpn_gateways {
            require(
                subnet_exists(&gw.vpc, &gw.subnet),
                format!("VPN gateway `{}`", gw.name),
                "subnet",
                &gw.subnet,
            );
        }

        for cluster in &craig.clusters {
            let owner = format!("Cluster `{}`", cluster.name);
            for subnet in &cluster.subnets {
                require(subnet_exists(&cluster.vpc, subnet), owner.clone(), "subnet", subnet);
            }
            if let Some(cos) = &cluster.cos {
                require(craig.object_storage(cos).is_some(), owner.clone(), "object storage", cos);
            }
        }

        for teleport in &craig.teleport_vsi {
            let owner = format!("Teleport VSI `{}`", teleport.name);
            require(
                craig.appid_instance(&teleport.appid).is_some(),
                owner.clone(),
                "AppID",
                &teleport.appid,
            );
            let template = &teleport.template;
            require(
                craig
                    .object_storage(&template.cos)
                    .map_or(false, |cos| cos.bucket(&template.bucket).is_some()),
                owner,
                "bucket",
                &template.bucket,
            );
        }

        for instance in &craig.power_instances {
            require(
                craig.power_workspace(&instance.workspace).is_some(),
                format!("Power instance `{}`", instance.name),
                "Power VS workspace",
                &instance.workspace,
            );
        }

        for volume in &craig.power_volumes {
            for attachment in &volume.attachments {
                require(
                    craig.power_instance(attachment).is_some(),
                    format!("Power volume `{}`", volume.name),
                    "Power instance",
                    attachment,
                );
            }
        }

        if craig.atracker.enabled {
            require(
                craig.bucket(&craig.atracker.bucket).is_some(),
                "Activity tracker".to_string(),
                "bucket",
                &craig.atracker.bucket,
            );
        }

        for vsi in &craig.vsi {
            let owner = format!("VSI deployment `{}`", vsi.name);
            let interfaces = vsi.network_interfaces.iter().flat_map(|i| &i.security_groups);
            check_security_groups(craig, &mut result, &owner, &vsi.vpc, vsi.security_groups.iter().chain(interfaces));
        }
        for f5 in &craig.f5_vsi {
            let owner = format!("F5 VSI `{}`", f5.name);
            let interfaces = f5.network_interfaces.iter().flat_map(|i| &i.security_groups);
            check_security_groups(craig, &mut result, &owner, &f5.vpc, f5.security_groups.iter().chain(interfaces));
        }
        for teleport in &craig.teleport_vsi {
            let owner = format!("Teleport VSI `{}`", teleport.name);
            check_security_groups(craig, &mut result, &owner, &teleport.vpc, &teleport.security_groups);
        }
        for lb in &craig.load_balancers {
            let owner = format!("Load balancer `{}`", lb.name);
            check_security_groups(craig, &mut result, &owner, &lb.vpc, &lb.security_groups);
        }
        for server in &craig.vpn_servers {
            let owner = format!("VPN server `{}`", server.name);
            check_security_groups(craig, &mut result, &owner, &server.vpc, &server.security_groups);
        }
        for vpe in &craig.virtual_private_endpoints {
            let owner = format!("VPE `{}`", vpe.name);
            check_security_groups(craig, &mut result, &owner, &vpe.vpc, &vpe.security_groups);
        }

        result
    }
}

/// Every security group must be declared in the VPC of the entity using it.
fn check_security_groups<'a>(
    craig: &Craig,
    result: &mut ValidationResult,
    owner: &str,
    vpc: &str,
    groups: impl IntoIterator<Item = &'a String>,
) {
    for name in groups {
        match craig.security_group(name) {
            None => result.add_error(format!("{} references unknown security group `{}`", owner, name)),
            Some(sg) if sg.vpc.as_deref() != Some(vpc) => result.add_error(format!(
                "{} in VPC `{}` references security group `{}` of VPC `{}`",
                owner,
                vpc,
                name,
                sg.vpc.as_deref().unwrap_or_default()
            )),
            Some(_) => {}
        }
    }
}
