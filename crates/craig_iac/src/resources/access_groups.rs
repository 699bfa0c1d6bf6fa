//! IAM access groups with their policies, dynamic rules and invites.

use craig_spec::{AccessGroup, AccessPolicy, Craig, DynamicPolicy};

use super::{tags, Attrs};
use crate::error::CraigResult;
use crate::naming::resource_name;
use crate::refs::{rg_id_ref, tf_ref, Scope};
use crate::section::{Formatted, Section};

fn group_address(group: &str) -> String {
    format!("{} access group", group)
}

fn group_ref(group: &AccessGroup) -> String {
    tf_ref("ibm_iam_access_group", &group_address(&group.name), None, false)
}

pub fn format_access_group(group: &AccessGroup, craig: &Craig) -> Formatted {
    Attrs::new()
        .set("name", resource_name(craig, &[group.name.as_str(), "ag"]))
        .set("description", group.description.as_str())
        .set("tags", tags(craig))
        .named(&group_address(&group.name))
}

pub fn format_access_group_policy(
    group: &AccessGroup,
    policy: &AccessPolicy,
    craig: &Craig,
) -> CraigResult<Formatted> {
    let from = "format_access_group_policy";
    let scope = &policy.resources;
    let resource_group = match scope.resource_group.as_deref() {
        Some(rg) => Some(rg_id_ref(craig, Some(rg), from, Scope::Root)?),
        None => None,
    };
    let resources = Attrs::new()
        .maybe("resource_group_id", resource_group)
        .maybe("resource_type", scope.resource_type.clone())
        .maybe("resource", scope.resource.clone())
        .maybe("service", scope.service.clone())
        .maybe("resource_instance_id", scope.resource_instance_id.clone())
        .build();

    Ok(Attrs::new()
        .set("access_group_id", group_ref(group))
        .set("roles", policy.roles.clone())
        .set_if(!resources.is_empty(), "resources", resources)
        .named(&format!("{} {} policy", group.name, policy.name)))
}

pub fn format_access_group_dynamic_rule(group: &AccessGroup, rule: &DynamicPolicy, craig: &Craig) -> Formatted {
    Attrs::new()
        .set("name", resource_name(craig, &[group.name.as_str(), &rule.name]))
        .set("access_group_id", group_ref(group))
        .set("expiration", rule.expiration)
        .set("identity_provider", rule.identity_provider.as_str())
        .set(
            "conditions",
            Attrs::new()
                .set("claim", rule.conditions.claim.as_str())
                .set("operator", rule.conditions.operator.as_str())
                .set("value", rule.conditions.value.as_str()),
        )
        .named(&format!("{} {} dynamic rule", group.name, rule.name))
}

pub fn format_access_group_members(group: &AccessGroup) -> Formatted {
    let invites = &group.invites;
    Attrs::new()
        .set("access_group_id", group_ref(group))
        .set_if(!invites.ibm_ids.is_empty(), "ibm_ids", invites.ibm_ids.clone())
        .set_if(
            !invites.iam_service_ids.is_empty(),
            "iam_service_ids",
            invites.iam_service_ids.clone(),
        )
        .set_if(
            !invites.iam_profile_ids.is_empty(),
            "iam_profile_ids",
            invites.iam_profile_ids.clone(),
        )
        .named(&format!("{} invites", group.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for group in &craig.access_groups {
        let mut section = Section::new(format!("{} access group", group.name));
        section.resource("ibm_iam_access_group", format_access_group(group, craig));
        for policy in &group.policies {
            section.resource(
                "ibm_iam_access_group_policy",
                format_access_group_policy(group, policy, craig)?,
            );
        }
        for rule in &group.dynamic_policies {
            section.resource(
                "ibm_iam_access_group_dynamic_rule",
                format_access_group_dynamic_rule(group, rule, craig),
            );
        }
        if group.has_invites {
            section.resource("ibm_iam_access_group_members", format_access_group_members(group));
        }
        sections.push(section);
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz" },
            "resource_groups": [{ "name": "slz-service-rg" }],
            "access_groups": [{
                "name": "admins",
                "description": "Account administrators",
                "policies": [{
                    "name": "admin-policy",
                    "roles": ["Administrator"],
                    "resources": { "resource_group": "slz-service-rg", "service": "kms" }
                }, {
                    "name": "viewer",
                    "roles": ["Viewer"]
                }],
                "dynamic_policies": [{
                    "name": "sso",
                    "identity_provider": "https://sso.example.com",
                    "expiration": 2,
                    "conditions": { "claim": "group", "operator": "EQUALS", "value": "admins" }
                }],
                "has_invites": true,
                "invites": { "ibm_ids": ["admin@example.com"] }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_policy_resources() {
        let craig = craig();
        let group = &craig.access_groups[0];
        let policy = format_access_group_policy(group, &group.policies[0], &craig).unwrap();
        assert_eq!(policy.name, "admins_admin_policy_policy");
        assert_eq!(policy.data["access_group_id"], "${ibm_iam_access_group.admins_access_group.id}");
        assert_eq!(
            policy.data["resources"],
            json!({ "resource_group_id": "${ibm_resource_group.slz_service_rg.id}", "service": "kms" })
        );

        let viewer = format_access_group_policy(group, &group.policies[1], &craig).unwrap();
        assert!(viewer.data.get("resources").is_none());
    }

    #[test]
    fn test_dynamic_rule_conditions_block() {
        let craig = craig();
        let group = &craig.access_groups[0];
        let rule = format_access_group_dynamic_rule(group, &group.dynamic_policies[0], &craig);
        assert_eq!(rule.data["name"], "slz-admins-sso");
        assert_eq!(rule.data["conditions"]["operator"], "EQUALS");
    }

    #[test]
    fn test_members_only_list_present_ids() {
        let craig = craig();
        let members = format_access_group_members(&craig.access_groups[0]);
        assert_eq!(members.data["ibm_ids"], json!(["admin@example.com"]));
        assert!(members.data.get("iam_service_ids").is_none());

        let sections = sections(&craig).unwrap();
        assert_eq!(sections[0].emissions.len(), 5);
    }
}
