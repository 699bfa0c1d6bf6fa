//! IAM authorization policies and account settings.

use craig_spec::{Craig, IamAccountSettings};

use super::Attrs;
use crate::error::CraigResult;
use crate::section::{Formatted, Section};

/// A service-to-service authorization policy.
#[derive(Debug, Clone)]
pub struct AuthPolicy<'a> {
    pub address: String,
    pub description: &'a str,
    pub source_service_name: &'a str,
    pub source_resource_type: Option<&'a str>,
    pub source_resource_instance_id: Option<String>,
    pub roles: &'a [&'a str],
    pub target_service_name: &'a str,
    pub target_resource_instance_id: String,
}

impl AuthPolicy<'_> {
    pub fn format(&self) -> Formatted {
        Attrs::new()
            .set("source_service_name", self.source_service_name)
            .maybe("source_resource_type", self.source_resource_type)
            .maybe("source_resource_instance_id", self.source_resource_instance_id.clone())
            .set("description", self.description)
            .set("roles", self.roles.to_vec())
            .set("target_service_name", self.target_service_name)
            .set("target_resource_instance_id", self.target_resource_instance_id.as_str())
            .named(&self.address)
    }
}

pub fn format_iam_account_settings(settings: &IamAccountSettings) -> Formatted {
    Attrs::new()
        .set("mfa", settings.mfa.as_str())
        .maybe("allowed_ip_addresses", settings.allowed_ip_addresses.clone())
        .set("include_history", settings.include_history)
        .maybe("if_match", settings.if_match.clone())
        .maybe("max_sessions_per_identity", settings.max_sessions_per_identity)
        .set("restrict_create_service_id", settings.restrict_create_service_id.as_str())
        .set(
            "restrict_create_platform_apikey",
            settings.restrict_create_platform_apikey.as_str(),
        )
        .maybe(
            "session_expiration_in_seconds",
            settings.session_expiration_in_seconds.clone(),
        )
        .maybe(
            "session_invalidation_in_seconds",
            settings.session_invalidation_in_seconds.clone(),
        )
        .named("iam account settings")
}

/// IAM account settings, only when enabled.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("iam account settings");
    if craig.iam_account_settings.enable {
        section.resource(
            "ibm_iam_account_settings",
            format_iam_account_settings(&craig.iam_account_settings),
        );
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_policy_skips_unset_source_fields() {
        let policy = AuthPolicy {
            address: "slz-kms server protect policy".to_string(),
            description: "Allow block storage volumes to be encrypted by Key Management instance.",
            source_service_name: "server-protect",
            source_resource_type: None,
            source_resource_instance_id: None,
            roles: &["Reader"],
            target_service_name: "kms",
            target_resource_instance_id: "${ibm_resource_instance.slz_kms.guid}".to_string(),
        }
        .format();

        assert_eq!(policy.name, "slz_kms_server_protect_policy");
        assert!(!policy.data.contains_key("source_resource_type"));
        assert_eq!(policy.data["roles"], json!(["Reader"]));
    }

    #[test]
    fn test_account_settings_disabled_is_empty() {
        let sections = sections(&Craig::default()).unwrap();
        assert!(sections[0].is_empty());
    }

    #[test]
    fn test_account_settings_enabled() {
        let craig: Craig = serde_json::from_value(json!({
            "iam_account_settings": { "enable": true, "mfa": "TOTP", "max_sessions_per_identity": 5 }
        }))
        .unwrap();
        let sections = sections(&craig).unwrap();
        let data = &sections[0].emissions[0].data;
        assert_eq!(data["mfa"], "TOTP");
        assert_eq!(data["max_sessions_per_identity"], 5);
        assert!(!data.contains_key("if_match"));
    }
}
