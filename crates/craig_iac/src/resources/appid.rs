//! AppID instances, their resource keys and redirect URLs.

use craig_spec::{AppId, AppIdKey, Craig};

use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{appid_ref, resource_or_data, rg_id_ref, Scope};
use crate::section::{Formatted, Section};

pub fn format_appid(appid: &AppId, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if appid.use_data {
        Attrs::new().set("name", appid.name.as_str())
    } else {
        Attrs::new()
            .set("name", resource_name(craig, &[&appid.name]))
            .set(
                "resource_group_id",
                rg_id_ref(craig, appid.resource_group.as_deref(), "format_appid", Scope::Root)?,
            )
            .set("service", "appid")
            .set("plan", "graduated-tier")
            .set("location", craig.options.region.as_str())
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&appid.name))
}

pub fn appid_key_address(appid: &str, key: &str) -> String {
    format!("{} key {}", appid, key)
}

pub fn format_appid_key(appid: &AppId, key: &AppIdKey, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set("name", resource_name(craig, &[appid.name.as_str(), &key.name, "key"]))
        .set("resource_instance_id", appid_ref(craig, &appid.name, None, "format_appid_key")?)
        .set("role", "Writer")
        .set("tags", tags(craig))
        .named(&appid_key_address(&appid.name, &key.name)))
}

/// Redirect URLs registered with an instance.
pub fn format_appid_redirect_urls(appid: &str, urls: Vec<String>, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_appid_redirect_urls";
    if urls.is_empty() {
        return Err(CraigError::invalid(from, "urls", "at least one redirect url is required"));
    }
    Ok(Attrs::new()
        .set("tenant_id", appid_ref(craig, appid, Some("guid"), from)?)
        .set("urls", urls)
        .named(&format!("{} urls", appid)))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();
    for appid in &craig.appid {
        let mut section = Section::new(format!("{} appid", appid.name));
        section.push(
            resource_or_data(appid.use_data),
            "ibm_resource_instance",
            format_appid(appid, craig)?,
        );
        for key in &appid.keys {
            section.resource("ibm_resource_key", format_appid_key(appid, key, craig)?);
        }
        sections.push(section);
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig(use_data: bool) -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south" },
            "resource_groups": [{ "name": "slz-service-rg" }],
            "appid": [{
                "name": "appid",
                "resource_group": "slz-service-rg",
                "use_data": use_data,
                "keys": [{ "name": "teleport" }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_appid_instance() {
        let craig = craig(false);
        let appid = format_appid(&craig.appid[0], &craig).unwrap();
        assert_eq!(appid.data["service"], "appid");
        assert_eq!(appid.data["plan"], "graduated-tier");
    }

    #[test]
    fn test_key_follows_instance_use_data() {
        let craig = craig(true);
        let key = format_appid_key(&craig.appid[0], &craig.appid[0].keys[0], &craig).unwrap();
        assert_eq!(key.name, "appid_key_teleport");
        assert_eq!(key.data["resource_instance_id"], "${data.ibm_resource_instance.appid.id}");
    }

    #[test]
    fn test_redirect_urls() {
        let craig = craig(false);
        let urls = format_appid_redirect_urls(
            "appid",
            vec!["https://teleport.example.com:3080/v1/webapi/oidc/callback".to_string()],
            &craig,
        )
        .unwrap();
        assert_eq!(urls.name, "appid_urls");
        assert_eq!(urls.data["tenant_id"], "${ibm_resource_instance.appid.guid}");
        assert!(format_appid_redirect_urls("appid", Vec::new(), &craig).is_err());
    }
}
