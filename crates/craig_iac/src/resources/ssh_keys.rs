//! VPC SSH keys.

use craig_spec::{Craig, SshKey};

use super::{tags, Attrs};
use crate::error::{required, CraigResult};
use crate::naming::resource_name;
use crate::refs::{resource_or_data, rg_id_ref, Scope};
use crate::section::{Formatted, Section};

pub fn format_ssh_key(key: &SshKey, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if key.use_data {
        Attrs::new().set("name", key.name.as_str())
    } else {
        Attrs::new()
            .set("name", resource_name(craig, &[&key.name]))
            .set("public_key", required(&key.public_key, "format_ssh_key", "public_key")?)
            .set(
                "resource_group",
                rg_id_ref(craig, key.resource_group.as_deref(), "format_ssh_key", Scope::Root)?,
            )
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&key.name))
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("ssh keys");
    for key in &craig.ssh_keys {
        section.push(resource_or_data(key.use_data), "ibm_is_ssh_key", format_ssh_key(key, craig)?);
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::BlockKind;
    use serde_json::json;

    fn craig(use_data: bool) -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz" },
            "resource_groups": [{ "name": "slz-management-rg", "use_data": use_data }],
            "ssh_keys": [
                { "name": "slz-ssh-key", "public_key": "ssh-rsa AAAA", "resource_group": "slz-management-rg" },
                { "name": "existing-key", "use_data": true }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_ssh_key_resource() {
        let craig = craig(false);
        let key = format_ssh_key(&craig.ssh_keys[0], &craig).unwrap();
        assert_eq!(key.name, "slz_ssh_key");
        assert_eq!(key.data["name"], "slz-slz-ssh-key");
        assert_eq!(key.data["public_key"], "ssh-rsa AAAA");
    }

    #[test]
    fn test_missing_public_key_is_invalid() {
        let mut craig = craig(false);
        craig.ssh_keys[0].public_key = None;
        assert!(format_ssh_key(&craig.ssh_keys[0], &craig).is_err());
    }

    #[test]
    fn test_resource_group_use_data_switches_reference_only() {
        let managed = craig(false);
        let existing = craig(true);
        let a = format_ssh_key(&managed.ssh_keys[0], &managed).unwrap();
        let b = format_ssh_key(&existing.ssh_keys[0], &existing).unwrap();

        assert_eq!(a.data["resource_group"], "${ibm_resource_group.slz_management_rg.id}");
        assert_eq!(b.data["resource_group"], "${data.ibm_resource_group.slz_management_rg.id}");

        let mut a_rest = a.data.clone();
        let mut b_rest = b.data.clone();
        a_rest.remove("resource_group");
        b_rest.remove("resource_group");
        assert_eq!(a_rest, b_rest);
    }

    #[test]
    fn test_data_key_section() {
        let sections = sections(&craig(false)).unwrap();
        assert_eq!(sections[0].emissions[1].kind, BlockKind::Data);
    }
}
