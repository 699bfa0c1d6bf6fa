//! CDKTF JSON tree accumulation.

use serde_json::{Map, Value};

use crate::error::{CraigError, CraigResult};
use crate::section::Emission;

fn child_map<'a>(map: &'a mut Map<String, Value>, key: &str) -> CraigResult<&'a mut Map<String, Value>> {
    map.entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| CraigError::invalid("cdktf_values", key, "is not an object"))
}

/// Insert `tree[category][tf_type][name] = attrs`, creating levels lazily.
pub fn cdktf_values(
    tree: &mut Map<String, Value>,
    category: &str,
    tf_type: &str,
    name: &str,
    attrs: Map<String, Value>,
) -> CraigResult<()> {
    let names = child_map(child_map(tree, category)?, tf_type)?;
    if names.contains_key(name) {
        return Err(CraigError::DuplicateAddress(format!(
            "{}.{}.{}",
            category, tf_type, name
        )));
    }
    names.insert(name.to_string(), Value::Object(attrs));
    Ok(())
}

/// Insert `tree[category][name] = attrs` for `module`, `variable` and `output`.
pub fn cdktf_block(
    tree: &mut Map<String, Value>,
    category: &str,
    name: &str,
    attrs: Map<String, Value>,
) -> CraigResult<()> {
    let names = child_map(tree, category)?;
    if names.contains_key(name) {
        return Err(CraigError::DuplicateAddress(format!("{}.{}", category, name)));
    }
    names.insert(name.to_string(), Value::Object(attrs));
    Ok(())
}

/// Add a formatted emission to the tree.
pub fn add_emission(tree: &mut Map<String, Value>, emission: &Emission) -> CraigResult<()> {
    cdktf_values(
        tree,
        emission.kind.as_str(),
        emission.tf_type,
        &emission.name,
        emission.data.clone(),
    )
}

/// Shallow-copy every key of `src` into `dest`.
pub fn transpose(src: &Map<String, Value>, dest: &mut Map<String, Value>) {
    for (key, value) in src {
        dest.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cdktf_values_creates_levels() {
        let mut tree = Map::new();
        let mut attrs = Map::new();
        attrs.insert("name".to_string(), json!("rg"));
        cdktf_values(&mut tree, "resource", "ibm_resource_group", "rg", attrs).unwrap();

        assert_eq!(
            Value::Object(tree),
            json!({ "resource": { "ibm_resource_group": { "rg": { "name": "rg" } } } })
        );
    }

    #[test]
    fn test_duplicate_address_is_rejected() {
        let mut tree = Map::new();
        cdktf_values(&mut tree, "data", "ibm_is_image", "img", Map::new()).unwrap();
        let err = cdktf_values(&mut tree, "data", "ibm_is_image", "img", Map::new()).unwrap_err();
        assert!(matches!(err, CraigError::DuplicateAddress(ref a) if a == "data.ibm_is_image.img"));
    }

    #[test]
    fn test_transpose_keeps_destination_order() {
        let mut dest = Map::new();
        dest.insert("source".to_string(), json!("./management_vpc"));
        let mut src = Map::new();
        src.insert("rg_id".to_string(), json!("${ibm_resource_group.rg.id}"));
        transpose(&src, &mut dest);

        let keys: Vec<&String> = dest.keys().collect();
        assert_eq!(keys, vec!["source", "rg_id"]);
    }

    #[test]
    fn test_transpose_copies_do_not_alias() {
        let template = json!({ "zone": null, "profile": "cx2-4x8" });
        let template = template.as_object().unwrap();

        let mut first = Map::new();
        transpose(template, &mut first);
        first.insert("zone".to_string(), json!("us-south-1"));

        let mut second = Map::new();
        transpose(template, &mut second);
        assert_eq!(second["zone"], Value::Null);
        assert_eq!(first["profile"], second["profile"]);
    }
}
