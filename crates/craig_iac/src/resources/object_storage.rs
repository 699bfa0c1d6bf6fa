//! Object storage instances, buckets and resource keys.

use craig_spec::{Bucket, CosKey, Craig, ObjectStorage};

use super::iam::AuthPolicy;
use super::{tags, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::{resource_name, snake_case};
use crate::refs::{
    block_ref, bucket_address, cos_address, cos_key_address, cos_ref, encryption_key_ref, kms_ref,
    kms_service, resource_or_data, rg_id_ref, Scope,
};
use crate::section::{Formatted, Section};

fn random_suffix_address(cos: &str) -> String {
    format!("{} random suffix", cos)
}

/// `-${random_string.<cos>_random_suffix.result}` when the instance asks for it.
fn random_suffix(cos: &ObjectStorage) -> String {
    if cos.use_random_suffix {
        format!(
            "-${{random_string.{}.result}}",
            snake_case(&random_suffix_address(&cos.name))
        )
    } else {
        String::new()
    }
}

fn auth_policy_address(cos: &str, kms: &str) -> String {
    format!("{} cos to {} kms policy", cos, kms)
}

pub fn format_cos_random_suffix(cos: &ObjectStorage) -> Formatted {
    Attrs::new()
        .set("length", 8)
        .set("special", false)
        .set("upper", false)
        .named(&random_suffix_address(&cos.name))
}

pub fn format_cos_instance(cos: &ObjectStorage, craig: &Craig) -> CraigResult<Formatted> {
    let attrs = if cos.use_data {
        Attrs::new()
            .set("name", cos.name.as_str())
            .set("service", "cloud-object-storage")
    } else {
        Attrs::new()
            .set(
                "name",
                format!(
                    "{}{}",
                    resource_name(craig, &[cos.name.as_str(), "object-storage"]),
                    random_suffix(cos)
                ),
            )
            .set(
                "resource_group_id",
                rg_id_ref(craig, cos.resource_group.as_deref(), "format_cos_instance", Scope::Root)?,
            )
            .set("service", "cloud-object-storage")
            .set("location", "global")
            .set("plan", cos.plan.as_str())
            .set("tags", tags(craig))
    };
    Ok(attrs.named(&cos_address(&cos.name)))
}

/// Authorization letting the instance read its encryption keys.
pub fn format_cos_auth_policy(cos: &ObjectStorage, kms: &str, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_cos_auth_policy";
    let kms_instance = craig
        .key_management(kms)
        .ok_or_else(|| CraigError::missing("key management instance", kms, from))?;
    Ok(AuthPolicy {
        address: auth_policy_address(&cos.name, kms),
        description: "Allow COS instance to read from KMS instance",
        source_service_name: "cloud-object-storage",
        source_resource_type: None,
        source_resource_instance_id: Some(cos_ref(craig, &cos.name, Some("guid"), from)?),
        roles: &["Reader"],
        target_service_name: kms_service(kms_instance),
        target_resource_instance_id: kms_ref(craig, kms, Some("guid"), from)?,
    }
    .format())
}

pub fn format_cos_bucket(cos: &ObjectStorage, bucket: &Bucket, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_cos_bucket";
    let instance = cos_ref(craig, &cos.name, None, from)?;

    let attrs = if bucket.use_data {
        Attrs::new()
            .set("bucket_name", bucket.name.as_str())
            .set("resource_instance_id", instance)
            .set("bucket_region", craig.options.region.as_str())
            .set("bucket_type", "region_location")
    } else {
        let key_protect = match bucket.kms_key.as_deref() {
            Some(key) => {
                let kms = cos.kms.as_deref().ok_or_else(|| {
                    CraigError::invalid(from, "kms_key", format!("object storage `{}` has no kms", cos.name))
                })?;
                Some((
                    encryption_key_ref(craig, kms, key, None, from)?,
                    block_ref("ibm_iam_authorization_policy", &auth_policy_address(&cos.name, kms)),
                ))
            }
            None => None,
        };

        let mut attrs = Attrs::new()
            .set(
                "bucket_name",
                format!("{}{}", resource_name(craig, &[&bucket.name]), random_suffix(cos)),
            )
            .set("resource_instance_id", instance)
            .set("storage_class", bucket.storage_class.as_str())
            .set("endpoint_type", bucket.endpoint.as_deref().unwrap_or("public"))
            .set("force_delete", bucket.force_delete)
            .set("region_location", craig.options.region.as_str());
        if let Some((key, policy)) = key_protect {
            attrs = attrs
                .set("key_protect", key)
                .set("depends_on", vec![policy]);
        }
        attrs
    };

    Ok(attrs.named(&bucket_address(&cos.name, &bucket.name)))
}

pub fn format_cos_key(cos: &ObjectStorage, key: &CosKey, craig: &Craig) -> CraigResult<Formatted> {
    Ok(Attrs::new()
        .set(
            "name",
            format!(
                "{}{}",
                resource_name(craig, &[cos.name.as_str(), "key", &key.name]),
                random_suffix(cos)
            ),
        )
        .set("resource_instance_id", cos_ref(craig, &cos.name, None, "format_cos_key")?)
        .set("role", key.role.as_str())
        .maybe(
            "parameters",
            key.enable_hmac.then(|| Attrs::new().set("HMAC", true)),
        )
        .set("tags", tags(craig))
        .named(&cos_key_address(&cos.name, &key.name)))
}

/// One section per instance.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut sections = Vec::new();

    for cos in &craig.object_storage {
        let mut section = Section::new(format!("{} object storage", cos.name));

        if cos.use_random_suffix {
            section.resource("random_string", format_cos_random_suffix(cos));
        }
        section.push(
            resource_or_data(cos.use_data),
            "ibm_resource_instance",
            format_cos_instance(cos, craig)?,
        );
        if let Some(kms) = cos.kms.as_deref() {
            section.resource("ibm_iam_authorization_policy", format_cos_auth_policy(cos, kms, craig)?);
        }
        for bucket in &cos.buckets {
            section.push(
                resource_or_data(bucket.use_data),
                "ibm_cos_bucket",
                format_cos_bucket(cos, bucket, craig)?,
            );
        }
        for key in &cos.keys {
            section.resource("ibm_resource_key", format_cos_key(cos, key, craig)?);
        }

        sections.push(section);
    }

    Ok(sections)
}
