//! Teleport bastion hosts.
//!
//! A bastion stores session recordings in an object storage bucket through
//! HMAC credentials and authenticates users with an AppID OIDC connector,
//! whose callback URL is registered with the AppID instance.

use serde::Serialize;

use craig_spec::{Craig, TeleportVsi};

use super::appid::{appid_key_address, format_appid_redirect_urls};
use super::cloud_init::{cloud_config, WriteFile};
use super::f5::f5_images;
use super::vsi::{format_vsi_image, image_ref, security_group_refs, ssh_key_refs, vsi_images};
use super::{subnet_zone, tags, zone_name, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{
    appid_ref, bucket_ref, cos_key_ref, optional_encryption_key_ref, rg_id_ref, subnet_ref, tf_ref, vpc_ref,
    BlockKind, Scope,
};
use crate::section::{Formatted, Section};

pub fn teleport_address(teleport: &TeleportVsi) -> String {
    format!("{} vpc {} teleport vsi", teleport.vpc, teleport.name)
}

/// OIDC callback registered with AppID for a bastion.
pub fn redirect_url(teleport: &TeleportVsi) -> String {
    format!(
        "https://{}.{}:3080/v1/webapi/oidc/callback",
        teleport.template.hostname, teleport.template.domain
    )
}

fn appid_key_credential(teleport: &TeleportVsi, craig: &Craig, field: &str, from: &str) -> CraigResult<String> {
    let key = &teleport.template.app_id_key;
    craig
        .appid_instance(&teleport.appid)
        .ok_or_else(|| CraigError::missing("appid instance", teleport.appid.as_str(), from))?
        .key(key)
        .ok_or_else(|| CraigError::missing("appid key", format!("{}/{}", teleport.appid, key), from))?;
    Ok(tf_ref(
        "ibm_resource_key",
        &appid_key_address(&teleport.appid, key),
        Some(&format!("credentials[\"{}\"]", field)),
        false,
    ))
}

#[derive(Serialize)]
struct TeleportConfig {
    teleport: TeleportNode,
    auth_service: AuthService,
    proxy_service: ProxyService,
    ssh_service: Enabled,
}

#[derive(Serialize)]
struct TeleportNode {
    nodename: String,
    data_dir: &'static str,
    storage: Storage,
}

#[derive(Serialize)]
struct Storage {
    audit_sessions_uri: String,
}

#[derive(Serialize)]
struct AuthService {
    enabled: bool,
    cluster_name: String,
    authentication: Authentication,
    message_of_the_day: String,
    license_file: &'static str,
}

#[derive(Serialize)]
struct Authentication {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ProxyService {
    enabled: bool,
    web_listen_addr: &'static str,
    public_addr: String,
    https_keypairs: Vec<KeyPair>,
}

#[derive(Serialize)]
struct KeyPair {
    key_file: &'static str,
    cert_file: &'static str,
}

#[derive(Serialize)]
struct Enabled {
    enabled: bool,
}

#[derive(Serialize)]
struct OidcConnector {
    kind: &'static str,
    version: &'static str,
    metadata: Metadata,
    spec: OidcSpec,
}

#[derive(Serialize)]
struct Metadata {
    name: &'static str,
}

#[derive(Serialize)]
struct OidcSpec {
    redirect_url: String,
    client_id: String,
    client_secret: String,
    issuer_url: String,
    scope: [&'static str; 2],
    claims_to_roles: Vec<ClaimMapping>,
}

#[derive(Serialize)]
struct ClaimMapping {
    claim: &'static str,
    value: String,
    roles: Vec<String>,
}

#[derive(Serialize)]
struct TeleportCloudConfig {
    write_files: Vec<WriteFile>,
    runcmd: Vec<String>,
}

/// Render the cloud-init document installing and configuring Teleport.
pub fn teleport_user_data(teleport: &TeleportVsi, craig: &Craig) -> CraigResult<String> {
    let from = "teleport_user_data";
    let template = &teleport.template;
    let cos = &template.cos;

    let bucket = bucket_ref(craig, cos, &template.bucket, None, from)?;
    let access_key = cos_key_ref(
        craig,
        cos,
        &template.cos_key,
        "credentials[\"cos_hmac_keys.access_key_id\"]",
        from,
    )?;
    let secret_key = cos_key_ref(
        craig,
        cos,
        &template.cos_key,
        "credentials[\"cos_hmac_keys.secret_access_key\"]",
        from,
    )?;
    let fqdn = format!("{}.{}", template.hostname, template.domain);

    let config = TeleportConfig {
        teleport: TeleportNode {
            nodename: template.hostname.clone(),
            data_dir: "/var/lib/teleport",
            storage: Storage {
                audit_sessions_uri: format!(
                    "s3://{}/recordings?endpoint=s3.{}.cloud-object-storage.appdomain.cloud&region=ibm",
                    bucket, craig.options.region
                ),
            },
        },
        auth_service: AuthService {
            enabled: true,
            cluster_name: fqdn.clone(),
            authentication: Authentication { kind: "oidc" },
            message_of_the_day: template.message_of_the_day.clone(),
            license_file: "/var/lib/teleport/license.pem",
        },
        proxy_service: ProxyService {
            enabled: true,
            web_listen_addr: "0.0.0.0:3080",
            public_addr: format!("{}:3080", fqdn),
            https_keypairs: vec![KeyPair {
                key_file: "/var/lib/teleport/key.pem",
                cert_file: "/var/lib/teleport/cert.pem",
            }],
        },
        ssh_service: Enabled { enabled: true },
    };

    let connector = OidcConnector {
        kind: "oidc",
        version: "v2",
        metadata: Metadata { name: "appid" },
        spec: OidcSpec {
            redirect_url: redirect_url(teleport),
            client_id: appid_key_credential(teleport, craig, "clientId", from)?,
            client_secret: appid_key_credential(teleport, craig, "secret", from)?,
            issuer_url: appid_key_credential(teleport, craig, "oauthServerUrl", from)?,
            scope: ["openid", "email"],
            claims_to_roles: template
                .claims_to_roles
                .iter()
                .map(|claim| ClaimMapping {
                    claim: "email",
                    value: claim.email.clone(),
                    roles: claim.roles.clone(),
                })
                .collect(),
        },
    };

    let document = TeleportCloudConfig {
        write_files: vec![
            WriteFile::private("/etc/teleport.yaml", serde_yaml::to_string(&config)?),
            WriteFile::private("/etc/teleport/oidc.yaml", serde_yaml::to_string(&connector)?),
            WriteFile::private("/var/lib/teleport/license.pem", template.license.as_str()),
            WriteFile::private("/var/lib/teleport/cert.pem", template.https_cert.as_str()),
            WriteFile::private("/var/lib/teleport/key.pem", template.https_key.as_str()),
            WriteFile::private(
                "/root/.aws/credentials",
                format!(
                    "[default]\naws_access_key_id = {}\naws_secret_access_key = {}\n",
                    access_key, secret_key
                ),
            ),
        ],
        runcmd: vec![
            format!(
                "curl -fsSL https://get.gravitational.com/teleport-ent-v{}-linux-amd64-bin.tar.gz | tar -xz -C /tmp",
                template.version
            ),
            "/tmp/teleport-ent/install".to_string(),
            "systemctl enable --now teleport".to_string(),
            "tctl create -f /etc/teleport/oidc.yaml".to_string(),
        ],
    };
    cloud_config(&document)
}

pub fn format_teleport_vsi(teleport: &TeleportVsi, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_teleport_vsi";
    let zone = subnet_zone(&teleport.subnet, from)?;
    let boot_encryption = optional_encryption_key_ref(
        craig,
        teleport.kms.as_deref(),
        teleport.encryption_key.as_deref(),
        from,
    )?;

    let primary = Attrs::new()
        .set("subnet", subnet_ref(craig, &teleport.vpc, &teleport.subnet, None, from, Scope::Root)?)
        .set("security_groups", security_group_refs(&teleport.security_groups, &teleport.vpc, craig, from)?);

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[teleport.name.as_str()]))
        .set("image", image_ref(&teleport.image))
        .set("profile", teleport.profile.as_str())
        .set(
            "resource_group",
            rg_id_ref(craig, teleport.resource_group.as_deref(), from, Scope::Root)?,
        )
        .set("vpc", vpc_ref(craig, &teleport.vpc, None, from, Scope::Root)?)
        .set("zone", zone_name(craig, zone))
        .set("tags", tags(craig))
        .set("primary_network_interface", primary)
        .maybe(
            "boot_volume",
            boot_encryption.map(|key| Attrs::new().set("encryption", key)),
        )
        .set("keys", ssh_key_refs(&teleport.ssh_keys, craig, from)?)
        .set("user_data", teleport_user_data(teleport, craig)?)
        .named(&teleport_address(teleport)))
}

/// Catalog images used only by bastions.
fn teleport_images(craig: &Craig) -> Vec<&str> {
    let mut shared = vsi_images(craig);
    shared.extend(f5_images(craig));
    let mut images: Vec<&str> = Vec::new();
    for teleport in &craig.teleport_vsi {
        let image = teleport.image.as_str();
        if !image.contains("local") && !shared.contains(&image) && !images.contains(&image) {
            images.push(image);
        }
    }
    images
}

/// Bastion instances plus one redirect URL block per distinct AppID instance.
pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("teleport");
    for image in teleport_images(craig) {
        section.push(BlockKind::Data, "ibm_is_image", format_vsi_image(image));
    }
    for teleport in &craig.teleport_vsi {
        section.resource("ibm_is_instance", format_teleport_vsi(teleport, craig)?);
    }

    let mut appids: Vec<&str> = Vec::new();
    for teleport in &craig.teleport_vsi {
        if !appids.contains(&teleport.appid.as_str()) {
            appids.push(&teleport.appid);
        }
    }
    for appid in appids {
        appid_ref(craig, appid, None, "format_appid_redirect_urls")?;
        let urls = craig
            .teleport_vsi
            .iter()
            .filter(|teleport| teleport.appid == appid)
            .map(redirect_url)
            .collect();
        section.resource("ibm_appid_redirect_urls", format_appid_redirect_urls(appid, urls, craig)?);
    }

    Ok(vec![section])
}
