//! F5 BIG-IP virtual edition instances.
//!
//! Each instance boots from a `tmos_declared` cloud-init document built from
//! its typed template. The admin password is never written into the
//! document; it is read from the `tmos_admin_password` variable.

use serde::Serialize;

use craig_spec::{Craig, F5Template, F5Vsi};

use super::cloud_init::{cloud_config, nullable};
use super::vsi::{format_vsi_image, image_ref, network_interfaces, security_group_refs, ssh_key_refs, vsi_images};
use super::{tags, zone_name, Attrs};
use crate::error::{CraigError, CraigResult};
use crate::naming::resource_name;
use crate::refs::{optional_encryption_key_ref, rg_id_ref, subnet_ref, vpc_ref, BlockKind, Scope};
use crate::section::{Formatted, Section};

const DO_PACKAGE: &str = "https://github.com/F5Networks/f5-declarative-onboarding/releases/download/v1.21.0/f5-declarative-onboarding-1.21.0-3.noarch.rpm";
const AS3_PACKAGE: &str = "https://github.com/F5Networks/f5-appsvcs-extension/releases/download/v3.28.0/f5-appsvcs-3.28.0-3.noarch.rpm";
const TS_PACKAGE: &str = "https://github.com/F5Networks/f5-telemetry-streaming/releases/download/v1.20.0/f5-telemetry-1.20.0-3.noarch.rpm";
const FAILOVER_PACKAGE: &str = "https://github.com/f5devcentral/f5-cloud-failover-extension/releases/download/v1.8.0/f5-cloud-failover-1.8.0-0.noarch.rpm";

pub fn f5_address(f5: &F5Vsi) -> String {
    format!("{} vpc {} f5 vsi", f5.vpc, f5.name)
}

fn required_license_field<'a>(value: &'a Option<String>, field: &str) -> CraigResult<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CraigError::invalid("f5_user_data", field, "is required by the selected license type"))
}

#[derive(Serialize)]
struct F5CloudConfig<'a> {
    chpasswd: Chpasswd,
    tmos_declared: TmosDeclared<'a>,
}

#[derive(Serialize)]
struct Chpasswd {
    expire: bool,
    list: &'static str,
}

#[derive(Serialize)]
struct TmosDeclared<'a> {
    enabled: bool,
    icontrollx_trusted_sources: bool,
    icontrollx_package_urls: [&'static str; 4],
    do_declaration: DoDeclaration<'a>,
    do_declaration_url: Option<&'a str>,
    as3_declaration_url: Option<&'a str>,
    ts_declaration_url: Option<&'a str>,
    phone_home_url: Option<&'a str>,
    phone_home_url_verify_tls: bool,
    phone_home_url_metadata: PhoneHomeMetadata<'a>,
    tgactive_url: Option<&'a str>,
    tgstandby_url: Option<&'a str>,
    tgrefresh_url: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DoDeclaration<'a> {
    schema_version: &'static str,
    class: &'static str,
    #[serde(rename = "async")]
    run_async: bool,
    #[serde(rename = "Common")]
    common: Tenant<'a>,
}

#[derive(Serialize)]
struct Tenant<'a> {
    class: &'static str,
    hostname: String,
    #[serde(rename = "myLicense", skip_serializing_if = "Option::is_none")]
    my_license: Option<License<'a>>,
    dbvars: DbVariables,
    default: Route,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct License<'a> {
    class: &'static str,
    license_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reg_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    big_iq_host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    big_iq_username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    big_iq_password: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_pool: Option<&'a str>,
    #[serde(rename = "skuKeyword1", skip_serializing_if = "Option::is_none")]
    sku_keyword_1: Option<&'a str>,
    #[serde(rename = "skuKeyword2", skip_serializing_if = "Option::is_none")]
    sku_keyword_2: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_of_measure: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hypervisor: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overwrite: Option<bool>,
}

#[derive(Serialize)]
struct DbVariables {
    class: &'static str,
    #[serde(rename = "restjavad.useextramb")]
    restjavad_useextramb: bool,
    #[serde(rename = "provision.extramb")]
    provision_extramb: u32,
    #[serde(rename = "ui.advisory.enabled")]
    ui_advisory_enabled: bool,
    #[serde(rename = "ui.advisory.color")]
    ui_advisory_color: &'static str,
}

#[derive(Serialize)]
struct Route {
    class: &'static str,
    gw: String,
    network: &'static str,
    mtu: u32,
}

#[derive(Serialize)]
struct PhoneHomeMetadata<'a> {
    template_source: &'a str,
    template_version: &'a str,
    zone: u8,
    vpc: &'a str,
    app_id: Option<&'a str>,
}

fn utility_field<'a>(utility: bool, value: &'a Option<String>, field: &str) -> CraigResult<Option<&'a str>> {
    if utility {
        required_license_field(value, field).map(Some)
    } else {
        Ok(None)
    }
}

fn pool_license(template: &F5Template, utility: bool) -> CraigResult<License<'_>> {
    Ok(License {
        class: "License",
        license_type: "licensePool",
        big_iq_host: Some(required_license_field(&template.license_host, "license_host")?),
        big_iq_username: Some(required_license_field(&template.license_username, "license_username")?),
        big_iq_password: Some("${var.tmos_admin_password}"),
        license_pool: Some(required_license_field(&template.license_pool, "license_pool")?),
        sku_keyword_1: utility_field(utility, &template.license_sku_keyword_1, "license_sku_keyword_1")?,
        sku_keyword_2: utility_field(utility, &template.license_sku_keyword_2, "license_sku_keyword_2")?,
        unit_of_measure: utility_field(utility, &template.license_unit_of_measure, "license_unit_of_measure")?,
        reachable: Some(false),
        hypervisor: Some("kvm"),
        overwrite: Some(true),
        ..Default::default()
    })
}

/// `myLicense` entry of the onboarding declaration.
fn license(template: &F5Template) -> CraigResult<Option<License<'_>>> {
    match template.license_type.as_str() {
        "none" => Ok(None),
        "byol" => Ok(Some(License {
            class: "License",
            license_type: "regKey",
            reg_key: Some(required_license_field(&template.byol_license_basekey, "byol_license_basekey")?),
            ..Default::default()
        })),
        "regkeypool" => pool_license(template, false).map(Some),
        "utilitypool" => pool_license(template, true).map(Some),
        other => Err(CraigError::invalid(
            "f5_user_data",
            "license_type",
            format!("unknown license type `{}`", other),
        )),
    }
}

/// Render the cloud-init document for one instance.
pub fn f5_user_data(f5: &F5Vsi) -> CraigResult<String> {
    let template = &f5.template;
    let document = F5CloudConfig {
        chpasswd: Chpasswd {
            expire: false,
            list: "admin:${var.tmos_admin_password}",
        },
        tmos_declared: TmosDeclared {
            enabled: true,
            icontrollx_trusted_sources: false,
            icontrollx_package_urls: [DO_PACKAGE, AS3_PACKAGE, TS_PACKAGE, FAILOVER_PACKAGE],
            do_declaration: DoDeclaration {
                schema_version: "1.0.0",
                class: "Device",
                run_async: true,
                common: Tenant {
                    class: "Tenant",
                    hostname: format!("{}.{}", template.hostname, template.domain),
                    my_license: license(template)?,
                    dbvars: DbVariables {
                        class: "DbVariables",
                        restjavad_useextramb: true,
                        provision_extramb: 1000,
                        ui_advisory_enabled: true,
                        ui_advisory_color: "blue",
                    },
                    default: Route {
                        class: "Route",
                        gw: format!("${{cidrhost(\"{}\", 1)}}", template.default_route_gateway_cidr),
                        network: "default",
                        mtu: 1500,
                    },
                },
            },
            do_declaration_url: nullable(&template.do_declaration_url),
            as3_declaration_url: nullable(&template.as3_declaration_url),
            ts_declaration_url: nullable(&template.ts_declaration_url),
            phone_home_url: nullable(&template.phone_home_url),
            phone_home_url_verify_tls: false,
            phone_home_url_metadata: PhoneHomeMetadata {
                template_source: &template.template_source,
                template_version: &template.template_version,
                zone: f5.zone,
                vpc: &f5.vpc,
                app_id: nullable(&template.app_id),
            },
            tgactive_url: nullable(&template.tgactive_url),
            tgstandby_url: nullable(&template.tgstandby_url),
            tgrefresh_url: nullable(&template.tgrefresh_url),
        },
    };
    cloud_config(&document)
}

pub fn format_f5_vsi(f5: &F5Vsi, craig: &Craig) -> CraigResult<Formatted> {
    let from = "format_f5_vsi";
    let boot_encryption = optional_encryption_key_ref(
        craig,
        f5.kms.as_deref(),
        f5.encryption_key.as_deref(),
        from,
    )?;

    let primary = Attrs::new()
        .set("subnet", subnet_ref(craig, &f5.vpc, &f5.subnet, None, from, Scope::Root)?)
        .set("security_groups", security_group_refs(&f5.security_groups, &f5.vpc, craig, from)?);

    Ok(Attrs::new()
        .set("name", resource_name(craig, &[f5.name.as_str()]))
        .set("image", image_ref(&f5.image))
        .set("profile", f5.profile.as_str())
        .set("resource_group", rg_id_ref(craig, f5.resource_group.as_deref(), from, Scope::Root)?)
        .set("vpc", vpc_ref(craig, &f5.vpc, None, from, Scope::Root)?)
        .set("zone", zone_name(craig, u32::from(f5.zone)))
        .set("tags", tags(craig))
        .set("primary_network_interface", primary)
        .maybe(
            "boot_volume",
            boot_encryption.map(|key| Attrs::new().set("encryption", key)),
        )
        .set("keys", ssh_key_refs(&f5.ssh_keys, craig, from)?)
        .set("user_data", f5_user_data(f5)?)
        .set_if(
            !f5.network_interfaces.is_empty(),
            "network_interfaces",
            network_interfaces(&f5.network_interfaces, &f5.vpc, craig, from)?,
        )
        .named(&f5_address(f5)))
}

/// Catalog images used by F5 instances and not already emitted for VSIs.
pub fn f5_images(craig: &Craig) -> Vec<&str> {
    let shared = vsi_images(craig);
    let mut images: Vec<&str> = Vec::new();
    for f5 in &craig.f5_vsi {
        let image = f5.image.as_str();
        if !image.contains("local") && !shared.contains(&image) && !images.contains(&image) {
            images.push(image);
        }
    }
    images
}

pub fn sections(craig: &Craig) -> CraigResult<Vec<Section>> {
    let mut section = Section::new("f5 big ip");
    for image in f5_images(craig) {
        section.push(BlockKind::Data, "ibm_is_image", format_vsi_image(image));
    }
    for f5 in &craig.f5_vsi {
        section.resource("ibm_is_instance", format_f5_vsi(f5, craig)?);
    }
    Ok(vec![section])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn craig() -> Craig {
        serde_json::from_value(json!({
            "_options": { "prefix": "slz", "region": "us-south" },
            "resource_groups": [{ "name": "slz-edge-rg" }],
            "vpcs": [{
                "name": "edge",
                "subnets": [{ "name": "f5-management-zone-1", "cidr": "10.5.30.0/24" }]
            }],
            "security_groups": [{ "name": "f5-management-sg", "vpc": "edge" }],
            "ssh_keys": [{ "name": "slz-ssh-key", "public_key": "ssh-rsa AAAA" }],
            "f5_vsi": [{
                "name": "f5-zone-1",
                "vpc": "edge",
                "zone": 1,
                "subnet": "f5-management-zone-1",
                "security_groups": ["f5-management-sg"],
                "ssh_keys": ["slz-ssh-key"],
                "resource_group": "slz-edge-rg",
                "template": {
                    "hostname": "f5-ve-01",
                    "domain": "local",
                    "default_route_gateway_cidr": "10.10.10.10/24"
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_f5_instance() {
        let craig = craig();
        let f5 = format_f5_vsi(&craig.f5_vsi[0], &craig).unwrap();
        assert_eq!(f5.name, "edge_vpc_f_5_zone_1_f_5_vsi");
        assert_eq!(f5.data["name"], "slz-f5-zone-1");
        assert_eq!(f5.data["zone"], "us-south-1");
        assert_eq!(
            f5.data["image"],
            "${data.ibm_is_image.f_5_bigip_16_1_2_2_0_0_28_all_1_slot.id}"
        );
        assert_eq!(
            f5.data["primary_network_interface"]["subnet"],
            "${module.edge_vpc.subnet_f_5_management_zone_1_id}"
        );
    }

    fn parse(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_user_data_default_route_and_password() {
        let text = f5_user_data(&craig().f5_vsi[0]).unwrap();
        assert!(text.starts_with("#cloud-config\n"));

        let document = parse(&text);
        assert_eq!(document["chpasswd"]["list"].as_str(), Some("admin:${var.tmos_admin_password}"));
        let common = &document["tmos_declared"]["do_declaration"]["Common"];
        assert_eq!(common["hostname"].as_str(), Some("f5-ve-01.local"));
        assert_eq!(common["default"]["gw"].as_str(), Some("${cidrhost(\"10.10.10.10/24\", 1)}"));
        assert_eq!(common["dbvars"]["provision.extramb"].as_u64(), Some(1000));
        assert!(common.get("myLicense").is_none());
        assert!(document["tmos_declared"]["phone_home_url"].is_null());
        assert_eq!(document["tmos_declared"]["phone_home_url_metadata"]["zone"].as_u64(), Some(1));
    }

    #[test]
    fn test_byol_license_requires_basekey() {
        let mut craig = craig();
        craig.f5_vsi[0].template.license_type = "byol".to_string();
        assert!(f5_user_data(&craig.f5_vsi[0]).is_err());

        craig.f5_vsi[0].template.byol_license_basekey = Some("AAAAA-BBBBB".to_string());
        let document = parse(&f5_user_data(&craig.f5_vsi[0]).unwrap());
        let license = &document["tmos_declared"]["do_declaration"]["Common"]["myLicense"];
        assert_eq!(license["licenseType"].as_str(), Some("regKey"));
        assert_eq!(license["regKey"].as_str(), Some("AAAAA-BBBBB"));
    }

    #[test]
    fn test_template_values_are_escaped() {
        let mut craig = craig();
        let template = &mut craig.f5_vsi[0].template;
        template.license_type = "utilitypool".to_string();
        template.license_host = Some("bigiq.example.com".to_string());
        template.license_username = Some("admin: ops".to_string());
        template.license_pool = Some("pool\n# not a comment".to_string());
        template.license_sku_keyword_1 = Some("F5-BIG-MSP".to_string());
        template.license_sku_keyword_2 = Some("10G".to_string());
        template.license_unit_of_measure = Some("hourly".to_string());
        template.phone_home_url = "https://example.com/home?a=1&b=#2".to_string();

        let document = parse(&f5_user_data(&craig.f5_vsi[0]).unwrap());
        let license = &document["tmos_declared"]["do_declaration"]["Common"]["myLicense"];
        assert_eq!(license["licenseType"].as_str(), Some("licensePool"));
        assert_eq!(license["bigIqUsername"].as_str(), Some("admin: ops"));
        assert_eq!(license["licensePool"].as_str(), Some("pool\n# not a comment"));
        assert_eq!(license["skuKeyword2"].as_str(), Some("10G"));
        assert_eq!(license["bigIqPassword"].as_str(), Some("${var.tmos_admin_password}"));
        assert_eq!(
            document["tmos_declared"]["phone_home_url"].as_str(),
            Some("https://example.com/home?a=1&b=#2")
        );
    }

    #[test]
    fn test_images_shared_with_vsi_are_not_repeated() {
        let mut craig = craig();
        assert_eq!(f5_images(&craig), vec!["f5-bigip-16-1-2-2-0-0-28-all-1slot"]);

        craig.vsi.push(craig_spec::Vsi {
            name: "bastion".to_string(),
            image_name: "f5-bigip-16-1-2-2-0-0-28-all-1slot".to_string(),
            ..Default::default()
        });
        assert!(f5_images(&craig).is_empty());
    }
}
