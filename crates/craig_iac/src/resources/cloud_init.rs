//! Cloud-init documents passed to instances as `user_data`.

use serde::Serialize;

use crate::error::CraigResult;

/// One entry of the `write_files` module.
#[derive(Debug, Serialize)]
pub struct WriteFile {
    pub path: &'static str,
    pub permissions: &'static str,
    pub content: String,
}

impl WriteFile {
    /// A file readable by root only.
    pub fn private(path: &'static str, content: impl Into<String>) -> Self {
        Self {
            path,
            permissions: "0600",
            content: content.into(),
        }
    }
}

/// Serialize a document behind the `#cloud-config` header.
pub fn cloud_config<T: Serialize>(document: &T) -> CraigResult<String> {
    Ok(format!("#cloud-config\n{}", serde_yaml::to_string(document)?))
}

/// Optional template value; empty strings and `null` serialize as YAML null.
pub fn nullable(value: &str) -> Option<&str> {
    if value.is_empty() || value == "null" {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Files {
        write_files: Vec<WriteFile>,
    }

    #[test]
    fn test_multiline_content_stays_valid() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB: abc\n-----END CERTIFICATE-----\n";
        let text = cloud_config(&Files {
            write_files: vec![WriteFile::private("/etc/cert.pem", pem)],
        })
        .unwrap();
        assert!(text.starts_with("#cloud-config\n"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed["write_files"][0]["content"].as_str(), Some(pem));
        assert_eq!(parsed["write_files"][0]["permissions"].as_str(), Some("0600"));
    }

    #[test]
    fn test_nullable() {
        assert_eq!(nullable("null"), None);
        assert_eq!(nullable(""), None);
        assert_eq!(nullable("https://example.com"), Some("https://example.com"));
    }
}
