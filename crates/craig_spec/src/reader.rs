//! Configuration file reading utilities.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{SpecError, SpecResult};
use crate::models::Craig;

/// Reader for CRAIG configuration files.
pub struct CraigReader;

impl CraigReader {
    /// Parse a configuration from JSON text.
    pub fn from_json(content: &str) -> SpecResult<Craig> {
        let craig: Craig = serde_json::from_str(content)?;
        Ok(craig)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(content: &str) -> SpecResult<Craig> {
        let craig: Craig = serde_yaml::from_str(content)?;
        Ok(craig)
    }

    /// Read a configuration file, picking the format from its extension.
    pub fn read_file(path: impl AsRef<Path>) -> SpecResult<Craig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SpecError::NotFound(path.to_path_buf()));
        }
        debug!("Reading configuration from {:?}", path);

        let content = fs::read_to_string(path)?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        };

        parsed.map_err(|e| SpecError::InvalidFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// List every configuration file below a directory, sorted by path.
    pub fn find_configs(dir: impl AsRef<Path>) -> SpecResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(SpecError::NotFound(dir.to_path_buf()));
        }

        let mut configs: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .map_or(false, |ext| ext == "json" || ext == "yaml" || ext == "yml")
            })
            .collect();
        configs.sort();

        debug!("Found {} configuration files in {:?}", configs.len(), dir);
        Ok(configs)
    }
}
