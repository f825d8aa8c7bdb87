use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Project configuration loaded from `.swagdoc.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwagdocConfig {
    /// Directory that `spec_filenames` are relative to.
    pub spec_dir: PathBuf,
    pub spec_filenames: Vec<String>,
    /// When set, specifications are fetched from `http://<host>/<file>`. Also the
    /// fallback host for documents that do not declare one.
    pub host: Option<String>,
    /// Merge every specification file into a single documentation set.
    pub collapse: bool,
}

impl Default for SwagdocConfig {
    fn default() -> Self {
        Self {
            spec_dir: PathBuf::from("."),
            spec_filenames: vec!["swagger.yaml".to_string()],
            host: None,
            collapse: false,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swagdoc.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwagdocConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SwagdocConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swagdoc configuration
spec_dir: .
spec_filenames:
  - swagger.yaml
  # - admin-api.yaml

# host: localhost:9090   # fetch specs from http://<host>/<file> instead of spec_dir
collapse: false          # merge all spec files into one documentation set
"#
}
