use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Where and how the durable file is written.
///
/// Sources, lowest precedence first: [`Default`], a TOML file
/// ([`StorageConfig::load`]), the `HBNB_FILE_PATH` environment variable
/// ([`StorageConfig::with_file_path_override`]), then whatever the caller sets
/// last.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON document holding every entity.
    pub file_path: PathBuf,
    /// Indent the JSON document.
    pub pretty: bool,
}

impl StorageConfig {
    pub const ENV_FILE_PATH: &'static str = "HBNB_FILE_PATH";

    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Absent keys keep their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply the value of [`Self::ENV_FILE_PATH`], typically
    /// `std::env::var_os(StorageConfig::ENV_FILE_PATH)`. Unset or empty
    /// values leave the path alone.
    pub fn with_file_path_override(mut self, value: Option<OsString>) -> Self {
        if let Some(path) = value.filter(|v| !v.is_empty()) {
            self.file_path = PathBuf::from(path);
        }
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("file.json"),
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StorageConfig::default();
        assert_eq!(c.file_path, PathBuf::from("file.json"));
        assert!(!c.pretty);
    }

    #[test]
    fn toml_overrides_defaults() {
        let c = StorageConfig::from_toml_str("file_path = \"data/objects.json\"\npretty = true\n")
            .unwrap();
        assert_eq!(c.file_path, PathBuf::from("data/objects.json"));
        assert!(c.pretty);
    }

    #[test]
    fn toml_partial_keeps_defaults() {
        let c = StorageConfig::from_toml_str("pretty = true").unwrap();
        assert_eq!(c.file_path, PathBuf::from("file.json"));
        assert!(c.pretty);
    }

    #[test]
    fn toml_type_error() {
        let err = StorageConfig::from_toml_str("pretty = \"yes\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StorageConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hbnb.toml");
        std::fs::write(&path, "file_path = \"other.json\"").unwrap();
        let c = StorageConfig::load(&path).unwrap();
        assert_eq!(c.file_path, PathBuf::from("other.json"));
    }

    #[test]
    fn env_override_replaces_path() {
        let c = StorageConfig::default().with_file_path_override(Some("env.json".into()));
        assert_eq!(c.file_path, PathBuf::from("env.json"));
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let c = StorageConfig::new("kept.json").with_file_path_override(Some(OsString::new()));
        assert_eq!(c.file_path, PathBuf::from("kept.json"));
        let c = StorageConfig::new("kept.json").with_file_path_override(None);
        assert_eq!(c.file_path, PathBuf::from("kept.json"));
    }
}
