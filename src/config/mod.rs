use crate::core::path::{config_file, default_backup_dir, ensure_dir};
use crate::core::{WinPathError, WinPathResult};
use crate::model::junction::{default_junctions, Junction, JunctionMap};
use crate::model::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Longest %PATH% Windows will expand
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Directory for backups (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<String>,

    /// Whether to colour warnings
    #[serde(default = "default_true")]
    pub color: bool,

    /// Whether to ask before each deletion
    #[serde(default = "default_true")]
    pub confirm_deletes: bool,

    /// Long directories and the junctions `shorten` replaces them with
    #[serde(default = "default_junctions")]
    pub junctions: Vec<Junction>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            backup_dir: None,
            color: true,
            confirm_deletes: true,
            junctions: default_junctions(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating the
    /// default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\winpath\config.yaml
    /// - Linux: ~/.config/winpath/config.yaml
    /// - macOS: ~/Library/Application Support/winpath/config.yaml
    pub fn load() -> WinPathResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from `path`, writing the defaults there when it is missing
    pub fn load_from(path: &Path) -> WinPathResult<Self> {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                // a read-only profile must not stop the tool
                tracing::warn!(path = %path.display(), error = %e, "could not write default config");
            }
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| WinPathError::Config(format!("Failed to parse config: {}", e)))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> WinPathResult<()> {
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| WinPathError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the backup directory path
    pub fn get_backup_dir(&self) -> WinPathResult<PathBuf> {
        if let Some(ref dir) = self.backup_dir {
            Ok(PathBuf::from(dir))
        } else {
            default_backup_dir()
        }
    }

    pub fn junction_map(&self) -> JunctionMap {
        JunctionMap::new(self.junctions.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.limit, 2047);
        assert!(config.color);
        assert!(config.confirm_deletes);
        assert_eq!(config.junctions.len(), 2);
    }

    #[test]
    fn test_missing_config_is_created() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("winpath").join("config.yaml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limit, 2047);
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.junctions, config.junctions);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "limit: 8191\ncolor: false\nbackup_dir: D:\\backups\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limit, 8191);
        assert!(!config.color);
        assert!(config.confirm_deletes);
        assert_eq!(config.get_backup_dir().unwrap(), PathBuf::from("D:\\backups"));
        assert_eq!(config.junction_map().len(), 2);
    }

    #[test]
    fn test_custom_junctions_are_sorted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "junctions:\n  - long: 'D:\\x\\'\n    short: 'D:\\y\\'\n  - long: 'D:\\x\\longer\\'\n    short: 'D:\\z\\'\n",
        )
        .unwrap();

        let map = Config::load_from(&path).unwrap().junction_map();
        let longs: Vec<&str> = map.iter().map(|j| j.long.as_str()).collect();
        assert_eq!(longs, vec!["D:\\x\\longer\\", "D:\\x\\"]);
    }

    #[test]
    fn test_malformed_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "limit: [not a number\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, WinPathError::Config(_)));
    }
}
