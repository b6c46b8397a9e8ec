use crate::core::error::{WinPathError, WinPathResult};
use std::path::{Path, PathBuf};

/// Get the winpath home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\winpath
/// - Linux: ~/.config/winpath
/// - macOS: ~/Library/Application Support/winpath
pub fn winpath_home() -> WinPathResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| WinPathError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("winpath"))
}

/// Get the config file path
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\winpath\config.yaml
/// - Linux: ~/.config/winpath/config.yaml
/// - macOS: ~/Library/Application Support/winpath/config.yaml
pub fn config_file() -> WinPathResult<PathBuf> {
    Ok(winpath_home()?.join("config.yaml"))
}

/// Directory backups are written to and listed from when none is configured.
pub fn default_backup_dir() -> WinPathResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| WinPathError::Path(format!("Failed to get current directory: {}", e)))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> WinPathResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
