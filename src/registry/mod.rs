//! The Windows registry as the PATH source.

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use windows::{broadcast_environment_change, RegistryStore};

#[cfg(not(windows))]
use crate::core::WinPathError;
use crate::core::WinPathResult;
use crate::model::Scope;
use crate::store::PathStore;

/// Where one scope's PATH lives in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegLocation {
    pub hive: &'static str,
    pub subkey: &'static str,
    pub value: &'static str,
}

impl std::fmt::Display for RegLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\\{}\\{}", self.hive, self.subkey, self.value)
    }
}

pub const USER_LOCATION: RegLocation = RegLocation {
    hive: "HKEY_CURRENT_USER",
    subkey: "Environment",
    value: "PATH",
};

pub const SYSTEM_LOCATION: RegLocation = RegLocation {
    hive: "HKEY_LOCAL_MACHINE",
    subkey: r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment",
    value: "Path",
};

pub fn location(scope: Scope) -> RegLocation {
    match scope {
        Scope::User => USER_LOCATION,
        Scope::System => SYSTEM_LOCATION,
    }
}

/// Open the registry-backed store.
#[cfg(windows)]
pub fn open_registry() -> WinPathResult<Box<dyn PathStore>> {
    Ok(Box::new(RegistryStore::new()))
}

/// Open the registry-backed store.
#[cfg(not(windows))]
pub fn open_registry() -> WinPathResult<Box<dyn PathStore>> {
    Err(WinPathError::Registry(
        "the registry is only available on Windows".to_string(),
    ))
}
