use super::{location, RegLocation};
use crate::core::{WinPathError, WinPathResult};
use crate::model::Scope;
use crate::store::PathStore;
use std::io;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE};
use winreg::{RegKey, HKEY};

/// HKCU and HKLM `Environment` keys. Values are written as `REG_SZ`.
#[derive(Debug, Default)]
pub struct RegistryStore;

impl RegistryStore {
    pub fn new() -> Self {
        Self
    }

    fn open(scope: Scope, flags: u32) -> io::Result<RegKey> {
        let hive: HKEY = match scope {
            Scope::User => HKEY_CURRENT_USER,
            Scope::System => HKEY_LOCAL_MACHINE,
        };
        RegKey::predef(hive).open_subkey_with_flags(location(scope).subkey, flags)
    }
}

fn access_error(scope: Scope, loc: RegLocation, e: io::Error) -> WinPathError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        WinPathError::AccessDenied { scope }
    } else {
        WinPathError::Registry(format!("{}: {}", loc, e))
    }
}

impl PathStore for RegistryStore {
    fn load_scope(&self, scope: Scope) -> WinPathResult<Vec<String>> {
        let loc = location(scope);
        let key = Self::open(scope, KEY_READ).map_err(|e| access_error(scope, loc, e))?;
        match key.get_value::<String, _>(loc.value) {
            Ok(value) => Ok(crate::model::listify(&value)),
            // a fresh profile has no user PATH at all
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(%loc, "PATH value not present");
                Ok(Vec::new())
            }
            Err(e) => Err(access_error(scope, loc, e)),
        }
    }

    fn save_scope(&mut self, scope: Scope, entries: &[String]) -> WinPathResult<()> {
        let loc = location(scope);
        let key = Self::open(scope, KEY_SET_VALUE).map_err(|e| access_error(scope, loc, e))?;
        key.set_value(loc.value, &entries.join(";"))
            .map_err(|e| access_error(scope, loc, e))?;
        broadcast_environment_change();
        Ok(())
    }

    fn describe(&self, scope: Scope) -> String {
        location(scope).to_string()
    }

    fn is_writable(&self, scope: Scope) -> bool {
        Self::open(scope, KEY_SET_VALUE).is_ok()
    }
}

/// Tell running programs that the environment changed, so new shells pick
/// up the saved PATH.
pub fn broadcast_environment_change() {
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_SETTINGCHANGE,
    };

    let param: Vec<u16> = "Environment".encode_utf16().chain(Some(0)).collect();
    let mut result: usize = 0;
    // SAFETY: `param` is NUL-terminated and outlives the call.
    let sent = unsafe {
        SendMessageTimeoutW(
            HWND_BROADCAST,
            WM_SETTINGCHANGE,
            0,
            param.as_ptr() as isize,
            SMTO_ABORTIFHUNG,
            5000,
            &mut result,
        )
    };
    if sent == 0 {
        tracing::warn!("WM_SETTINGCHANGE broadcast timed out");
    }
}
