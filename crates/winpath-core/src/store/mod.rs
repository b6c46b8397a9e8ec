//! Where the two PATH lists come from and go back to.

mod memory;

pub use memory::MemoryStore;

use crate::core::WinPathResult;
use crate::model::Scope;

/// Load/save boundary for the PATH lists.
///
/// `save_scope` must report missing privileges as
/// [`WinPathError::AccessDenied`](crate::core::WinPathError::AccessDenied) so
/// callers can tell them apart from I/O failures.
pub trait PathStore {
    /// Raw entries of `scope`, in stored order.
    fn load_scope(&self, scope: Scope) -> WinPathResult<Vec<String>>;

    /// Replace the stored entries of `scope`.
    fn save_scope(&mut self, scope: Scope, entries: &[String]) -> WinPathResult<()>;

    /// Human-readable location of `scope`, shown in the legend.
    fn describe(&self, scope: Scope) -> String;

    /// Whether a save to `scope` is expected to succeed.
    fn is_writable(&self, _scope: Scope) -> bool {
        true
    }
}
