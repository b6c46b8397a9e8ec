//! Core of winpath: the USER/SYSTEM PATH model, its list operations, the
//! persistence boundary and the backup file format.

// Errors, suggestions and app directories
pub mod core;

// PATH lists and their operations
pub mod model;

// Load/save boundary
pub mod store;

// JSON backups
pub mod backup;

// Re-export commonly used types
pub use backup::{Backup, JsonFileStore};
pub use core::{format_error_with_help, ErrorHelp, WinPathError, WinPathResult};
pub use model::{DedupChoice, PathEntry, PathList, PathSetModel, Scope};
pub use store::{MemoryStore, PathStore};
