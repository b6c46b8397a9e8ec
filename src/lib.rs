//! winpath: inspect and edit the Windows USER and SYSTEM PATH variables.
//!
//! This crate re-exports the PATH model from `winpath-core` and adds the
//! pieces that touch the machine: the registry, junctions, configuration and
//! terminal output.

pub use winpath_core::{
    format_error_with_help, Backup, DedupChoice, ErrorHelp, JsonFileStore, MemoryStore,
    PathEntry, PathList, PathSetModel, PathStore, Scope, WinPathError, WinPathResult,
};

/// Core module re-exported from winpath-core.
pub mod core {
    pub use winpath_core::core::*;
}

pub use winpath_core::{backup, model, store};

/// Configuration management.
pub mod config;

/// Registry access (Windows only).
pub mod registry;

/// Junction creation for `shorten`.
pub mod junction;

/// Coloured terminal output.
pub mod ui;
