//! In-memory model of the USER and SYSTEM PATH lists.

pub mod entry;
pub mod junction;
pub mod length;
pub mod list;
pub mod set;

pub use entry::{expand_env_vars, listify, normalize_key, stringify, PathEntry, Scope};
pub use junction::{Junction, JunctionMap, Shortening};
pub use length::{LengthReport, DEFAULT_LIMIT};
pub use list::{normalize, NormalizeReport, PathList};
pub use set::{
    DedupChoice, DedupStep, DedupSummary, DeleteOutcome, PathSetModel, SaveReport,
};
