use crate::model::Scope;
use thiserror::Error;

pub type WinPathResult<T> = Result<T, WinPathError>;

#[derive(Error, Debug)]
pub enum WinPathError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Access denied while writing {scope} PATH")]
    AccessDenied { scope: Scope },

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl WinPathError {
    /// True for failures caused by missing privileges rather than broken I/O.
    pub fn is_access_denied(&self) -> bool {
        match self {
            WinPathError::AccessDenied { .. } => true,
            WinPathError::Io(e) => e.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}
