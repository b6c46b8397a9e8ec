use crate::core::WinPathError;
use crate::model::Scope;

/// Provides helpful suggestions for common errors
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for WinPathError {
    fn help(&self) -> Option<String> {
        match self {
            WinPathError::AccessDenied { scope: Scope::System } => Some(
                "💡 Suggestion: Writing the SYSTEM PATH needs elevation. Right-click the terminal and choose 'Run as administrator'"
                    .to_string(),
            ),
            WinPathError::AccessDenied { scope: Scope::User } => Some(
                "💡 Suggestion: Check that your account may modify HKEY_CURRENT_USER\\Environment"
                    .to_string(),
            ),
            WinPathError::NotFound(msg) => {
                if msg.contains("backup") {
                    Some(
                        "💡 Suggestion: Create a backup first with 'winpath backup', or check the backup directory in config.yaml"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            WinPathError::Parse(_) | WinPathError::Json(_) => Some(
                "💡 Suggestion: A backup file must be a JSON object with the string keys USER_PATH and SYSTEM_PATH"
                    .to_string(),
            ),
            WinPathError::Config(msg) => Some(format!(
                "💡 Suggestion: Check your YAML syntax in config.yaml, or delete the file to regenerate the defaults\n\nError details: {}",
                msg
            )),
            WinPathError::Registry(_) => Some(
                "💡 Suggestion: Outside Windows, or without registry access, use --source <file.json> to edit a backup file instead"
                    .to_string(),
            ),
            WinPathError::Io(e) => {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    Some(
                        "💡 Suggestion: Check file permissions, or try running with appropriate permissions"
                            .to_string(),
                    )
                } else if e.kind() == std::io::ErrorKind::NotFound {
                    Some(
                        "💡 Suggestion: The file or directory may not exist. Check the path and try again"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Format an error with helpful suggestions
pub fn format_error_with_help(error: &WinPathError) -> String {
    let mut output = format!("❌ Error: {}", error);

    if let Some(help) = error.help() {
        output.push_str("\n\n");
        output.push_str(&help);
    }

    output
}
