use crate::cli::session::Session;
use std::process::ExitCode;
use winpath::core::WinPathResult;

pub fn run(session: &Session, comment: Option<String>) -> WinPathResult<ExitCode> {
    let files = session.backup(comment.as_deref().unwrap_or_default())?;
    println!("  Text copy: {}", files.text.display());
    Ok(ExitCode::SUCCESS)
}
