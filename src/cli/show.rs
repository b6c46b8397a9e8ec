use crate::cli::session::Session;
use crate::cli::view;
use std::process::ExitCode;
use winpath::core::WinPathResult;

pub fn run(session: &Session, filter: Option<String>) -> WinPathResult<ExitCode> {
    match filter {
        Some(needle) => view::print_filtered(&session.model, &needle),
        None => session.view(),
    }
    Ok(ExitCode::SUCCESS)
}

/// Exit status 2 when %PATH% no longer fits.
pub fn check(session: &Session) -> WinPathResult<ExitCode> {
    let report = session.check_lengths(true);
    let missing = session.model.non_existent().len();
    let duplicates = session.model.duplicates().len();
    if missing > 0 {
        println!("{} entries do not exist.", missing);
    }
    if duplicates > 0 {
        println!("{} entries are in both the USER and the SYSTEM PATH.", duplicates);
    }

    if report.exceeded() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
