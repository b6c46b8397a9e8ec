//! One-shot edits: change the lists, then save them straight away.

use crate::cli::session::Session;
use std::process::ExitCode;
use winpath::core::WinPathResult;
use winpath::model::{DedupChoice, Scope};

fn save(session: &mut Session) -> ExitCode {
    if !session.model.unsaved_changes() {
        println!("Nothing changed.");
        return ExitCode::SUCCESS;
    }
    if session.save() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub fn purge(session: &mut Session, yes: bool) -> WinPathResult<ExitCode> {
    session.purge(!yes)?;
    Ok(save(session))
}

pub fn dedup(session: &mut Session, choice: DedupChoice) -> WinPathResult<ExitCode> {
    session.dedup_all(choice);
    Ok(save(session))
}

pub fn add(session: &mut Session, scope: Scope, entries: Vec<String>) -> WinPathResult<ExitCode> {
    session.add(scope, &entries);
    Ok(save(session))
}

pub fn shorten(session: &mut Session) -> WinPathResult<ExitCode> {
    session.shorten();
    Ok(save(session))
}
