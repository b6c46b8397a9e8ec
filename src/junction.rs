//! Creating the directory junctions that `shorten` points PATH entries at.

use crate::model::junction::{Junction, JunctionMap};
use std::io;
use std::path::Path;

/// Outcome for one configured pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JunctionStatus {
    /// The junction was made now.
    Created,
    /// The short path already resolves to the long one.
    Existing,
    /// The long directory isn't there; nothing to shorten.
    MissingTarget,
    /// The short path is taken by a different directory.
    Conflict,
    Failed(String),
}

impl JunctionStatus {
    pub fn is_usable(&self) -> bool {
        matches!(self, JunctionStatus::Created | JunctionStatus::Existing)
    }
}

/// Make sure every junction of `map` exists, and return the pairs that are
/// safe to substitute together with what happened to each.
pub fn ensure_junctions(map: &JunctionMap) -> (JunctionMap, Vec<(Junction, JunctionStatus)>) {
    let mut statuses = Vec::new();
    for junction in map.iter() {
        let status = ensure_junction(junction);
        tracing::debug!(long = %junction.long, short = %junction.short, ?status, "junction");
        statuses.push((junction.clone(), status));
    }

    let usable = statuses
        .iter()
        .filter(|(_, status)| status.is_usable())
        .map(|(j, _)| j.clone())
        .collect();
    (usable, statuses)
}

fn ensure_junction(junction: &Junction) -> JunctionStatus {
    let long = Path::new(trim_separator(&junction.long));
    let short = Path::new(trim_separator(&junction.short));

    if !long.is_dir() {
        return JunctionStatus::MissingTarget;
    }
    if short.exists() {
        return if same_directory(long, short) {
            JunctionStatus::Existing
        } else {
            JunctionStatus::Conflict
        };
    }
    match make_junction(long, short) {
        Ok(()) => JunctionStatus::Created,
        Err(e) => JunctionStatus::Failed(e.to_string()),
    }
}

fn trim_separator(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['\\', '/']);
    // keep the root of `C:\` intact
    if trimmed.ends_with(':') {
        path
    } else {
        trimmed
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(windows)]
fn make_junction(long: &Path, short: &Path) -> io::Result<()> {
    let output = std::process::Command::new("cmd")
        .args(["/C", "mklink", "/J"])
        .arg(short)
        .arg(long)
        .output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(io::Error::other(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg(not(windows))]
fn make_junction(_long: &Path, _short: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "directory junctions need Windows",
    ))
}
