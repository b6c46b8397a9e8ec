//! JSON backups of both PATH lists, plus a plain-text copy for reading.

use crate::core::path::ensure_dir;
use crate::core::{WinPathError, WinPathResult};
use crate::model::{listify, PathSetModel, Scope};
use crate::store::PathStore;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BACKUP_PREFIX: &str = "path_vars_backup";

/// On-disk form: each scope as one `;`-joined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(rename = "USER_PATH")]
    pub user_path: String,
    #[serde(rename = "SYSTEM_PATH")]
    pub system_path: String,
}

impl Backup {
    pub fn from_model(model: &PathSetModel) -> Self {
        Self {
            user_path: model.user().joined(),
            system_path: model.system().joined(),
        }
    }

    pub fn entries(&self, scope: Scope) -> Vec<String> {
        match scope {
            Scope::User => listify(&self.user_path),
            Scope::System => listify(&self.system_path),
        }
    }

    pub fn to_json(&self) -> WinPathResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse backup JSON. Malformed text and missing keys are `Parse` errors.
    pub fn parse(json: &str) -> WinPathResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| WinPathError::Parse(format!("invalid backup file: {}", e)))
    }

    /// The legacy labelled text form.
    pub fn to_text(&self) -> String {
        format!(
            "USER PATH:\n{}\nSYSTEM PATH:\n{}",
            self.user_path, self.system_path
        )
    }

    /// Replace the model's lists with this backup and snapshot them.
    pub fn restore_into(&self, model: &mut PathSetModel) -> crate::model::NormalizeReport {
        model.replace(&self.entries(Scope::User), &self.entries(Scope::System))
    }
}

/// Paths written by [`write_backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFiles {
    pub json: PathBuf,
    pub text: PathBuf,
}

/// `path_vars_backup2016-05-03_14h02m07s[_comment]`
pub fn backup_stem(at: DateTime<Local>, comment: &str) -> String {
    let mut stem = format!("{}{}", BACKUP_PREFIX, at.format("%Y-%m-%d_%Hh%Mm%Ss"));
    let comment = comment.trim();
    if !comment.is_empty() {
        stem.push('_');
        stem.push_str(&sanitize(comment));
    }
    stem
}

fn sanitize(comment: &str) -> String {
    comment
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Write `<stem>.json` and `<stem>.txt` into `dir`.
pub fn write_backup(dir: &Path, backup: &Backup, comment: &str) -> WinPathResult<BackupFiles> {
    ensure_dir(dir)?;
    let stem = backup_stem(Local::now(), comment);

    let json = dir.join(format!("{}.json", stem));
    fs::write(&json, backup.to_json()?)?;

    let text = dir.join(format!("{}.txt", stem));
    fs::write(&text, backup.to_text())?;

    tracing::info!(json = %json.display(), "wrote PATH backup");
    Ok(BackupFiles { json, text })
}

/// `*.json` files directly inside `dir`, sorted by file name.
pub fn list_backups(dir: &Path) -> WinPathResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if entry.file_type().is_file() && is_json {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Pick the `index`-th file of [`list_backups`].
pub fn select_backup(dir: &Path, index: usize) -> WinPathResult<PathBuf> {
    list_backups(dir)?
        .into_iter()
        .nth(index)
        .ok_or_else(|| WinPathError::NotFound(format!("backup #{} in {}", index, dir.display())))
}

pub fn read_backup(path: &Path) -> WinPathResult<Backup> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WinPathError::NotFound(format!("backup file {}", path.display()))
        } else {
            WinPathError::Io(e)
        }
    })?;
    Backup::parse(&content)
}

/// Load a backup file into `model`. The model is untouched on any error.
pub fn load_backup(
    path: &Path,
    model: &mut PathSetModel,
) -> WinPathResult<crate::model::NormalizeReport> {
    let backup = read_backup(path)?;
    Ok(backup.restore_into(model))
}

/// A backup file used as the PATH source instead of the registry.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PathStore for JsonFileStore {
    fn load_scope(&self, scope: Scope) -> WinPathResult<Vec<String>> {
        Ok(read_backup(&self.path)?.entries(scope))
    }

    fn save_scope(&mut self, scope: Scope, entries: &[String]) -> WinPathResult<()> {
        let mut backup = match read_backup(&self.path) {
            Ok(backup) => backup,
            Err(WinPathError::NotFound(_)) => Backup {
                user_path: String::new(),
                system_path: String::new(),
            },
            Err(e) => return Err(e),
        };
        let joined = entries.join(";");
        match scope {
            Scope::User => backup.user_path = joined,
            Scope::System => backup.system_path = joined,
        }
        fs::write(&self.path, backup.to_json()?).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                WinPathError::AccessDenied { scope }
            } else {
                WinPathError::Io(e)
            }
        })
    }

    fn describe(&self, scope: Scope) -> String {
        let key = match scope {
            Scope::User => "USER_PATH",
            Scope::System => "SYSTEM_PATH",
        };
        format!("{}::{}", self.path.display(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn model(user: &[&str], system: &[&str]) -> PathSetModel {
        let mut m = PathSetModel::with_base_dir(r"C:\work", r"C:\Windows");
        m.replace(user, system);
        m
    }

    #[test]
    fn test_json_uses_registry_style_keys() {
        let backup = Backup::from_model(&model(&[r"C:\u1", r"C:\u2"], &[r"C:\s"]));
        let json = backup.to_json().unwrap();
        assert_eq!(json, r#"{"USER_PATH":"C:\\u1;C:\\u2","SYSTEM_PATH":"C:\\s"}"#);
    }

    #[test]
    fn test_round_trip_through_file() {
        let temp = TempDir::new().unwrap();
        let original = model(&[r"C:\Users\me\bin", "rel"], &[r"C:\Windows", r"%X%\y"]);

        let files = write_backup(temp.path(), &Backup::from_model(&original), "before cleanup")
            .unwrap();
        assert!(files.text.exists());
        assert!(files
            .json
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_before_cleanup.json"));

        let mut restored = model(&["other"], &[]);
        load_backup(&files.json, &mut restored).unwrap();

        assert_eq!(restored.user().values(), original.user().values());
        assert_eq!(restored.system().values(), original.system().values());
        assert!(!restored.unsaved_changes());
    }

    #[test]
    fn test_text_form_has_labelled_sections() {
        let backup = Backup {
            user_path: "a;b".to_string(),
            system_path: "c".to_string(),
        };
        assert_eq!(backup.to_text(), "USER PATH:\na;b\nSYSTEM PATH:\nc");
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let err = Backup::parse(r#"{"USER_PATH": "a"}"#).unwrap_err();
        assert!(matches!(err, WinPathError::Parse(_)));
        let err = Backup::parse("not json").unwrap_err();
        assert!(matches!(err, WinPathError::Parse(_)));
    }

    #[test]
    fn test_failed_load_leaves_model_unchanged() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.json");
        fs::write(&broken, "{").unwrap();

        let mut m = model(&["u"], &["s"]);
        m.insert(Scope::User, &["pending"]);

        assert!(matches!(
            load_backup(&broken, &mut m).unwrap_err(),
            WinPathError::Parse(_)
        ));
        assert!(matches!(
            load_backup(&temp.path().join("missing.json"), &mut m).unwrap_err(),
            WinPathError::NotFound(_)
        ));
        assert_eq!(m.user().values(), vec!["pending", "u"]);
        assert!(m.unsaved_changes());
    }

    #[test]
    fn test_list_and_select_backups() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.json"), "{}").unwrap();
        fs::write(temp.path().join("a.json"), "{}").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::create_dir(temp.path().join("dir.json")).unwrap();

        let names: Vec<String> = list_backups(temp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);

        assert!(select_backup(temp.path(), 1).unwrap().ends_with("b.json"));
        assert!(matches!(
            select_backup(temp.path(), 2).unwrap_err(),
            WinPathError::NotFound(_)
        ));
        assert!(list_backups(&temp.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_backup_stem_format() {
        let at = Local.with_ymd_and_hms(2016, 5, 3, 14, 2, 7).unwrap();
        assert_eq!(backup_stem(at, ""), "path_vars_backup2016-05-03_14h02m07s");
        assert_eq!(
            backup_stem(at, "pre/install"),
            "path_vars_backup2016-05-03_14h02m07s_pre_install"
        );
    }

    #[test]
    fn test_json_file_store_saves_scopes_separately() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("source.json");
        fs::write(&path, r#"{"USER_PATH":"u1;u2","SYSTEM_PATH":"s1"}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_scope(Scope::User).unwrap(), vec!["u1", "u2"]);

        store.save_scope(Scope::System, &["s2".to_string()]).unwrap();
        let backup = read_backup(&path).unwrap();
        assert_eq!(backup.user_path, "u1;u2");
        assert_eq!(backup.system_path, "s2");
        assert!(store.describe(Scope::User).ends_with("::USER_PATH"));
    }
}
