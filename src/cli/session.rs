use crate::cli::prompt::Prompter;
use crate::cli::view;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use winpath::backup::{self, Backup, BackupFiles};
use winpath::config::Config;
use winpath::core::{format_error_with_help, WinPathResult};
use winpath::junction::{ensure_junctions, JunctionStatus};
use winpath::model::{
    listify, DedupChoice, DedupSummary, LengthReport, NormalizeReport, PathEntry, PathSetModel,
    Scope, Shortening,
};
use winpath::store::PathStore;
use winpath::ui;

/// Everything one run of the tool works on.
pub struct Session {
    pub model: PathSetModel,
    pub store: Box<dyn PathStore>,
    pub config: Config,
    pub prompter: Box<dyn Prompter>,
    pub backup_dir: PathBuf,
}

impl Session {
    /// Load both lists from `store`.
    pub fn open(
        store: Box<dyn PathStore>,
        config: Config,
        prompter: Box<dyn Prompter>,
    ) -> WinPathResult<Self> {
        let backup_dir = config.get_backup_dir()?;
        let mut model = PathSetModel::new().with_limit(config.limit);
        let report = model.load_from(&*store)?;
        report_normalization(&report);

        Ok(Self::new(model, store, config, prompter, backup_dir))
    }

    pub fn new(
        model: PathSetModel,
        store: Box<dyn PathStore>,
        config: Config,
        prompter: Box<dyn Prompter>,
        backup_dir: PathBuf,
    ) -> Self {
        Self {
            model,
            store,
            config,
            prompter,
            backup_dir,
        }
    }

    pub fn view(&self) {
        view::print(&self.model, &*self.store);
    }

    /// Print the lengths when asked to, or when the limit is exceeded.
    pub fn check_lengths(&self, verbose: bool) -> LengthReport {
        let report = self.model.lengths();
        if verbose || report.exceeded() {
            println!(
                "USER PATH: {} chars, SYSTEM PATH: {} chars, %PATH%: {} of {} ({:.0}%)",
                report.user,
                report.system,
                report.total(),
                report.limit,
                report.percent()
            );
        }
        if report.exceeded() {
            println!(
                "{}",
                ui::warn(&format!(
                    "/!\\ %PATH% is too long: Windows ignores everything after {} characters.",
                    report.limit
                ))
            );
        } else if verbose {
            println!("{}", ui::ok("%PATH% length is fine."));
        }
        report
    }

    /// Delete by combined-view index. Unknown indices are reported and skipped.
    pub fn delete_indices(&mut self, indices: &[usize]) -> WinPathResult<usize> {
        let combined = self.model.combined();
        let mut targets = Vec::new();
        for &idx in indices {
            match combined.get(idx) {
                Some(entry) => targets.push((*entry).clone()),
                None => println!("There is no entry #{}.", idx),
            }
        }
        self.delete_targets(targets, true)
    }

    /// Delete each target, asking first when `ask` and `confirm_deletes` are set.
    pub fn delete_targets(&mut self, targets: Vec<PathEntry>, ask: bool) -> WinPathResult<usize> {
        let mut removed = 0;
        let mut seen = HashSet::new();

        for target in targets {
            if !seen.insert(target.clone()) {
                continue;
            }
            if self.model.is_vital(&target) && self.model.system().contains(&target) {
                println!("{} will not be removed from the SYSTEM PATH.", target);
                if !self.model.user().contains(&target) {
                    continue;
                }
                println!("It is also in the USER PATH.");
            }

            println!("{}", target);
            if ask
                && self.config.confirm_deletes
                && !self.prompter.confirm("Delete this entry?", true)?
            {
                println!("Kept.");
                continue;
            }

            removed += self.model.delete([&target]).removed();
            println!("{}", ui::ok("Removed."));
        }
        Ok(removed)
    }

    /// Delete every entry whose directory is missing.
    pub fn purge(&mut self, ask: bool) -> WinPathResult<usize> {
        let missing = self.model.non_existent();
        if missing.is_empty() {
            println!("Every entry exists, nothing to purge.");
            return Ok(0);
        }
        println!("{} entries do not exist.", missing.len());
        self.delete_targets(missing, ask)
    }

    pub fn add_interactive(&mut self) -> WinPathResult<()> {
        let answer = self
            .prompter
            .input("Add to the [u]ser or [s]ystem PATH?", Some("u"))?;
        let scope: Scope = match answer.parse() {
            Ok(scope) => scope,
            Err(msg) => {
                println!("{}", msg);
                return Ok(());
            }
        };
        let value = self
            .prompter
            .input("Entries to add (separate several with ;)", Some(""))?;
        self.add(scope, &listify(&value));
        Ok(())
    }

    /// Put `raw` at the front of `scope`.
    pub fn add(&mut self, scope: Scope, raw: &[String]) -> usize {
        let raw: Vec<&str> = raw
            .iter()
            .flat_map(|r| r.split(';'))
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if raw.is_empty() {
            println!("Nothing to add.");
            return 0;
        }

        let report = self.model.insert(scope, &raw);
        report_normalization(&report);
        println!(
            "{}",
            ui::ok(&format!(
                "Inserted {} entries at the start of the {} PATH.",
                raw.len(),
                scope
            ))
        );
        raw.len()
    }

    /// Ask once per entry found in both scopes. An empty answer repeats the
    /// previous one.
    pub fn dedup_interactive(&mut self) -> WinPathResult<DedupSummary> {
        if self.model.duplicates().is_empty() {
            println!("No entry is in both the USER and the SYSTEM PATH.");
            return Ok(DedupSummary::default());
        }

        let vital: HashSet<PathEntry> = self
            .model
            .duplicates()
            .into_iter()
            .filter(|e| self.model.is_vital(e))
            .collect();
        let prompter = &mut self.prompter;
        let mut last: Option<String> = None;
        let mut failure = None;

        let summary = self.model.resolve_duplicates(|entry| {
            println!();
            println!("{}", entry);
            let answer = match prompter.input(
                "Remove from [u]ser, [s]ystem, [b]oth, [n]one or [c]ancel?",
                last.as_deref(),
            ) {
                Ok(answer) => answer,
                Err(e) => {
                    failure = Some(e);
                    return DedupChoice::Cancel;
                }
            };

            let choice = parse_dedup_answer(&answer).unwrap_or_else(|| {
                println!("Unknown answer '{}', skipping.", answer);
                DedupChoice::Skip
            });
            if matches!(choice, DedupChoice::System | DedupChoice::Both)
                && vital.contains(entry)
            {
                println!("{} stays in the SYSTEM PATH.", entry);
            }
            last = Some(answer);
            choice
        });

        if let Some(e) = failure {
            return Err(e);
        }
        print_dedup_summary(&summary);
        Ok(summary)
    }

    /// Resolve every duplicate with the same choice.
    pub fn dedup_all(&mut self, choice: DedupChoice) -> DedupSummary {
        let summary = self.model.resolve_duplicates(|_| choice);
        print_dedup_summary(&summary);
        summary
    }

    /// Create the configured junctions and substitute the usable ones.
    pub fn shorten(&mut self) -> Shortening {
        let (usable, statuses) = ensure_junctions(&self.config.junction_map());
        for (junction, status) in &statuses {
            match status {
                JunctionStatus::Created => {
                    println!("Created junction {} -> {}", junction.short, junction.long)
                }
                JunctionStatus::Existing => {}
                JunctionStatus::MissingTarget => {
                    println!("{} does not exist, skipped.", junction.long)
                }
                JunctionStatus::Conflict => println!(
                    "{}",
                    ui::warn(&format!(
                        "{} exists and does not point to {}, skipped.",
                        junction.short, junction.long
                    ))
                ),
                JunctionStatus::Failed(msg) => println!(
                    "{}",
                    ui::warn(&format!(
                        "Couldn't create junction {}: {}",
                        junction.short, msg
                    ))
                ),
            }
        }

        if usable.is_empty() {
            println!("No junction available, nothing to shorten.");
            return Shortening::default();
        }

        let saved = self.model.substitute_junctions(&usable);
        println!(
            "Saved {} characters in the USER PATH and {} in the SYSTEM PATH.",
            saved.user, saved.system
        );
        saved
    }

    pub fn backup(&self, comment: &str) -> WinPathResult<BackupFiles> {
        let files = backup::write_backup(&self.backup_dir, &Backup::from_model(&self.model), comment)?;
        println!(
            "{}",
            ui::ok(&format!("Backup written to {}", files.json.display()))
        );
        Ok(files)
    }

    pub fn load_interactive(&mut self) -> WinPathResult<()> {
        let files = backup::list_backups(&self.backup_dir)?;
        ui::print_header(&format!("Backups in {}", self.backup_dir.display()));
        for (idx, file) in files.iter().enumerate() {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            println!("{:4}: {}", idx, name);
        }
        println!("   r: re-read the stored PATH");
        println!("   c: cancel");

        let answer = self.prompter.input("Which one?", Some("c"))?;
        match answer.trim().to_lowercase().as_str() {
            "c" | "q" => println!("Canceled."),
            "r" => self.reload()?,
            other => match other.parse::<usize>().ok().and_then(|i| files.get(i)) {
                Some(path) => self.load_file(path),
                None => println!("No backup '{}'.", other),
            },
        }
        Ok(())
    }

    /// Replace both lists with a backup. On failure nothing changes.
    pub fn load_file(&mut self, path: &Path) {
        match backup::load_backup(path, &mut self.model) {
            Ok(report) => {
                report_normalization(&report);
                println!(
                    "{}",
                    ui::ok(&format!(
                        "Loaded {}. Save with `s` to apply it.",
                        path.display()
                    ))
                );
            }
            Err(e) => println!(
                "{}",
                ui::warn(&format!("/!\\ Couldn't load this file: {}", e))
            ),
        }
    }

    /// Throw away edits and read the store again.
    pub fn reload(&mut self) -> WinPathResult<()> {
        let report = self.model.load_from(&*self.store)?;
        report_normalization(&report);
        println!("Re-read the stored PATH.");
        Ok(())
    }

    pub fn show_store(&self) {
        for scope in [Scope::System, Scope::User] {
            ui::print_header(&format!("{} PATH ({})", scope, self.store.describe(scope)));
            match self.store.load_scope(scope) {
                Ok(entries) => {
                    for entry in entries {
                        println!("  {}", entry);
                    }
                }
                Err(e) => println!("{}", ui::warn(&format!("Couldn't read it: {}", e))),
            }
        }
    }

    pub fn show_env(&self) {
        let path = std::env::var("PATH").unwrap_or_default();
        let entries = listify(&path);
        ui::print_header("%PATH% of this process");
        for entry in &entries {
            println!("  {}", entry);
        }
        println!(
            "{} entries, {} characters",
            entries.len(),
            path.encode_utf16().count()
        );
    }

    /// Save both scopes, reporting each. True when both were written.
    pub fn save(&mut self) -> bool {
        let report = self.model.save_to(&mut *self.store);
        for scope in Scope::ALL {
            match report.result(scope) {
                Ok(()) => println!("{}", ui::ok(&format!("{} PATH saved.", scope))),
                Err(e) => println!(
                    "{}",
                    ui::warn(&format!(
                        "Couldn't save the {} PATH.\n{}",
                        scope,
                        format_error_with_help(e)
                    ))
                ),
            }
        }
        if report.is_success() {
            println!("Open a new console to see the change.");
        }
        report.is_success()
    }

    /// True when it is fine to leave.
    pub fn confirm_quit(&mut self) -> WinPathResult<bool> {
        if !self.model.unsaved_changes() {
            return Ok(true);
        }
        for scope in Scope::ALL {
            if self.model.scope_changed(scope) {
                println!("{}", ui::warn(&format!("The {} PATH has unsaved changes.", scope)));
            }
        }
        self.prompter.confirm("Quit without saving?", false)
    }
}

/// `u`, `s`, `b`, `n` and `c` with their long forms.
pub fn parse_dedup_answer(answer: &str) -> Option<DedupChoice> {
    match answer.trim().to_lowercase().as_str() {
        "u" | "user" => Some(DedupChoice::User),
        "s" | "sys" | "system" => Some(DedupChoice::System),
        "b" | "both" => Some(DedupChoice::Both),
        "n" | "none" | "skip" => Some(DedupChoice::Skip),
        "c" | "cancel" | "q" => Some(DedupChoice::Cancel),
        _ => None,
    }
}

fn print_dedup_summary(summary: &DedupSummary) {
    if summary.cancelled {
        println!("Canceled.");
    }
    println!(
        "{} duplicates resolved, {} skipped.",
        summary.resolved, summary.skipped
    );
}

/// Operator-facing lines for what loading or adding changed. Case-only
/// differences are left out.
fn normalization_notes(report: &NormalizeReport) -> Vec<String> {
    let mut notes: Vec<String> = report
        .changed
        .iter()
        .filter(|(raw, key)| !raw.eq_ignore_ascii_case(key))
        .map(|(raw, key)| format!("Normalized {} to {}", raw, key))
        .collect();
    if report.duplicates_removed > 0 {
        notes.push(format!(
            "Dropped {} repeated entries.",
            report.duplicates_removed
        ));
    }
    notes
}

fn report_normalization(report: &NormalizeReport) {
    for (raw, key) in &report.changed {
        tracing::info!(%raw, %key, "entry compared in normalized form");
    }
    for raw in &report.unexpanded {
        tracing::debug!(%raw, "entry keeps its %VARIABLE% reference");
    }
    for note in normalization_notes(report) {
        println!("{}", note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::ScriptedPrompter;
    use tempfile::TempDir;
    use winpath::store::MemoryStore;

    /// A session over `store`, with relative entries resolved inside `temp`
    /// and `existing` created there.
    fn session(temp: &TempDir, store: MemoryStore, existing: &[&str], answers: &[&str]) -> Session {
        for dir in existing {
            std::fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        let base = temp.path().to_string_lossy().to_string();
        let mut model = PathSetModel::with_base_dir(base, r"C:\Windows");
        model.load_from(&store).unwrap();
        Session::new(
            model,
            Box::new(store),
            Config::default(),
            Box::new(ScriptedPrompter::new(answers)),
            temp.path().join("backups"),
        )
    }

    fn values(session: &Session, scope: Scope) -> Vec<String> {
        session.model.list(scope).values()
    }

    #[test]
    fn test_normalization_notes_skip_case_only_changes() {
        let report = NormalizeReport {
            changed: vec![
                (r"C:\Tools".to_string(), r"c:\tools".to_string()),
                (r"C:\Tools\..\bin\".to_string(), r"c:\bin".to_string()),
            ],
            unexpanded: vec!["%X%".to_string()],
            duplicates_removed: 2,
        };

        assert_eq!(
            normalization_notes(&report),
            vec![
                r"Normalized C:\Tools\..\bin\ to c:\bin".to_string(),
                "Dropped 2 repeated entries.".to_string(),
            ]
        );
        assert!(normalization_notes(&NormalizeReport::default()).is_empty());
    }

    #[test]
    fn test_dedup_system_answer_keeps_vital_variable_entry() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["%SystemRoot%", "p"], vec!["%SystemRoot%", "p"]);
        let mut s = session(&temp, store, &[], &["s", ""]);

        s.dedup_interactive().unwrap();
        assert_eq!(values(&s, Scope::User), vec!["%SystemRoot%", "p"]);
        assert_eq!(values(&s, Scope::System), vec!["%SystemRoot%"]);
    }

    #[test]
    fn test_parse_dedup_answer() {
        assert_eq!(parse_dedup_answer("U"), Some(DedupChoice::User));
        assert_eq!(parse_dedup_answer("system"), Some(DedupChoice::System));
        assert_eq!(parse_dedup_answer("b"), Some(DedupChoice::Both));
        assert_eq!(parse_dedup_answer("n"), Some(DedupChoice::Skip));
        assert_eq!(parse_dedup_answer("c"), Some(DedupChoice::Cancel));
        assert_eq!(parse_dedup_answer("x"), None);
    }

    #[test]
    fn test_delete_by_index_asks_first() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u1", "u2"], vec!["s1"]);
        let mut s = session(&temp, store, &["u1", "u2", "s1"], &["y", "n"]);

        // combined: s1, u1, u2
        let removed = s.delete_indices(&[1, 2, 9]).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(values(&s, Scope::User), vec!["u2"]);
        assert_eq!(values(&s, Scope::System), vec!["s1"]);
    }

    #[test]
    fn test_vital_only_in_system_is_not_offered() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(Vec::<&str>::new(), vec![r"C:\Windows", "s1"]);
        let mut s = session(&temp, store, &["s1"], &[]);

        assert_eq!(s.delete_indices(&[0]).unwrap(), 0);
        assert_eq!(values(&s, Scope::System), vec![r"C:\Windows", "s1"]);
    }

    #[test]
    fn test_purge_without_asking() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["gone1", "here"], vec!["gone2"]);
        let mut s = session(&temp, store, &["here"], &[]);

        assert_eq!(s.purge(false).unwrap(), 2);
        assert_eq!(values(&s, Scope::User), vec!["here"]);
        assert!(values(&s, Scope::System).is_empty());
        assert_eq!(s.purge(false).unwrap(), 0);
    }

    #[test]
    fn test_add_splits_joined_arguments() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["old"], Vec::<&str>::new());
        let mut s = session(&temp, store, &[], &[]);

        let added = s.add(Scope::User, &["a;b".to_string(), " ".to_string(), "old".to_string()]);
        assert_eq!(added, 3);
        assert_eq!(values(&s, Scope::User), vec!["a", "b", "old"]);
    }

    #[test]
    fn test_add_interactive_rejects_unknown_scope() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["old"], Vec::<&str>::new());
        let mut s = session(&temp, store, &[], &["x"]);

        s.add_interactive().unwrap();
        assert_eq!(values(&s, Scope::User), vec!["old"]);
    }

    #[test]
    fn test_add_interactive_to_system() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(Vec::<&str>::new(), vec!["s1"]);
        let mut s = session(&temp, store, &[], &["s", "new1;new2"]);

        s.add_interactive().unwrap();
        assert_eq!(values(&s, Scope::System), vec!["new1", "new2", "s1"]);
    }

    #[test]
    fn test_dedup_repeats_last_answer() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["a", "b", "c"], vec!["a", "b", "c"]);
        let mut s = session(&temp, store, &[], &["u", "", "n"]);

        let summary = s.dedup_interactive().unwrap();
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(values(&s, Scope::User), vec!["c"]);
        assert_eq!(values(&s, Scope::System), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_cancel_stops() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["a", "b"], vec!["a", "b"]);
        let mut s = session(&temp, store, &[], &["c"]);

        let summary = s.dedup_interactive().unwrap();
        assert!(summary.cancelled);
        assert_eq!(s.model.duplicates().len(), 2);
    }

    #[test]
    fn test_dedup_all_both_keeps_vital() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec![r"C:\Windows", "p"], vec![r"C:\Windows", "p"]);
        let mut s = session(&temp, store, &[], &[]);

        s.dedup_all(DedupChoice::Both);
        assert!(values(&s, Scope::User).is_empty());
        assert_eq!(values(&s, Scope::System), vec![r"C:\Windows"]);
        assert!(s.model.duplicates().is_empty());
    }

    #[test]
    fn test_save_reports_each_scope() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u"], vec!["s"]).deny_writes(Scope::System);
        let mut s = session(&temp, store, &[], &[]);

        s.add(Scope::User, &["u2".to_string()]);
        s.add(Scope::System, &["s2".to_string()]);
        assert!(!s.save());

        assert_eq!(s.store.load_scope(Scope::User).unwrap(), vec!["u2", "u"]);
        assert_eq!(s.store.load_scope(Scope::System).unwrap(), vec!["s"]);
        assert!(!s.model.scope_changed(Scope::User));
        assert!(s.model.scope_changed(Scope::System));
    }

    #[test]
    fn test_backup_then_load_by_number() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u"], vec!["s"]);
        let mut s = session(&temp, store, &[], &["0"]);

        s.backup("").unwrap();
        s.add(Scope::User, &["extra".to_string()]);
        s.load_interactive().unwrap();

        assert_eq!(values(&s, Scope::User), vec!["u"]);
        assert!(!s.model.unsaved_changes());
    }

    #[test]
    fn test_load_bad_file_keeps_state() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u"], vec!["s"]);
        let mut s = session(&temp, store, &[], &[]);
        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();

        s.add(Scope::User, &["pending".to_string()]);
        s.load_file(&broken);
        assert_eq!(values(&s, Scope::User), vec!["pending", "u"]);
    }

    #[test]
    fn test_reload_discards_edits() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u"], vec!["s"]);
        let mut s = session(&temp, store, &[], &["r"]);

        s.add(Scope::User, &["pending".to_string()]);
        s.load_interactive().unwrap();
        assert_eq!(values(&s, Scope::User), vec!["u"]);
    }

    #[test]
    fn test_quit_asks_only_with_unsaved_changes() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new(vec!["u"], vec!["s"]);
        let mut s = session(&temp, store, &[], &[""]);

        assert!(s.confirm_quit().unwrap());
        s.add(Scope::User, &["pending".to_string()]);
        // empty answer takes the default: stay
        assert!(!s.confirm_quit().unwrap());
    }
}
