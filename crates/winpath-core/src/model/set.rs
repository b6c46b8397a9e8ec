use crate::core::WinPathResult;
use crate::model::entry::{expand_env_vars, normalize_key, PathEntry, Scope};
use crate::model::junction::{JunctionMap, Shortening};
use crate::model::length::{truncation_index, LengthReport, DEFAULT_LIMIT};
use crate::model::list::{normalize, NormalizeReport, PathList};
use crate::store::PathStore;
use std::collections::HashSet;
use std::path::Path;

/// Answer for one entry that is in both scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupChoice {
    User,
    System,
    Both,
    Skip,
    Cancel,
}

/// Whether a duplicate walk should go on after a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupStep {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupSummary {
    pub resolved: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteOutcome {
    pub removed_user: usize,
    pub removed_system: usize,
    /// Requested entries kept in SYSTEM because they are vital.
    pub protected: Vec<PathEntry>,
}

impl DeleteOutcome {
    pub fn removed(&self) -> usize {
        self.removed_user + self.removed_system
    }
}

/// Per-scope outcome of writing the model back.
#[derive(Debug)]
pub struct SaveReport {
    pub user: WinPathResult<()>,
    pub system: WinPathResult<()>,
}

impl SaveReport {
    pub fn result(&self, scope: Scope) -> &WinPathResult<()> {
        match scope {
            Scope::User => &self.user,
            Scope::System => &self.system,
        }
    }

    pub fn is_success(&self) -> bool {
        self.user.is_ok() && self.system.is_ok()
    }
}

/// USER and SYSTEM PATH lists plus the snapshot they were loaded with.
///
/// Every list operation is total: absent entries, empty inputs and empty
/// mappings leave the model untouched. Nothing reaches the store until
/// [`PathSetModel::save_to`] is called.
#[derive(Debug, Clone)]
pub struct PathSetModel {
    user: PathList,
    system: PathList,
    original_user: Vec<String>,
    original_system: Vec<String>,
    vital_paths: HashSet<String>,
    system_root: String,
    base_dir: String,
    limit: usize,
}

impl Default for PathSetModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSetModel {
    /// Empty model resolving relative entries against the working directory
    /// and protecting `%SystemRoot%` and its `system32`.
    pub fn new() -> Self {
        let base_dir = std::env::current_dir()
            .map(|d| d.to_string_lossy().to_string())
            .unwrap_or_default();
        let system_root = std::env::var("SystemRoot").unwrap_or_else(|_| r"C:\Windows".to_string());
        Self::with_base_dir(base_dir, &system_root)
    }

    pub fn with_base_dir(base_dir: impl Into<String>, system_root: &str) -> Self {
        let base_dir = base_dir.into();
        let root = system_root.trim_end_matches(['\\', '/']);
        let vital_paths = [root.to_string(), format!("{}\\system32", root)]
            .iter()
            .map(|p| PathEntry::new(p, &base_dir).key().to_string())
            .collect();
        Self {
            user: PathList::new(),
            system: PathList::new(),
            original_user: Vec::new(),
            original_system: Vec::new(),
            vital_paths,
            system_root: root.to_string(),
            base_dir,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    /// Build an entry with this model's base directory.
    pub fn entry(&self, raw: &str) -> PathEntry {
        PathEntry::new(raw, &self.base_dir)
    }

    pub fn user(&self) -> &PathList {
        &self.user
    }

    pub fn system(&self) -> &PathList {
        &self.system
    }

    pub fn list(&self, scope: Scope) -> &PathList {
        match scope {
            Scope::User => &self.user,
            Scope::System => &self.system,
        }
    }

    fn list_mut(&mut self, scope: Scope) -> &mut PathList {
        match scope {
            Scope::User => &mut self.user,
            Scope::System => &mut self.system,
        }
    }

    /// Replace one scope with normalized `raw` entries. Snapshots are kept.
    pub fn set_scope<S: AsRef<str>>(&mut self, scope: Scope, raw: &[S]) -> NormalizeReport {
        let (list, report) = normalize(raw, &self.base_dir);
        *self.list_mut(scope) = list;
        report
    }

    /// Replace both scopes and take a fresh snapshot.
    pub fn replace<S: AsRef<str>>(&mut self, user: &[S], system: &[S]) -> NormalizeReport {
        let mut report = self.set_scope(Scope::User, user);
        report.merge(self.set_scope(Scope::System, system));
        self.snapshot();
        report
    }

    /// Remember the current lists as the saved state.
    pub fn snapshot(&mut self) {
        self.original_user = self.user.values();
        self.original_system = self.system.values();
    }

    fn snapshot_scope(&mut self, scope: Scope) {
        match scope {
            Scope::User => self.original_user = self.user.values(),
            Scope::System => self.original_system = self.system.values(),
        }
    }

    pub fn scope_changed(&self, scope: Scope) -> bool {
        match scope {
            Scope::User => self.user.values() != self.original_user,
            Scope::System => self.system.values() != self.original_system,
        }
    }

    pub fn unsaved_changes(&self) -> bool {
        self.scope_changed(Scope::User) || self.scope_changed(Scope::System)
    }

    /// `system ++ user`, the order Windows searches.
    pub fn combined(&self) -> Vec<&PathEntry> {
        self.system.iter().chain(self.user.iter()).collect()
    }

    pub fn index_in(&self, scope: Scope, entry: &PathEntry) -> Option<usize> {
        self.list(scope).position(entry)
    }

    pub fn vital_paths(&self) -> &HashSet<String> {
        &self.vital_paths
    }

    /// True for `%SystemRoot%` and its `system32`, however they are spelled.
    pub fn is_vital(&self, entry: &PathEntry) -> bool {
        if self.vital_paths.contains(entry.key()) {
            return true;
        }
        entry.has_env_reference()
            && self
                .vital_paths
                .contains(&normalize_key(&self.expand(entry.value()), &self.base_dir))
    }

    /// `%SystemRoot%` and `%windir%` resolve to this model's system root,
    /// other names to the process environment.
    fn expand(&self, value: &str) -> String {
        expand_env_vars(value, |name| {
            if name.eq_ignore_ascii_case("SystemRoot") || name.eq_ignore_ascii_case("windir") {
                Some(self.system_root.clone())
            } else {
                std::env::var(name).ok()
            }
        })
    }

    /// Combined entries whose directory is missing, checked against the
    /// filesystem on every call.
    pub fn non_existent(&self) -> Vec<PathEntry> {
        self.combined()
            .into_iter()
            .filter(|entry| !self.exists_on_disk(entry))
            .cloned()
            .collect()
    }

    fn exists_on_disk(&self, entry: &PathEntry) -> bool {
        let expanded = self.expand(entry.value());
        let path = Path::new(&expanded);
        if path.is_absolute() {
            path.exists()
        } else {
            Path::new(&self.base_dir).join(path).exists()
        }
    }

    /// Remove `targets` from USER, and from SYSTEM unless they are vital.
    pub fn delete<'a>(&mut self, targets: impl IntoIterator<Item = &'a PathEntry>) -> DeleteOutcome {
        let keys: HashSet<String> = targets.into_iter().map(|t| t.key().to_string()).collect();
        let mut outcome = DeleteOutcome::default();

        outcome.removed_user = self.user.remove_where(|e| keys.contains(e.key()));
        let (removed_system, protected) = self.remove_from_system(&keys);
        outcome.removed_system = removed_system;
        outcome.protected = protected;

        tracing::debug!(
            user = outcome.removed_user,
            system = outcome.removed_system,
            protected = outcome.protected.len(),
            "deleted entries"
        );
        outcome
    }

    /// Drop SYSTEM entries whose key is in `keys`, keeping vital ones.
    /// Returns the number removed and the entries kept.
    fn remove_from_system(&mut self, keys: &HashSet<String>) -> (usize, Vec<PathEntry>) {
        let (protected, doomed): (Vec<PathEntry>, Vec<PathEntry>) = self
            .system
            .iter()
            .filter(|e| keys.contains(e.key()))
            .cloned()
            .partition(|e| self.is_vital(e));

        let doomed: HashSet<String> = doomed.iter().map(|e| e.key().to_string()).collect();
        let removed = self.system.remove_where(|e| doomed.contains(e.key()));
        (removed, protected)
    }

    /// Normalize `raw` and put it at the front of `scope` in the given order.
    pub fn insert<S: AsRef<str>>(&mut self, scope: Scope, raw: &[S]) -> NormalizeReport {
        let (list, report) = normalize(raw, &self.base_dir);
        self.list_mut(scope).prepend(list.entries().to_vec());
        report
    }

    /// Entries present in both scopes, in combined order.
    pub fn duplicates(&self) -> Vec<PathEntry> {
        self.system
            .iter()
            .filter(|e| self.user.contains(e))
            .cloned()
            .collect()
    }

    pub fn dedup_resolve(&mut self, entry: &PathEntry, choice: DedupChoice) -> DedupStep {
        match choice {
            DedupChoice::User => {
                self.user.remove_where(|e| e == entry);
            }
            DedupChoice::System => {
                let keys = HashSet::from([entry.key().to_string()]);
                self.remove_from_system(&keys);
            }
            DedupChoice::Both => {
                self.delete([entry]);
            }
            DedupChoice::Skip => {}
            DedupChoice::Cancel => return DedupStep::Stop,
        }
        DedupStep::Continue
    }

    /// Walk [`PathSetModel::duplicates`] asking `choose` once per entry.
    pub fn resolve_duplicates(
        &mut self,
        mut choose: impl FnMut(&PathEntry) -> DedupChoice,
    ) -> DedupSummary {
        let mut summary = DedupSummary::default();
        for entry in self.duplicates() {
            let choice = choose(&entry);
            if self.dedup_resolve(&entry, choice) == DedupStep::Stop {
                summary.cancelled = true;
                break;
            }
            match choice {
                DedupChoice::Skip => summary.skipped += 1,
                _ => summary.resolved += 1,
            }
        }
        summary
    }

    /// Replace long prefixes by their junctions in both scopes.
    pub fn substitute_junctions(&mut self, mapping: &JunctionMap) -> Shortening {
        let before_user = self.user.joined_len() as i64;
        let before_system = self.system.joined_len() as i64;

        if !mapping.is_empty() {
            let base = self.base_dir.clone();
            self.user.rewrite(&base, |v| mapping.apply(v));
            self.system.rewrite(&base, |v| mapping.apply(v));
            self.user.dedup();
            self.system.dedup();
        }

        Shortening {
            user: before_user - self.user.joined_len() as i64,
            system: before_system - self.system.joined_len() as i64,
        }
    }

    pub fn lengths(&self) -> LengthReport {
        LengthReport {
            user: self.user.joined_len(),
            system: self.system.joined_len(),
            limit: self.limit,
        }
    }

    pub fn total_length(&self) -> usize {
        self.lengths().total()
    }

    pub fn utilization_ratio(&self) -> f64 {
        self.lengths().ratio()
    }

    /// First combined index Windows will silently drop, if any.
    pub fn truncated_from(&self) -> Option<usize> {
        truncation_index(self.combined(), self.limit)
    }

    /// Read both scopes from `store` and snapshot them.
    pub fn load_from(&mut self, store: &dyn PathStore) -> WinPathResult<NormalizeReport> {
        let user = store.load_scope(Scope::User)?;
        let system = store.load_scope(Scope::System)?;
        tracing::debug!(user = user.len(), system = system.len(), "loaded PATH lists");
        Ok(self.replace(&user, &system))
    }

    /// Write each scope independently. A scope's snapshot only moves when
    /// that scope was written.
    pub fn save_to(&mut self, store: &mut dyn PathStore) -> SaveReport {
        let mut save = |model: &mut Self, scope: Scope| {
            let result = store.save_scope(scope, &model.list(scope).values());
            match &result {
                Ok(()) => {
                    tracing::info!(%scope, "saved PATH");
                    model.snapshot_scope(scope);
                }
                Err(e) => tracing::warn!(%scope, error = %e, "failed to save PATH"),
            }
            result
        };
        let user = save(self, Scope::User);
        let system = save(self, Scope::System);
        SaveReport { user, system }
    }
}
