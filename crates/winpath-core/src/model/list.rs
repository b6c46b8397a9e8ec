use crate::model::entry::{stringify, PathEntry};
use std::collections::HashSet;

/// Ordered PATH entries of one scope. Earlier entries win when Windows
/// resolves a command.
#[derive(Debug, Clone, Default)]
pub struct PathList {
    entries: Vec<PathEntry>,
}

/// Diagnostics collected while normalizing raw entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// `(raw, key)` for every input whose key differs from its text.
    pub changed: Vec<(String, String)>,
    /// Inputs containing `%NAME%` that were compared without resolution.
    pub unexpanded: Vec<String>,
    pub duplicates_removed: usize,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty() && self.unexpanded.is_empty() && self.duplicates_removed == 0
    }

    pub(crate) fn merge(&mut self, other: NormalizeReport) {
        self.changed.extend(other.changed);
        self.unexpanded.extend(other.unexpanded);
        self.duplicates_removed += other.duplicates_removed;
    }
}

/// Turn raw strings into a deduplicated list, keeping the first occurrence of
/// every key. Empty strings are skipped.
pub fn normalize<S: AsRef<str>>(raw: &[S], base_dir: &str) -> (PathList, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut list = PathList::new();

    for item in raw {
        let text = item.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        let entry = PathEntry::new(text, base_dir);
        if entry.has_env_reference() {
            report.unexpanded.push(text.to_string());
        } else if entry.key() != text {
            report.changed.push((text.to_string(), entry.key().to_string()));
        }
        list.entries.push(entry);
    }

    report.duplicates_removed = list.dedup();
    (list, report)
}

impl PathList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PathEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn position(&self, entry: &PathEntry) -> Option<usize> {
        self.entries.iter().position(|e| e == entry)
    }

    pub fn contains(&self, entry: &PathEntry) -> bool {
        self.position(entry).is_some()
    }

    /// Entry texts in order, as they are written back.
    pub fn values(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.value().to_string()).collect()
    }

    /// The `;`-joined registry value.
    pub fn joined(&self) -> String {
        stringify(&self.values())
    }

    /// Length of [`PathList::joined`] in UTF-16 code units.
    pub fn joined_len(&self) -> usize {
        let separators = self.entries.len().saturating_sub(1);
        self.entries.iter().map(PathEntry::len).sum::<usize>() + separators
    }

    /// Remove every entry matching `pred`, returning how many went away.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&PathEntry) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(e));
        before - self.entries.len()
    }

    /// Put `entries` at the front in the given order. Entries already in the
    /// list move to the front instead of appearing twice.
    pub fn prepend(&mut self, entries: Vec<PathEntry>) {
        for entry in entries.into_iter().rev() {
            self.entries.retain(|e| e != &entry);
            self.entries.insert(0, entry);
        }
    }

    /// Drop later occurrences of the same key. Returns the number removed.
    pub fn dedup(&mut self) -> usize {
        let mut seen = HashSet::new();
        let before = self.entries.len();
        self.entries.retain(|e| seen.insert(e.key().to_string()));
        before - self.entries.len()
    }

    /// Rewrite every entry value through `f`, re-deriving keys.
    pub(crate) fn rewrite(&mut self, base_dir: &str, mut f: impl FnMut(&str) -> String) {
        for entry in self.entries.iter_mut() {
            let value = f(entry.value());
            if value != entry.value() {
                *entry = PathEntry::new(&value, base_dir);
            }
        }
    }
}

impl<'a> IntoIterator for &'a PathList {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r"C:\work";

    fn values(list: &PathList) -> Vec<&str> {
        list.iter().map(PathEntry::value).collect()
    }

    #[test]
    fn test_normalize_keeps_first_occurrence() {
        let (list, report) = normalize(&[r"C:\A", r"c:\b", r"c:/a/", r"C:\B\"], BASE);
        assert_eq!(values(&list), vec![r"C:\A", r"c:\b"]);
        assert_eq!(report.duplicates_removed, 2);
    }

    #[test]
    fn test_normalize_reports_changes() {
        let (_, report) = normalize(&["p1", r"c:\ok", r"%JAVA_HOME%\bin"], BASE);
        assert_eq!(
            report.changed,
            vec![("p1".to_string(), r"c:\work\p1".to_string())]
        );
        assert_eq!(report.unexpanded, vec![r"%JAVA_HOME%\bin".to_string()]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = ["b", r"C:\X\..\Y", "B", r"\\srv\s\", "", "  a  ", r"c:\y"];
        let (once, _) = normalize(&raw, BASE);
        let (twice, report) = normalize(&once.values(), BASE);
        assert_eq!(once.values(), twice.values());
        assert_eq!(
            once.iter().map(PathEntry::key).collect::<Vec<_>>(),
            twice.iter().map(PathEntry::key).collect::<Vec<_>>()
        );
        assert_eq!(report.duplicates_removed, 0);
    }

    #[test]
    fn test_normalize_empty_input() {
        let raw: [&str; 0] = [];
        let (list, report) = normalize(&raw, BASE);
        assert!(list.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_prepend_preserves_given_order_and_moves_existing() {
        let (mut list, _) = normalize(&[r"C:\a", r"C:\b"], BASE);
        let (new, _) = normalize(&[r"C:\x", r"C:\B", r"C:\y"], BASE);
        list.prepend(new.entries().to_vec());
        assert_eq!(values(&list), vec![r"C:\x", r"C:\B", r"C:\y", r"C:\a"]);
    }

    #[test]
    fn test_joined_len_matches_joined() {
        let (list, _) = normalize(&[r"C:\a", r"C:\bb", r"C:\ccc"], BASE);
        assert_eq!(list.joined(), r"C:\a;C:\bb;C:\ccc");
        assert_eq!(list.joined_len(), list.joined().len());
        assert_eq!(PathList::new().joined_len(), 0);
    }
}
