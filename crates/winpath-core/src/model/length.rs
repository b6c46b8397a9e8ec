use crate::model::entry::PathEntry;

/// Windows 7 refuses to expand a `%PATH%` longer than this.
pub const DEFAULT_LIMIT: usize = 2047;

/// Character counts of both scopes against the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthReport {
    pub user: usize,
    pub system: usize,
    pub limit: usize,
}

impl LengthReport {
    /// `system;user`, as the shell sees it.
    pub fn total(&self) -> usize {
        self.system + 1 + self.user
    }

    pub fn ratio(&self) -> f64 {
        if self.limit == 0 {
            return f64::INFINITY;
        }
        self.total() as f64 / self.limit as f64
    }

    pub fn percent(&self) -> f64 {
        100.0 * self.ratio()
    }

    pub fn exceeded(&self) -> bool {
        self.total() > self.limit
    }
}

/// Index of the first entry that no longer fits into `limit`, counting one
/// separator before every entry but the first.
pub fn truncation_index<'a>(
    entries: impl IntoIterator<Item = &'a PathEntry>,
    limit: usize,
) -> Option<usize> {
    let mut total = 0usize;
    for (idx, entry) in entries.into_iter().enumerate() {
        if idx > 0 {
            total += 1;
        }
        total += entry.len();
        if total > limit {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(values: &[&str]) -> Vec<PathEntry> {
        values.iter().map(|v| PathEntry::new(v, r"C:\")).collect()
    }

    #[test]
    fn test_report_total_and_ratio() {
        let report = LengthReport { user: 10, system: 20, limit: 62 };
        assert_eq!(report.total(), 31);
        assert!((report.ratio() - 0.5).abs() < 1e-9);
        assert!(!report.exceeded());
    }

    #[test]
    fn test_report_exceeded() {
        let report = LengthReport { user: 1000, system: 1047, limit: DEFAULT_LIMIT };
        assert_eq!(report.total(), 2048);
        assert!(report.exceeded());
    }

    #[test]
    fn test_truncation_counts_separators() {
        let list = entries(&["aaaa", "bbbb", "cccc"]);
        // 4, 4+1+4 = 9, 9+1+4 = 14
        assert_eq!(truncation_index(&list, 14), None);
        assert_eq!(truncation_index(&list, 13), Some(2));
        assert_eq!(truncation_index(&list, 9), Some(2));
        assert_eq!(truncation_index(&list, 8), Some(1));
        assert_eq!(truncation_index(&list, 3), Some(0));
    }

    #[test]
    fn test_truncation_of_nothing() {
        assert_eq!(truncation_index(&entries(&[]), 0), None);
    }
}
