use std::collections::HashSet;
use winpath::model::{PathEntry, PathSetModel, Scope};
use winpath::store::PathStore;
use winpath::ui;

pub const NOT_FOUND: &str = " [ N O T  F O U N D ]";

/// `"   3.*S 2 ---C:\\gone [ N O T  F O U N D ]"`
pub fn format_entry(model: &PathSetModel, idx: usize, entry: &PathEntry, missing: bool) -> String {
    let mut line = format!("{:4}.", idx);
    line.push(if missing { '*' } else { ' ' });

    match model.index_in(Scope::System, entry) {
        Some(n) => line.push_str(&format!("S{:2}", n)),
        None => line.push_str("---"),
    }
    match model.index_in(Scope::User, entry) {
        Some(n) => line.push_str(&format!(" U{:2}", n)),
        None => line.push_str(" ---"),
    }

    line.push(' ');
    if missing {
        line.push_str(&ui::warn(&format!("{}{}", entry, NOT_FOUND)));
    } else {
        line.push_str(entry.value());
    }
    line
}

/// The numbered combined view, with the truncation warning in place.
pub fn render(model: &PathSetModel) -> Vec<String> {
    let missing: HashSet<PathEntry> = model.non_existent().into_iter().collect();
    let truncated = model.truncated_from();

    let mut lines = Vec::new();
    for (idx, entry) in model.combined().into_iter().enumerate() {
        if truncated == Some(idx) {
            lines.push(ui::warn(
                "/!\\ The following entries will not be in %PATH% (too long):",
            ));
        }
        lines.push(format_entry(model, idx, entry, missing.contains(entry)));
    }
    lines
}

/// Combined indices and entries whose value contains `needle`, ignoring case.
pub fn filter<'a>(model: &'a PathSetModel, needle: &str) -> Vec<(usize, &'a PathEntry)> {
    let needle = needle.to_lowercase();
    model
        .combined()
        .into_iter()
        .enumerate()
        .filter(|(_, entry)| entry.value().to_lowercase().contains(&needle))
        .collect()
}

pub fn render_filtered(model: &PathSetModel, needle: &str) -> Vec<String> {
    let missing: HashSet<PathEntry> = model.non_existent().into_iter().collect();
    filter(model, needle)
        .into_iter()
        .map(|(idx, entry)| format_entry(model, idx, entry, missing.contains(entry)))
        .collect()
}

pub fn legend(store: &dyn PathStore) -> Vec<String> {
    vec![
        String::new(),
        format!("S: position in the system path ({})", store.describe(Scope::System)),
        format!("U: position in the user path ({})", store.describe(Scope::User)),
        "*: directory not found".to_string(),
    ]
}

pub fn print(model: &PathSetModel, store: &dyn PathStore) {
    for line in render(model).into_iter().chain(legend(store)) {
        println!("{}", line);
    }
}

pub fn print_filtered(model: &PathSetModel, needle: &str) {
    let lines = render_filtered(model, needle);
    if lines.is_empty() {
        println!("No entry contains '{}'.", needle);
    }
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn model_in(dir: &TempDir, user: &[&str], system: &[&str]) -> PathSetModel {
        let base = dir.path().to_string_lossy().to_string();
        let mut m = PathSetModel::with_base_dir(base, r"C:\Windows");
        m.replace(user, system);
        m
    }

    #[test]
    fn test_line_for_entry_in_both_scopes() {
        ui::set_color(false);
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("shared")).unwrap();
        std::fs::create_dir(temp.path().join("sys")).unwrap();
        let m = model_in(&temp, &["shared"], &["sys", "shared"]);

        let lines = render(&m);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   0. S 0 --- sys");
        assert_eq!(lines[1], "   1. S 1 U 0 shared");
        assert_eq!(lines[2], "   2. S 1 U 0 shared");
    }

    #[test]
    fn test_missing_entry_is_flagged() {
        ui::set_color(false);
        let temp = TempDir::new().unwrap();
        let m = model_in(&temp, &["gone"], &[]);

        let lines = render(&m);
        assert_eq!(lines, vec!["   0.*--- U 0 gone [ N O T  F O U N D ]"]);
    }

    #[test]
    fn test_truncation_warning_precedes_entry() {
        ui::set_color(false);
        let temp = TempDir::new().unwrap();
        for name in ["aaaa", "bbbb", "cccc"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }
        let base = temp.path().to_string_lossy().to_string();
        let mut m = PathSetModel::with_base_dir(base, r"C:\Windows").with_limit(9);
        m.replace(&["cccc"], &["aaaa", "bbbb"]);

        let lines = render(&m);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("/!\\"));
        assert!(lines[3].ends_with("cccc"));
    }

    #[test]
    fn test_filter_ignores_case() {
        let temp = TempDir::new().unwrap();
        let m = model_in(&temp, &[r"C:\Python39", r"C:\Tools"], &[r"D:\python\scripts"]);

        let hits: Vec<usize> = filter(&m, "PYTHON").into_iter().map(|(i, _)| i).collect();
        assert_eq!(hits, vec![0, 1]);
        assert!(filter(&m, "ruby").is_empty());
    }
}
