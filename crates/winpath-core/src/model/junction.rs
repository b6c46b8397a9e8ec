use serde::{Deserialize, Serialize};

/// A long directory prefix and the junction that stands in for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    pub long: String,
    pub short: String,
}

impl Junction {
    pub fn new(long: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: short.into(),
        }
    }
}

/// Substitution pairs, always kept longest `long` first so that
/// `C:\Program Files\` cannot match inside `C:\Program Files (x86)\`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunctionMap {
    pairs: Vec<Junction>,
}

impl JunctionMap {
    pub fn new(pairs: impl IntoIterator<Item = Junction>) -> Self {
        let mut pairs: Vec<Junction> = pairs.into_iter().collect();
        // stable: equal lengths keep their given order
        pairs.sort_by(|a, b| b.long.chars().count().cmp(&a.long.chars().count()));
        Self { pairs }
    }

    /// `Program Files` directories mapped to short junctions on the system drive.
    pub fn program_files() -> Self {
        Self::new(default_junctions())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Junction> {
        self.pairs.iter()
    }

    /// Apply every pair in order to one value.
    pub fn apply(&self, value: &str) -> String {
        self.pairs.iter().fold(value.to_string(), |acc, j| {
            replace_ignore_ascii_case(&acc, &j.long, &j.short)
        })
    }
}

impl FromIterator<Junction> for JunctionMap {
    fn from_iter<I: IntoIterator<Item = Junction>>(iter: I) -> Self {
        Self::new(iter)
    }
}

pub fn default_junctions() -> Vec<Junction> {
    vec![
        Junction::new(r"C:\Program Files (x86)\", r"C:\prgx86\"),
        Junction::new(r"C:\Program Files\", r"C:\prg\"),
    ]
}

/// Character savings of a substitution pass, per scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shortening {
    pub user: i64,
    pub system: i64,
}

/// Replace every occurrence of `needle`, comparing ASCII letters without case.
pub fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    // ASCII lowering keeps byte offsets stable
    let lower_hay = haystack.to_ascii_lowercase();
    let lower_needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(found) = lower_hay[pos..].find(&lower_needle) {
        let start = pos + found;
        out.push_str(&haystack[pos..start]);
        out.push_str(replacement);
        pos = start + needle.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_orders_longest_first() {
        let map = JunctionMap::new(vec![
            Junction::new(r"C:\Program Files\", r"C:\prg\"),
            Junction::new(r"C:\Program Files (x86)\", r"C:\prgx86\"),
        ]);
        let longs: Vec<&str> = map.iter().map(|j| j.long.as_str()).collect();
        assert_eq!(longs, vec![r"C:\Program Files (x86)\", r"C:\Program Files\"]);
    }

    #[test]
    fn test_apply_prefers_full_match() {
        let map = JunctionMap::program_files();
        assert_eq!(map.apply(r"C:\Program Files (x86)\Foo"), r"C:\prgx86\Foo");
        assert_eq!(map.apply(r"C:\Program Files\Git\cmd"), r"C:\prg\Git\cmd");
    }

    #[test]
    fn test_apply_matches_lower_case_variant() {
        let map = JunctionMap::program_files();
        assert_eq!(map.apply(r"c:\program files\nodejs"), r"C:\prg\nodejs");
    }

    #[test]
    fn test_replace_ignore_case_all_occurrences() {
        assert_eq!(replace_ignore_ascii_case("aXbxc", "x", "--"), "a--b--c");
        assert_eq!(replace_ignore_ascii_case("abc", "", "z"), "abc");
        assert_eq!(replace_ignore_ascii_case("Grüße\\X", "\\x", "/y"), "Grüße/y");
    }

    #[test]
    fn test_empty_map_is_identity() {
        let map = JunctionMap::default();
        assert!(map.is_empty());
        assert_eq!(map.apply(r"C:\Program Files\X"), r"C:\Program Files\X");
    }
}
