//! PATH entries and the Windows-style normalization used to compare them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Which of the two registry-backed lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    User,
    System,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::User, Scope::System];

    /// Single letter used in the combined view (`U3`, `S0`).
    pub fn tag(self) -> char {
        match self {
            Scope::User => 'U',
            Scope::System => 'S',
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User => write!(f, "USER"),
            Scope::System => write!(f, "SYSTEM"),
        }
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "user" => Ok(Scope::User),
            "s" | "sys" | "system" => Ok(Scope::System),
            other => Err(format!("unknown scope '{}', expected user or system", other)),
        }
    }
}

/// One PATH entry.
///
/// `value` is the text shown to the operator and written back on save.
/// `key` is the normalized form: equality and hashing only look at it, so
/// `C:\Tools\` and `c:/tools` are the same entry.
#[derive(Debug, Clone)]
pub struct PathEntry {
    value: String,
    key: String,
}

impl PathEntry {
    /// Build an entry, resolving relative text against `base_dir`.
    pub fn new(raw: &str, base_dir: &str) -> Self {
        let value = raw.trim().to_string();
        let key = normalize_key(&value, base_dir);
        Self { value, key }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Length as Windows counts it (UTF-16 code units).
    pub fn len(&self) -> usize {
        self.value.encode_utf16().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Whether the value still contains an unexpanded `%NAME%` reference.
    pub fn has_env_reference(&self) -> bool {
        has_env_reference(&self.value)
    }
}

impl PartialEq for PathEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PathEntry {}

impl Hash for PathEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Split a `;`-joined PATH value into trimmed, non-empty entries.
pub fn listify(path_str: &str) -> Vec<String> {
    path_str
        .split(';')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Join entries the way they are stored in the registry.
pub fn stringify<S: AsRef<str>>(entries: &[S]) -> String {
    entries
        .iter()
        .map(|e| e.as_ref())
        .collect::<Vec<_>>()
        .join(";")
}

/// Comparison key for a PATH entry: Windows `abspath` against `base_dir`,
/// then ASCII lower-case.
///
/// Never fails. Text with a `%NAME%` reference is not resolved against the
/// base because its real location is only known after expansion.
pub fn normalize_key(raw: &str, base_dir: &str) -> String {
    let text = raw.trim().replace('/', "\\");
    let resolved = if has_env_reference(&text) {
        let trimmed = text.trim_end_matches('\\');
        if trimmed.is_empty() {
            text.clone()
        } else {
            trimmed.to_string()
        }
    } else {
        absolute(&text, base_dir)
    };
    resolved.to_ascii_lowercase()
}

/// True when `value` contains `%NAME%` with a non-empty name.
pub fn has_env_reference(value: &str) -> bool {
    let mut rest = value;
    while let Some(start) = rest.find('%') {
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(0) => rest = after,
            Some(_) => return true,
            None => return false,
        }
    }
    false
}

/// Expand `%NAME%` references. Unknown names are left untouched.
pub fn expand_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

enum Prefix<'a> {
    /// `C:\x` or `C:x`
    Drive(&'a str, &'a str),
    /// `\\server\share\x`
    Unc(String, &'a str),
    /// `\x`
    Rooted(&'a str),
    Relative(&'a str),
}

fn split_prefix(path: &str) -> Prefix<'_> {
    let bytes = path.as_bytes();
    if let Some(after) = path.strip_prefix("\\\\") {
        let mut parts = after.splitn(3, '\\');
        let server = parts.next().unwrap_or("");
        let share = parts.next();
        let rest = parts.next().unwrap_or("");
        let prefix = match share {
            Some(share) => format!("\\\\{}\\{}", server, share),
            None => format!("\\\\{}", server),
        };
        Prefix::Unc(prefix, rest)
    } else if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Prefix::Drive(&path[..2], &path[2..])
    } else if path.starts_with('\\') {
        Prefix::Rooted(path)
    } else {
        Prefix::Relative(path)
    }
}

/// Root (drive or UNC share) and remaining text of the base directory.
fn base_parts(base_dir: &str) -> (String, String) {
    let base = base_dir.trim().replace('/', "\\");
    match split_prefix(&base) {
        Prefix::Drive(drive, rest) => (drive.to_string(), rest.to_string()),
        Prefix::Unc(prefix, rest) => (prefix, rest.to_string()),
        Prefix::Rooted(rest) | Prefix::Relative(rest) => (String::new(), rest.to_string()),
    }
}

fn absolute(path: &str, base_dir: &str) -> String {
    let (root, rest) = match split_prefix(path) {
        Prefix::Drive(drive, rest) => (drive.to_string(), rest.to_string()),
        Prefix::Unc(prefix, rest) => (prefix, rest.to_string()),
        Prefix::Rooted(rest) => (base_parts(base_dir).0, rest.to_string()),
        Prefix::Relative(rest) => {
            let (root, base_rest) = base_parts(base_dir);
            (root, format!("{}\\{}", base_rest, rest))
        }
    };

    let mut components: Vec<&str> = Vec::new();
    for component in rest.split('\\') {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }

    format!("{}\\{}", root, components.join("\\"))
}
