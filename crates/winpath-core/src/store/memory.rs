use crate::core::{WinPathError, WinPathResult};
use crate::model::Scope;
use crate::store::PathStore;
use std::collections::HashSet;

/// Keeps both lists in memory. Writes can be refused per scope to simulate
/// a process without administrator rights.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    user: Vec<String>,
    system: Vec<String>,
    read_only: HashSet<Scope>,
}

impl MemoryStore {
    pub fn new<S: Into<String>>(
        user: impl IntoIterator<Item = S>,
        system: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            user: user.into_iter().map(Into::into).collect(),
            system: system.into_iter().map(Into::into).collect(),
            read_only: HashSet::new(),
        }
    }

    /// Make every later save to `scope` fail with `AccessDenied`.
    pub fn deny_writes(mut self, scope: Scope) -> Self {
        self.read_only.insert(scope);
        self
    }

    pub fn entries(&self, scope: Scope) -> &[String] {
        match scope {
            Scope::User => &self.user,
            Scope::System => &self.system,
        }
    }
}

impl PathStore for MemoryStore {
    fn load_scope(&self, scope: Scope) -> WinPathResult<Vec<String>> {
        Ok(self.entries(scope).to_vec())
    }

    fn save_scope(&mut self, scope: Scope, entries: &[String]) -> WinPathResult<()> {
        if self.read_only.contains(&scope) {
            return Err(WinPathError::AccessDenied { scope });
        }
        let target = match scope {
            Scope::User => &mut self.user,
            Scope::System => &mut self.system,
        };
        *target = entries.to_vec();
        Ok(())
    }

    fn describe(&self, scope: Scope) -> String {
        format!("memory::{}", scope)
    }

    fn is_writable(&self, scope: Scope) -> bool {
        !self.read_only.contains(&scope)
    }
}
