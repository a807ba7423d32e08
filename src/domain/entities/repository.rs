use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Relation of the local branch to the matching branch of one remote.
///
/// Reconciliation only ever yields `UpToDate`, `Changed` or `Unknown`: the
/// symmetric divergence count it relies on carries no direction. `Ahead`
/// and `Behind` stay in the type for a directional comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RemoteDivergence {
    Ahead,
    Behind,
    UpToDate,
    Changed,
    #[default]
    Unknown,
}

impl RemoteDivergence {
    /// Classify a symmetric divergence count.
    pub fn from_divergence_count(count: u64) -> Self {
        if count == 0 {
            Self::UpToDate
        } else {
            Self::Changed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ahead => "Ahead",
            Self::Behind => "Behind",
            Self::UpToDate => "Up to date",
            Self::Changed => "Changed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RemoteDivergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Local state of a working tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkingTreeStatus {
    Clean,
    Dirty,
    #[default]
    Undefined,
}

impl WorkingTreeStatus {
    /// Interpret `git status --porcelain` output: any line means dirty.
    pub fn from_porcelain(output: &str) -> Self {
        if output.trim().is_empty() {
            Self::Clean
        } else {
            Self::Dirty
        }
    }

    /// Text shown in the status column. `Undefined` shows nothing.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Dirty => "Dirty",
            Self::Undefined => "",
        }
    }
}

impl fmt::Display for WorkingTreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One named remote of a repository.
///
/// Only `name` and `url` are persisted; `divergence` is rebuilt on every
/// reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRef {
    pub name: String,
    pub url: String,
    #[serde(skip)]
    pub divergence: RemoteDivergence,
}

impl RemoteRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            divergence: RemoteDivergence::Unknown,
        }
    }

    pub fn with_divergence(mut self, divergence: RemoteDivergence) -> Self {
        self.divergence = divergence;
        self
    }
}

/// One tracked working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    /// Absolute path; the registry key.
    pub directory: PathBuf,
    pub valid: bool,
    pub working_tree_status: WorkingTreeStatus,
    remotes: Vec<RemoteRef>,
    pub display_name: String,
}

impl RepositoryEntry {
    /// A freshly discovered, valid entry.
    pub fn new(directory: impl Into<PathBuf>, remotes: Vec<RemoteRef>) -> Self {
        let directory = directory.into();
        let display_name = directory.display().to_string();
        let mut entry = Self {
            directory,
            valid: true,
            working_tree_status: WorkingTreeStatus::Undefined,
            remotes: Vec::new(),
            display_name,
        };
        entry.set_remotes(remotes);
        entry
    }

    /// Mark the entry unusable.
    ///
    /// Remotes are kept so a kept entry still persists them, but their
    /// divergence is reset and nothing should display them.
    pub fn invalidate(&mut self) {
        self.valid = false;
        self.working_tree_status = WorkingTreeStatus::Undefined;
        for remote in &mut self.remotes {
            remote.divergence = RemoteDivergence::Unknown;
        }
    }

    pub fn remotes(&self) -> &[RemoteRef] {
        &self.remotes
    }

    pub fn remotes_mut(&mut self) -> &mut [RemoteRef] {
        &mut self.remotes
    }

    /// Replace the remotes, keeping the first remote of each name.
    pub fn set_remotes(&mut self, remotes: Vec<RemoteRef>) {
        self.remotes.clear();
        for remote in remotes {
            if self.get_remote(&remote.name).is_none() {
                self.remotes.push(remote);
            }
        }
    }

    pub fn get_remote(&self, name: &str) -> Option<&RemoteRef> {
        self.remotes.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divergence_classification() {
        assert_eq!(
            RemoteDivergence::from_divergence_count(0),
            RemoteDivergence::UpToDate
        );
        assert_eq!(
            RemoteDivergence::from_divergence_count(3),
            RemoteDivergence::Changed
        );
        assert_eq!(RemoteDivergence::default(), RemoteDivergence::Unknown);
        assert_eq!(RemoteDivergence::UpToDate.to_string(), "Up to date");
    }

    #[test]
    fn test_working_tree_status_from_porcelain() {
        assert_eq!(WorkingTreeStatus::from_porcelain(""), WorkingTreeStatus::Clean);
        assert_eq!(
            WorkingTreeStatus::from_porcelain(" M src/lib.rs\n?? notes.txt\n"),
            WorkingTreeStatus::Dirty
        );
        assert_eq!(WorkingTreeStatus::Undefined.label(), "");
    }

    #[test]
    fn test_entry_creation() {
        let entry = RepositoryEntry::new(
            "/home/user/src/repo",
            vec![RemoteRef::new("origin", "https://example.com/repo.git")],
        );
        assert!(entry.valid);
        assert_eq!(entry.display_name, "/home/user/src/repo");
        assert_eq!(entry.working_tree_status, WorkingTreeStatus::Undefined);
        assert_eq!(entry.remotes().len(), 1);
    }

    #[test]
    fn test_remote_names_are_unique() {
        let mut entry = RepositoryEntry::new("/repo", Vec::new());
        entry.set_remotes(vec![
            RemoteRef::new("origin", "https://example.com/a.git"),
            RemoteRef::new("origin", "https://example.com/b.git"),
            RemoteRef::new("upstream", "https://example.com/c.git"),
        ]);

        assert_eq!(entry.remotes().len(), 2);
        assert_eq!(
            entry.get_remote("origin").unwrap().url,
            "https://example.com/a.git"
        );
    }

    #[test]
    fn test_invalidate_drops_derived_state() {
        let mut entry = RepositoryEntry::new(
            "/repo",
            vec![RemoteRef::new("origin", "https://example.com/repo.git")
                .with_divergence(RemoteDivergence::UpToDate)],
        );
        entry.working_tree_status = WorkingTreeStatus::Dirty;
        entry.invalidate();

        assert!(!entry.valid);
        assert_eq!(entry.working_tree_status, WorkingTreeStatus::Undefined);
        assert_eq!(entry.remotes().len(), 1);
        assert_eq!(entry.remotes()[0].divergence, RemoteDivergence::Unknown);
    }

    #[test]
    fn test_remote_serialization_skips_divergence() {
        let remote = RemoteRef::new("origin", "https://example.com/repo.git")
            .with_divergence(RemoteDivergence::Changed);
        let json = serde_json::to_string(&remote).unwrap();
        assert_eq!(json, r#"{"name":"origin","url":"https://example.com/repo.git"}"#);

        let back: RemoteRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back.divergence, RemoteDivergence::Unknown);
    }
}
