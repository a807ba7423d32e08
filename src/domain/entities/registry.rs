use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::repository::RepositoryEntry;

/// In-memory map of tracked directories to their metadata.
///
/// Every key equals the `directory` of the entry stored under it; the
/// mutators below keep that true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: BTreeMap<PathBuf, RepositoryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, directory: &Path) -> Option<&RepositoryEntry> {
        self.entries.get(directory)
    }

    pub fn get_mut(&mut self, directory: &Path) -> Option<&mut RepositoryEntry> {
        self.entries.get_mut(directory)
    }

    pub fn contains(&self, directory: &Path) -> bool {
        self.entries.contains_key(directory)
    }

    /// Insert or overwrite the entry keyed by its own directory.
    ///
    /// Returns the previous entry for that directory, if any.
    pub fn insert(&mut self, entry: RepositoryEntry) -> Option<RepositoryEntry> {
        self.entries.insert(entry.directory.clone(), entry)
    }

    /// Overwrite an existing entry; unknown directories are ignored.
    ///
    /// Returns whether the entry was written.
    pub fn replace(&mut self, entry: RepositoryEntry) -> bool {
        match self.entries.get_mut(&entry.directory) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, directory: &Path) -> Option<RepositoryEntry> {
        self.entries.remove(directory)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RepositoryEntry> {
        self.entries.values()
    }

    /// Registered directories in ascending path order.
    pub fn directories(&self) -> Vec<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    /// Directories whose entry is currently marked invalid.
    pub fn invalid_directories(&self) -> Vec<PathBuf> {
        self.entries
            .values()
            .filter(|e| !e.valid)
            .map(|e| e.directory.clone())
            .collect()
    }
}

impl FromIterator<RepositoryEntry> for Registry {
    fn from_iter<T: IntoIterator<Item = RepositoryEntry>>(iter: T) -> Self {
        let mut registry = Registry::new();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::repository::RemoteRef;

    fn entry(dir: &str) -> RepositoryEntry {
        RepositoryEntry::new(dir, vec![RemoteRef::new("origin", "https://example.com/r.git")])
    }

    #[test]
    fn test_insert_overwrites_same_directory() {
        let mut registry = Registry::new();
        assert!(registry.insert(entry("/src/a")).is_none());
        assert!(registry.insert(entry("/src/a")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_keys_match_entry_directories() {
        let registry: Registry = vec![entry("/src/b"), entry("/src/a")].into_iter().collect();
        for dir in registry.directories() {
            assert_eq!(registry.get(&dir).unwrap().directory, dir);
        }
        assert_eq!(
            registry.directories(),
            vec![PathBuf::from("/src/a"), PathBuf::from("/src/b")]
        );
    }

    #[test]
    fn test_replace_ignores_unknown_directory() {
        let mut registry: Registry = vec![entry("/src/a")].into_iter().collect();

        let mut updated = entry("/src/a");
        updated.invalidate();
        assert!(registry.replace(updated));
        assert!(!registry.replace(entry("/src/unknown")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.invalid_directories(), vec![PathBuf::from("/src/a")]);
    }

    #[test]
    fn test_remove() {
        let mut registry: Registry = vec![entry("/src/a"), entry("/src/b")].into_iter().collect();
        assert!(registry.remove(Path::new("/src/a")).is_some());
        assert!(registry.remove(Path::new("/src/a")).is_none());
        assert!(!registry.contains(Path::new("/src/a")));
        assert_eq!(registry.len(), 1);
    }
}
