//! Test fixtures for creating test data
//!
//! Real repositories are built with libgit2, so no git executable is needed.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use gclone::domain::entities::registry::Registry;
use gclone::domain::entities::repository::{RemoteRef, RepositoryEntry};
use gclone::infrastructure::filesystem::RegistryStore;

/// Initialise a repository at `path` with the given remotes.
pub fn init_repo(path: &Path, remotes: &[(&str, &str)]) -> PathBuf {
    std::fs::create_dir_all(path).unwrap();
    let repo = git2::Repository::init(path).unwrap();
    for (name, url) in remotes {
        repo.remote(name, url).unwrap();
    }
    path.canonicalize().unwrap()
}

/// Scratch area holding repositories and a storage file.
pub struct RegistryFixture {
    pub temp_dir: TempDir,
}

impl RegistryFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().canonicalize().unwrap()
    }

    pub fn storage_path(&self) -> PathBuf {
        self.root().join("data").join("register.json")
    }

    pub fn store(&self) -> RegistryStore {
        RegistryStore::new(self.storage_path())
    }

    /// Create `name` under the root as a repository with `remotes`.
    pub fn repo(&self, name: &str, remotes: &[(&str, &str)]) -> PathBuf {
        init_repo(&self.root().join(name), remotes)
    }

    /// Create `name` under the root as a plain directory.
    pub fn plain_dir(&self, name: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn write_storage(&self, content: &str) {
        let path = self.storage_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn read_storage(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.storage_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with one entry per directory, each with an `origin` remote.
pub fn registry_with<P: AsRef<Path>>(directories: &[P], url: &str) -> Registry {
    directories
        .iter()
        .map(|d| RepositoryEntry::new(d.as_ref(), vec![RemoteRef::new("origin", url)]))
        .collect()
}
