//! Mock services for testing
//!
//! `MockVcs` answers every VCS operation from per-directory scripts and
//! records each call, so registry behaviour can be checked without a git
//! executable.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gclone::domain::entities::repository::{RemoteRef, WorkingTreeStatus};
use gclone::domain::value_objects::git_url::GitUrl;
use gclone::infrastructure::scm::{FetchOptions, ScmError, VcsOperations};

/// Scripted state of one directory
#[derive(Debug, Clone)]
pub struct MockRepo {
    pub remotes: Vec<RemoteRef>,
    /// `None` makes the working tree query fail
    pub status: Option<WorkingTreeStatus>,
    /// `None` behaves like a detached HEAD
    pub branch: Option<String>,
    /// Divergence count per remote name; missing remotes fail the query
    pub counts: HashMap<String, u64>,
    pub fetch_fails: bool,
}

impl MockRepo {
    pub fn new() -> Self {
        Self {
            remotes: Vec::new(),
            status: Some(WorkingTreeStatus::Clean),
            branch: Some("main".to_string()),
            counts: HashMap::new(),
            fetch_fails: false,
        }
    }

    /// Add a remote whose branch is `count` commits apart from HEAD.
    pub fn with_remote(mut self, name: &str, url: &str, count: u64) -> Self {
        self.remotes.push(RemoteRef::new(name, url));
        self.counts.insert(name.to_string(), count);
        self
    }

    pub fn with_status(mut self, status: Option<WorkingTreeStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn detached(mut self) -> Self {
        self.branch = None;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fetch_fails = true;
        self
    }
}

impl Default for MockRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct MockState {
    repos: HashMap<PathBuf, MockRepo>,
    clone_fails: bool,
    call_history: Vec<String>,
}

/// Mock VCS; every clone shares one state.
#[derive(Clone, Default)]
pub struct MockVcs {
    state: Arc<Mutex<MockState>>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repo(&self, directory: impl Into<PathBuf>, repo: MockRepo) {
        self.state.lock().unwrap().repos.insert(directory.into(), repo);
    }

    pub fn remove_repo(&self, directory: &Path) {
        self.state.lock().unwrap().repos.remove(directory);
    }

    pub fn set_clone_fails(&self, fails: bool) {
        self.state.lock().unwrap().clone_fails = fails;
    }

    pub fn get_call_history(&self) -> Vec<String> {
        self.state.lock().unwrap().call_history.clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.get_call_history()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().call_history.push(call);
    }

    fn repo(&self, directory: &Path) -> Option<MockRepo> {
        self.state.lock().unwrap().repos.get(directory).cloned()
    }
}

#[async_trait]
impl VcsOperations for MockVcs {
    /// Creates the destination directory and scripts it as a repository
    /// with an `origin` remote pointing at `url`.
    async fn clone_repository(&self, url: &str, destination: Option<&Path>) -> Result<(), ScmError> {
        self.record(format!(
            "clone {} {}",
            url,
            destination.map(|d| d.display().to_string()).unwrap_or_default()
        ));
        if self.state.lock().unwrap().clone_fails {
            return Err(ScmError::clone_failed("repository not found"));
        }

        // Without a destination git creates the default directory under the cwd.
        let destination = match destination {
            Some(d) => d.to_path_buf(),
            None => GitUrl::new(url)
                .and_then(|u| u.default_directory_name())
                .map(PathBuf::from)
                .map_err(|e| ScmError::clone_failed(e.to_string()))?,
        };
        std::fs::create_dir_all(&destination)?;
        let canonical = destination.canonicalize()?;
        self.add_repo(canonical, MockRepo::new().with_remote("origin", url, 0));
        Ok(())
    }

    async fn fetch(&self, directory: &Path, options: &FetchOptions) -> Result<(), ScmError> {
        self.record(format!("fetch {} {}", directory.display(), options.args().join(" ")));
        match self.repo(directory) {
            Some(repo) if !repo.fetch_fails => Ok(()),
            Some(_) => Err(ScmError::fetch_failed("could not read from remote repository")),
            None => Err(ScmError::repository_not_found(directory)),
        }
    }

    async fn list_remotes(&self, directory: &Path) -> Result<Vec<RemoteRef>, ScmError> {
        self.record(format!("remotes {}", directory.display()));
        self.repo(directory)
            .map(|r| r.remotes)
            .ok_or_else(|| ScmError::repository_not_found(directory))
    }

    async fn working_tree_status(&self, directory: &Path) -> Result<WorkingTreeStatus, ScmError> {
        self.record(format!("status {}", directory.display()));
        self.repo(directory)
            .and_then(|r| r.status)
            .ok_or_else(|| ScmError::status_failed("not a git repository"))
    }

    async fn current_branch(&self, directory: &Path) -> Result<String, ScmError> {
        self.record(format!("branch {}", directory.display()));
        self.repo(directory)
            .and_then(|r| r.branch)
            .ok_or_else(|| ScmError::unexpected_output("git branch --show-current", ""))
    }

    async fn divergence_count(
        &self,
        directory: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<u64, ScmError> {
        self.record(format!("divergence {} {}/{}", directory.display(), remote, branch));
        self.repo(directory)
            .and_then(|r| r.counts.get(remote).copied())
            .ok_or_else(|| ScmError::command_failed("git rev-list", 128, "unknown revision"))
    }
}
