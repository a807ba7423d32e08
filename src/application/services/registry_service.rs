use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::use_cases::fetch_repositories::{
    FetchRepositoriesConfig, FetchRepositoriesUseCase, FetchSummary,
};
use crate::application::use_cases::prune_entries::{
    ConfirmationSource, DeleteMethod, PruneEntriesUseCase, PruneOutcome,
};
use crate::application::use_cases::status_check::{
    ReconcileSummary, StatusCheckConfig, StatusCheckUseCase,
};
use crate::common::error::GcloneError;
use crate::common::result::GcloneResult;
use crate::domain::entities::registry::Registry;
use crate::domain::entities::repository::RepositoryEntry;
use crate::domain::value_objects::git_url::GitUrl;
use crate::infrastructure::filesystem::RegistryStore;
use crate::infrastructure::scm::{FetchOptions, VcsOperations};

/// Registry handle threaded through every command.
///
/// Owns the loaded registry and is the single place that mutates and
/// persists it.
pub struct RegistryService {
    registry: Registry,
    store: RegistryStore,
    vcs: Arc<dyn VcsOperations>,
    jobs: Option<usize>,
}

impl RegistryService {
    pub fn new(registry: Registry, store: RegistryStore, vcs: Arc<dyn VcsOperations>) -> Self {
        Self {
            registry,
            store,
            vcs,
            jobs: None,
        }
    }

    /// Load the registry from `store`.
    pub async fn load(store: RegistryStore, vcs: Arc<dyn VcsOperations>) -> GcloneResult<Self> {
        let registry = store.load().await?;
        Ok(Self::new(registry, store, vcs))
    }

    /// Bound concurrent VCS calls in batch operations.
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Register `path` and persist immediately.
    ///
    /// Returns the canonical directory used as the key.
    pub async fn add(&mut self, path: &Path) -> GcloneResult<PathBuf> {
        let directory = tokio::fs::canonicalize(path).await.map_err(|e| {
            GcloneError::filesystem_error_with_source(
                "Cannot resolve directory",
                Some(path.to_path_buf()),
                e,
            )
        })?;
        if !directory.is_dir() {
            return Err(GcloneError::not_a_git_directory(directory));
        }

        let remotes = self
            .vcs
            .list_remotes(&directory)
            .await
            .map_err(|e| GcloneError::not_a_git_directory_with_source(&directory, e))?;
        debug!("{} has {} remotes", directory.display(), remotes.len());

        let replaced = self
            .registry
            .insert(RepositoryEntry::new(directory.clone(), remotes))
            .is_some();
        self.store.store(&self.registry).await?;

        if replaced {
            info!("Updated {}", directory.display());
        } else {
            info!("Added {}", directory.display());
        }
        Ok(directory)
    }

    /// Clone `url` and register the resulting directory.
    ///
    /// Without a destination the directory is the one `git clone` picks.
    pub async fn clone_repository(
        &mut self,
        url: &str,
        destination: Option<&str>,
    ) -> GcloneResult<PathBuf> {
        let git_url = GitUrl::new(url)
            .map_err(|e| GcloneError::validation_error("url", e.to_string(), Some(url.to_string())))?;
        let target = git_url
            .clone_destination(destination)
            .map_err(|e| GcloneError::clone_failed(git_url.as_str(), e.to_string()))?;

        let explicit = destination
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(Path::new);
        self.vcs
            .clone_repository(git_url.as_str(), explicit)
            .await
            .map_err(|e| GcloneError::clone_failed_with_source(git_url.as_str(), e))?;

        self.add(&target).await
    }

    /// Fetch every entry with `options`; failures stay per entry.
    pub async fn fetch(&self, options: FetchOptions) -> FetchSummary {
        let config = FetchRepositoriesConfig::new(options).with_max_parallel(self.jobs);
        FetchRepositoriesUseCase::new(config, Arc::clone(&self.vcs))
            .execute(&self.registry)
            .await
    }

    /// Run one reconciliation pass over the whole registry.
    pub async fn reconcile(&mut self, progress: Option<ProgressBar>, verbose: bool) -> ReconcileSummary {
        let config = StatusCheckConfig::new()
            .with_max_parallel(self.jobs)
            .with_verbose(verbose);
        let mut use_case = StatusCheckUseCase::new(config, Arc::clone(&self.vcs));
        if let Some(progress) = progress {
            use_case = use_case.with_progress(progress);
        }
        use_case.execute(&mut self.registry).await
    }

    /// Prune invalid entries; stores the registry when anything was removed.
    pub async fn prune(
        &mut self,
        method: DeleteMethod,
        source: &mut dyn ConfirmationSource,
    ) -> GcloneResult<PruneOutcome> {
        let outcome = PruneEntriesUseCase::new(method).execute(&mut self.registry, source)?;
        if outcome.any_deleted() {
            self.store().await?;
        }
        Ok(outcome)
    }

    pub async fn store(&self) -> GcloneResult<()> {
        self.store.store(&self.registry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::prune_entries::MockConfirmationSource;
    use crate::infrastructure::scm::GitScm;
    use tempfile::TempDir;

    async fn open_service(temp_dir: &TempDir) -> RegistryService {
        let store = RegistryStore::new(temp_dir.path().join("register.json"));
        RegistryService::load(store, Arc::new(GitScm::new()))
            .await
            .unwrap()
    }

    fn init_repo(path: &Path) {
        let repo = git2::Repository::init(path).unwrap();
        repo.remote("origin", "https://example.com/repo.git").unwrap();
    }

    #[tokio::test]
    async fn test_add_canonicalizes_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let repo_dir = temp_dir.path().join("work").join("repo");
        std::fs::create_dir_all(&repo_dir).unwrap();
        init_repo(&repo_dir);

        let mut service = open_service(&temp_dir).await;
        let messy = temp_dir.path().join("work").join(".").join("repo");
        let added = service.add(&messy).await.unwrap();

        assert!(added.is_absolute());
        assert_eq!(added, repo_dir.canonicalize().unwrap());
        assert_eq!(service.registry().get(&added).unwrap().directory, added);

        let reloaded = open_service(&temp_dir).await;
        assert!(reloaded.registry().contains(&added));
    }

    #[tokio::test]
    async fn test_add_twice_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let repo_dir = temp_dir.path().join("repo");
        std::fs::create_dir(&repo_dir).unwrap();
        init_repo(&repo_dir);

        let mut service = open_service(&temp_dir).await;
        service.add(&repo_dir).await.unwrap();
        service.add(&repo_dir).await.unwrap();
        assert_eq!(service.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_plain_directory() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("plain");
        std::fs::create_dir(&plain).unwrap();

        let mut service = open_service(&temp_dir).await;
        assert!(matches!(
            service.add(&plain).await,
            Err(GcloneError::NotAGitDirectory { .. })
        ));
        assert!(service.registry().is_empty());
        assert!(!service.store_path().exists());
    }

    #[tokio::test]
    async fn test_prune_stores_only_after_deletion() {
        let temp_dir = TempDir::new().unwrap();
        let store = RegistryStore::new(temp_dir.path().join("register.json"));
        let mut entry = RepositoryEntry::new(temp_dir.path().join("gone"), Vec::new());
        entry.invalidate();
        let registry: Registry = vec![entry].into_iter().collect();
        let mut service = RegistryService::new(registry, store, Arc::new(GitScm::new()));

        let mut keep = MockConfirmationSource::new();
        keep.expect_confirm_deletion()
            .returning(|_| Ok(Some("n".to_string())));
        let outcome = service.prune(DeleteMethod::DeleteAsk, &mut keep).await.unwrap();
        assert!(!outcome.any_deleted());
        assert!(!service.store_path().exists());

        let mut never = MockConfirmationSource::new();
        let outcome = service.prune(DeleteMethod::DeleteAll, &mut never).await.unwrap();
        assert_eq!(outcome.deleted_count(), 1);
        assert!(service.store_path().exists());
    }
}
