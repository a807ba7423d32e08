use indicatif::ProgressBar;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::error::GcloneError;
use crate::common::executor::{fan_out, ExecutorConfig};
use crate::common::result::GcloneResultExt;
use crate::domain::entities::registry::Registry;
use crate::domain::entities::repository::{RemoteDivergence, RepositoryEntry, WorkingTreeStatus};
use crate::infrastructure::scm::VcsOperations;

/// Settings for a reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct StatusCheckConfig {
    /// Upper bound on concurrent VCS calls (None = CPU count)
    pub max_parallel: Option<usize>,

    /// Log per-entry outcomes at debug level
    pub verbose: bool,
}

impl StatusCheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_parallel(mut self, max_parallel: Option<usize>) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Counts gathered over one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Entries whose result was merged back
    pub checked: usize,
    pub valid: usize,
    pub invalid: usize,
    pub dirty: usize,
    /// Entries whose task died before reporting; they are marked invalid
    pub missing: usize,
}

/// Status Reconciler: re-derives validity, working tree status and remote
/// divergence for every registry entry.
pub struct StatusCheckUseCase {
    config: StatusCheckConfig,
    vcs: Arc<dyn VcsOperations>,
    progress: Option<ProgressBar>,
}

impl StatusCheckUseCase {
    pub fn new(config: StatusCheckConfig, vcs: Arc<dyn VcsOperations>) -> Self {
        Self {
            config,
            vcs,
            progress: None,
        }
    }

    /// Advance `progress` once per collected working tree result.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run one full pass. Every entry present before the pass is present
    /// after it; no failure aborts the pass.
    pub async fn execute(&self, registry: &mut Registry) -> ReconcileSummary {
        let executor = ExecutorConfig::from_jobs(self.config.max_parallel);
        let mut summary = ReconcileSummary::default();

        self.refresh_working_trees(registry, &executor, &mut summary)
            .await;
        self.refresh_divergence(registry, &executor).await;

        for entry in registry.entries() {
            if entry.valid {
                summary.valid += 1;
                if entry.working_tree_status == WorkingTreeStatus::Dirty {
                    summary.dirty += 1;
                }
            } else {
                summary.invalid += 1;
            }
        }

        debug!("Reconciliation finished: {:?}", summary);
        summary
    }

    async fn refresh_working_trees(
        &self,
        registry: &mut Registry,
        executor: &ExecutorConfig,
        summary: &mut ReconcileSummary,
    ) {
        let snapshot: Vec<RepositoryEntry> = registry.entries().cloned().collect();
        if let Some(progress) = &self.progress {
            progress.set_length(snapshot.len() as u64);
            progress.set_position(0);
        }

        let vcs = Arc::clone(&self.vcs);
        let verbose = self.config.verbose;
        let progress = self.progress.clone();
        let results = fan_out(
            snapshot,
            executor,
            move |entry| check_working_tree(Arc::clone(&vcs), entry, verbose),
            |_| {
                if let Some(progress) = &progress {
                    progress.inc(1);
                }
            },
        )
        .await;

        let mut written = HashSet::with_capacity(results.len());
        for entry in results {
            let directory = entry.directory.clone();
            if written.contains(&directory) {
                warn!("Duplicate result for {}, ignored", directory.display());
                continue;
            }
            if registry.replace(entry) {
                written.insert(directory);
            }
        }
        summary.checked = written.len();

        for directory in registry.directories() {
            if written.contains(&directory) {
                continue;
            }
            warn!("No status reported for {}", directory.display());
            if let Some(entry) = registry.get_mut(&directory) {
                entry.invalidate();
            }
            summary.missing += 1;
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
    }

    async fn refresh_divergence(&self, registry: &mut Registry, executor: &ExecutorConfig) {
        let work: Vec<(PathBuf, Vec<String>)> = registry
            .entries()
            .filter(|e| e.valid && !e.remotes().is_empty())
            .map(|e| {
                let names = e.remotes().iter().map(|r| r.name.clone()).collect();
                (e.directory.clone(), names)
            })
            .collect();

        let vcs = Arc::clone(&self.vcs);
        let results = fan_out(
            work,
            executor,
            move |(directory, names)| check_divergence(Arc::clone(&vcs), directory, names),
            |_| {},
        )
        .await;

        for (directory, divergences) in results {
            let Some(entry) = registry.get_mut(&directory) else {
                continue;
            };
            for remote in entry.remotes_mut() {
                if let Some((_, divergence)) = divergences.iter().find(|(n, _)| *n == remote.name) {
                    remote.divergence = *divergence;
                }
            }
        }
    }
}

/// One working tree unit: re-read remotes, then query the working tree.
async fn check_working_tree(
    vcs: Arc<dyn VcsOperations>,
    mut entry: RepositoryEntry,
    verbose: bool,
) -> RepositoryEntry {
    entry.invalidate();

    let remotes = vcs
        .list_remotes(&entry.directory)
        .await
        .map_err(|e| GcloneError::not_a_git_directory_with_source(&entry.directory, e))
        .to_option_logged();
    let Some(remotes) = remotes else {
        return entry;
    };
    entry.set_remotes(remotes);

    let status = vcs
        .working_tree_status(&entry.directory)
        .await
        .map_err(|e| GcloneError::external_operation_failed("status", &entry.directory, e))
        .to_option_logged();
    if let Some(status) = status {
        entry.working_tree_status = status;
        entry.valid = true;
    }

    if verbose {
        debug!(
            "{}: valid={} status={:?}",
            entry.directory.display(),
            entry.valid,
            entry.working_tree_status
        );
    }
    entry
}

/// One divergence unit: the branch is looked up once, then every remote is
/// compared against `<remote>/<branch>` independently.
async fn check_divergence(
    vcs: Arc<dyn VcsOperations>,
    directory: PathBuf,
    remotes: Vec<String>,
) -> (PathBuf, Vec<(String, RemoteDivergence)>) {
    let branch = vcs
        .current_branch(&directory)
        .await
        .map_err(|e| GcloneError::external_operation_failed("branch lookup", &directory, e))
        .to_option_logged();

    let mut divergences = Vec::with_capacity(remotes.len());
    for name in remotes {
        let divergence = match &branch {
            Some(branch) => vcs
                .divergence_count(&directory, &name, branch)
                .await
                .map(RemoteDivergence::from_divergence_count)
                .map_err(|e| {
                    GcloneError::external_operation_failed(
                        format!("comparison with {}/{}", name, branch),
                        &directory,
                        e,
                    )
                })
                .unwrap_or_default_logged(),
            None => RemoteDivergence::Unknown,
        };
        divergences.push((name, divergence));
    }

    (directory, divergences)
}
