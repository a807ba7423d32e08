use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::common::error::GcloneError;
use crate::common::executor::{fan_out, ExecutorConfig};
use crate::domain::entities::registry::Registry;
use crate::infrastructure::scm::{FetchOptions, VcsOperations};

#[derive(Debug, Clone, Default)]
pub struct FetchRepositoriesConfig {
    /// Arguments forwarded verbatim to every fetch
    pub options: FetchOptions,

    /// Upper bound on concurrent fetches (None = CPU count)
    pub max_parallel: Option<usize>,

    /// Print a banner for each directory
    pub show_banner: bool,
}

impl FetchRepositoriesConfig {
    pub fn new(options: FetchOptions) -> Self {
        Self {
            options,
            max_parallel: None,
            show_banner: true,
        }
    }

    pub fn with_max_parallel(mut self, max_parallel: Option<usize>) -> Self {
        self.max_parallel = max_parallel;
        self
    }

    pub fn with_banner(mut self, show_banner: bool) -> Self {
        self.show_banner = show_banner;
        self
    }
}

/// Outcome of a fetch batch
#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub fetched: Vec<PathBuf>,
    /// Directories whose fetch failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl FetchSummary {
    pub fn total(&self) -> usize {
        self.fetched.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetch every registered directory. A failure only affects its own entry.
pub struct FetchRepositoriesUseCase {
    config: FetchRepositoriesConfig,
    vcs: Arc<dyn VcsOperations>,
}

impl FetchRepositoriesUseCase {
    pub fn new(config: FetchRepositoriesConfig, vcs: Arc<dyn VcsOperations>) -> Self {
        Self { config, vcs }
    }

    pub async fn execute(&self, registry: &Registry) -> FetchSummary {
        let executor = ExecutorConfig::from_jobs(self.config.max_parallel);
        let options = Arc::new(self.config.options.clone());
        let vcs = Arc::clone(&self.vcs);
        let show_banner = self.config.show_banner;

        let results = fan_out(
            registry.directories(),
            &executor,
            move |directory| {
                let vcs = Arc::clone(&vcs);
                let options = Arc::clone(&options);
                async move {
                    if show_banner {
                        println!("{} {}", "Fetching:".cyan(), directory.display());
                    }
                    let outcome = vcs
                        .fetch(&directory, &options)
                        .await
                        .map_err(|e| GcloneError::external_operation_failed("fetch", &directory, e));
                    (directory, outcome)
                }
            },
            |_| {},
        )
        .await;

        let mut summary = FetchSummary::default();
        for (directory, outcome) in results {
            match outcome {
                Ok(()) => summary.fetched.push(directory),
                Err(e) => {
                    warn!("{}: {}", e, error_detail(&e));
                    summary.failed.push((directory, error_detail(&e)));
                }
            }
        }
        summary.fetched.sort();
        summary.failed.sort();

        info!(
            "Fetched {} of {} directories",
            summary.fetched.len(),
            summary.total()
        );
        summary
    }
}

fn error_detail(error: &GcloneError) -> String {
    match error {
        GcloneError::ExternalOperationFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}
