use super::scm_interface::{FetchOptions, ScmError, VcsOperations};
use crate::domain::entities::repository::{RemoteRef, WorkingTreeStatus};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Git implementation of the external VCS operations.
///
/// Working tree and history queries shell out to the `git` executable;
/// remote discovery reads the repository configuration through libgit2.
pub struct GitScm {
    git_executable: String,
}

impl Default for GitScm {
    fn default() -> Self {
        Self {
            git_executable: "git".to_string(),
        }
    }
}

impl GitScm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            git_executable: executable.into(),
        }
    }

    async fn execute_git_command(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<std::process::Output, ScmError> {
        let mut cmd = Command::new(&self.git_executable);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!(
            "Running {} {} in {}",
            self.git_executable,
            args.join(" "),
            working_dir.map(|d| d.display().to_string()).unwrap_or_else(|| ".".to_string())
        );
        // A missing working directory also spawns with NotFound.
        cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound && working_dir.map_or(true, Path::is_dir) {
                ScmError::executable_not_found(&self.git_executable)
            } else {
                ScmError::from(e)
            }
        })
    }

    /// Execute a git command and return its trimmed stdout on success
    async fn execute_git_command_checked(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ScmError> {
        let output = self.execute_git_command(args, working_dir).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let command = format!("{} {}", self.git_executable, args.join(" "));
            return Err(ScmError::command_failed(
                command,
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VcsOperations for GitScm {
    async fn clone_repository(
        &self,
        url: &str,
        destination: Option<&Path>,
    ) -> Result<(), ScmError> {
        let mut args = vec!["clone", url];
        let destination = destination
            .map(|d| {
                d.to_str().ok_or_else(|| ScmError::Internal {
                    message: format!("Invalid destination path: {}", d.display()),
                })
            })
            .transpose()?;
        if let Some(dest) = destination {
            args.push(dest);
        }

        let output = self.execute_git_command(&args, None).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScmError::clone_failed(format!(
                "git clone exited with {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(())
    }

    async fn fetch(&self, directory: &Path, options: &FetchOptions) -> Result<(), ScmError> {
        let mut args = vec!["fetch"];
        args.extend(options.args().iter().map(String::as_str));

        let output = self.execute_git_command(&args, Some(directory)).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScmError::fetch_failed(stderr.trim().to_string()));
        }

        Ok(())
    }

    async fn list_remotes(&self, directory: &Path) -> Result<Vec<RemoteRef>, ScmError> {
        let directory = directory.to_path_buf();
        tokio::task::spawn_blocking(move || read_remotes(&directory))
            .await
            .map_err(|e| ScmError::Internal {
                message: format!("Remote lookup task failed: {}", e),
            })?
    }

    async fn working_tree_status(&self, directory: &Path) -> Result<WorkingTreeStatus, ScmError> {
        let porcelain = self
            .execute_git_command_checked(
                &["--no-optional-locks", "status", "--porcelain=v1"],
                Some(directory),
            )
            .await
            .map_err(|e| ScmError::status_failed(e.to_string()))?;

        Ok(WorkingTreeStatus::from_porcelain(&porcelain))
    }

    async fn current_branch(&self, directory: &Path) -> Result<String, ScmError> {
        let branch = self
            .execute_git_command_checked(&["branch", "--show-current"], Some(directory))
            .await?;

        if branch.is_empty() {
            // Detached HEAD prints nothing.
            return Err(ScmError::unexpected_output("git branch --show-current", branch));
        }
        Ok(branch)
    }

    async fn divergence_count(
        &self,
        directory: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<u64, ScmError> {
        let range = format!("{}/{}...", remote, branch);
        let count = self
            .execute_git_command_checked(&["rev-list", "--count", &range], Some(directory))
            .await?;

        parse_count(&count).ok_or_else(|| {
            ScmError::unexpected_output(format!("git rev-list --count {}", range), count)
        })
    }
}

fn read_remotes(directory: &Path) -> Result<Vec<RemoteRef>, ScmError> {
    let repo = git2::Repository::open(directory).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound {
            ScmError::repository_not_found(directory)
        } else {
            ScmError::from(e)
        }
    })?;

    let names = repo.remotes()?;
    let mut remotes = Vec::with_capacity(names.len());
    for name in names.iter().flatten() {
        let remote = repo.find_remote(name)?;
        match remote.url() {
            Some(url) => remotes.push(RemoteRef::new(name, url)),
            None => debug!("Remote {} in {} has no usable URL", name, directory.display()),
        }
    }
    Ok(remotes)
}

fn parse_count(output: &str) -> Option<u64> {
    output.lines().next()?.trim().parse().ok()
}
