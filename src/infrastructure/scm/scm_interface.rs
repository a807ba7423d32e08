use async_trait::async_trait;
use std::path::Path;

use crate::domain::entities::repository::{RemoteRef, WorkingTreeStatus};

/// External version-control operations the registry relies on.
///
/// Implementations report outcomes only; the registry decides how a failure
/// is classified (invalid entry, unknown divergence, failed clone).
#[async_trait]
pub trait VcsOperations: Send + Sync {
    /// Clone `url`; without a destination the tool picks the directory name.
    async fn clone_repository(&self, url: &str, destination: Option<&Path>)
        -> Result<(), ScmError>;

    /// Fetch in `directory`, forwarding `options` untouched.
    async fn fetch(&self, directory: &Path, options: &FetchOptions) -> Result<(), ScmError>;

    /// Fetch remotes configured for the repository at exactly `directory`.
    async fn list_remotes(&self, directory: &Path) -> Result<Vec<RemoteRef>, ScmError>;

    async fn working_tree_status(&self, directory: &Path) -> Result<WorkingTreeStatus, ScmError>;

    async fn current_branch(&self, directory: &Path) -> Result<String, ScmError>;

    /// Number of commits in the symmetric difference of `<remote>/<branch>` and HEAD.
    async fn divergence_count(
        &self,
        directory: &Path,
        remote: &str,
        branch: &str,
    ) -> Result<u64, ScmError>;
}

/// Opaque arguments forwarded to every `fetch` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    args: Vec<String>,
}

impl FetchOptions {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args
                .into_iter()
                .map(Into::into)
                .filter(|a: &String| !a.is_empty())
                .collect(),
        }
    }

    /// Split a single option string on whitespace.
    pub fn from_raw(raw: &str) -> Self {
        Self::new(raw.split_whitespace())
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Whether a help flag was passed among the forwarded options.
    pub fn requests_help(&self) -> bool {
        self.args.iter().any(|a| a == "-h" || a == "--help")
    }
}

/// Errors that can occur while running version-control operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    #[error("Clone operation failed: {message}")]
    CloneFailed { message: String },

    #[error("Fetch operation failed: {message}")]
    FetchFailed { message: String },

    #[error("Status check failed: {message}")]
    StatusFailed { message: String },

    #[error("Unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("SCM executable not found: {executable}")]
    ExecutableNotFound { executable: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Git error: {source}")]
    Git2Error {
        #[from]
        source: git2::Error,
    },

    #[error("Command execution failed: {command}, exit code: {exit_code}, stderr: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    pub fn repository_not_found(path: &Path) -> Self {
        Self::RepositoryNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    pub fn status_failed(message: impl Into<String>) -> Self {
        Self::StatusFailed {
            message: message.into(),
        }
    }

    pub fn unexpected_output(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            command: command.into(),
            output: output.into(),
        }
    }

    pub fn executable_not_found(executable: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
        }
    }

    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_options_drop_empty_args() {
        let options = FetchOptions::new(vec!["--prune", "", "origin"]);
        assert_eq!(options.args(), &["--prune".to_string(), "origin".to_string()]);
    }

    #[test]
    fn test_fetch_options_from_raw() {
        let options = FetchOptions::from_raw("  --all   --tags ");
        assert_eq!(options.args(), &["--all".to_string(), "--tags".to_string()]);
        assert!(FetchOptions::from_raw("").is_empty());
    }

    #[test]
    fn test_fetch_options_help_detection() {
        assert!(FetchOptions::new(["--all", "-h"]).requests_help());
        assert!(FetchOptions::new(["--help"]).requests_help());
        assert!(!FetchOptions::new(["--hard"]).requests_help());
    }

    #[test]
    fn test_command_failed_message() {
        let error = ScmError::command_failed("git status", 128, "not a git repository");
        assert_eq!(
            error.to_string(),
            "Command execution failed: git status, exit code: 128, stderr: not a git repository"
        );
    }
}
