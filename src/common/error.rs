use std::path::PathBuf;
use thiserror::Error;

use crate::infrastructure::scm::ScmError;

#[derive(Error, Debug)]
pub enum GcloneError {
    #[error("No git structure found in directory: {}", path.display())]
    NotAGitDirectory {
        path: PathBuf,
        #[source]
        source: Option<ScmError>,
    },

    #[error("Clone of {url} failed: {message}")]
    CloneFailed {
        url: String,
        message: String,
        #[source]
        source: Option<ScmError>,
    },

    #[error("Storage file {} has an invalid format", path.display())]
    InvalidStorageFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} failed in {}", directory.display())]
    ExternalOperationFailed {
        operation: String,
        directory: PathBuf,
        #[source]
        source: ScmError,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GcloneError {
    pub fn not_a_git_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotAGitDirectory {
            path: path.into(),
            source: None,
        }
    }

    pub fn not_a_git_directory_with_source(path: impl Into<PathBuf>, source: ScmError) -> Self {
        Self::NotAGitDirectory {
            path: path.into(),
            source: Some(source),
        }
    }

    pub fn clone_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CloneFailed {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn clone_failed_with_source(url: impl Into<String>, source: ScmError) -> Self {
        Self::CloneFailed {
            url: url.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn invalid_storage_format(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::InvalidStorageFormat {
            path: path.into(),
            source,
        }
    }

    pub fn external_operation_failed(
        operation: impl Into<String>,
        directory: impl Into<PathBuf>,
        source: ScmError,
    ) -> Self {
        Self::ExternalOperationFailed {
            operation: operation.into(),
            directory: directory.into(),
            source,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn internal_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InternalError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<std::io::Error> for GcloneError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}
