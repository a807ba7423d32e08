use crate::common::error::GcloneError;

/// Result alias used across the crate.
///
/// # Examples
///
/// ```
/// use gclone::common::result::GcloneResult;
/// use gclone::common::error::GcloneError;
///
/// fn example_function() -> GcloneResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> GcloneResult<()> {
///     Err(GcloneError::not_a_git_directory("/tmp/plain"))
/// }
/// ```
pub type GcloneResult<T> = Result<T, GcloneError>;

/// Conversions from foreign `Result`s into [`GcloneResult`].
pub trait ResultExt<T, E> {
    /// Wrap an IO failure with a message and the path it concerned.
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GcloneResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> GcloneResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| GcloneError::filesystem_error_with_source(message, path, e.into()))
    }
}

/// Helpers for downgrading per-entry failures inside a batch.
pub trait GcloneResultExt<T> {
    /// Log the error as a warning and continue with `None`.
    fn to_option_logged(self) -> Option<T>;

    /// Log the error as a warning and continue with `T::default()`.
    fn unwrap_or_default_logged(self) -> T
    where
        T: Default;
}

impl<T> GcloneResultExt<T> for GcloneResult<T> {
    fn to_option_logged(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn unwrap_or_default_logged(self) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{}, using default", e);
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = Some(PathBuf::from("/test/path"));

        match result.with_filesystem_error("read storage", path) {
            Err(GcloneError::FileSystemError { path: Some(p), .. }) => {
                assert_eq!(p, PathBuf::from("/test/path"))
            }
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }

    #[test]
    fn test_to_option_logged() {
        let ok_result: GcloneResult<String> = Ok("test".to_string());
        assert_eq!(ok_result.to_option_logged(), Some("test".to_string()));

        let err_result: GcloneResult<String> = Err(GcloneError::not_a_git_directory("/tmp/x"));
        assert_eq!(err_result.to_option_logged(), None);
    }

    #[test]
    fn test_unwrap_or_default_logged() {
        let err_result: GcloneResult<u64> = Err(GcloneError::not_a_git_directory("/tmp/x"));
        assert_eq!(err_result.unwrap_or_default_logged(), 0);
    }
}
