use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum GitUrlError {
    #[error("Empty repository address")]
    Empty,

    #[error("Cannot derive a directory name from: {0}")]
    MissingRepoName(String),
}

fn remote_address_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(git://|git@|ssh://|https?://)").expect("remote address pattern is valid")
    })
}

/// Whether `candidate` looks like something `git clone` fetches from a
/// remote, rather than a local directory.
pub fn is_remote_address(candidate: &str) -> bool {
    remote_address_pattern().is_match(candidate.trim())
}

/// Address handed to `git clone`: a remote URL, an scp-like address or a
/// local repository path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitUrl {
    url: String,
}

impl GitUrl {
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(GitUrlError::Empty);
        }
        Ok(Self {
            url: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn is_remote(&self) -> bool {
        is_remote_address(&self.url)
    }

    /// The repository path part of the address.
    ///
    /// scp-like addresses (`git@host:org/repo.git`) are not URLs, so the
    /// part after the first `:` is used for them.
    fn repo_path(&self) -> String {
        if let Ok(parsed) = Url::parse(&self.url) {
            if parsed.has_host() {
                return parsed.path().to_string();
            }
        }
        match self.url.split_once(':') {
            Some((_, path)) => path.to_string(),
            None => self.url.clone(),
        }
    }

    /// Directory `git clone` creates when no destination is given: the last
    /// path segment with trailing `/` and `.git` removed.
    pub fn default_directory_name(&self) -> Result<String, GitUrlError> {
        let path = self.repo_path();
        let trimmed = path.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let trimmed = trimmed.trim_end_matches('/');

        let name = trimmed
            .rsplit(['/', ':'])
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| GitUrlError::MissingRepoName(self.url.clone()))?;

        Ok(name.to_string())
    }

    /// Destination directory: `destination` if given, else the default name.
    pub fn clone_destination(&self, destination: Option<&str>) -> Result<PathBuf, GitUrlError> {
        match destination.map(str::trim).filter(|d| !d.is_empty()) {
            Some(dest) => Ok(PathBuf::from(dest)),
            None => self.default_directory_name().map(PathBuf::from),
        }
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        Self::new(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_address_detection() {
        assert!(is_remote_address("https://github.com/user/repo.git"));
        assert!(is_remote_address("http://example.com/repo"));
        assert!(is_remote_address("git://example.com/repo.git"));
        assert!(is_remote_address("git@github.com:user/repo.git"));
        assert!(is_remote_address("ssh://git@example.com/repo.git"));

        assert!(!is_remote_address("."));
        assert!(!is_remote_address("/home/user/src/repo"));
        assert!(!is_remote_address("github.com/user/repo"));
        assert!(!is_remote_address("gitlab/repo"));
    }

    #[test]
    fn test_default_directory_name() {
        let cases = [
            ("https://github.com/user/repo.git", "repo"),
            ("https://github.com/user/repo", "repo"),
            ("https://github.com/user/repo/", "repo"),
            ("https://github.com/user/repo.git/", "repo"),
            ("git@github.com:user/tool.git", "tool"),
            ("git@example.com:tool.git", "tool"),
            ("ssh://git@example.com:2222/team/service.git", "service"),
            ("git://example.com/project", "project"),
            ("/srv/git/shared.git", "shared"),
        ];
        for (url, expected) in cases {
            let url = GitUrl::new(url).unwrap();
            assert_eq!(url.default_directory_name().unwrap(), expected, "{}", url);
        }
    }

    #[test]
    fn test_missing_repo_name() {
        let url = GitUrl::new("https://example.com/").unwrap();
        assert!(matches!(
            url.default_directory_name(),
            Err(GitUrlError::MissingRepoName(_))
        ));
    }

    #[test]
    fn test_clone_destination() {
        let url = GitUrl::new("https://github.com/user/repo.git").unwrap();
        assert_eq!(url.clone_destination(None).unwrap(), PathBuf::from("repo"));
        assert_eq!(url.clone_destination(Some("")).unwrap(), PathBuf::from("repo"));
        assert_eq!(
            url.clone_destination(Some("work/other")).unwrap(),
            PathBuf::from("work/other")
        );
    }

    #[test]
    fn test_local_sources() {
        let url = GitUrl::try_from("../mirror/repo").unwrap();
        assert!(!url.is_remote());
        assert_eq!(url.default_directory_name().unwrap(), "repo");
        assert!(GitUrl::new("https://example.com/a/b.git").unwrap().is_remote());
        assert_eq!(GitUrl::try_from("  "), Err(GitUrlError::Empty));
    }
}
