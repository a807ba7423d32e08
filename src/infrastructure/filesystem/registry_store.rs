use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, info};

use crate::common::error::GcloneError;
use crate::common::result::{GcloneResult, ResultExt};
use crate::domain::entities::registry::Registry;
use crate::domain::entities::repository::{RemoteRef, RepositoryEntry};

const APP_DIR: &str = "gclone";
const STORAGE_FILE: &str = "register.json";

/// Persisted metadata of one directory. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    remotes: Vec<RemoteRef>,
}

/// Accepted storage shapes.
///
/// Older versions wrapped the directory map in a `Repos` object; it is read
/// and rewritten in the flat shape on the next store.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredRegistry {
    Legacy {
        #[serde(rename = "Repos")]
        repos: BTreeMap<String, StoredEntry>,
    },
    Current(BTreeMap<String, StoredEntry>),
}

impl StoredRegistry {
    fn into_entries(self) -> BTreeMap<String, StoredEntry> {
        match self {
            StoredRegistry::Legacy { repos } => repos,
            StoredRegistry::Current(entries) => entries,
        }
    }
}

/// JSON file holding the directory -> metadata mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the storage file from the process environment.
    ///
    /// An explicit `index` wins; otherwise `$XDG_DATA_HOME/gclone/register.json`,
    /// falling back to `$HOME/.local/share/gclone/register.json`.
    pub fn resolve(index: Option<&Path>) -> GcloneResult<Self> {
        let cwd = std::env::current_dir()
            .with_filesystem_error("Failed to read the current directory", None)?;
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve_with(index, std::env::var_os("XDG_DATA_HOME"), home, &cwd)
    }

    pub fn resolve_with(
        index: Option<&Path>,
        xdg_data_home: Option<OsString>,
        home: Option<PathBuf>,
        cwd: &Path,
    ) -> GcloneResult<Self> {
        if let Some(index) = index {
            return Ok(Self::new(absolutize(index, cwd)));
        }

        let data_home = match xdg_data_home.filter(|v| !v.is_empty()) {
            Some(dir) => absolutize(Path::new(&dir), cwd),
            None => home
                .map(|h| h.join(".local").join("share"))
                .ok_or_else(|| {
                    GcloneError::validation_error(
                        "index",
                        "Neither XDG_DATA_HOME nor HOME is set; pass --index",
                        None,
                    )
                })?,
        };

        Ok(Self::new(data_home.join(APP_DIR).join(STORAGE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the registry. A missing or empty file is an empty registry.
    pub async fn load(&self) -> GcloneResult<Registry> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No storage file at {}, starting empty", self.path.display());
                return Ok(Registry::new());
            }
            Err(e) => {
                return Err(GcloneError::filesystem_error_with_source(
                    "Failed to read storage file",
                    Some(self.path.clone()),
                    e,
                ))
            }
        };

        let registry = Self::decode(&content)
            .map_err(|e| GcloneError::invalid_storage_format(&self.path, e))?;
        debug!(
            "Loaded {} entries from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    /// Write the registry as pretty JSON, creating the parent directory.
    pub async fn store(&self, registry: &Registry) -> GcloneResult<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .with_filesystem_error("Failed to create storage directory", Some(parent.to_path_buf()))?;
        }

        let content = Self::encode(registry)?;
        async_fs::write(&self.path, content)
            .await
            .with_filesystem_error("Failed to write storage file", Some(self.path.clone()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            async_fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .with_filesystem_error("Failed to restrict storage file", Some(self.path.clone()))?;
        }

        info!("Stored {} entries to {}", registry.len(), self.path.display());
        Ok(())
    }

    fn decode(content: &str) -> Result<Registry, serde_json::Error> {
        if content.trim().is_empty() {
            return Ok(Registry::new());
        }

        let stored: StoredRegistry = serde_json::from_str(content)?;
        Ok(stored
            .into_entries()
            .into_iter()
            .map(|(dir, entry)| RepositoryEntry::new(dir, entry.remotes))
            .collect())
    }

    fn encode(registry: &Registry) -> GcloneResult<String> {
        let stored: BTreeMap<String, StoredEntry> = registry
            .entries()
            .map(|entry| {
                (
                    entry.directory.display().to_string(),
                    StoredEntry {
                        remotes: entry.remotes().to_vec(),
                    },
                )
            })
            .collect();

        let mut content = serde_json::to_string_pretty(&stored)
            .map_err(|e| GcloneError::internal_error_with_source("Failed to encode registry", e))?;
        content.push('\n');
        Ok(content)
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
