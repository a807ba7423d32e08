//! # gclone - registry of local git working copies
//!
//! `gclone` remembers which directories hold git repositories and checks all
//! of them at once: whether the working tree is dirty, and whether the local
//! branch matches the same branch on every remote.
//!
//! ## Features
//!
//! - **Registry**: add directories or clone straight into the registry
//! - **Concurrent status**: every entry is checked in its own task
//! - **Grouped views**: by directory or by remote URL, sorted by key or status
//! - **Pruning**: directories that are no longer repositories are offered for removal
//! - **Fetch all**: run `git fetch` with the same options everywhere
//!
//! ## Quick Start
//!
//! ```bash
//! gclone add ~/src/project ~/src/tool
//! gclone https://github.com/example/repo.git
//! gclone status --list remote --sort status
//! gclone fetch --prune
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: registry entities and value objects
//! - [`application`]: registry operations, reconciliation, fetch and pruning
//! - [`infrastructure`]: git access and the JSON storage file
//! - [`presentation`]: CLI interface and terminal output
//! - [`common`]: error handling and the task fan-out executor
//!
//! ## Error Handling
//!
//! - [`common::error::GcloneError`]: main error type
//! - [`common::result::GcloneResult`]: type alias for `Result<T, GcloneError>`
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gclone::application::services::RegistryService;
//! use gclone::infrastructure::{GitScm, RegistryStore};
//! use gclone::presentation::ui::status_view::{build_status_lines, StatusViewOptions};
//!
//! # async fn example() -> gclone::Result<()> {
//! let store = RegistryStore::resolve(None)?;
//! let mut service = RegistryService::load(store, Arc::new(GitScm::new())).await?;
//!
//! service.reconcile(None, false).await;
//! for line in build_status_lines(service.registry(), &StatusViewOptions::default(), None) {
//!     println!("{} {} {}", line.key, line.status, line.info);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::GcloneError;
pub use crate::common::result::GcloneResult as Result;
