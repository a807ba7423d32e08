//! Version-control operations the registry delegates to.

pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{FetchOptions, ScmError, VcsOperations};
