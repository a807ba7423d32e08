/// Infrastructure layer modules
///
/// Concrete implementations for external system interactions:
/// - SCM operations (git executable and libgit2)
/// - File system operations (the registry storage file)
pub mod filesystem;
pub mod scm;

pub use filesystem::RegistryStore;
pub use scm::{FetchOptions, GitScm, ScmError, VcsOperations};
