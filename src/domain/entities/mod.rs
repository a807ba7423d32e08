pub mod registry;
pub mod repository;

pub use registry::Registry;
pub use repository::{RemoteDivergence, RemoteRef, RepositoryEntry, WorkingTreeStatus};
