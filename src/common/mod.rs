//! Shared error types, result helpers and the task fan-out executor.

pub mod error;
pub mod executor;
pub mod result;

pub use error::GcloneError;
pub use executor::{fan_out, ExecutorConfig};
pub use result::{GcloneResult, GcloneResultExt, ResultExt};
