pub mod add;
pub mod clone;
pub mod fetch;
pub mod list;
pub mod status;

pub use add::*;
pub use clone::*;
pub use fetch::*;
pub use list::*;
pub use status::*;
