pub mod display;
pub mod prompt;
pub mod status_view;

pub use display::DisplayHelper;
pub use status_view::{build_status_lines, ListKey, SortKey, StatusLine, StatusViewOptions};
