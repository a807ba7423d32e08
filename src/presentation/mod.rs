//! Command line surface and terminal output.

pub mod cli;
pub mod ui;
