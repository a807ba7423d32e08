pub mod fetch_repositories;
pub mod prune_entries;
pub mod status_check;
