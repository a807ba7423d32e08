//! Grouping, ordering and layout of reconciled entries.

use clap::ValueEnum;
use std::cmp::Ordering;
use std::path::Path;

use crate::domain::entities::registry::Registry;
use crate::domain::entities::repository::{RemoteDivergence, RepositoryEntry, WorkingTreeStatus};

/// Which field keys a status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListKey {
    /// One line per directory
    #[default]
    #[value(name = "dir")]
    Directory,
    /// One line per remote URL
    Remote,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    Key,
    Status,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusViewOptions {
    pub list: ListKey,
    pub sort: SortKey,
    pub reverse: bool,
}

/// Color attribute attached to a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    Green,
    Red,
    Yellow,
    Plain,
}

impl From<WorkingTreeStatus> for StatusColor {
    fn from(status: WorkingTreeStatus) -> Self {
        match status {
            WorkingTreeStatus::Clean => StatusColor::Green,
            WorkingTreeStatus::Dirty => StatusColor::Red,
            WorkingTreeStatus::Undefined => StatusColor::Plain,
        }
    }
}

impl From<RemoteDivergence> for StatusColor {
    fn from(divergence: RemoteDivergence) -> Self {
        match divergence {
            RemoteDivergence::UpToDate => StatusColor::Green,
            RemoteDivergence::Ahead | RemoteDivergence::Behind | RemoteDivergence::Changed => {
                StatusColor::Red
            }
            RemoteDivergence::Unknown => StatusColor::Yellow,
        }
    }
}

/// One renderable row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub key: String,
    pub status: String,
    pub color: StatusColor,
    pub info: String,
}

impl StatusLine {
    pub fn new(
        key: impl Into<String>,
        status: impl Into<String>,
        color: StatusColor,
        info: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            status: status.into(),
            color,
            info: info.into(),
        }
    }
}

/// Build the ordered, deduplicated and aligned lines for `registry`.
///
/// Invalid entries are left out; they are offered for pruning instead.
pub fn build_status_lines(
    registry: &Registry,
    options: &StatusViewOptions,
    home: Option<&Path>,
) -> Vec<StatusLine> {
    let valid = registry.entries().filter(|e| e.valid);
    let mut lines: Vec<StatusLine> = match options.list {
        ListKey::Directory => valid.map(|e| directory_line(e, home)).collect(),
        ListKey::Remote => valid.flat_map(|e| remote_lines(e, home)).collect(),
    };

    sort_lines(&mut lines, options.sort, options.reverse);
    remove_duplicate_keys(&mut lines);
    align_columns(&mut lines);
    lines
}

fn directory_line(entry: &RepositoryEntry, home: Option<&Path>) -> StatusLine {
    let info = if entry.remotes().is_empty() {
        "none set".to_string()
    } else {
        entry
            .remotes()
            .iter()
            .map(|r| format!("{}: {}", r.name, r.divergence.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    StatusLine::new(
        abbreviate_home(&entry.directory, home),
        entry.working_tree_status.label(),
        entry.working_tree_status.into(),
        info,
    )
}

fn remote_lines<'a>(
    entry: &'a RepositoryEntry,
    home: Option<&'a Path>,
) -> impl Iterator<Item = StatusLine> + 'a {
    entry.remotes().iter().map(move |remote| {
        StatusLine::new(
            remote.url.clone(),
            remote.divergence.label(),
            remote.divergence.into(),
            abbreviate_home(&entry.directory, home),
        )
    })
}

/// Stable sort by key, then optionally a stable pass by status.
///
/// `reverse` inverts whichever comparator runs; with a status sort the key
/// order underneath is reversed too.
pub fn sort_lines(lines: &mut [StatusLine], sort: SortKey, reverse: bool) {
    let direction = |ordering: Ordering| if reverse { ordering.reverse() } else { ordering };

    lines.sort_by(|a, b| direction(a.key.as_bytes().cmp(b.key.as_bytes())));
    if sort == SortKey::Status {
        lines.sort_by(|a, b| direction(a.status.as_bytes().cmp(b.status.as_bytes())));
    }
}

/// Blank every key already shown by an earlier visible line.
pub fn remove_duplicate_keys(lines: &mut [StatusLine]) {
    let mut shown: Vec<String> = Vec::new();
    for line in lines.iter_mut() {
        if line.key.is_empty() {
            continue;
        }
        if shown.iter().any(|k| *k == line.key) {
            line.key.clear();
        } else {
            shown.push(line.key.clone());
        }
    }
}

/// Right-pad key and status to the widest value in the set.
pub fn align_columns(lines: &mut [StatusLine]) {
    let key_width = lines.iter().map(|l| l.key.chars().count()).max().unwrap_or(0);
    let status_width = lines
        .iter()
        .map(|l| l.status.chars().count())
        .max()
        .unwrap_or(0);

    for line in lines.iter_mut() {
        pad_to(&mut line.key, key_width);
        pad_to(&mut line.status, status_width);
    }
}

fn pad_to(value: &mut String, width: usize) {
    let len = value.chars().count();
    if len < width {
        value.extend(std::iter::repeat(' ').take(width - len));
    }
}

/// Replace a leading `home` with `~`.
pub fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home.filter(|h| !h.as_os_str().is_empty()) {
        if let Ok(rest) = path.strip_prefix(home) {
            return if rest.as_os_str().is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", rest.display())
            };
        }
    }
    path.display().to_string()
}
