use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::common::result::{GcloneResult, ResultExt};
use crate::domain::entities::registry::Registry;

/// How invalid entries are confirmed for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMethod {
    /// Delete without asking
    DeleteAll,
    /// Ask for every entry
    DeleteAsk,
}

/// One answer read from a confirmation source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneAnswer {
    Yes,
    No,
    All,
    Quit,
}

impl PruneAnswer {
    /// Interpret a raw answer. `None` (end of input) quits; an empty line
    /// takes the default, which is yes.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Quit;
        };
        match raw.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            None | Some('y') => Self::Yes,
            Some('a') => Self::All,
            Some('q') => Self::Quit,
            Some(_) => Self::No,
        }
    }
}

/// Source of per-entry deletion answers.
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationSource {
    /// Ask whether `display_name` should be removed. `Ok(None)` means the
    /// input is exhausted.
    fn confirm_deletion(&mut self, display_name: &str) -> io::Result<Option<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneState {
    Pending,
    Deleted,
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneDecision {
    pub directory: PathBuf,
    pub state: PruneState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    /// One decision per invalid entry, in visiting order
    pub decisions: Vec<PruneDecision>,
    /// Whether the pass was quit before visiting every entry
    pub aborted: bool,
}

impl PruneOutcome {
    pub fn removed(&self) -> impl Iterator<Item = &PathBuf> {
        self.decisions
            .iter()
            .filter(|d| d.state == PruneState::Deleted)
            .map(|d| &d.directory)
    }

    pub fn deleted_count(&self) -> usize {
        self.removed().count()
    }

    /// Whether the registry changed and should be stored.
    pub fn any_deleted(&self) -> bool {
        self.deleted_count() > 0
    }
}

/// Pruning Controller: removes entries whose `valid` flag is false.
///
/// Entries are visited in directory order. Quitting keeps the current entry
/// and every entry after it; deletions answered before the quit stand.
pub struct PruneEntriesUseCase {
    method: DeleteMethod,
}

impl PruneEntriesUseCase {
    pub fn new(method: DeleteMethod) -> Self {
        Self { method }
    }

    pub fn execute(
        &self,
        registry: &mut Registry,
        source: &mut dyn ConfirmationSource,
    ) -> GcloneResult<PruneOutcome> {
        let mut method = self.method;
        let mut outcome = PruneOutcome::default();

        for directory in registry.invalid_directories() {
            let mut decision = PruneDecision {
                directory,
                state: PruneState::Pending,
            };

            if outcome.aborted {
                decision.state = PruneState::Kept;
                outcome.decisions.push(decision);
                continue;
            }

            decision.state = match method {
                DeleteMethod::DeleteAll => PruneState::Deleted,
                DeleteMethod::DeleteAsk => {
                    let display_name = registry
                        .get(&decision.directory)
                        .map(|e| e.display_name.clone())
                        .unwrap_or_else(|| decision.directory.display().to_string());
                    let answer = source
                        .confirm_deletion(&display_name)
                        .with_filesystem_error("Failed to read confirmation", None)?;

                    match PruneAnswer::parse(answer.as_deref()) {
                        PruneAnswer::Yes => PruneState::Deleted,
                        PruneAnswer::No => PruneState::Kept,
                        PruneAnswer::All => {
                            method = DeleteMethod::DeleteAll;
                            PruneState::Deleted
                        }
                        PruneAnswer::Quit => {
                            outcome.aborted = true;
                            PruneState::Kept
                        }
                    }
                }
            };

            if decision.state == PruneState::Deleted {
                registry.remove(&decision.directory);
                info!("Removed {} from the registry", decision.directory.display());
            } else {
                debug!("Kept {}", decision.directory.display());
            }
            outcome.decisions.push(decision);
        }

        Ok(outcome)
    }
}
