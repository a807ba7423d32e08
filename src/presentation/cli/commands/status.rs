use anyhow::Result;

use crate::application::services::RegistryService;
use crate::application::use_cases::prune_entries::{ConfirmationSource, DeleteMethod};
use crate::presentation::ui::display::DisplayHelper;
use crate::presentation::ui::status_view::{build_status_lines, StatusViewOptions};

/// Handler for the status command
pub struct StatusCommand {
    pub options: StatusViewOptions,
    pub verbose: bool,
}

impl StatusCommand {
    pub fn new(options: StatusViewOptions, verbose: bool) -> Self {
        Self { options, verbose }
    }

    /// Reconcile, print the lines, then offer invalid entries for pruning.
    pub async fn execute(
        &self,
        service: &mut RegistryService,
        display: &DisplayHelper,
        confirmation: &mut dyn ConfirmationSource,
    ) -> Result<()> {
        if service.registry().is_empty() {
            return Ok(());
        }

        let progress =
            display.create_progress_bar(service.registry().len() as u64, "Collecting statuses");
        let summary = service.reconcile(Some(progress), self.verbose).await;
        tracing::debug!("{:?}", summary);

        let lines = build_status_lines(service.registry(), &self.options, display.home());
        display.print_status_lines(&lines);

        let outcome = service.prune(DeleteMethod::DeleteAsk, confirmation).await?;
        if outcome.any_deleted() {
            display.info(&format!(
                "Removed {} entries from {}",
                outcome.deleted_count(),
                display.format_path(service.store_path())
            ));
        }
        Ok(())
    }
}
