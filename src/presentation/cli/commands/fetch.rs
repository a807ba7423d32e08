use anyhow::Result;

use crate::application::services::RegistryService;
use crate::infrastructure::scm::FetchOptions;
use crate::presentation::ui::display::DisplayHelper;

/// Handler for the fetch command
pub struct FetchCommand {
    pub options: FetchOptions,
}

impl FetchCommand {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            options: FetchOptions::new(args),
        }
    }

    /// Whether the caller should print help instead of fetching.
    pub fn wants_help(&self) -> bool {
        self.options.requests_help()
    }

    pub async fn execute(&self, service: &RegistryService, display: &DisplayHelper) -> Result<()> {
        let summary = service.fetch(self.options.clone()).await;

        for (directory, reason) in &summary.failed {
            display.warning(&format!(
                "Fetch failed in {}: {}",
                display.format_path(directory),
                reason
            ));
        }
        if !summary.failed.is_empty() {
            display.info(&format!(
                "Fetched {} of {} repositories",
                summary.fetched.len(),
                summary.total()
            ));
        }
        Ok(())
    }
}
