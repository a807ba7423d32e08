use anyhow::Result;

use crate::application::services::RegistryService;
use crate::presentation::ui::display::DisplayHelper;

/// Handler for the clone command
pub struct CloneCommand {
    pub url: String,
    pub destination: Option<String>,
}

impl CloneCommand {
    pub fn new(url: String, destination: Option<String>) -> Self {
        Self { url, destination }
    }

    pub async fn execute(&self, service: &mut RegistryService, display: &DisplayHelper) -> Result<()> {
        display.info(&format!("Cloning {}", self.url));
        let added = service
            .clone_repository(&self.url, self.destination.as_deref())
            .await?;
        display.success(&format!("Added {}", display.format_path(&added)));
        Ok(())
    }
}
