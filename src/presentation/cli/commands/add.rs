use anyhow::Result;
use std::path::PathBuf;

use crate::application::services::RegistryService;
use crate::presentation::ui::display::DisplayHelper;

/// Handler for the add command
pub struct AddCommand {
    pub directories: Vec<PathBuf>,
}

impl AddCommand {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }

    /// Every directory is attempted; each success is stored right away.
    pub async fn execute(&self, service: &mut RegistryService, display: &DisplayHelper) -> Result<()> {
        let mut failed = 0;
        for directory in &self.directories {
            match service.add(directory).await {
                Ok(added) => display.success(&format!("Added {}", display.format_path(&added))),
                Err(e) => {
                    display.error(&e.to_string());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            anyhow::bail!(
                "{} of {} directories could not be added",
                failed,
                self.directories.len()
            );
        }
        Ok(())
    }
}
