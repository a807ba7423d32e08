use anyhow::Result;

use crate::application::services::RegistryService;
use crate::presentation::ui::display::DisplayHelper;

/// Handler for the list command: registered directories, no status
pub struct ListCommand;

impl ListCommand {
    pub fn execute(&self, service: &RegistryService, display: &DisplayHelper) -> Result<()> {
        for directory in service.registry().directories() {
            println!("{}", display.format_path(&directory));
        }
        Ok(())
    }
}
