//! Executing user-level commands against the browser.

use tabweave_common::{BrowserCommand, TabId, TabweaveError};
use tracing::debug;

use crate::listeners::TabEvent;

use super::TabBrowser;

impl TabBrowser {
    /// Run one command. Tab positions are zero-based strip positions;
    /// commands without a position act on the active tab.
    pub fn execute(&mut self, command: BrowserCommand) -> Result<(), TabweaveError> {
        debug!(command = command.label(), "executing command");
        match command {
            BrowserCommand::NewTab(url) => {
                let url = url.unwrap_or_else(|| self.home_url().to_string());
                let id = self.open_tab(Some(&url))?;
                self.activate(id)?;
            }
            BrowserCommand::CloseTab(position) => {
                let id = match position {
                    Some(pos) => self.at(pos)?,
                    None => self.require_active()?,
                };
                self.close_tab(id)?;
            }
            BrowserCommand::Activate(pos) => {
                let id = self.at(pos)?;
                self.activate(id)?;
            }
            BrowserCommand::Next => {
                self.activate_next()?;
            }
            BrowserCommand::Prev => {
                self.activate_prev()?;
            }
            BrowserCommand::Navigate(url) => {
                let id = self.require_active()?;
                self.navigate(id, &url)?;
            }
            BrowserCommand::Back => {
                let id = self.require_active()?;
                self.back(id)?;
            }
            BrowserCommand::Forward => {
                let id = self.require_active()?;
                self.forward(id)?;
            }
            BrowserCommand::Reload => {
                let id = self.require_active()?;
                self.reload(id)?;
            }
            BrowserCommand::Stop => {
                let id = self.require_active()?;
                self.stop(id)?;
            }
            BrowserCommand::Key(key) => {
                self.dispatch_input(TabEvent::Key { key });
            }
            BrowserCommand::Pointer { x, y } => {
                self.dispatch_input(TabEvent::Pointer { x, y });
            }
        }
        Ok(())
    }

    fn at(&self, position: usize) -> Result<TabId, TabweaveError> {
        self.tabs()
            .id_at(position)
            .ok_or_else(|| TabweaveError::Other(format!("no tab at position {position}")))
    }

    fn require_active(&self) -> Result<TabId, TabweaveError> {
        self.active_id()
            .ok_or_else(|| TabweaveError::Other("no active tab".into()))
    }
}
