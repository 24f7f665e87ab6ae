//! The `deploy-key` command: run the provisioning session.

use anyhow::anyhow;

use crate::cli::args::DeployKeyArgs;
use crate::error::{KitbagError, Result};
use crate::sshkey::{default_context, ProvisionOutcome, Provisioner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Provisions the dotfiles deploy key interactively.
pub struct DeployKeyCommand;

impl DeployKeyCommand {
    pub fn new(_args: DeployKeyArgs) -> Self {
        Self
    }
}

impl Command for DeployKeyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Dotfiles deploy key");

        let home = dirs::home_dir()
            .ok_or_else(|| KitbagError::Other(anyhow!("could not determine home directory")))?;

        let provisioner = Provisioner::new(home, default_context());
        match provisioner.run(ui)? {
            // Operator abort at a prompt is a clean exit, not a failure.
            ProvisionOutcome::Aborted | ProvisionOutcome::Completed => {
                Ok(CommandResult::success())
            }
        }
    }
}
