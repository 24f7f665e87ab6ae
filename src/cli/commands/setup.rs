//! The `setup` command: probe, install, write configs.

use anyhow::anyhow;

use crate::cli::args::SetupArgs;
use crate::configs;
use crate::error::{KitbagError, Result};
use crate::install;
use crate::platform::{build_plan, probe};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Runs the full bootstrap: Prober → Installer → Config Writer.
pub struct SetupCommand {
    args: SetupArgs,
}

impl SetupCommand {
    pub fn new(args: SetupArgs) -> Self {
        Self { args }
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Kitbag setup");

        let profile = probe()?;
        ui.message(&format!(
            "Detected {} ({}, privilege: {:?})",
            profile.os_family, profile.package_manager, profile.privilege
        ));

        let plan = build_plan(&profile);
        let report = install::install(&plan, ui)?;

        for package in &report.present {
            match &package.version {
                Some(version) => ui.message(&format!("  {} {}", package.binary, version)),
                None => ui.message(&format!("  {}", package.binary)),
            }
        }
        if !report.missing_optional.is_empty() {
            ui.warning(&format!(
                "Missing optional tools: {}",
                report.missing_optional.join(", ")
            ));
        }

        if self.args.skip_configs {
            ui.message("Skipping shell configuration (--skip-configs)");
        } else {
            let home = dirs::home_dir().ok_or_else(|| {
                KitbagError::Other(anyhow!("could not determine home directory"))
            })?;
            let written = configs::write_configs(&home)?;
            for path in &written {
                ui.message(&format!("  wrote {}", path.display()));
            }
        }

        ui.success("Machine bootstrapped. Start a new shell to pick up the config.");
        Ok(CommandResult::success())
    }
}
