//! The `probe` command: show the platform and plan, mutate nothing.

use serde::Serialize;

use crate::cli::args::ProbeArgs;
use crate::error::Result;
use crate::platform::{build_plan, probe, HostProfile, InstallPlan};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Diagnostic view of what `setup` would do.
pub struct ProbeCommand {
    args: ProbeArgs,
}

/// JSON payload for `probe --json`.
#[derive(Serialize)]
struct ProbeReport<'a> {
    profile: &'a HostProfile,
    plan: &'a InstallPlan,
}

impl ProbeCommand {
    pub fn new(args: ProbeArgs) -> Self {
        Self { args }
    }
}

impl Command for ProbeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let profile = probe()?;
        let plan = build_plan(&profile);

        if self.args.json {
            let report = ProbeReport {
                profile: &profile,
                plan: &plan,
            };
            let rendered =
                serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?;
            println!("{}", rendered);
            return Ok(CommandResult::success());
        }

        ui.message(&format!("os family:       {}", profile.os_family));
        ui.message(&format!("package manager: {}", profile.package_manager));
        ui.message(&format!("privilege:       {:?}", profile.privilege));
        ui.message(&format!("update command:  {}", plan.update));
        ui.message(&format!("install command: {}", plan.install));
        let essential: Vec<&str> = plan
            .packages
            .iter()
            .filter(|p| p.essential)
            .map(|p| p.name)
            .collect();
        let optional: Vec<&str> = plan
            .packages
            .iter()
            .filter(|p| !p.essential)
            .map(|p| p.name)
            .collect();
        ui.message(&format!("essential:       {}", essential.join(", ")));
        ui.message(&format!("optional:        {}", optional.join(", ")));

        Ok(CommandResult::success())
    }
}
