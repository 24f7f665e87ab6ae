//! Running the install plan.
//!
//! Update then install, each a single external invocation. Either failing
//! aborts the whole run; the operator fixes the condition and re-runs.
//! There is no rollback and no dry-run.

use crate::error::{KitbagError, Result};
use crate::platform::InstallPlan;
use crate::shell::{execute, CommandOptions, CommandResult, CommandSpec};
use crate::ui::UserInterface;

use super::verify::{self, VerifyReport};

/// Run the plan's update and install commands, then verify the expected
/// binaries are resolvable on PATH.
pub fn install(plan: &InstallPlan, ui: &mut dyn UserInterface) -> Result<VerifyReport> {
    run_step(&plan.update, "Refreshing package metadata", ui)?;
    run_step(
        &plan.install,
        &format!("Installing {} packages", plan.packages.len()),
        ui,
    )?;

    verify::verify_installed(plan.packages, ui)
}

fn run_step(spec: &CommandSpec, label: &str, ui: &mut dyn UserInterface) -> Result<()> {
    tracing::info!(command = %spec, "running");

    let verbose = ui.output_mode().shows_command_output();
    let mut spinner = ui.start_spinner(label);

    let options = if verbose {
        // Let the package manager write straight to the terminal.
        CommandOptions::default()
    } else {
        CommandOptions::captured()
    };

    let result = match execute(spec, &options) {
        Ok(result) => result,
        Err(e) => {
            spinner.finish_error(label);
            return Err(e);
        }
    };

    if result.success {
        spinner.finish_success(label);
        Ok(())
    } else {
        spinner.finish_error(label);
        surface_failure(&result, ui);
        Err(KitbagError::CommandFailed {
            command: spec.to_string(),
            code: result.exit_code,
        })
    }
}

/// Show the tail of captured output so the operator sees why the package
/// manager failed without scrolling through the whole transcript.
fn surface_failure(result: &CommandResult, ui: &mut dyn UserInterface) {
    let combined = result.combined_output();
    let tail: Vec<&str> = combined.lines().rev().take(10).collect();
    for line in tail.into_iter().rev() {
        ui.message(line);
    }
}
