//! The deploy-key provisioning session.
//!
//! An explicit state machine: each state handler performs one step and
//! names the next state. All operator interaction goes through
//! [`UserInterface`], and all externals (key generation, the ssh probe,
//! git) are injected through [`ProvisionContext`], so tests drive entire
//! sessions with a `MockUI` and stub closures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KitbagError, Result};
use crate::shell::{execute, CommandOptions};
use crate::ui::{Prompt, PromptOption, UserInterface};

use super::alias::{upsert_alias, SshAlias, DOTFILES_ALIAS};
use super::clone::{detect_setup_entry, CloneRequest, SetupEntryPoint};
use super::connectivity::{self, ProbeOutcome};
use super::material::{self, DeployKeyMaterial};

/// States of the provisioning session.
#[derive(Debug)]
enum ProvisionState {
    KeyCheck,
    KeyGenerate,
    ConfigWrite,
    AwaitRegistration,
    ConnectivityTest,
    CloneFlow,
    Done(ProvisionOutcome),
}

/// How the session ended (when it did not fail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The session ran to the end.
    Completed,
    /// The operator chose to stop at the existing-key prompt; nothing
    /// was modified. Exits 0.
    Aborted,
}

/// Injected externals, so tests can stub everything that leaves the
/// process.
pub struct ProvisionContext<'a> {
    /// Generate a key pair at the given paths with the given comment.
    pub generate_key: &'a dyn Fn(&DeployKeyMaterial, &str) -> Result<()>,
    /// Run the bounded authentication probe against the alias.
    pub probe_connectivity: &'a dyn Fn(&str) -> Result<ProbeOutcome>,
    /// Clone the repository through the alias.
    pub clone_repo: &'a dyn Fn(&CloneRequest, &str) -> Result<()>,
    /// Run a setup entry point inside the clone, streaming its output.
    pub run_setup: &'a dyn Fn(&Path, SetupEntryPoint) -> Result<()>,
}

/// Build the production context.
pub fn default_context() -> ProvisionContext<'static> {
    ProvisionContext {
        generate_key: &material::generate,
        probe_connectivity: &connectivity::probe_alias,
        clone_repo: &super::clone::clone_repo,
        run_setup: &|dir, entry| {
            let spec = entry.command();
            let options = CommandOptions {
                cwd: Some(dir.to_path_buf()),
                ..Default::default()
            };
            let result = execute(&spec, &options)?;
            if result.success {
                Ok(())
            } else {
                Err(KitbagError::CommandFailed {
                    command: spec.to_string(),
                    code: result.exit_code,
                })
            }
        },
    }
}

/// Drives one provisioning session.
pub struct Provisioner<'a> {
    home: PathBuf,
    ssh_dir: PathBuf,
    ctx: ProvisionContext<'a>,
}

impl<'a> Provisioner<'a> {
    /// Create a provisioner rooted at the given home directory.
    pub fn new(home: impl Into<PathBuf>, ctx: ProvisionContext<'a>) -> Self {
        let home = home.into();
        let ssh_dir = home.join(".ssh");
        Self { home, ssh_dir, ctx }
    }

    fn key_material(&self) -> DeployKeyMaterial {
        DeployKeyMaterial::in_dir(&self.ssh_dir)
    }

    /// Run the session to completion.
    ///
    /// `Ok(Aborted)` is an operator choice (exit 0); `Err` is a fatal
    /// step (connectivity, clone, or an external command), exit nonzero.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<ProvisionOutcome> {
        let mut state = ProvisionState::KeyCheck;
        loop {
            tracing::debug!(?state, "provision step");
            state = match state {
                ProvisionState::KeyCheck => self.key_check(ui)?,
                ProvisionState::KeyGenerate => self.key_generate(ui)?,
                ProvisionState::ConfigWrite => self.config_write(ui)?,
                ProvisionState::AwaitRegistration => self.await_registration(ui)?,
                ProvisionState::ConnectivityTest => self.connectivity_test(ui)?,
                ProvisionState::CloneFlow => self.clone_flow(ui)?,
                ProvisionState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    fn key_check(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let material = self.key_material();
        if !material.exists() {
            return Ok(ProvisionState::KeyGenerate);
        }

        ui.message(&format!(
            "Deploy key already exists at {}",
            material.private_key.display()
        ));

        let choice = ui.prompt(&Prompt::select(
            "existing_key",
            "What do you want to do with it?",
            vec![
                PromptOption::new("reuse", "Reuse the existing key"),
                PromptOption::new("regenerate", "Delete it and generate a new one"),
                PromptOption::new("abort", "Abort without changing anything"),
            ],
            "reuse",
        ))?;

        match choice.as_string().as_str() {
            "regenerate" => {
                material.remove()?;
                ui.message("Removed old key material");
                Ok(ProvisionState::KeyGenerate)
            }
            "abort" => {
                ui.message("Aborted; nothing was changed.");
                Ok(ProvisionState::Done(ProvisionOutcome::Aborted))
            }
            _ => Ok(ProvisionState::ConfigWrite),
        }
    }

    fn key_generate(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let material = self.key_material();
        let comment = material::key_comment(
            &material::hostname(),
            chrono::Local::now().date_naive(),
        );

        (self.ctx.generate_key)(&material, &comment)?;
        ui.success(&format!(
            "Generated deploy key {}",
            material.private_key.display()
        ));
        Ok(ProvisionState::ConfigWrite)
    }

    fn config_write(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let material = self.key_material();
        let alias = SshAlias::dotfiles(&self.display_path(&material.private_key));

        upsert_alias(&self.ssh_dir.join("config"), &alias)?;
        ui.success(&format!(
            "SSH alias '{}' written to {}",
            DOTFILES_ALIAS,
            self.ssh_dir.join("config").display()
        ));
        Ok(ProvisionState::AwaitRegistration)
    }

    fn await_registration(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let material = self.key_material();
        let public_key = material.public_key_contents()?;

        ui.message("");
        ui.message("Add this public key as a read-only deploy key on your dotfiles repository:");
        ui.message("");
        ui.message(&format!("    {}", public_key));
        ui.message("");
        ui.message("(repository → Settings → Deploy keys → Add deploy key)");

        // Trust establishment is a human action; block until it happened.
        loop {
            let done = ui
                .prompt(&Prompt::confirm(
                    "key_registered",
                    "Have you added the deploy key?",
                    true,
                ))?
                .as_bool()
                .unwrap_or(false);
            if done {
                return Ok(ProvisionState::ConnectivityTest);
            }
            ui.message("Waiting. Add the key, then confirm.");
        }
    }

    fn connectivity_test(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let mut spinner = ui.start_spinner("Testing SSH connectivity");
        let outcome = match (self.ctx.probe_connectivity)(DOTFILES_ALIAS) {
            Ok(outcome) => outcome,
            Err(e) => {
                spinner.finish_error("Connectivity test failed");
                return Err(e);
            }
        };

        if outcome.authenticated {
            spinner.finish_success("Authenticated with the remote");
            return Ok(ProvisionState::CloneFlow);
        }

        spinner.finish_error("Could not authenticate");
        for line in connectivity::remediation(DOTFILES_ALIAS) {
            ui.message(&line);
        }
        Err(KitbagError::ConnectivityFailed {
            message: "authentication marker not observed within 10s".to_string(),
        })
    }

    fn clone_flow(&self, ui: &mut dyn UserInterface) -> Result<ProvisionState> {
        let clone_now = ui
            .prompt(&Prompt::confirm(
                "clone_now",
                "Clone your dotfiles repository now?",
                true,
            ))?
            .as_bool()
            .unwrap_or(false);

        if !clone_now {
            self.print_usage(ui);
            return Ok(ProvisionState::Done(ProvisionOutcome::Completed));
        }

        let owner = ui
            .prompt(&Prompt::input("owner", "Repository owner", None))?
            .as_string();
        if owner.trim().is_empty() {
            return Err(KitbagError::CloneFailed {
                message: "repository owner is required".to_string(),
            });
        }

        let repo = ui
            .prompt(&Prompt::input("repo", "Repository name", Some("dotfiles")))?
            .as_string();

        let default_dest = self.home.join("dotfiles");
        let mut destination = self.expand_destination(
            &ui.prompt(&Prompt::input(
                "destination",
                "Clone destination",
                Some(&default_dest.to_string_lossy()),
            ))?
            .as_string(),
        );

        // Collision loop: redirect re-prompts until a free path or another
        // resolution is chosen.
        while destination.exists() {
            let choice = ui.prompt(&Prompt::select(
                "destination_exists",
                &format!("{} already exists", destination.display()),
                vec![
                    PromptOption::new("overwrite", "Delete it and clone fresh"),
                    PromptOption::new("skip", "Skip the clone"),
                    PromptOption::new("redirect", "Clone somewhere else"),
                ],
                "skip",
            ))?;

            match choice.as_string().as_str() {
                "overwrite" => {
                    fs::remove_dir_all(&destination)?;
                }
                "redirect" => {
                    destination = self.expand_destination(
                        &ui.prompt(&Prompt::input("destination", "Clone destination", None))?
                            .as_string(),
                    );
                }
                _ => {
                    ui.message("Skipping clone.");
                    self.print_usage(ui);
                    return Ok(ProvisionState::Done(ProvisionOutcome::Completed));
                }
            }
        }

        let request = CloneRequest {
            owner: owner.trim().to_string(),
            repo: repo.trim().to_string(),
            destination: destination.clone(),
        };

        let mut spinner = ui.start_spinner(&format!("Cloning {}", request.remote(DOTFILES_ALIAS)));
        match (self.ctx.clone_repo)(&request, DOTFILES_ALIAS) {
            Ok(()) => spinner.finish_success(&format!("Cloned into {}", destination.display())),
            Err(e) => {
                spinner.finish_error("Clone failed");
                for line in connectivity::remediation(DOTFILES_ALIAS) {
                    ui.message(&line);
                }
                return Err(e);
            }
        }

        self.offer_setup(&destination, ui)?;
        ui.success("Deploy key provisioning complete");
        Ok(ProvisionState::Done(ProvisionOutcome::Completed))
    }

    fn offer_setup(&self, clone_dir: &Path, ui: &mut dyn UserInterface) -> Result<()> {
        let Some(entry) = detect_setup_entry(clone_dir) else {
            ui.message("No setup entry point found (install.sh, setup.sh, Makefile).");
            return Ok(());
        };

        let run = ui
            .prompt(&Prompt::confirm(
                "run_setup",
                &format!("Found {}. Run it now?", entry.file_name()),
                false,
            ))?
            .as_bool()
            .unwrap_or(false);

        if !run {
            ui.message(&format!(
                "Skipping {}. Run it later from {}.",
                entry.file_name(),
                clone_dir.display()
            ));
            return Ok(());
        }

        (self.ctx.run_setup)(clone_dir, entry)?;
        ui.success(&format!("{} finished", entry.file_name()));
        Ok(())
    }

    fn print_usage(&self, ui: &mut dyn UserInterface) {
        ui.message("Use the alias for any manual operation:");
        ui.message(&format!(
            "    git clone {}:<owner>/dotfiles.git ~/dotfiles",
            DOTFILES_ALIAS
        ));
        ui.message(&format!("    ssh -T {}", DOTFILES_ALIAS));
    }

    /// Render a key path with `~` when it lives under home, so the durable
    /// SSH config stays portable across home relocations (bind mounts).
    fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        }
    }

    /// Expand a leading `~/` against the provisioner's home.
    fn expand_destination(&self, input: &str) -> PathBuf {
        let trimmed = input.trim();
        if let Some(rest) = trimmed.strip_prefix("~/") {
            self.home.join(rest)
        } else {
            PathBuf::from(trimmed)
        }
    }
}
