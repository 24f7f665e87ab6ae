//! Non-interactive UI for CI and headless environments.
//!
//! Prompts resolve to their defaults; a prompt without a default is an
//! error, since there is no operator to answer it.

use anyhow::anyhow;

use crate::error::{KitbagError, Result};

use super::{
    OutputMode, ProgressSpinner, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// UI implementation that never blocks on operator input.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let Some(default) = &prompt.default else {
            return Err(KitbagError::Other(anyhow!(
                "prompt '{}' has no default and no operator is present",
                prompt.key
            )));
        };

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(matches!(
                default.as_str(),
                "true" | "yes" | "y" | "1"
            ))),
            _ => Ok(PromptResult::String(default.clone())),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}...", message);
        }
        Box::new(ProgressSpinner::hidden())
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_resolves_to_default() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let prompt = Prompt::input("repo", "Repository?", Some("dotfiles"));
        let result = ui.prompt(&prompt).unwrap();
        assert_eq!(result.as_string(), "dotfiles");
    }

    #[test]
    fn confirm_default_yes_is_true() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let prompt = Prompt::confirm("go", "Continue?", true);
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn prompt_without_default_is_error() {
        let mut ui = NonInteractiveUI::new(OutputMode::Quiet);
        let prompt = Prompt::input("owner", "Owner?", None);
        assert!(ui.prompt(&prompt).is_err());
    }

    #[test]
    fn never_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }
}
