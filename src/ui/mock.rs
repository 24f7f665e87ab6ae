//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses, so a whole provisioner session can be
//! scripted.

use std::collections::{HashMap, VecDeque};

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys prompted repeatedly,
/// such as the redirect loop in the clone flow.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key, returned in order.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    fn response_to_result(prompt: &Prompt, response: String) -> PromptResult {
        match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(matches!(
                response.as_str(),
                "true" | "yes" | "y" | "1"
            )),
            _ => PromptResult::String(response),
        }
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        // Queued responses first (for keys prompted repeatedly)
        if let Some(queue) = self.prompt_queues.get_mut(&prompt.key) {
            if let Some(response) = queue.pop_front() {
                return Ok(Self::response_to_result(prompt, response));
            }
        }

        if let Some(response) = self.prompt_responses.get(&prompt.key) {
            return Ok(Self::response_to_result(prompt, response.clone()));
        }

        // Fall back to the prompt's own default
        if let Some(default) = &prompt.default {
            return Ok(Self::response_to_result(prompt, default.clone()));
        }

        // Last resort for unscripted prompts
        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(false)),
            _ => Ok(PromptResult::String(String::new())),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Spinner that swallows everything.
struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
    fn finish_skipped(&mut self, _msg: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_messages() {
        let mut ui = MockUI::new();

        ui.message("probing");
        ui.success("done");
        ui.warning("careful");
        ui.error("oops");

        assert_eq!(ui.messages(), &["probing"]);
        assert_eq!(ui.successes(), &["done"]);
        assert_eq!(ui.warnings(), &["careful"]);
        assert_eq!(ui.errors(), &["oops"]);
    }

    #[test]
    fn prompt_with_configured_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("owner", "octocat");

        let prompt = Prompt::input("owner", "Repository owner?", None);
        let result = ui.prompt(&prompt).unwrap();

        assert_eq!(result.as_string(), "octocat");
        assert_eq!(ui.prompts_shown(), &["owner"]);
    }

    #[test]
    fn prompt_falls_back_to_default() {
        let mut ui = MockUI::new();

        let prompt = Prompt::input("repo", "Repository?", Some("dotfiles"));
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "dotfiles");
    }

    #[test]
    fn confirm_response_parses_to_bool() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("run_setup", "yes");

        let prompt = Prompt::confirm("run_setup", "Run it?", false);
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn unscripted_confirm_without_default_is_false() {
        let mut ui = MockUI::new();
        let prompt = Prompt {
            key: "k".into(),
            question: "?".into(),
            prompt_type: PromptType::Confirm,
            default: None,
        };
        assert_eq!(ui.prompt(&prompt).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn queued_responses_returned_in_order() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses("destination", vec!["/tmp/a", "/tmp/b"]);

        let prompt = Prompt::input("destination", "Where?", None);
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "/tmp/a");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "/tmp/b");
    }

    #[test]
    fn queue_exhaustion_falls_back_to_set_response() {
        let mut ui = MockUI::new();
        ui.set_prompt_response("key", "fallback");
        ui.queue_prompt_responses("key", vec!["first"]);

        let prompt = Prompt::input("key", "?", None);
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "first");
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "fallback");
    }

    #[test]
    fn has_helpers_match_substrings() {
        let mut ui = MockUI::new();
        ui.warning("Optional tool 'fzf' not found");
        assert!(ui.has_warning("fzf"));
        assert!(!ui.has_warning("htop"));
    }

    #[test]
    fn mock_is_interactive_by_default() {
        let ui = MockUI::new();
        assert!(ui.is_interactive());
    }
}
