//! Progress spinner backed by indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::SpinnerHandle;

/// Spinner shown during long-running external commands.
pub struct ProgressSpinner {
    bar: Option<ProgressBar>,
}

impl ProgressSpinner {
    /// Create and start a spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Create a hidden spinner (quiet mode).
    pub fn hidden() -> Self {
        Self { bar: None }
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(msg.to_string());
        }
    }

    fn finish_success(&mut self, msg: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("✓ {}", msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("✗ {}", msg));
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(format!("○ {}", msg));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_ignores_operations() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("working");
        spinner.finish_success("done");
    }

    #[test]
    fn spinner_finish_consumes_bar() {
        let mut spinner = ProgressSpinner::new("working");
        spinner.finish_error("failed");
        // A second finish is a no-op
        spinner.finish_success("done");
    }
}
