//! SSH connectivity probe.
//!
//! An authentication-only `ssh -T` against the alias. GitHub's probe exits
//! nonzero even when authentication succeeds (no shell is granted), so
//! success is decided by a marker substring in the combined output, never
//! by exit status.

use std::time::Duration;

use crate::error::Result;
use crate::shell::{execute, CommandOptions, CommandSpec};

/// Substring that marks a successful authentication in the remote's
/// response ("Hi user! You've successfully authenticated, ...").
pub const SUCCESS_MARKER: &str = "successfully authenticated";

/// Upper bound on the probe, so a skipped or misconfigured registration
/// cannot hang the session indefinitely.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// What the probe observed.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub authenticated: bool,
    pub output: String,
}

/// Probe the alias with a bounded authentication-only connection.
pub fn probe_alias(alias: &str) -> Result<ProbeOutcome> {
    let spec = CommandSpec::new(
        "ssh",
        &[
            "-T",
            "-o",
            "StrictHostKeyChecking=accept-new",
            "-o",
            "BatchMode=yes",
            alias,
        ],
    );

    let result = execute(&spec, &CommandOptions::captured_with_timeout(PROBE_TIMEOUT))?;
    let output = result.combined_output();

    Ok(ProbeOutcome {
        authenticated: output_indicates_success(&output),
        output,
    })
}

/// Decide success on output content, not exit status.
pub(crate) fn output_indicates_success(output: &str) -> bool {
    output.contains(SUCCESS_MARKER)
}

/// Manual commands the operator can run when the probe fails.
pub fn remediation(alias: &str) -> Vec<String> {
    vec![
        "Check that the public key is registered as a deploy key, then test manually:".to_string(),
        format!("    ssh -T {}", alias),
        format!("    git clone {}:<owner>/dotfiles.git ~/dotfiles", alias),
    ]
}
