//! Post-install verification.
//!
//! Re-checks each expected executable on PATH after the install command
//! reports success. Essential binaries missing is fatal; optional ones
//! only warn. Package managers can exit 0 while skipping a package (held
//! back, masked, or renamed upstream), so trusting exit status alone is
//! not enough.

use crate::error::{KitbagError, Result};
use crate::platform::PackageSpec;
use crate::shell::command_output;
use crate::ui::UserInterface;

/// A package whose binary resolved on PATH.
#[derive(Debug, Clone)]
pub struct VerifiedPackage {
    pub name: &'static str,
    pub binary: &'static str,
    /// Best-effort version extracted from `<binary> --version`.
    pub version: Option<String>,
}

/// Outcome of post-install verification.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub present: Vec<VerifiedPackage>,
    pub missing_optional: Vec<&'static str>,
}

/// Verify the expected binaries, resolving them on PATH via `which`.
pub fn verify_installed(
    packages: &'static [PackageSpec],
    ui: &mut dyn UserInterface,
) -> Result<VerifyReport> {
    verify_with(
        packages,
        |binary| which::which(binary).is_ok(),
        |binary| command_output(binary, &["--version"]).and_then(|out| extract_version(&out)),
        ui,
    )
}

/// Verification with injected PATH/version lookups, for tests.
fn verify_with(
    packages: &'static [PackageSpec],
    on_path: impl Fn(&str) -> bool,
    version_of: impl Fn(&str) -> Option<String>,
    ui: &mut dyn UserInterface,
) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    for package in packages {
        if on_path(package.binary) {
            report.present.push(VerifiedPackage {
                name: package.name,
                binary: package.binary,
                version: version_of(package.binary),
            });
            continue;
        }

        if package.essential {
            return Err(KitbagError::MissingBinary {
                binary: package.binary.to_string(),
            });
        }

        tracing::warn!(binary = package.binary, "optional tool not on PATH");
        ui.warning(&format!(
            "Optional tool '{}' not found after install",
            package.binary
        ));
        report.missing_optional.push(package.name);
    }

    Ok(report)
}

/// Extract a version number from `--version` output.
fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"version\s+(\d+\.\d+)", r"v(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}
