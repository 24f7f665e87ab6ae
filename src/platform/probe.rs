//! Host platform detection.

use serde::Serialize;

use crate::error::{KitbagError, Result};
use crate::shell::is_root;

/// Supported OS families, classified by the package manager present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsFamily {
    #[serde(rename = "linux-debian")]
    DebianLinux,
    #[serde(rename = "linux-arch")]
    ArchLinux,
    #[serde(rename = "linux-fedora")]
    FedoraLinux,
    #[serde(rename = "linux-rhel")]
    RhelLinux,
    #[serde(rename = "macos")]
    MacOs,
}

impl OsFamily {
    /// Human-readable family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DebianLinux => "linux-debian",
            Self::ArchLinux => "linux-arch",
            Self::FedoraLinux => "linux-fedora",
            Self::RhelLinux => "linux-rhel",
            Self::MacOs => "macos",
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How mutating system commands gain the privileges they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeMode {
    /// Already running as the superuser; no wrapper needed.
    Root,
    /// Prefix mutating commands with `sudo`.
    Sudo,
}

/// The probed host: OS family, privilege mode, and the package manager
/// that classified it.
///
/// Derived once per run and read-only afterward. `package_manager` is
/// always non-empty: hosts with no known manager never produce a profile.
#[derive(Debug, Clone, Serialize)]
pub struct HostProfile {
    pub os_family: OsFamily,
    pub privilege: PrivilegeMode,
    pub package_manager: String,
}

/// Package managers checked on Linux, in order. First match wins:
/// container base images may expose more than one tool on PATH, so the
/// order must be deterministic, Debian before Arch before Fedora before
/// RHEL.
const LINUX_MANAGERS: &[(&str, OsFamily)] = &[
    ("apt-get", OsFamily::DebianLinux),
    ("pacman", OsFamily::ArchLinux),
    ("dnf", OsFamily::FedoraLinux),
    ("yum", OsFamily::RhelLinux),
];

/// Probe the host and derive its profile.
///
/// Fails with [`KitbagError::UnsupportedPlatform`] when no known package
/// manager is found, or when the host is macOS without Homebrew (a hard
/// stop: the operator must install it first, then re-run).
pub fn probe() -> Result<HostProfile> {
    let on_path = |tool: &str| which::which(tool).is_ok();
    let profile = classify(cfg!(target_os = "macos"), on_path)?;
    tracing::debug!(
        family = %profile.os_family,
        manager = %profile.package_manager,
        "host probe complete"
    );
    Ok(profile)
}

/// Classify the host given a PATH-lookup function.
///
/// Split out from [`probe`] so tests can inject fake lookups.
fn classify(is_macos: bool, on_path: impl Fn(&str) -> bool) -> Result<HostProfile> {
    let privilege = if is_root() {
        PrivilegeMode::Root
    } else {
        PrivilegeMode::Sudo
    };

    if is_macos {
        if on_path("brew") {
            return Ok(HostProfile {
                os_family: OsFamily::MacOs,
                privilege,
                package_manager: "brew".to_string(),
            });
        }
        return Err(KitbagError::UnsupportedPlatform {
            message: "macOS detected but Homebrew is not installed. \
                      Install it from https://brew.sh and re-run."
                .to_string(),
        });
    }

    for (manager, family) in LINUX_MANAGERS {
        if on_path(manager) {
            return Ok(HostProfile {
                os_family: *family,
                privilege,
                package_manager: manager.to_string(),
            });
        }
    }

    Err(KitbagError::UnsupportedPlatform {
        message: "no supported package manager found (looked for apt-get, pacman, dnf, yum)"
            .to_string(),
    })
}
