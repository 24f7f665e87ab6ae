//! The static install-plan table.

use serde::Serialize;

use crate::shell::CommandSpec;

use super::probe::{HostProfile, OsFamily, PrivilegeMode};

/// A package to install and the executable it is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    /// Name passed to the package manager.
    pub name: &'static str,

    /// Executable expected on PATH afterwards.
    pub binary: &'static str,

    /// Whether absence after install is fatal (true) or a warning (false).
    pub essential: bool,
}

/// The baseline toolkit, in install order.
///
/// The names are valid across apt, pacman, dnf, yum, and brew; ripgrep is
/// the one package whose binary differs from its package name.
pub const PACKAGES: &[PackageSpec] = &[
    PackageSpec {
        name: "git",
        binary: "git",
        essential: true,
    },
    PackageSpec {
        name: "curl",
        binary: "curl",
        essential: true,
    },
    PackageSpec {
        name: "zsh",
        binary: "zsh",
        essential: true,
    },
    PackageSpec {
        name: "tmux",
        binary: "tmux",
        essential: true,
    },
    PackageSpec {
        name: "wget",
        binary: "wget",
        essential: false,
    },
    PackageSpec {
        name: "ripgrep",
        binary: "rg",
        essential: false,
    },
    PackageSpec {
        name: "fzf",
        binary: "fzf",
        essential: false,
    },
    PackageSpec {
        name: "jq",
        binary: "jq",
        essential: false,
    },
    PackageSpec {
        name: "htop",
        binary: "htop",
        essential: false,
    },
    PackageSpec {
        name: "tree",
        binary: "tree",
        essential: false,
    },
];

/// Commands and package list for one run of the installer.
///
/// Built deterministically from a [`HostProfile`]; transient, computed and
/// discarded within a single run.
#[derive(Debug, Clone, Serialize)]
pub struct InstallPlan {
    /// Refreshes package metadata.
    pub update: CommandSpec,

    /// Installs the full package list in one invocation, so the manager
    /// resolves dependencies jointly.
    pub install: CommandSpec,

    /// The packages the install command covers.
    pub packages: &'static [PackageSpec],
}

/// Build the install plan for a probed host.
///
/// One row per OS family. Homebrew commands are never sudo-prefixed
/// (brew refuses to run as root); every other manager's mutating
/// commands gain the wrapper under [`PrivilegeMode::Sudo`].
pub fn build_plan(profile: &HostProfile) -> InstallPlan {
    let names: Vec<&str> = PACKAGES.iter().map(|p| p.name).collect();

    let (update, install) = match profile.os_family {
        OsFamily::DebianLinux => (
            CommandSpec::new("apt-get", &["update"]),
            CommandSpec::new("apt-get", &["install", "-y"]).with_args(names),
        ),
        OsFamily::ArchLinux => (
            CommandSpec::new("pacman", &["-Sy", "--noconfirm"]),
            CommandSpec::new("pacman", &["-S", "--noconfirm", "--needed"]).with_args(names),
        ),
        OsFamily::FedoraLinux => (
            CommandSpec::new("dnf", &["makecache"]),
            CommandSpec::new("dnf", &["install", "-y"]).with_args(names),
        ),
        OsFamily::RhelLinux => (
            CommandSpec::new("yum", &["makecache"]),
            CommandSpec::new("yum", &["install", "-y"]).with_args(names),
        ),
        OsFamily::MacOs => (
            CommandSpec::new("brew", &["update"]),
            CommandSpec::new("brew", &["install"]).with_args(names),
        ),
    };

    let escalate =
        profile.privilege == PrivilegeMode::Sudo && profile.os_family != OsFamily::MacOs;

    let (update, install) = if escalate {
        (update.with_sudo(), install.with_sudo())
    } else {
        (update, install)
    };

    InstallPlan {
        update,
        install,
        packages: PACKAGES,
    }
}
