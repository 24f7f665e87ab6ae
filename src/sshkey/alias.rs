//! SSH client config alias management.
//!
//! The deploy key is reachable through a dedicated host alias so the
//! operator's default identity is untouched. The alias block is upserted:
//! any prior block with the same alias is removed before the new one is
//! appended, so re-running never produces duplicate or conflicting
//! entries. The prior config is backed up before mutation.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// The fixed host alias for the dotfiles deploy key.
pub const DOTFILES_ALIAS: &str = "github-dotfiles";

/// One `Host` block in the SSH client config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshAlias {
    pub alias: String,
    pub host: String,
    pub user: String,
    /// Path written into `IdentityFile` (tilde form when under home).
    pub identity_file: String,
}

impl SshAlias {
    /// The dotfiles alias pointing at the given identity file.
    pub fn dotfiles(identity_file: &str) -> Self {
        Self {
            alias: DOTFILES_ALIAS.to_string(),
            host: "github.com".to_string(),
            user: "git".to_string(),
            identity_file: identity_file.to_string(),
        }
    }

    /// Render the config block.
    pub fn render(&self) -> String {
        format!(
            "Host {}\n    HostName {}\n    User {}\n    IdentityFile {}\n    IdentitiesOnly yes\n",
            self.alias, self.host, self.user, self.identity_file
        )
    }
}

/// Upsert `alias` into the SSH config at `config_path`.
///
/// Writes `<config>.backup` with the prior content first (only when a
/// config already exists), removes any existing block for the alias, and
/// appends the freshly rendered one. The config ends up mode 600, which
/// ssh requires.
pub fn upsert_alias(config_path: &Path, alias: &SshAlias) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let prior = if config_path.exists() {
        let contents = fs::read_to_string(config_path)?;
        fs::write(backup_path(config_path), &contents)?;
        contents
    } else {
        String::new()
    };

    let mut next = strip_alias_block(&prior, &alias.alias);
    if !next.is_empty() && !next.ends_with("\n\n") {
        if !next.ends_with('\n') {
            next.push('\n');
        }
        next.push('\n');
    }
    next.push_str(&alias.render());

    fs::write(config_path, &next)?;
    set_config_mode(config_path)?;

    tracing::debug!(config = %config_path.display(), alias = %alias.alias, "upserted ssh alias");
    Ok(())
}

fn backup_path(config_path: &Path) -> std::path::PathBuf {
    let mut name = config_path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    config_path.with_file_name(name)
}

/// Remove any `Host <alias>` block from `contents`.
///
/// A block runs from its `Host` line to the next top-level `Host` line or
/// end of input. Only a block whose host list contains exactly our alias
/// is removed; everything else passes through untouched.
pub(crate) fn strip_alias_block(contents: &str, alias: &str) -> String {
    let mut out = String::new();
    let mut skipping = false;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if let Some(hosts) = trimmed.strip_prefix("Host ") {
            skipping = hosts.split_whitespace().any(|h| h == alias);
        }
        if !skipping {
            out.push_str(line);
            out.push('\n');
        }
    }

    // Collapse trailing blank lines left behind by a removed block
    while out.ends_with("\n\n") {
        out.pop();
    }
    if out == "\n" {
        out.clear();
    }
    out
}

#[cfg(unix)]
fn set_config_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_config_mode(_path: &Path) -> Result<()> {
    Ok(())
}
