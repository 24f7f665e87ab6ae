//! Deploy-key material lifecycle.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{KitbagError, Result};
use crate::shell::{command_output, execute, CommandOptions, CommandSpec};

/// File name of the private key inside the SSH directory.
pub const KEY_FILE_NAME: &str = "dotfiles_deploy_key";

/// Paths of a deploy-key pair.
///
/// Durable filesystem state: created idempotently, surviving across runs,
/// and never deleted automatically; removal is a documented manual step
/// (or the operator's explicit "regenerate" choice).
#[derive(Debug, Clone)]
pub struct DeployKeyMaterial {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl DeployKeyMaterial {
    /// Key material at its fixed location inside `ssh_dir`.
    pub fn in_dir(ssh_dir: &Path) -> Self {
        let private_key = ssh_dir.join(KEY_FILE_NAME);
        let public_key = ssh_dir.join(format!("{}.pub", KEY_FILE_NAME));
        Self {
            private_key,
            public_key,
        }
    }

    /// Whether any half of the pair already exists.
    pub fn exists(&self) -> bool {
        self.private_key.exists() || self.public_key.exists()
    }

    /// Remove both halves (operator chose "regenerate").
    pub fn remove(&self) -> Result<()> {
        for path in [&self.private_key, &self.public_key] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Read the public half for display to the operator.
    pub fn public_key_contents(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.public_key)?.trim_end().to_string())
    }
}

/// The key comment: hostname and generation date, for auditability in the
/// remote's deploy-key list.
pub fn key_comment(hostname: &str, date: NaiveDate) -> String {
    format!("dotfiles-deploy@{}-{}", hostname, date.format("%Y-%m-%d"))
}

/// Best-effort hostname for the key comment.
pub fn hostname() -> String {
    command_output("hostname", &[])
        .map(|out| out.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown-host".to_string())
}

/// Generate a new Ed25519 pair with an empty passphrase.
///
/// The empty passphrase is deliberate: the key is used unattended from
/// scripts and cron on the VM. Private key ends up mode 600, public 644.
pub fn generate(material: &DeployKeyMaterial, comment: &str) -> Result<()> {
    if let Some(ssh_dir) = material.private_key.parent() {
        fs::create_dir_all(ssh_dir)?;
        set_mode(ssh_dir, 0o700)?;
    }

    let keygen = CommandSpec::new(
        "ssh-keygen",
        &[
            "-q",
            "-t",
            "ed25519",
            "-N",
            "",
            "-C",
            comment,
            "-f",
            &material.private_key.to_string_lossy(),
        ],
    );

    let result = execute(&keygen, &CommandOptions::captured())?;
    if !result.success {
        return Err(KitbagError::CommandFailed {
            command: keygen.to_string(),
            code: result.exit_code,
        });
    }

    set_mode(&material.private_key, 0o600)?;
    set_mode(&material.public_key, 0o644)?;

    tracing::info!(key = %material.private_key.display(), "generated deploy key");
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
