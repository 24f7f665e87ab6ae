//! End-to-end provisioning sessions against a temporary home.
//!
//! These run the real state machine with the real filesystem artifacts;
//! only the network-facing externals (ssh probe, git clone) are stubbed.
//! Key generation uses the real ssh-keygen when it is available.

use std::fs;

use kitbag::error::{KitbagError, Result};
use kitbag::sshkey::{
    CloneRequest, DeployKeyMaterial, ProbeOutcome, ProvisionContext, ProvisionOutcome,
    Provisioner, SetupEntryPoint,
};
use kitbag::ui::MockUI;
use tempfile::TempDir;

fn authenticated_probe(_: &str) -> Result<ProbeOutcome> {
    Ok(ProbeOutcome {
        authenticated: true,
        output: "Hi! You've successfully authenticated, but no shell is provided.".to_string(),
    })
}

fn fake_clone(request: &CloneRequest, _: &str) -> Result<()> {
    fs::create_dir_all(&request.destination)?;
    Ok(())
}

fn fake_generate(material: &DeployKeyMaterial, comment: &str) -> Result<()> {
    if let Some(parent) = material.private_key.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&material.private_key, "FAKE PRIVATE KEY")?;
    fs::write(&material.public_key, format!("ssh-ed25519 AAAA {}", comment))?;
    Ok(())
}

fn run_setup_noop(_: &std::path::Path, _: SetupEntryPoint) -> Result<()> {
    Ok(())
}

fn stubbed_ctx() -> ProvisionContext<'static> {
    ProvisionContext {
        generate_key: &fake_generate,
        probe_connectivity: &authenticated_probe,
        clone_repo: &fake_clone,
        run_setup: &run_setup_noop,
    }
}

/// Real key generation, stubbed network.
fn real_keygen_ctx() -> ProvisionContext<'static> {
    ProvisionContext {
        generate_key: &kitbag::sshkey::material::generate,
        ..stubbed_ctx()
    }
}

#[test]
fn full_session_with_real_keygen() {
    if which::which("ssh-keygen").is_err() {
        return;
    }
    let home = TempDir::new().unwrap();
    let provisioner = Provisioner::new(home.path(), real_keygen_ctx());
    let mut ui = MockUI::new();
    ui.set_prompt_response("owner", "octocat");

    let outcome = provisioner.run(&mut ui).unwrap();
    assert_eq!(outcome, ProvisionOutcome::Completed);

    let ssh_dir = home.path().join(".ssh");
    let public = fs::read_to_string(ssh_dir.join("dotfiles_deploy_key.pub")).unwrap();
    assert!(public.starts_with("ssh-ed25519"));
    assert!(public.contains("dotfiles-deploy@"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let private_mode = fs::metadata(ssh_dir.join("dotfiles_deploy_key"))
            .unwrap()
            .permissions()
            .mode();
        let public_mode = fs::metadata(ssh_dir.join("dotfiles_deploy_key.pub"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(private_mode & 0o777, 0o600);
        assert_eq!(public_mode & 0o777, 0o644);
    }

    let config = fs::read_to_string(ssh_dir.join("config")).unwrap();
    assert!(config.contains("Host github-dotfiles"));
    assert!(config.contains("IdentitiesOnly yes"));
    assert!(home.path().join("dotfiles").exists());
}

#[test]
fn rerun_with_reuse_keeps_single_alias_block_and_backup() {
    let home = TempDir::new().unwrap();
    let provisioner = Provisioner::new(home.path(), stubbed_ctx());

    let mut first = MockUI::new();
    first.set_prompt_response("clone_now", "no");
    provisioner.run(&mut first).unwrap();

    let mut second = MockUI::new();
    second.set_prompt_response("existing_key", "reuse");
    second.set_prompt_response("clone_now", "no");
    provisioner.run(&mut second).unwrap();

    let ssh_dir = home.path().join(".ssh");
    let config = fs::read_to_string(ssh_dir.join("config")).unwrap();
    let blocks = config
        .lines()
        .filter(|l| l.trim_start().starts_with("Host ") && l.contains("github-dotfiles"))
        .count();
    assert_eq!(blocks, 1);

    // The second run backed up the first run's config
    let backup = fs::read_to_string(ssh_dir.join("config.backup")).unwrap();
    assert!(backup.contains("Host github-dotfiles"));
}

#[test]
fn abort_leaves_filesystem_untouched() {
    let home = TempDir::new().unwrap();
    let ssh_dir = home.path().join(".ssh");
    fs::create_dir_all(&ssh_dir).unwrap();
    fs::write(ssh_dir.join("dotfiles_deploy_key"), "EXISTING").unwrap();
    fs::write(ssh_dir.join("dotfiles_deploy_key.pub"), "EXISTING PUB").unwrap();

    let provisioner = Provisioner::new(home.path(), stubbed_ctx());
    let mut ui = MockUI::new();
    ui.set_prompt_response("existing_key", "abort");

    let outcome = provisioner.run(&mut ui).unwrap();

    assert_eq!(outcome, ProvisionOutcome::Aborted);
    assert_eq!(
        fs::read_to_string(ssh_dir.join("dotfiles_deploy_key")).unwrap(),
        "EXISTING"
    );
    assert!(!ssh_dir.join("config").exists());
    assert!(!ssh_dir.join("config.backup").exists());
}

#[test]
fn failed_connectivity_stops_before_clone_flow() {
    let home = TempDir::new().unwrap();
    let ctx = ProvisionContext {
        probe_connectivity: &|_| {
            Ok(ProbeOutcome {
                authenticated: false,
                output: "git@github.com: Permission denied (publickey).".to_string(),
            })
        },
        ..stubbed_ctx()
    };

    let provisioner = Provisioner::new(home.path(), ctx);
    let mut ui = MockUI::new();

    let err = provisioner.run(&mut ui).unwrap_err();

    assert!(matches!(err, KitbagError::ConnectivityFailed { .. }));
    assert!(!home.path().join("dotfiles").exists());
    assert!(ui.has_message("ssh -T github-dotfiles"));
}

#[test]
fn collision_skip_completes_without_cloning() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("dotfiles")).unwrap();
    fs::write(home.path().join("dotfiles/marker"), "pre-existing").unwrap();

    let provisioner = Provisioner::new(home.path(), stubbed_ctx());
    let mut ui = MockUI::new();
    ui.set_prompt_response("owner", "octocat");
    ui.set_prompt_response("destination_exists", "skip");

    let outcome = provisioner.run(&mut ui).unwrap();

    assert_eq!(outcome, ProvisionOutcome::Completed);
    // Pre-existing tree untouched
    assert!(home.path().join("dotfiles/marker").exists());
}
