//! Deploy-key provisioning.
//!
//! Creates an Ed25519 key pair scoped to the dotfiles repository, registers
//! it under a per-host alias in the SSH client config, waits for the
//! operator to add the public half as a deploy key on the remote, tests
//! connectivity, and optionally clones the repository and runs its setup
//! entry point.
//!
//! The whole session is an explicit state machine ([`provision::Provisioner`])
//! driven through the [`UserInterface`](crate::ui::UserInterface) trait, so
//! tests script it with a `MockUI` and stubbed externals.

pub mod alias;
pub mod clone;
pub mod connectivity;
pub mod material;
pub mod provision;

pub use alias::{upsert_alias, SshAlias, DOTFILES_ALIAS};
pub use clone::{detect_setup_entry, CloneRequest, SetupEntryPoint};
pub use connectivity::{ProbeOutcome, PROBE_TIMEOUT, SUCCESS_MARKER};
pub use material::DeployKeyMaterial;
pub use provision::{default_context, ProvisionContext, ProvisionOutcome, Provisioner};
