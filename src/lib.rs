//! Kitbag - bootstrap fresh machines.
//!
//! Kitbag replaces the pair of ad-hoc bootstrap shell scripts every team
//! carries around: one that installs a baseline CLI toolkit and shell
//! configuration on a new VM or container, and one that provisions an SSH
//! deploy key giving the machine read-only access to a private dotfiles
//! repository.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`configs`] - Shell configuration writer (embedded templates)
//! - [`error`] - Error types and result aliases
//! - [`install`] - Package installation and post-install verification
//! - [`platform`] - Host probing and the static install-plan table
//! - [`shell`] - Structured external command execution
//! - [`sshkey`] - Deploy-key provisioning state machine
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```no_run
//! use kitbag::platform::{build_plan, probe};
//!
//! let profile = probe()?;
//! let plan = build_plan(&profile);
//! println!("would run: {}", plan.install);
//! # Ok::<(), kitbag::KitbagError>(())
//! ```

pub mod cli;
pub mod configs;
pub mod error;
pub mod install;
pub mod platform;
pub mod shell;
pub mod sshkey;
pub mod ui;

pub use error::{KitbagError, Result};
