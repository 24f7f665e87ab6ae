//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Kitbag - bootstrap fresh machines.
#[derive(Debug, Parser)]
#[command(name = "kitbag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output (streams package-manager output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the baseline toolkit and write shell configuration
    Setup(SetupArgs),

    /// Show the detected platform and install plan without mutating anything
    Probe(ProbeArgs),

    /// Provision an SSH deploy key for the dotfiles repository
    DeployKey(DeployKeyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Install packages only; leave .zshrc and .tmux.conf untouched
    #[arg(long)]
    pub skip_configs: bool,

    /// Never prompt (setup has no prompts today; accepted for symmetry)
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `probe` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProbeArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `deploy-key` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeployKeyArgs {}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn setup_parses_with_flags() {
        let cli = Cli::try_parse_from(["kitbag", "setup", "--skip-configs"]).unwrap();
        match cli.command {
            Commands::Setup(args) => assert!(args.skip_configs),
            other => panic!("expected Setup, got {:?}", other),
        }
    }

    #[test]
    fn probe_parses_json_flag() {
        let cli = Cli::try_parse_from(["kitbag", "probe", "--json"]).unwrap();
        match cli.command {
            Commands::Probe(args) => assert!(args.json),
            other => panic!("expected Probe, got {:?}", other),
        }
    }

    #[test]
    fn deploy_key_takes_no_flags() {
        let cli = Cli::try_parse_from(["kitbag", "deploy-key"]).unwrap();
        assert!(matches!(cli.command, Commands::DeployKey(_)));
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from(["kitbag", "setup", "--verbose", "--no-color"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["kitbag"]).is_err());
    }
}
