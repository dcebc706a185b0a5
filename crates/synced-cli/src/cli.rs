//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// opencode-synced - Keep your OpenCode configuration in a git repository
#[derive(Parser, Debug)]
#[command(name = "opencode-synced")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this checkout instead of the configured sync repository
    #[arg(long, global = true, env = "OPENCODE_SYNCED_REPO", value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show resolved directories and sync file locations
    Locations {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show what would be synced and where it lives in the repository
    Plan {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy the sync repository's contents onto this machine
    ///
    /// Extra files listed in the repository's manifests are validated before
    /// anything is written; a manifest path outside its subtree aborts the pull.
    Pull {
        /// Output the apply report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy this machine's configuration into the sync repository
    ///
    /// Nothing is committed; review the changes with `opencode-synced diff`.
    Push {
        /// Output the apply report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sync repository's state relative to its remote
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Summarize uncommitted changes in the sync repository
    Diff,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_command() {
        let cli = Cli::parse_from(["opencode-synced"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_plan_json() {
        let cli = Cli::parse_from(["opencode-synced", "plan", "--json"]);
        assert_eq!(cli.command, Some(Commands::Plan { json: true }));
    }

    #[test]
    fn parse_global_repo_after_subcommand() {
        let cli = Cli::parse_from(["opencode-synced", "pull", "--repo", "/tmp/sync", "-v"]);
        assert_eq!(cli.command, Some(Commands::Pull { json: false }));
        assert_eq!(cli.repo, Some(PathBuf::from("/tmp/sync")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["opencode-synced", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));
    }
}
