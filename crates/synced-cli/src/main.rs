//! opencode-synced CLI
//!
//! Syncs OpenCode configuration between this machine and a git repository.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::SyncContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        match e.code() {
            Some(code) => eprintln!("{}[{}]: {}", "error".red().bold(), code, e),
            None => eprintln!("{}: {}", "error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, SyncContext::from_process(cli.repo)),
        None => {
            println!("{} OpenCode config sync", "opencode-synced".green().bold());
            println!();
            println!(
                "Run {} for available commands.",
                "opencode-synced --help".cyan()
            );
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, ctx: SyncContext) -> Result<()> {
    match cmd {
        Commands::Locations { json } => commands::run_locations(&ctx, json),
        Commands::Plan { json } => commands::run_plan(&ctx, json),
        Commands::Pull { json } => commands::run_pull(&ctx, json),
        Commands::Push { json } => commands::run_push(&ctx, json),
        Commands::Status { json } => commands::run_status(&ctx, json),
        Commands::Diff => commands::run_diff(&ctx),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "opencode-synced",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
