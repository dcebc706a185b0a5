//! Pull and push command implementations

use std::path::Path;

use colored::Colorize;
use tracing::debug;

use synced_core::{
    ApplyReport, SyncConfig, ensure_not_diverged, sync_local_to_repo, sync_repo_to_local,
};

use crate::context::{SyncContext, is_git_checkout};
use crate::error::Result;

/// Run the pull command
///
/// Refuses to run against a diverged checkout. Overrides from
/// `opencode-synced.overrides.jsonc` are merged into the pulled config files.
pub fn run_pull(ctx: &SyncContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let repo_dir = ctx.existing_repo_dir(&config)?;
    guard_divergence(&repo_dir, &config)?;

    let plan = ctx.plan(&config, &repo_dir);
    let overrides = ctx.overrides()?;
    let report = sync_repo_to_local(&plan, overrides.as_ref())?;

    print_report("Pulled", &repo_dir, &report, json)
}

/// Run the push command
///
/// Copies local files into the checkout; committing is left to the user.
pub fn run_push(ctx: &SyncContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let repo_dir = ctx.existing_repo_dir(&config)?;
    guard_divergence(&repo_dir, &config)?;

    let plan = ctx.plan(&config, &repo_dir);
    let overrides = ctx.overrides()?;
    let report = sync_local_to_repo(&plan, overrides.as_ref())?;

    print_report("Pushed", &repo_dir, &report, json)?;
    if !json && !report.is_empty() {
        println!();
        println!(
            "Review with {} and commit in {}.",
            "opencode-synced diff".cyan(),
            repo_dir.display()
        );
    }
    Ok(())
}

fn guard_divergence(repo_dir: &Path, config: &SyncConfig) -> Result<()> {
    if !is_git_checkout(repo_dir) {
        debug!(repo = %repo_dir.display(), "Not a git checkout, skipping divergence check");
        return Ok(());
    }
    ensure_not_diverged(repo_dir, config.branch())?;
    Ok(())
}

fn print_report(verb: &str, repo_dir: &Path, report: &ApplyReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!(
            "{} Nothing to do. {} is in sync.",
            "OK".green().bold(),
            repo_dir.display()
        );
    } else {
        println!(
            "{} {} ({} change(s))",
            verb.green().bold(),
            repo_dir.display().to_string().yellow(),
            report.actions.len()
        );
        for action in &report.actions {
            println!("  {} {}", "+".green(), action);
        }
    }

    for skipped in &report.skipped {
        debug!("{skipped}");
    }
    Ok(())
}
