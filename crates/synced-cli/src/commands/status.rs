//! Status command implementation

use colored::Colorize;
use serde_json::json;

use synced_core::{SyncConfig, ensure_not_diverged};
use synced_git::Divergence;

use crate::context::{SyncContext, is_git_checkout};
use crate::error::Result;

/// Run the status command
pub fn run_status(ctx: &SyncContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let repo_dir = ctx.repo_dir(&config);
    let exists = repo_dir.is_dir();

    // A diverged checkout is reported, not treated as a failure
    let divergence = if exists && is_git_checkout(&repo_dir) {
        Some(synced_git::divergence(&repo_dir, config.branch())?)
    } else {
        None
    };

    if json {
        let output = json!({
            "repo": format!("{}/{}", config.repo.owner, config.repo.name),
            "branch": config.branch(),
            "repoDir": repo_dir,
            "exists": exists,
            "ahead": divergence.map(|d| d.ahead),
            "behind": divergence.map(|d| d.behind),
            "hasUpstream": divergence.map(|d| d.has_upstream),
            "diverged": divergence.is_some_and(|d| d.is_diverged()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_status(&config, &repo_dir, exists, divergence);

    if divergence.is_some_and(|d| d.is_diverged()) {
        // Surface the same error pull and push would raise
        ensure_not_diverged(&repo_dir, config.branch())?;
    }
    Ok(())
}

fn print_status(
    config: &SyncConfig,
    repo_dir: &std::path::Path,
    exists: bool,
    divergence: Option<Divergence>,
) {
    println!("{}", "Sync Status".bold());
    println!();
    println!(
        "{}:     {}/{}",
        "Repo".dimmed(),
        config.repo.owner.cyan(),
        config.repo.name.cyan()
    );
    println!("{}:   {}", "Branch".dimmed(), config.branch());
    println!("{}: {}", "Checkout".dimmed(), repo_dir.display());
    println!(
        "{}:  {}",
        "Secrets".dimmed(),
        if config.includes_secrets() {
            "included".yellow()
        } else {
            "excluded".green()
        }
    );
    println!();

    if !exists {
        println!("{}", "Checkout missing".red().bold());
        return;
    }

    match divergence {
        None => println!("{}", "Not a git checkout".yellow()),
        Some(d) if !d.has_upstream => println!("{}", "No upstream branch yet".yellow()),
        Some(d) if d.is_diverged() => println!(
            "{} ({} ahead, {} behind)",
            "Diverged".red().bold(),
            d.ahead,
            d.behind
        ),
        Some(d) if d.ahead == 0 && d.behind == 0 => println!("{}", "Up to date".green()),
        Some(d) => println!("{} ahead, {} behind", d.ahead, d.behind),
    }
}
