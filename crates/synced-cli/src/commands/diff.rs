//! Diff command implementation
//!
//! Summarizes uncommitted changes in the sync checkout and suggests a commit
//! message for them.

use chrono::Local;
use colored::Colorize;

use synced_core::{DiffSource, GitDiff, fallback_message};

use crate::context::SyncContext;
use crate::error::Result;

/// Run the diff command
pub fn run_diff(ctx: &SyncContext) -> Result<()> {
    let config = ctx.load_config()?;
    let repo_dir = ctx.existing_repo_dir(&config)?;

    let Some(summary) = GitDiff.diff_summary(&repo_dir) else {
        println!(
            "{} No uncommitted changes in {}.",
            "OK".green().bold(),
            repo_dir.display()
        );
        return Ok(());
    };

    println!("{} {}", "Diff".blue().bold(), repo_dir.display().to_string().yellow());
    println!();
    for line in summary.lines() {
        let colored_line = match line.split_once('\t') {
            Some(("A", _)) => line.green(),
            Some(("D", _)) => line.red(),
            Some(_) => line.yellow(),
            None => line.normal(),
        };
        println!("  {colored_line}");
    }
    println!();
    println!(
        "{}: {}",
        "Suggested message".dimmed(),
        fallback_message(Local::now().date_naive())
    );
    Ok(())
}
