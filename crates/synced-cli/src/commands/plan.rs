//! Plan command implementation
//!
//! Shows the fixed items and extra allowlists without touching the disk.

use colored::Colorize;

use synced_core::{ExtraManifest, PathKind, SyncPlan};

use crate::context::SyncContext;
use crate::error::Result;

/// Run the plan command
pub fn run_plan(ctx: &SyncContext, json: bool) -> Result<()> {
    let config = ctx.load_config()?;
    let repo_dir = ctx.repo_dir(&config);
    let plan = ctx.plan(&config, &repo_dir);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &SyncPlan) {
    println!(
        "{} {}",
        "Plan".blue().bold(),
        plan.repo_root.display().to_string().yellow()
    );
    println!();

    println!("{}:", "Items".bold());
    for item in &plan.items {
        let marker = match item.kind {
            PathKind::File => " ",
            PathKind::Directory => "/",
        };
        let secret = if item.is_secret {
            " (secret)".red().to_string()
        } else {
            String::new()
        };
        println!(
            "  {}{} <- {}{}",
            item.repo_path.cyan(),
            marker,
            item.local_path.display(),
            secret
        );
    }
    println!();

    print_extras("Extra configs", &plan.extra_configs);
    print_extras("Extra secrets", &plan.extra_secrets);
}

fn print_extras(title: &str, manifest: &ExtraManifest) {
    println!("{}:", title.bold());
    if manifest.allowlist.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for portable in &manifest.allowlist {
        println!(
            "  {} <- {}",
            manifest.repo_path_for(portable).cyan(),
            portable
        );
    }
    println!();
}
