//! Locations command implementation

use colored::Colorize;
use serde_json::json;

use crate::context::SyncContext;
use crate::error::Result;

/// Print where the sync tool looks for its files on this machine.
pub fn run_locations(ctx: &SyncContext, json: bool) -> Result<()> {
    let locations = &ctx.locations;
    let xdg = &locations.xdg;

    if json {
        let output = json!({
            "platform": ctx.platform.as_str(),
            "homeDir": xdg.home_dir,
            "configDir": xdg.config_dir,
            "dataDir": xdg.data_dir,
            "stateDir": xdg.state_dir,
            "configRoot": locations.config_root,
            "syncConfigPath": locations.sync_config_path,
            "overridesPath": locations.overrides_path,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Locations".bold());
    println!();
    println!("{}:      {}", "Platform".dimmed(), ctx.platform.to_string().cyan());
    println!("{}:          {}", "Home".dimmed(), xdg.home_dir.display());
    println!("{}:    {}", "Config dir".dimmed(), xdg.config_dir.display());
    println!("{}:      {}", "Data dir".dimmed(), xdg.data_dir.display());
    println!("{}:     {}", "State dir".dimmed(), xdg.state_dir.display());
    println!();
    println!("{}:   {}", "Config root".dimmed(), locations.config_root.display());
    println!("{}:   {}", "Sync config".dimmed(), locations.sync_config_path.display());
    println!("{}:     {}", "Overrides".dimmed(), locations.overrides_path.display());

    Ok(())
}
