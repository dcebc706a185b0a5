//! Working-tree diff summaries
//!
//! Equivalent to `git diff --name-status` followed by `git diff --stat`:
//! unstaged changes between the index and the working tree. Untracked files
//! are not listed, matching plain `git diff`.

use std::path::Path;

use git2::{Delta, DiffStatsFormat, Repository};
use tracing::debug;

use crate::Result;

/// Width passed to libgit2 when rendering the stat block.
const STAT_WIDTH: usize = 80;

/// One `<status>\t<path>` line per changed file.
pub fn name_status(repo: &Repository) -> Result<String> {
    let diff = repo.diff_index_to_workdir(None, None)?;

    let mut lines = Vec::new();
    for delta in diff.deltas() {
        let code = match delta.status() {
            Delta::Added => 'A',
            Delta::Deleted => 'D',
            Delta::Modified => 'M',
            Delta::Renamed => 'R',
            Delta::Copied => 'C',
            Delta::Typechange => 'T',
            _ => continue,
        };
        let path = delta.new_file().path().or_else(|| delta.old_file().path());
        if let Some(path) = path {
            lines.push(format!("{code}\t{}", path.display()));
        }
    }

    Ok(lines.join("\n"))
}

/// The `--stat` block, or an empty string when nothing changed.
pub fn stat_summary(repo: &Repository) -> Result<String> {
    let diff = repo.diff_index_to_workdir(None, None)?;
    let stats = diff.stats()?;
    if stats.files_changed() == 0 {
        return Ok(String::new());
    }

    let buf = stats.to_buf(DiffStatsFormat::FULL, STAT_WIDTH)?;
    Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
}

/// Name-status lines followed by the stat block, empty sections omitted.
pub fn diff_summary(repo_dir: &Path) -> Result<String> {
    let repo = crate::open(repo_dir)?;
    let sections = [name_status(&repo)?, stat_summary(&repo)?];

    let summary = sections
        .iter()
        .map(|section| section.trim())
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    debug!(repo = %repo_dir.display(), bytes = summary.len(), "Computed diff summary");
    Ok(summary)
}
