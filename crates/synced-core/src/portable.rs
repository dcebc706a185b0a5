//! Home-relative portable paths
//!
//! A portable path names a file the same way on every machine: `~` for the
//! home directory itself, `~/<rel>` for anything below it (always with
//! forward slashes), and a cleaned absolute path for anything outside.

use std::path::{Path, PathBuf};

use synced_fs::NormalizedPath;

use crate::env::Platform;

/// Convert `path` into its portable form relative to `home_dir`.
///
/// Both inputs are cleaned (backslashes become slashes, dot segments are
/// resolved) before comparison. Windows compares case-insensitively; the
/// relative part keeps the case of `path`.
pub fn normalize_path(path: &Path, home_dir: &Path, platform: Platform) -> String {
    let path = NormalizedPath::new(path);
    let home = NormalizedPath::new(home_dir);

    match strip_home(path.as_str(), home.as_str(), platform) {
        Some("") => "~".to_string(),
        Some(rel) => format!("~/{rel}"),
        None => path.as_str().to_string(),
    }
}

fn strip_home<'a>(path: &'a str, home: &str, platform: Platform) -> Option<&'a str> {
    if home.is_empty() {
        return None;
    }

    let head = path.get(..home.len())?;
    let matches = match platform {
        Platform::Windows => head.eq_ignore_ascii_case(home),
        Platform::Linux | Platform::Darwin => head == home,
    };
    if !matches {
        return None;
    }

    let rest = &path[home.len()..];
    if rest.is_empty() {
        Some(rest)
    } else if home.ends_with('/') {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Expand a portable path against the current home directory.
///
/// Anything not starting with `~` is returned unchanged.
pub fn denormalize_path(portable: &str, home_dir: &Path) -> PathBuf {
    if portable == "~" {
        return home_dir.to_path_buf();
    }
    match portable.strip_prefix("~/") {
        Some(rel) => rel
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(home_dir.to_path_buf(), |acc, segment| acc.join(segment)),
        None => PathBuf::from(portable),
    }
}

/// Expand a leading `~` or `~/` (or `~\`) in a user-supplied path.
pub fn expand_home(input: &str, home_dir: &Path) -> PathBuf {
    if input == "~" {
        return home_dir.to_path_buf();
    }
    match input.strip_prefix("~/").or_else(|| input.strip_prefix("~\\")) {
        Some(rest) => home_dir.join(rest),
        None => PathBuf::from(input),
    }
}
