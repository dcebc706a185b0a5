//! XDG-style directory resolution per platform

use std::path::PathBuf;

use crate::env::{Env, Platform};

/// Base directories for configuration, data and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgPaths {
    pub home_dir: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
}

const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
const XDG_DATA_HOME: &str = "XDG_DATA_HOME";
const XDG_STATE_HOME: &str = "XDG_STATE_HOME";

/// Resolve the home directory for `platform` from `env`.
///
/// Windows prefers `USERPROFILE` and falls back to `HOME`. A missing home
/// yields an empty path; callers that care must check.
pub fn home_dir(env: &Env, platform: Platform) -> String {
    let home = match platform {
        Platform::Windows => env.get("USERPROFILE").or_else(|| env.get("HOME")),
        Platform::Linux | Platform::Darwin => env.get("HOME"),
    };
    home.unwrap_or_default().to_string()
}

/// Compute configuration, data and state directories.
///
/// Pure string composition: nothing is read from disk and nothing can fail.
pub fn resolve_xdg_paths(env: &Env, platform: Platform) -> XdgPaths {
    let home = home_dir(env, platform);

    let xdg_config = env.get(XDG_CONFIG_HOME);
    let xdg_data = env.get(XDG_DATA_HOME);
    let xdg_state = env.get(XDG_STATE_HOME);

    let xdg_default = |var: Option<&str>, segments: &[&str]| {
        var.map(str::to_string)
            .unwrap_or_else(|| join_for(platform, &home, segments))
    };

    // Any XDG variable switches Windows to the XDG layout for all three dirs
    let any_xdg = xdg_config.is_some() || xdg_data.is_some() || xdg_state.is_some();
    let uses_native_windows_dirs = platform == Platform::Windows && !any_xdg;

    let (config_dir, data_dir, state_dir) = if uses_native_windows_dirs {
        let local = env
            .get("LOCALAPPDATA")
            .map(str::to_string)
            .unwrap_or_else(|| join_for(platform, &home, &["AppData", "Local"]));
        let roaming = env
            .get("APPDATA")
            .map(str::to_string)
            .unwrap_or_else(|| join_for(platform, &home, &["AppData", "Roaming"]));
        (roaming, local.clone(), local)
    } else {
        (
            xdg_default(xdg_config, &[".config"]),
            xdg_default(xdg_data, &[".local", "share"]),
            xdg_default(xdg_state, &[".local", "state"]),
        )
    };

    XdgPaths {
        home_dir: PathBuf::from(home),
        config_dir: PathBuf::from(config_dir),
        data_dir: PathBuf::from(data_dir),
        state_dir: PathBuf::from(state_dir),
    }
}

/// Join path segments onto `base` with the separator of `platform`.
///
/// The host's own separator is never consulted, so Windows layouts can be
/// computed (and tested) on Linux and vice versa.
pub fn join_for(platform: Platform, base: &str, segments: &[&str]) -> String {
    let sep = platform.separator();
    let mut out = base.to_string();
    for segment in segments {
        if !out.is_empty() && !out.ends_with(['/', '\\']) {
            out.push(sep);
        }
        out.push_str(segment);
    }
    out
}

/// [`join_for`] for a base that is already a `PathBuf`.
pub fn join_path(platform: Platform, base: &std::path::Path, segments: &[&str]) -> PathBuf {
    PathBuf::from(join_for(platform, &base.to_string_lossy(), segments))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_for_uses_target_separator() {
        assert_eq!(
            join_for(Platform::Windows, "C:\\Users\\Test", &[".local", "share"]),
            "C:\\Users\\Test\\.local\\share"
        );
        assert_eq!(
            join_for(Platform::Linux, "/home/test/", &[".config"]),
            "/home/test/.config"
        );
    }

    #[test]
    fn windows_home_falls_back_to_home() {
        let env = Env::from_pairs([("HOME", "C:\\msys\\home\\test")]);
        assert_eq!(home_dir(&env, Platform::Windows), "C:\\msys\\home\\test");
    }

    #[test]
    fn windows_without_appdata_uses_profile_subdirs() {
        let env = Env::from_pairs([("USERPROFILE", "C:\\Users\\Test")]);
        let paths = resolve_xdg_paths(&env, Platform::Windows);
        assert_eq!(
            paths.config_dir,
            PathBuf::from("C:\\Users\\Test\\AppData\\Roaming")
        );
        assert_eq!(paths.state_dir, PathBuf::from("C:\\Users\\Test\\AppData\\Local"));
    }
}
