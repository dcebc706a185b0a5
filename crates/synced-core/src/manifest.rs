//! Extra manifests and the containment check
//!
//! Manifest files live in the repository and are read back on every pull.
//! They may have been edited by hand, merged or fetched from a remote, so
//! their contents are untrusted: a [`ManifestEntry`] must pass
//! [`ExtraManifest::validate`] to become a [`ValidatedEntry`], and only
//! validated entries can reach the file transfer code in [`crate::apply`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use synced_fs::{ConfigStore, NormalizedPath};
use tracing::debug;

use crate::env::Platform;
use crate::error::{PathSafetyError, PathSafetyKind};
use crate::plan::{ExtraManifest, PathKind};
use crate::portable::{denormalize_path, normalize_path};
use crate::{Error, Result};

/// One entry as stored in `extra-manifest.json`. Untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub source_path: String,
    pub repo_path: String,
    #[serde(rename = "type")]
    pub kind: PathKind,
}

/// On-disk manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default)]
    pub entries: Vec<ManifestEntry>,
}

/// A manifest entry whose repository path is known to stay inside its
/// category subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    source: String,
    local_path: PathBuf,
    repo_path: String,
    kind: PathKind,
}

impl ValidatedEntry {
    /// Portable source path.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source path expanded against the current home directory.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Clean repository-relative path inside the category subtree.
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    /// Back to the persisted form, with the cleaned repository path.
    pub fn to_entry(&self) -> ManifestEntry {
        ManifestEntry {
            source_path: self.source.clone(),
            repo_path: self.repo_path.clone(),
            kind: self.kind,
        }
    }
}

impl ExtraManifest {
    /// Check an entry against this manifest's subtree.
    ///
    /// This is the only way to obtain a [`ValidatedEntry`]. Allowlist
    /// membership is not checked here; a valid entry the configuration no
    /// longer lists is skipped by the caller, not rejected.
    pub fn validate(
        &self,
        entry: &ManifestEntry,
        home_dir: &Path,
        platform: Platform,
    ) -> std::result::Result<ValidatedEntry, PathSafetyError> {
        let repo_path = validate_repo_path(&entry.repo_path, &self.subtree())?;
        let source = portable_source(&entry.source_path, home_dir, platform);
        let local_path = denormalize_path(&source, home_dir);

        Ok(ValidatedEntry {
            source,
            local_path,
            repo_path,
            kind: entry.kind,
        })
    }

    /// The entry a push records for an allowlisted portable path.
    pub fn entry_for(&self, portable: &str, kind: PathKind) -> ManifestEntry {
        ManifestEntry {
            source_path: portable.to_string(),
            repo_path: self.repo_path_for(portable),
            kind,
        }
    }
}

/// Resolve `repo_path` and require it to sit strictly inside `subtree`.
///
/// Rejects rooted paths (`/x`, `\x`, `C:\x`, `C:/x`, `//server/share`) and
/// any segment carrying a drive or stream qualifier with
/// [`PathSafetyKind::AbsolutePath`]. Dot segments are resolved without
/// discarding leading `..`; a result outside `subtree`, or equal to it, is
/// [`PathSafetyKind::EscapesRoot`]. Returns the cleaned relative path.
pub fn validate_repo_path(
    repo_path: &str,
    subtree: &str,
) -> std::result::Result<String, PathSafetyError> {
    let fail = |kind| PathSafetyError {
        kind,
        path: repo_path.to_string(),
        subtree: subtree.to_string(),
    };

    let slashed = repo_path.replace('\\', "/");
    if slashed.starts_with('/')
        || NormalizedPath::new(&slashed).is_absolute()
        || slashed.split('/').any(|segment| segment.contains(':'))
    {
        return Err(fail(PathSafetyKind::AbsolutePath));
    }

    let mut resolved: Vec<&str> = Vec::new();
    for segment in slashed.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if resolved.pop().is_none() {
                    return Err(fail(PathSafetyKind::EscapesRoot));
                }
            }
            other => resolved.push(other),
        }
    }

    let root: Vec<&str> = subtree.split('/').filter(|s| !s.is_empty()).collect();
    if resolved.len() <= root.len() || resolved[..root.len()] != root[..] {
        return Err(fail(PathSafetyKind::EscapesRoot));
    }

    Ok(resolved.join("/"))
}

/// Portable form of a manifest `sourcePath`.
///
/// Tool-written manifests store `~/...`; hand-written ones may hold an
/// absolute path, which is normalized against the current home.
fn portable_source(source: &str, home_dir: &Path, platform: Platform) -> String {
    let slashed = source.replace('\\', "/");
    if slashed == "~" {
        return slashed;
    }
    match slashed.strip_prefix("~/") {
        Some(rest) => {
            let rest = NormalizedPath::new(rest);
            if rest.as_str().is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", rest.as_str())
            }
        }
        None => normalize_path(Path::new(source), home_dir, platform),
    }
}

/// Read a manifest file. A missing file is `Ok(None)`.
pub fn read_manifest(path: &Path) -> Result<Option<ManifestFile>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(synced_fs::Error::io(path, e).into()),
    };

    let manifest = serde_json::from_str(&content).map_err(|e| Error::ManifestInvalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "Read extra manifest");
    Ok(Some(manifest))
}

/// Write a manifest as pretty JSON, atomically.
pub fn write_manifest(path: &Path, manifest: &ManifestFile) -> Result<()> {
    ConfigStore::new().save(&NormalizedPath::new(path), manifest)?;
    debug!(path = %path.display(), entries = manifest.entries.len(), "Wrote extra manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ExtraCategory;
    use rstest::rstest;

    #[rstest]
    #[case("/etc/passwd")]
    #[case("\\etc\\passwd")]
    #[case("C:\\Windows\\system.ini")]
    #[case("C:/Windows/system.ini")]
    #[case("c:relative")]
    #[case("//server/share/x")]
    #[case("\\\\server\\share\\x")]
    #[case("config/extra/D:evil")]
    fn rejects_absolute_paths(#[case] path: &str) {
        let err = validate_repo_path(path, "config/extra").unwrap_err();
        assert_eq!(err.kind, PathSafetyKind::AbsolutePath, "{path}");
        assert_eq!(err.path, path);
    }

    #[rstest]
    #[case("../../etc/passwd")]
    #[case("config/extra/../../../x")]
    #[case("config/extra/../other.txt")]
    #[case("secrets/extra/a.txt")]
    #[case("config/extras/a.txt")]
    #[case("config/extra")]
    #[case("config/extra/a/..")]
    #[case("")]
    fn rejects_paths_outside_subtree(#[case] path: &str) {
        let err = validate_repo_path(path, "config/extra").unwrap_err();
        assert_eq!(err.kind, PathSafetyKind::EscapesRoot, "{path}");
    }

    #[rstest]
    #[case("config/extra/safe.txt", "config/extra/safe.txt")]
    #[case("./config/extra/./a/../b.txt", "config/extra/b.txt")]
    #[case("config\\extra\\dir\\f", "config/extra/dir/f")]
    #[case("config//extra///x", "config/extra/x")]
    fn accepts_and_cleans_contained_paths(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(validate_repo_path(path, "config/extra").unwrap(), expected);
    }

    #[test]
    fn validate_expands_source_against_current_home() {
        let manifest = ExtraManifest::new(ExtraCategory::Configs, Path::new("/repo"), vec![]);
        let entry = ManifestEntry {
            source_path: "~/.config/tool/settings.json".into(),
            repo_path: "config/extra/abc-settings.json".into(),
            kind: PathKind::File,
        };

        let validated = manifest
            .validate(&entry, Path::new("/Users/test"), Platform::Darwin)
            .unwrap();

        assert_eq!(validated.source(), "~/.config/tool/settings.json");
        assert_eq!(
            validated.local_path(),
            Path::new("/Users/test/.config/tool/settings.json")
        );
    }

    #[test]
    fn absolute_sources_become_portable() {
        assert_eq!(
            portable_source("/home/test/target.txt", Path::new("/home/test"), Platform::Linux),
            "~/target.txt"
        );
        assert_eq!(
            portable_source("~/a/../b", Path::new("/home/test"), Platform::Linux),
            "~/b"
        );
    }

    #[test]
    fn unknown_entry_type_is_rejected() {
        let json = r#"{"entries": [{"sourcePath": "~/x", "repoPath": "config/extra/x", "type": "symlink"}]}"#;
        assert!(serde_json::from_str::<ManifestFile>(json).is_err());
    }
}
