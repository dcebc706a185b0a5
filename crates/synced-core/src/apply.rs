//! Apply a sync plan in either direction
//!
//! Pulling (repository to local) is the security-sensitive direction:
//! manifest entries read from the repository are validated, every one of
//! them, before the first byte is written anywhere. A single bad entry
//! aborts the whole call. There is no rollback; files copied before a later
//! failure stay copied.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use synced_fs::checksum::compute_file_checksum;
use synced_fs::{ConfigStore, NormalizedPath, io};
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::{deep_merge, strip_overrides};
use crate::manifest::{ManifestFile, ValidatedEntry, read_manifest, write_manifest};
use crate::plan::{ExtraManifest, PathKind, SyncItem, SyncPlan};
use crate::portable::denormalize_path;

/// What an apply call did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Changes made, in order
    pub actions: Vec<String>,
    /// Items or entries deliberately left alone, with the reason
    pub skipped: Vec<String>,
}

impl ApplyReport {
    fn action(&mut self, message: String) {
        debug!("{message}");
        self.actions.push(message);
    }

    fn skip(&mut self, message: String) {
        debug!("{message}");
        self.skipped.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    RepoToLocal,
    LocalToRepo,
}

/// Something the transfer routine may copy.
///
/// Only builder-made items and validated manifest entries qualify; a raw
/// [`crate::ManifestEntry`] cannot be turned into one.
#[derive(Debug, Clone, Copy)]
enum Transfer<'a> {
    Item(&'a SyncItem),
    Entry(&'a ValidatedEntry),
}

impl Transfer<'_> {
    fn repo_path(&self) -> &str {
        match self {
            Self::Item(item) => &item.repo_path,
            Self::Entry(entry) => entry.repo_path(),
        }
    }

    fn local_path(&self) -> &Path {
        match self {
            Self::Item(item) => &item.local_path,
            Self::Entry(entry) => entry.local_path(),
        }
    }

    fn kind(&self) -> PathKind {
        match self {
            Self::Item(item) => item.kind,
            Self::Entry(entry) => entry.kind(),
        }
    }
}

fn transfer(
    plan: &SyncPlan,
    what: Transfer<'_>,
    direction: Direction,
    report: &mut ApplyReport,
) -> Result<()> {
    let repo_file = plan.repo_file(what.repo_path());
    let local_file = what.local_path();

    let (source, target) = match direction {
        Direction::RepoToLocal => (repo_file.as_path(), local_file),
        Direction::LocalToRepo => (local_file, repo_file.as_path()),
    };

    match what.kind() {
        PathKind::File => {
            if unchanged(source, target) {
                report.skip(format!("Unchanged {}", what.repo_path()));
                return Ok(());
            }
            io::copy_file(source, target)?;
        }
        PathKind::Directory => {
            // Pushing mirrors the local tree; pulling merges into it
            if direction == Direction::LocalToRepo {
                io::remove_path(target)?;
            }
            io::copy_dir_all(source, target)?;
        }
    }

    let arrow = match direction {
        Direction::RepoToLocal => format!("{} -> {}", what.repo_path(), target.display()),
        Direction::LocalToRepo => format!("{} -> {}", source.display(), what.repo_path()),
    };
    report.action(format!("Copied {arrow}"));
    Ok(())
}

fn unchanged(source: &Path, target: &Path) -> bool {
    match (compute_file_checksum(source), compute_file_checksum(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy the repository's state onto this machine.
///
/// Fixed items are copied when the repository has them. Both extra
/// manifests are read and fully validated before anything is written;
/// entries whose source is no longer allowlisted are skipped. When
/// `overrides` is given it is deep-merged into every local OpenCode config
/// file afterwards.
pub fn sync_repo_to_local(plan: &SyncPlan, overrides: Option<&Value>) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    let mut validated = Vec::new();
    for manifest in plan.manifests() {
        validated.push((manifest, validated_entries(plan, manifest)?));
    }
    for item in &plan.items {
        ensure_repo_path_safe(plan, &item.repo_path)?;
    }

    for item in &plan.items {
        let source = plan.repo_file(&item.repo_path);
        if !source.exists() {
            report.skip(format!("Not in repository: {}", item.repo_path));
            continue;
        }
        transfer(plan, Transfer::Item(item), Direction::RepoToLocal, &mut report)?;
    }

    for (manifest, entries) in &validated {
        for entry in entries {
            if !manifest.allows(entry.source(), plan.platform) {
                report.skip(format!("Not allowlisted: {}", entry.source()));
                continue;
            }
            if !plan.repo_file(entry.repo_path()).exists() {
                warn!(repo_path = %entry.repo_path(), "Manifest entry has no payload in repository");
                report.skip(format!("Missing payload: {}", entry.repo_path()));
                continue;
            }
            transfer(plan, Transfer::Entry(entry), Direction::RepoToLocal, &mut report)?;
        }
    }

    if let Some(overrides) = overrides.filter(|value| has_content(value)) {
        apply_overrides(plan, overrides, &mut report)?;
    }

    info!(
        actions = report.actions.len(),
        skipped = report.skipped.len(),
        "Pulled repository into local config"
    );
    Ok(report)
}

/// Read and validate every entry of one manifest.
///
/// Entries carried by the plan itself are validated the same way as those
/// read from disk. Repository sources must not traverse symlinks.
fn validated_entries(plan: &SyncPlan, manifest: &ExtraManifest) -> Result<Vec<ValidatedEntry>> {
    let on_disk = read_manifest(&manifest.manifest_path)?.unwrap_or_default();

    let mut validated = Vec::new();
    for entry in on_disk.entries.iter().chain(&manifest.entries) {
        let entry = manifest.validate(entry, &plan.home_dir, plan.platform)?;
        ensure_repo_path_safe(plan, entry.repo_path())?;
        validated.push(entry);
    }
    Ok(validated)
}

/// Refuse a repository path that traverses a symlink, at any depth.
fn ensure_repo_path_safe(plan: &SyncPlan, repo_path: &str) -> Result<()> {
    io::ensure_no_symlinks(&plan.repo_root, &plan.repo_file(repo_path))?;
    Ok(())
}

/// Every repository path a push may write, remove or prune.
fn push_targets(plan: &SyncPlan) -> Vec<String> {
    let mut targets: Vec<String> = plan.items.iter().map(|item| item.repo_path.clone()).collect();
    for manifest in plan.manifests() {
        targets.push(manifest.category.manifest_repo_path());
        targets.push(manifest.subtree());
        targets.extend(
            manifest
                .allowlist
                .iter()
                .map(|portable| manifest.repo_path_for(portable)),
        );
    }
    targets
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

fn apply_overrides(plan: &SyncPlan, overrides: &Value, report: &mut ApplyReport) -> Result<()> {
    let store = ConfigStore::new();
    for item in plan.items.iter().filter(|item| item.is_config_file) {
        if !item.local_path.is_file() {
            continue;
        }
        let path = NormalizedPath::new(&item.local_path);
        let mut value: Value = store.load(&path)?;
        deep_merge(&mut value, overrides);
        store.save(&path, &value)?;
        report.action(format!("Applied overrides to {}", item.local_path.display()));
    }
    Ok(())
}

/// Record this machine's state in the repository.
///
/// No repository path that will be written, removed or pruned may pass
/// through a symlink; this is checked for all of them before the first write.
/// Fixed items whose local copy is gone are removed from the repository.
/// Override values are stripped from OpenCode config files before they are
/// written. Every allowlisted extra path that exists locally is copied to
/// its encoded repository path, the manifest is rewritten, and payloads no
/// entry references any more are pruned.
pub fn sync_local_to_repo(plan: &SyncPlan, overrides: Option<&Value>) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    let overrides = overrides.filter(|value| has_content(value));

    for repo_path in push_targets(plan) {
        ensure_repo_path_safe(plan, &repo_path)?;
    }

    for item in &plan.items {
        let repo_file = plan.repo_file(&item.repo_path);

        if !item.local_path.exists() {
            if repo_file.exists() {
                io::remove_path(&repo_file)?;
                report.action(format!("Removed {}", item.repo_path));
            }
            continue;
        }

        match overrides {
            Some(overrides) if item.is_config_file => {
                write_stripped_config(item, &repo_file, overrides)?;
                report.action(format!(
                    "Copied {} -> {} (overrides stripped)",
                    item.local_path.display(),
                    item.repo_path
                ));
            }
            _ => transfer(plan, Transfer::Item(item), Direction::LocalToRepo, &mut report)?,
        }
    }

    for manifest in plan.manifests() {
        push_extras(plan, manifest, &mut report)?;
    }

    info!(
        actions = report.actions.len(),
        skipped = report.skipped.len(),
        "Pushed local config into repository"
    );
    Ok(report)
}

fn write_stripped_config(item: &SyncItem, repo_file: &Path, overrides: &Value) -> Result<()> {
    let store = ConfigStore::new();
    let local: Value = store.load(&NormalizedPath::new(&item.local_path))?;

    let repo_path = NormalizedPath::new(repo_file);
    let base: Option<Value> = if repo_file.is_file() {
        Some(store.load(&repo_path)?)
    } else {
        None
    };

    let stripped = strip_overrides(&local, overrides, base.as_ref());
    store.save(&repo_path, &stripped)?;
    Ok(())
}

fn push_extras(plan: &SyncPlan, manifest: &ExtraManifest, report: &mut ApplyReport) -> Result<()> {
    let mut entries = Vec::new();

    for portable in &manifest.allowlist {
        let local = denormalize_path(portable, &plan.home_dir);
        let kind = if local.is_dir() {
            PathKind::Directory
        } else if local.is_file() {
            PathKind::File
        } else {
            report.skip(format!("Missing locally: {portable}"));
            continue;
        };

        let entry = manifest.validate(
            &manifest.entry_for(portable, kind),
            &plan.home_dir,
            plan.platform,
        )?;
        ensure_repo_path_safe(plan, entry.repo_path())?;
        transfer(plan, Transfer::Entry(&entry), Direction::LocalToRepo, report)?;
        entries.push(entry.to_entry());
    }

    if entries.is_empty() && !manifest.manifest_path.exists() {
        return Ok(());
    }

    let referenced: HashSet<String> = entries
        .iter()
        .filter_map(|entry| payload_name(&entry.repo_path, &manifest.subtree()))
        .collect();
    write_manifest(&manifest.manifest_path, &ManifestFile { entries })?;
    prune_payloads(plan, &manifest.subtree(), &referenced, report)
}

/// First path segment below `subtree`.
fn payload_name(repo_path: &str, subtree: &str) -> Option<String> {
    let rest = repo_path.strip_prefix(subtree)?.strip_prefix('/')?;
    rest.split('/').next().map(str::to_string)
}

fn prune_payloads(
    plan: &SyncPlan,
    subtree: &str,
    referenced: &HashSet<String>,
    report: &mut ApplyReport,
) -> Result<()> {
    // Never list or delete through a linked payload directory
    ensure_repo_path_safe(plan, subtree)?;
    let payload_dir = plan.repo_file(subtree);
    let payload_dir = payload_dir.as_path();

    let entries = match fs::read_dir(payload_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(synced_fs::Error::io(payload_dir, e).into()),
    };

    for entry in entries {
        let entry = entry.map_err(|e| synced_fs::Error::io(payload_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !referenced.contains(&name) {
            io::remove_path(&entry.path())?;
            report.action(format!("Pruned {}", entry.path().display()));
        }
    }
    Ok(())
}
