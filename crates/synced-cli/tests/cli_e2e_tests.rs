//! CLI end-to-end tests that invoke the compiled `opencode-synced` binary.
//!
//! Each test gets its own home directory; the binary sees it through `HOME`
//! (and `USERPROFILE`) with the OpenCode config root pinned underneath it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{Value, json};
use synced_test_utils::TestHome;
use synced_test_utils::git::{commit_all, detached_commit, repo_with_commit};

/// Returns the path to the compiled binary.
fn synced_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_opencode-synced"))
}

/// Run the binary with `home` as the user's home directory.
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(synced_bin())
        .args(args)
        .env("HOME", home)
        .env("USERPROFILE", home)
        .env("opencode_config_dir", home.join(".config").join("opencode"))
        .env("NO_COLOR", "1")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("XDG_STATE_HOME")
        .env_remove("OPENCODE_SYNCED_REPO")
        .output()
        .expect("failed to execute opencode-synced binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Write `opencode-synced.jsonc` into `home`, pointing at `repo`.
fn write_config(home: &Path, repo: &Path, extra_config_paths: &[&str]) {
    let config = json!({
        "repo": {"owner": "acme", "name": "opencode-config"},
        "includeModelFavorites": false,
        "extraConfigPaths": extra_config_paths,
        "localRepoPath": repo,
    });
    let path = home.join(".config/opencode/opencode-synced.jsonc");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        format!("// generated by test\n{}", serde_json::to_string_pretty(&config).unwrap()),
    )
    .unwrap();
}

#[test]
fn help_lists_sync_commands() {
    let out = Command::new(synced_bin())
        .arg("--help")
        .output()
        .expect("failed to run --help");

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("pull"), "help should mention pull:\n{text}");
    assert!(text.contains("push"), "help should mention push:\n{text}");
}

#[test]
fn locations_json_reflects_environment() {
    let sandbox = TestHome::new();
    let out = run(&sandbox.home(), &["locations", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let value: Value = serde_json::from_str(&stdout(&out)).unwrap();
    let config_root = sandbox.home().join(".config").join("opencode");
    assert_eq!(value["configRoot"], json!(config_root));
    assert_eq!(
        value["syncConfigPath"],
        json!(config_root.join("opencode-synced.jsonc"))
    );
}

#[test]
fn plan_without_config_reports_code() {
    let sandbox = TestHome::new();
    let out = run(&sandbox.home(), &["plan"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("sync_config_missing"));
}

#[test]
fn plan_json_lists_items_and_extras() {
    let sandbox = TestHome::new();
    write_config(&sandbox.home(), &sandbox.repo(), &["~/.config/tool/settings.json"]);

    let out = run(&sandbox.home(), &["plan", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let plan: Value = serde_json::from_str(&stdout(&out)).unwrap();
    let repo_paths: Vec<&str> = plan["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["repoPath"].as_str().unwrap())
        .collect();
    assert!(repo_paths.contains(&"config/opencode.json"));
    assert!(!repo_paths.contains(&"state/model.json"));
    assert_eq!(
        plan["extraConfigs"]["allowlist"],
        json!(["~/.config/tool/settings.json"])
    );
}

#[test]
fn push_then_pull_between_two_homes() {
    let machine_a = TestHome::new();
    let machine_b = TestHome::new();
    let repo = machine_a.repo();
    let extras = ["~/.config/tool/settings.json"];

    write_config(&machine_a.home(), &repo, &extras);
    machine_a.write_home(".config/opencode/AGENTS.md", "# Shared agents\n");
    machine_a.write_home(".config/tool/settings.json", "{\"shared\": true}\n");

    let out = run(&machine_a.home(), &["push"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    machine_a.assert_repo_exists("config/AGENTS.md");
    machine_a.assert_repo_exists("config/extra-manifest.json");

    write_config(&machine_b.home(), &repo, &extras);
    let out = run(&machine_b.home(), &["pull", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let report: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert!(!report["actions"].as_array().unwrap().is_empty());
    assert_eq!(
        machine_b.read_home(".config/opencode/AGENTS.md"),
        "# Shared agents\n"
    );
    assert_eq!(
        machine_b.read_home(".config/tool/settings.json"),
        "{\"shared\": true}\n"
    );
}

#[test]
fn pull_rejects_absolute_manifest_path() {
    let sandbox = TestHome::new();
    write_config(&sandbox.home(), &sandbox.repo(), &["~/target.txt"]);
    sandbox.write_repo(
        "config/extra-manifest.json",
        r#"{"entries": [{"sourcePath": "~/target.txt", "repoPath": "/etc/passwd", "type": "file"}]}"#,
    );

    let out = run(&sandbox.home(), &["pull"]);

    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("path_unsafe"), "stderr: {err}");
    assert!(err.contains("absolute paths are not allowed"), "stderr: {err}");
    sandbox.assert_home_missing("target.txt");
}

#[test]
fn pull_requires_existing_checkout() {
    let sandbox = TestHome::new();
    write_config(&sandbox.home(), &sandbox.root().join("missing"), &[]);

    let out = run(&sandbox.home(), &["pull"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("Sync repository not found"));
}

fn diverge(repo_dir: &Path) {
    let repo = repo_with_commit(repo_dir);
    let base = repo.head().unwrap().peel_to_commit().unwrap().id();
    let remote_tip = detached_commit(&repo, base, "Remote change");
    repo.reference("refs/remotes/origin/main", remote_tip, true, "test")
        .unwrap();
    fs::write(repo_dir.join("local.txt"), "local").unwrap();
    commit_all(&repo, "Local change");
}

#[test]
fn pull_refuses_diverged_checkout() {
    let sandbox = TestHome::new();
    diverge(&sandbox.repo());
    write_config(&sandbox.home(), &sandbox.repo(), &[]);

    let out = run(&sandbox.home(), &["pull"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("repo_diverged"));
}

#[test]
fn status_json_reports_divergence() {
    let sandbox = TestHome::new();
    diverge(&sandbox.repo());
    write_config(&sandbox.home(), &sandbox.repo(), &[]);

    let out = run(&sandbox.home(), &["status", "--json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let status: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(status["repo"], "acme/opencode-config");
    assert_eq!(status["ahead"], 1);
    assert_eq!(status["behind"], 1);
    assert_eq!(status["diverged"], true);
}

#[test]
fn diff_summarizes_pushed_changes() {
    let sandbox = TestHome::new();
    repo_with_commit(&sandbox.repo());
    write_config(&sandbox.home(), &sandbox.repo(), &[]);

    let out = run(&sandbox.home(), &["diff"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("No uncommitted changes"));

    sandbox.write_repo("README.md", "# Sync repo\nedited\n");
    let out = run(&sandbox.home(), &["diff"]);
    let text = stdout(&out);
    assert!(text.contains("M\tREADME.md"), "stdout: {text}");
    assert!(text.contains("Sync OpenCode config ("), "stdout: {text}");
}
