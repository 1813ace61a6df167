#![allow(deprecated)]
use assert_cmd::Command;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use predicates::prelude::*;
use tempfile::TempDir;

const NOW: &str = "2024-05-01T12:00:00Z";
// 2024-05-01T10:30:00Z
const NINETY_MINUTES_AGO: i64 = 1_714_559_400_000;

const ONLINE_BADGE: &str = "[![Discord Presence](https://badgen.net/badge/Discord%20User/Online?color=43B581&labelColor=2F3136&icon=discord)](https://github.com/octocat/octocat)";

fn badge(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("presence-badge").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BADGE_CONFIG")
        .env_remove("GITHUB_ACTOR")
        .env_remove("BADGE_NOW")
        .env_remove("RUST_LOG")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITHUB_API_URL");
    cmd
}

fn write_presence(dir: &TempDir, json: &str) -> String {
    let path = dir.path().join("presence.json");
    std::fs::write(&path, json).unwrap();
    path.display().to_string()
}

fn game_presence() -> String {
    format!(
        r#"{{"status":"online","activities":{{"GAME_ACTIVITY":{{"name":"Factorio","timestamps":{{"start":{NINETY_MINUTES_AGO}}}}}}}}}"#
    )
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

#[test]
fn render_online_without_activity() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);

    badge(&dir)
        .args(["render", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .success()
        .stdout(format!("{ONLINE_BADGE}\n"));
}

#[test]
fn render_reads_stdin_by_default() {
    let dir = TempDir::new().unwrap();

    badge(&dir)
        .args(["render", "--actor", "octocat"])
        .write_stdin(r#"{"status":"online","activities":{}}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(ONLINE_BADGE));
}

#[test]
fn render_json_reports_selection_and_time() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, &game_presence());

    let output = badge(&dir)
        .args([
            "render", "--presence", &presence, "--actor", "octocat", "--now", NOW, "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["selected"], "GAME_ACTIVITY");
    assert_eq!(json["used_preferred"], false);
    assert_eq!(json["time"], "1 hour 30 minutes elapsed.");
    assert_eq!(json["text"]["status"], "Factorio, 1 hour 30 minutes elapsed.");
    assert!(json["markdown"]
        .as_str()
        .unwrap()
        .starts_with("[![Discord Presence](https://badgen.net/badge/"));
}

#[test]
fn render_now_from_env() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, &game_presence());

    badge(&dir)
        .env("BADGE_NOW", NOW)
        .args(["render", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Factorio%2C%201%20hour%2030%20minutes%20elapsed.",
        ));
}

#[test]
fn render_without_actor_fails() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);

    badge(&dir)
        .args(["render", "--presence", &presence])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--actor"));
}

#[test]
fn render_missing_activity_field_fails() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(
        &dir,
        r#"{"status":"online","activities":{"GAME_ACTIVITY":{"state":"in menus"}}}"#,
    );

    badge(&dir)
        .args(["render", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no 'name' field"));
}

#[test]
fn render_rejects_invalid_color_config() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    std::fs::write(
        dir.path().join("presence-badge.yaml"),
        "statuses:\n  online:\n    display: Online\n    color: zzz\n",
    )
    .unwrap();

    badge(&dir)
        .args(["render", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config validation failed"))
        .stderr(predicate::str::contains("zzz"));
}

#[test]
fn render_uses_discovered_config() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    std::fs::write(
        dir.path().join("presence-badge.yaml"),
        "identifier: My Status\nredirect_url: octocat/dotfiles\n",
    )
    .unwrap();

    badge(&dir)
        .args(["render", "--presence", &presence])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[![My Status]("))
        .stdout(predicate::str::contains("(https://github.com/octocat/dotfiles)"));
}

#[test]
fn render_rejects_redirect_the_patcher_cannot_match() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    std::fs::write(
        dir.path().join("presence-badge.yaml"),
        "redirect_url: \"octocat/my repo\"\n",
    )
    .unwrap();

    badge(&dir)
        .args(["render", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("redirect_url"));
}

// ---------------------------------------------------------------------------
// patch
// ---------------------------------------------------------------------------

#[test]
fn patch_prepends_then_settles() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    std::fs::write(dir.path().join("README.md"), "# Octocat\n").unwrap();

    badge(&dir)
        .args(["patch", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added badge"));

    let content = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(content, format!("{ONLINE_BADGE}\n\n# Octocat\n"));

    badge(&dir)
        .args(["patch", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));

    let again = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(again, content);
}

#[test]
fn patch_replaces_existing_badge() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    let stale = "[![Discord Presence](https://badgen.net/badge/Discord%20User/Offline?color=747F8D&labelColor=2F3136&icon=discord)](https://github.com/octocat/octocat)";
    std::fs::write(
        dir.path().join("README.md"),
        format!("# Octocat\n\n{stale}\n\nMore text.\n"),
    )
    .unwrap();

    badge(&dir)
        .args(["patch", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("replaced badge"));

    let content = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(content, format!("# Octocat\n\n{ONLINE_BADGE}\n\nMore text.\n"));
}

#[test]
fn patch_dry_run_leaves_file() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);
    std::fs::write(dir.path().join("README.md"), "# Octocat\n").unwrap();

    badge(&dir)
        .args([
            "patch", "--presence", &presence, "--actor", "octocat", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    let content = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert_eq!(content, "# Octocat\n");
}

#[test]
fn patch_missing_readme_fails() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);

    badge(&dir)
        .args(["patch", "--presence", &presence, "--actor", "octocat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to patch"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_init_validate_show() {
    let dir = TempDir::new().unwrap();

    badge(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("presence-badge.yaml").exists());

    badge(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    badge(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();

    badge(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    badge(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discord Presence"))
        .stdout(predicate::str::contains("statuses.online"))
        .stdout(predicate::str::contains("1DB954"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("presence-badge.yaml"),
        "identifier: \"bad  identifier!\"\nseparator: \"\"\n",
    )
    .unwrap();

    badge(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] identifier"))
        .stdout(predicate::str::contains("[warning] separator"));
}

#[test]
fn config_show_json_uses_defaults_without_file() {
    let dir = TempDir::new().unwrap();

    let output = badge(&dir)
        .args(["config", "show", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["identifier"], "Discord Presence");
    assert_eq!(json["preferred_activity"], "RICH_PRESENCE");
}

#[test]
fn explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();

    badge(&dir)
        .args(["config", "show", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

#[test]
fn sync_commits_changed_readme() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);

    let mut server = mockito::Server::new();
    let body = serde_json::json!({
        "content": STANDARD.encode("# Octocat\n"),
        "sha": "abc123",
    });
    let get = server
        .mock("GET", "/repos/octocat/octocat/contents/README.md")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create();
    let put = server
        .mock("PUT", "/repos/octocat/octocat/contents/README.md")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "sha": "abc123",
            "content": STANDARD.encode(format!("{ONLINE_BADGE}\n\n# Octocat\n")),
        })))
        .with_status(200)
        .with_body("{}")
        .create();

    badge(&dir)
        .env("GITHUB_TOKEN", "secret")
        .env("GITHUB_REPOSITORY", "octocat/octocat")
        .env("GITHUB_ACTOR", "octocat")
        .args(["sync", "--presence", &presence, "--api-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat/octocat:README.md: added badge"));

    get.assert();
    put.assert();
}

#[test]
fn sync_dry_run_does_not_commit() {
    let dir = TempDir::new().unwrap();
    let presence = write_presence(&dir, r#"{"status":"online"}"#);

    let mut server = mockito::Server::new();
    let body = serde_json::json!({
        "content": STANDARD.encode("# Octocat\n"),
        "sha": "abc123",
    });
    let _get = server
        .mock("GET", "/repos/octocat/octocat/contents/README.md")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create();
    let put = server
        .mock("PUT", "/repos/octocat/octocat/contents/README.md")
        .expect(0)
        .create();

    badge(&dir)
        .args([
            "sync",
            "--presence",
            &presence,
            "--actor",
            "octocat",
            "--repo",
            "octocat/octocat",
            "--token",
            "secret",
            "--api-url",
            &server.url(),
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));

    put.assert();
}
