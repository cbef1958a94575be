//! Integration tests for the `hostlink` binary.
//!
//! Everything runs against a temporary HOME and database; provider calls
//! go to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `hostlink` with config and data dirs pointed into `home` and every
/// `HOSTLINK_*` override cleared.
fn hostlink_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hostlink");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("HOSTLINK_PROFILE")
        .env_remove("HOSTLINK_API_URL")
        .env_remove("HOSTLINK_TOKEN")
        .env_remove("HOSTLINK_TEAM_ID")
        .env_remove("HOSTLINK_DATABASE")
        .env_remove("HOSTLINK_TIMEOUT")
        .env_remove("HOSTLINK_DEFAULTS__OUTPUT")
        .env_remove("HOSTLINK_DEFAULTS__COLOR")
        .env_remove("RUST_LOG");
    cmd
}

/// Where `hostlink` looks for `config.toml` under the isolated `home`.
fn config_file(home: &Path) -> std::path::PathBuf {
    if cfg!(target_os = "macos") {
        home.join("Library/Application Support/dev.hostlink.hostlink/config.toml")
    } else {
        home.join("config").join("hostlink").join("config.toml")
    }
}

fn write_config(home: &Path, contents: &str) {
    let path = config_file(home);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({e}):\n{}", combined_output(output))
    })
}

/// Run a prepared command off the async runtime so the mock server keeps
/// serving while the binary blocks.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = hostlink_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("attach")
                .and(predicate::str::contains("verify"))
                .and(predicate::str::contains("classify")),
        );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hostlink"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_attach_missing_args_is_usage_error() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["attach", "proj1"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["--profile", "nope", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_classify_subdomain_json() {
    let home = TempDir::new().unwrap();
    let output = hostlink_cmd(home.path())
        .args(["classify", "https://Blog.Example.com/", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value = stdout_json(&output);
    assert_eq!(value["domain"], "blog.example.com");
    assert_eq!(value["classification"]["kind"], "subdomain");
    assert_eq!(value["classification"]["label"], "blog");
    assert_eq!(value["routing"], "CNAME");
}

#[test]
fn test_classify_apex_plain() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["classify", "example.com", "-o", "plain"])
        .assert()
        .success()
        .stdout("apex\n");
}

#[test]
fn test_classify_single_label_is_rejected() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["classify", "localhost"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("localhost"));
}

#[test]
fn test_get_on_empty_database_reports_absence() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("hostlink.db");

    hostlink_cmd(home.path())
        .args(["get", "proj1", "-d"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("No domain attached to project 'proj1'"));

    hostlink_cmd(home.path())
        .args(["get", "proj1", "-o", "json", "-d"])
        .arg(&db)
        .assert()
        .success()
        .stdout("null\n");
}

#[test]
fn test_list_on_empty_database_is_empty_array() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["list", "-o", "json-compact", "-d"])
        .arg(home.path().join("hostlink.db"))
        .assert()
        .success()
        .stdout("[]\n");
}

// ── Config defaults ─────────────────────────────────────────────────

#[test]
fn test_config_default_output_applies_without_flag() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[defaults]\noutput = \"json-compact\"\n");

    hostlink_cmd(home.path())
        .args(["list", "-d"])
        .arg(home.path().join("hostlink.db"))
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_env_default_output_applies_without_flag() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .env("HOSTLINK_DEFAULTS__OUTPUT", "json-compact")
        .args(["list", "-d"])
        .arg(home.path().join("hostlink.db"))
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_output_flag_beats_config_default() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[defaults]\noutput = \"json-compact\"\n");

    hostlink_cmd(home.path())
        .args(["classify", "example.com", "-o", "plain"])
        .assert()
        .success()
        .stdout("apex\n");
}

#[test]
fn test_invalid_config_default_output_is_reported() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[defaults]\noutput = \"xml\"\n");

    hostlink_cmd(home.path())
        .args(["classify", "example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("defaults.output"));
}

#[test]
fn test_attach_without_token_is_auth_error() {
    let home = TempDir::new().unwrap();
    hostlink_cmd(home.path())
        .args(["attach", "proj1", "https://app-x1.vercel.app", "example.com", "-d"])
        .arg(home.path().join("hostlink.db"))
        .assert()
        .code(3);
}

// ── End-to-end against a mock provider ──────────────────────────────

async fn mount_attach_mocks(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v9/projects/app-x1/domains"))
        .and(body_json(json!({ "name": "example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "example.com",
            "verified": true,
            "verification": []
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v6/domains/example.com/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "misconfigured": true,
            "recommendedIPv4": [{ "rank": 1, "value": ["76.76.21.21"] }],
            "recommendedCNAME": [{ "rank": 1, "value": "cname.vercel-dns.com." }],
            "aValues": [],
            "cnames": []
        })))
        .mount(server)
        .await;
}

fn provider_cmd(home: &Path, server: &MockServer, args: &[&str]) -> assert_cmd::Command {
    let mut cmd = hostlink_cmd(home);
    cmd.args(args)
        .args(["--api-url", &server.uri(), "--token", "test-token", "-o", "json", "-d"])
        .arg(home.join("hostlink.db"));
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_attach_then_get_roundtrips_through_database() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    mount_attach_mocks(&server).await;

    let output = run(provider_cmd(
        home.path(),
        &server,
        &["attach", "proj1", "https://app-x1.vercel.app", "example.com"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let attached = stdout_json(&output);
    assert_eq!(attached["projectName"], "app-x1");
    assert_eq!(attached["classification"]["kind"], "apex");
    assert_eq!(
        attached["requiredDns"],
        json!([{ "type": "A", "host": "@", "value": "76.76.21.21", "ttl": 60 }])
    );
    assert_eq!(attached["status"]["ownershipVerified"], true);
    assert_eq!(attached["status"]["fullyVerified"], false);
    assert_eq!(attached["state"], "pending-routing");

    let output = run(provider_cmd(home.path(), &server, &["get", "proj1"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let stored = stdout_json(&output);
    assert_eq!(stored["customDomain"], "example.com");
    assert_eq!(stored["routingVerified"], false);
    assert_eq!(stored["requiredDns"][0]["host"], "@");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_verify_reports_missing_ownership_record() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v9/projects/app-x1/domains"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "example.com",
            "verified": false,
            "verification": [{
                "type": "TXT",
                "domain": "_vercel.example.com",
                "value": "abc123"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/domains/example.com/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "misconfigured": false,
            "recommendedIPv4": [{ "rank": 1, "value": ["76.76.21.21"] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v9/projects/app-x1/domains/example.com/verify"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "missing_txt_record",
                "message": "missing",
                "record": { "name": "_vercel.example.com", "value": "abc123" }
            }
        })))
        .mount(&server)
        .await;

    let output = run(provider_cmd(
        home.path(),
        &server,
        &["attach", "proj1", "https://app-x1.vercel.app", "example.com"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let output = run(provider_cmd(
        home.path(),
        &server,
        &["verify", "proj1", "example.com"],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let verified = stdout_json(&output);
    assert_eq!(verified["outcome"], "missing-ownership-record");
    assert_eq!(
        verified["required"],
        json!({ "type": "TXT", "host": "_vercel.example.com", "value": "abc123", "ttl": 60 })
    );
    assert_eq!(verified["status"]["ownershipVerified"], false);
    assert_eq!(verified["state"], "pending-ownership");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_provider_outage_leaves_database_untouched() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v9/projects/app-x1/domains"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let output = run(provider_cmd(
        home.path(),
        &server,
        &["attach", "proj1", "https://app-x1.vercel.app", "example.com"],
    ))
    .await;
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));

    let output = run(provider_cmd(home.path(), &server, &["list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(stdout_json(&output), json!([]));
}
