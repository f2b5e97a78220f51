use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to fixture file
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Home directory with an optional ~/.config/intake-assist/config.toml
fn home_with_config(contents: Option<&str>) -> TempDir {
    let home = TempDir::new().unwrap();
    if let Some(contents) = contents {
        let dir = home.path().join(".config").join("intake-assist");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), contents).unwrap();
    }
    home
}

#[test]
fn test_cli_help_flag() {
    cargo_bin_cmd!()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("situation section"));
}

#[test]
fn test_cli_version_flag() {
    cargo_bin_cmd!()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("intake-assist"));
}

#[test]
fn test_cli_apply_conflicts_with_json() {
    cargo_bin_cmd!()
        .args(["--apply", "--json"])
        .arg(fixture_path("application.json"))
        .assert()
        .failure();
}

#[test]
fn test_cli_without_api_key_is_not_configured() {
    let home = home_with_config(None);

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env_remove("OPENAI_API_KEY")
        .arg(fixture_path("application.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"))
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_cli_blank_env_key_does_not_configure() {
    let home = home_with_config(None);

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env("OPENAI_API_KEY", "   ")
        .arg(fixture_path("application.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_cli_with_invalid_json_file() {
    let home = home_with_config(None);

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg(fixture_path("invalid.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid application data"));
}

#[test]
fn test_cli_with_invalid_json_on_stdin() {
    let home = home_with_config(None);

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env("OPENAI_API_KEY", "sk-test")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid application data"));
}

#[test]
fn test_cli_with_nonexistent_file() {
    let home = home_with_config(None);

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_cli_invalid_config_warns_and_falls_back() {
    let home = home_with_config(Some("[assist\napi_key = \"k\""));

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env_remove("OPENAI_API_KEY")
        .arg(fixture_path("application.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Warning: Invalid config"))
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_cli_unreachable_endpoint_reports_network_error() {
    // Port 1 refuses connections; a single attempt keeps the test fast
    let home = home_with_config(Some(
        "[assist]\napi_key = \"sk-file\"\nendpoint = \"http://127.0.0.1:1/v1/chat/completions\"\nmax_attempts = 1\ntimeout_ms = 2000\n",
    ));

    cargo_bin_cmd!()
        .env("HOME", home.path())
        .env_remove("OPENAI_API_KEY")
        .arg(fixture_path("application.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please"));
}
