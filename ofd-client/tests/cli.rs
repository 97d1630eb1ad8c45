use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

// на порту 1 никто не слушает => соединение отклоняется сразу
const DEAD_BASE_URL: &str = "http://127.0.0.1:1";

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    let text = format!(
        r#"{{
            "auth": ["user", "secret"],
            "kkt": {{"INN": "7700000000", "FNumber": "1", "KKTNumber": "2", "KKTRegNumber": "3"}},
            "base_url": "{DEAD_BASE_URL}",
            "timeout_secs": 5
        }}"#
    );
    fs::write(&path, text).unwrap();
    path
}

fn ofd_client() -> Command {
    Command::cargo_bin("ofd-client").unwrap()
}

#[test]
fn help_lists_commands() {
    ofd_client()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("receipts-short")
                .and(predicate::str::contains("z-reports"))
                .and(predicate::str::contains("totals")),
        );
}

#[test]
fn missing_config_fails() {
    let dir = tempfile::tempdir().unwrap();

    ofd_client()
        .current_dir(dir.path())
        .arg("kkts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn broken_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.json");
    fs::write(&cfg, "{\"auth\": ").unwrap();

    ofd_client()
        .arg("--config")
        .arg(&cfg)
        .arg("kkts")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn from_without_to_is_usage_error() {
    ofd_client()
        .args(["receipts", "--from", "2021-02-01T00:00:01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[test]
fn unreachable_auth_server_fails_without_cache_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path());
    let token_file = dir.path().join("authtoken.json");

    ofd_client()
        .arg("--config")
        .arg(&cfg)
        .arg("--token-file")
        .arg(&token_file)
        .arg("token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to obtain auth token"));

    assert!(!token_file.exists());
}

#[test]
fn cached_token_is_used_and_unreachable_api_prints_null() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path());
    let token_file = dir.path().join("authtoken.json");
    fs::write(
        &token_file,
        r#"{"AuthToken": "CACHED", "ExpirationDateUtc": "2999-01-01T00:00:00"}"#,
    )
    .unwrap();

    ofd_client()
        .arg("--config")
        .arg(&cfg)
        .arg("--token-file")
        .arg(&token_file)
        .arg("token")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"HasToken\": true"));

    ofd_client()
        .arg("--config")
        .arg(&cfg)
        .arg("--token-file")
        .arg(&token_file)
        .args(["kkts"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));

    // файл перезаписан в каноническом виде: ключи по порядку, отступ 2
    let saved = fs::read_to_string(&token_file).unwrap();
    assert_eq!(
        saved,
        "{\n  \"AuthToken\": \"CACHED\",\n  \"ExpirationDateUtc\": \"2999-01-01T00:00:00\"\n}"
    );
}
