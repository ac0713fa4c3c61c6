use std::path::Path;

use assert_cmd::Command;
use critique_test::{MockUpstream, Reply, TEST_API_KEY};
use predicates::prelude::*;

fn critique(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("critique").unwrap();
    cmd.env_remove("OPENROUTER_API_KEY")
        .env_remove("CRITIQUE_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

#[test]
fn models_lists_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::str::contains("openai/gpt-4o-mini"))
        .stdout(predicate::str::contains("(default)"))
        .stdout(predicate::str::contains("Anthropic"));
}

#[test]
fn estimate_file() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("snippet.py");
    std::fs::write(&file, "a".repeat(40)).unwrap();

    critique(&tmp.path().join("data"))
        .arg("estimate")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("~510 input + up to 255 output tokens"));
}

#[test]
fn usage_on_fresh_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total cost:    $0.0000"));
}

#[test]
fn history_empty_then_clear() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No analysis history yet."));

    critique(tmp.path())
        .args(["history", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared."));
    assert!(tmp.path().join("history.json").exists());
}

#[test]
fn history_show_prints_full_result() {
    let tmp = tempfile::tempdir().unwrap();
    let history = serde_json::json!({
        "history": [{
            "timestamp": "2026-01-02 03:04:05",
            "code_preview": "def f(): pass",
            "language": "python",
            "mode": "Security Audit",
            "result": "## 🔒 Security Audit Report\nAll clear.",
            "tokens": {"input": 12, "output": 34},
            "cost": 0.0001,
            "model": "openai/gpt-4o-mini"
        }]
    });
    std::fs::write(tmp.path().join("history.json"), history.to_string()).unwrap();

    critique(tmp.path())
        .args(["history", "--show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Security Audit | python"))
        .stdout(predicate::str::contains("All clear."));

    critique(tmp.path())
        .args(["history", "--show", "2"])
        .assert()
        .code(1);
}

#[test]
fn results_empty() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached results."));
}

#[test]
fn unknown_mode_is_validation_error() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("main.py");
    std::fs::write(&file, "print('hello world')").unwrap();

    critique(tmp.path())
        .args(["analyze", "--mode", "poetry"])
        .arg(&file)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown review mode"));
}

#[test]
fn short_code_is_validation_error() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("tiny.py");
    std::fs::write(&file, "x=1").unwrap();

    critique(tmp.path())
        .arg("analyze")
        .arg(&file)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn malformed_api_key_is_rejected_before_sending() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("main.py");
    std::fs::write(&file, "print('hello world')").unwrap();

    critique(tmp.path())
        .args(["analyze", "--yes", "--api-key", "sk-wrong"])
        .arg(&file)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("should start with 'sk-or-'"));

    // The snippet was still remembered for the next run.
    let settings = std::fs::read_to_string(tmp.path().join("settings.json")).unwrap();
    assert!(settings.contains("print('hello world')"));
}

#[test]
fn invalid_config_exits_with_config_code() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[llm]\nmax_tokens = 50\n").unwrap();

    critique(tmp.path())
        .arg("usage")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_tokens"));
}

#[test]
fn missing_project_dir_is_general_error() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .args(["project", "--yes"])
        .arg(tmp.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Project directory not found"));
}

#[test]
fn modes_lists_every_review_mode() {
    let tmp = tempfile::tempdir().unwrap();
    critique(tmp.path())
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("security-review"))
        .stdout(predicate::str::contains("OWASP Top 10"))
        .stdout(predicate::str::contains("project-review"));
}

#[test]
fn analyze_records_successful_review() {
    // The mock server runs on the runtime's worker threads while the binary blocks.
    let rt = tokio::runtime::Runtime::new().unwrap();
    let upstream = rt.block_on(MockUpstream::start(Reply::completion(
        "## 🔒 Security Audit Report\nNo findings.",
        1200,
        300,
    )));

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("config.toml"),
        format!("[llm]\nbase_url = \"{}\"\n", upstream.base_url()),
    )
    .unwrap();
    let file = tmp.path().join("main.py");
    std::fs::write(&file, "print('hello world')").unwrap();

    critique(tmp.path())
        .args(["analyze", "--yes", "--mode", "security-review", "--api-key", TEST_API_KEY])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No findings."))
        .stderr(predicate::str::contains("Estimated: ~505 input"))
        .stderr(predicate::str::contains("1200 tokens in, 300 out | $0.0004"));

    assert_eq!(upstream.requests().len(), 1);
    let history: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("history.json")).unwrap())
            .unwrap();
    assert_eq!(history["history"][0]["mode"], "Security Audit");
    let results = std::fs::read_to_string(tmp.path().join("results.json")).unwrap();
    assert!(results.contains("SECURITY_REVIEW"));

    critique(tmp.path())
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total cost:    $0.0004"));
}
