#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, contents: impl AsRef<[u8]>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn reward(skill: &str, xps: &[u64]) -> String {
    let samples: Vec<Value> = xps
        .iter()
        .enumerate()
        .map(|(i, xp)| {
            json!({
                "timestamp": format!("2026-03-01T10:{:02}:00Z", i),
                "elapsedMs": i as u64 * 60_000,
                "skills": {skill: {"level": 5, "xp": xp}},
                "totalLevel": 32
            })
        })
        .collect();
    json!({"tracking": {"botName": "b", "startTime": "2026-03-01T10:00:00Z", "samples": samples}})
        .to_string()
}

fn skillbench(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("skillbench").unwrap();
    cmd.current_dir(cwd)
        .env_remove("SKILLBENCH_CONFIG")
        .env_remove("SKILLBENCH_HORIZON")
        .env_remove("SKILLBENCH_JOBS_ROOT")
        .env_remove("SKILLBENCH_OUT");
    cmd
}

#[test]
fn extract_writes_data_json_and_matching_script() {
    let tmp = tempdir().unwrap();
    write(
        &tmp.path().join("jobs/kimi-fishing-xp-10m/fishing-xp-10m__a/verifier/reward.json"),
        reward("fishing", &[0, 120, 260]),
    );
    write(
        &tmp.path().join("jobs/qwen3-fishing-xp-10m/fishing-xp-10m__b/verifier/reward.json"),
        reward("fishing", &[0, 90]),
    );

    skillbench(tmp.path())
        .args(["extract", "--out", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kimi-k2.5"))
        .stdout(predicate::str::contains("fishing"));

    let json_text = fs::read_to_string(tmp.path().join("site/data.json")).unwrap();
    let js_text = fs::read_to_string(tmp.path().join("site/data.js")).unwrap();
    assert_eq!(js_text, format!("window.BENCHMARK_DATA = {json_text};\n"));

    let data: Value = serde_json::from_str(&json_text).unwrap();
    assert_eq!(data["kimi-k2.5"]["fishing"]["finalScore"], json!(260.0));
    assert_eq!(data["qwen3-coder-next"]["fishing"]["samples"].as_array().unwrap().len(), 2);
}

#[test]
fn filter_with_no_matching_jobs_exits_one() {
    let tmp = tempdir().unwrap();
    write(
        &tmp.path().join("jobs/kimi-fishing-xp-10m/t/verifier/reward.json"),
        reward("fishing", &[0, 1]),
    );

    skillbench(tmp.path())
        .args(["extract", "--filter", "gemini", "--out", "site"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("gemini"));
    assert!(!tmp.path().join("site").exists());
}

#[test]
fn zero_records_exits_one_without_output() {
    let tmp = tempdir().unwrap();
    write(
        &tmp.path().join("jobs/kimi-fishing-xp-10m/t/verifier/test-stdout.txt"),
        "verifier crashed before printing a reward\n",
    );

    skillbench(tmp.path())
        .args(["extract", "--out", "site"])
        .assert()
        .code(1);
    assert!(!tmp.path().join("site/data.json").exists());
    assert!(!tmp.path().join("site/data.js").exists());
}

#[test]
fn missing_jobs_root_is_a_config_error() {
    let tmp = tempdir().unwrap();
    skillbench(tmp.path())
        .args(["extract", "--jobs-root", "nowhere"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let tmp = tempdir().unwrap();
    write(&tmp.path().join("skillbench.yaml"), "jobs_root: [unterminated\n");
    skillbench(tmp.path()).args(["extract"]).assert().code(2);
}

#[test]
fn config_file_model_rules_take_precedence() {
    let tmp = tempdir().unwrap();
    write(
        &tmp.path().join("bench.yaml"),
        "script_var: RESULTS\nmodel_rules:\n  - patterns: [kimi]\n    model: kimi-k3-preview\n",
    );
    write(
        &tmp.path().join("runs/kimi-mining-xp-10m/t/verifier/reward.json"),
        reward("mining", &[0, 40]),
    );

    skillbench(tmp.path())
        .args(["extract", "--config", "bench.yaml", "--jobs-root", "runs"])
        .assert()
        .success();

    let js_text = fs::read_to_string(tmp.path().join("results/data.js")).unwrap();
    assert!(js_text.starts_with("window.RESULTS = "));
    assert!(js_text.contains("kimi-k3-preview"));
}

#[test]
fn inspect_reports_winning_source_as_json() {
    let tmp = tempdir().unwrap();
    let trial = tmp.path().join("jobs/sonnet-cooking-xp-10m/cooking-xp-10m__z");
    write(
        &trial.join("verifier/tracking.json"),
        json!({"samples": [{"elapsedMs": 0, "skills": {"cooking": {"level": 1, "xp": 0}}, "totalLevel": 32},
                           {"elapsedMs": 60000, "skills": {"cooking": {"level": 3, "xp": 180}}, "totalLevel": 34}]})
            .to_string(),
    );

    let out = skillbench(tmp.path())
        .args(["inspect", "--format", "json"])
        .arg(&trial)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["source"], json!("tracking_file"));
    assert_eq!(report["model"], json!("claude-sonnet-4.5"));
    assert_eq!(report["variant"], json!("cooking"));
    assert_eq!(report["samples"], json!(2));
    assert_eq!(report["finalScore"], json!(180.0));
}

#[test]
fn inspect_without_any_source_exits_one() {
    let tmp = tempdir().unwrap();
    let trial = tmp.path().join("jobs/sonnet-cooking-xp-10m/t");
    fs::create_dir_all(trial.join("verifier")).unwrap();

    skillbench(tmp.path())
        .arg("inspect")
        .arg(&trial)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("source:     -"));
}
