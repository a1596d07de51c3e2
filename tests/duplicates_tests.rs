//! Integration tests for check, scan and compare

mod support;

use predicates::prelude::*;
use support::{apidup, stdout_json, write_catalog};
use tempfile::tempdir;

#[test]
fn test_check_finds_twin() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--format", "json", "check", "users-get"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output);
    assert_eq!(report["status"], "duplicates_found");
    assert_eq!(report["api"]["id"], "users-get");
    assert_eq!(report["summary"]["total_duplicates"], 1);
    assert_eq!(report["summary"]["critical_duplicates"], 1);
    assert_eq!(report["summary"]["estimated_savings"], 5000);
    assert_eq!(report["summary"]["consolidation_priority"], "Medium");

    let duplicate = &report["duplicates"][0];
    assert_eq!(duplicate["api"]["id"], "users-fetch");
    assert_eq!(duplicate["similarity"]["overall"], 100.0);
    assert_eq!(duplicate["similarity"]["path"], 100.0);
    assert_eq!(duplicate["severity"], "CRITICAL");
    assert!(duplicate["recommendation"]
        .as_str()
        .unwrap()
        .starts_with("CRITICAL: "));
}

#[test]
fn test_check_clean_report() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["check", "invoices-delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[invoices-delete] DELETE"))
        .stdout(predicate::str::contains("No significant duplicates detected"));
}

#[test]
fn test_check_zero_threshold_lists_everything_else() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--format", "json", "check", "orders-list", "--threshold", "0"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output);
    let duplicates = report["duplicates"].as_array().unwrap();
    assert_eq!(duplicates.len(), 3);
    assert!(duplicates.iter().all(|d| d["api"]["id"] != "orders-list"));
    assert_eq!(report["summary"]["consolidation_priority"], "High");

    let scores: Vec<f64> = duplicates
        .iter()
        .map(|d| d["similarity"]["overall"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_check_human_verbose_shows_breakdown() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["check", "users-fetch", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 duplicate(s), 1 critical"))
        .stdout(predicate::str::contains("CRITICAL [users-get]"))
        .stdout(predicate::str::contains("path 100.00"));
}

#[test]
fn test_config_file_sets_savings() {
    let dir = tempdir().unwrap();
    write_catalog(dir.path());
    std::fs::write(
        dir.path().join("apidup.toml"),
        "[duplicates]\nsavings_per_duplicate = 1200\n",
    )
    .unwrap();

    let output = apidup()
        .current_dir(dir.path())
        .args(["--catalog", "apis.json", "--format", "json", "check", "users-get"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["summary"]["estimated_savings"], 1200);
}

#[test]
fn test_explicit_config_path() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());
    let config = dir.path().join("strict.toml");
    std::fs::write(&config, "[duplicates]\nthreshold = 0.0\n").unwrap();

    let output = apidup()
        .arg("--catalog")
        .arg(&catalog)
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "check", "users-get"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["summary"]["total_duplicates"], 3);
}

#[test]
fn test_scan_reports_every_api() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--format", "json", "scan"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports = stdout_json(&output);
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 4);

    let statuses: Vec<&str> = reports
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec!["duplicates_found", "duplicates_found", "clean", "clean"]
    );
    assert_eq!(reports[2]["message"], "No significant duplicates detected");
}

#[test]
fn test_scan_only_duplicates_human() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["scan", "--only-duplicates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[users-get] GET /api/v1/users/{id}"))
        .stdout(predicate::str::contains("[orders-list]").not())
        .stdout(predicate::str::contains(
            "Scanned 4 API(s): 2 with duplicates",
        ));
}

#[test]
fn test_compare_pair() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let output = apidup()
        .arg("--catalog")
        .arg(&catalog)
        .args(["--format", "json", "compare", "users-get", "orders-list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let comparison = stdout_json(&output);
    assert_eq!(comparison["first"]["id"], "users-get");
    assert_eq!(comparison["second"]["id"], "orders-list");
    assert_eq!(comparison["similarity"]["path"], 0.0);
    // Same method only: 0.3 structural
    assert_eq!(comparison["similarity"]["structural"], 30.0);
    assert_eq!(comparison["similarity"]["behavioral"], 0.0);
    assert_eq!(comparison["severity"], "INFO");
}

#[test]
fn test_compare_is_symmetric() {
    let dir = tempdir().unwrap();
    let catalog = write_catalog(dir.path());

    let run = |a: &str, b: &str| {
        let output = apidup()
            .arg("--catalog")
            .arg(&catalog)
            .args(["--format", "json", "compare", a, b])
            .output()
            .unwrap();
        stdout_json(&output)["similarity"].clone()
    };

    assert_eq!(
        run("users-get", "invoices-delete"),
        run("invoices-delete", "users-get")
    );
}

#[test]
fn test_yaml_catalog() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("apis.yaml"),
        "apis:\n  - id: a\n    path: /items/{id}\n    method: get\n  - id: b\n    path: /items/{itemId}\n    method: GET\n",
    )
    .unwrap();

    apidup()
        .current_dir(dir.path())
        .args(["--catalog", "apis.yaml", "compare", "a", "b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path 100.00"));
}
