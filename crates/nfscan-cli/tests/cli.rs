use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn nfscan() -> Command {
    Command::cargo_bin("nfscan").unwrap()
}

#[test]
fn stage_pattern_renders_draft() {
    let payload = json!({
        "file_name": "inv1.png",
        "bucket_name": "notas",
        "important_data": "SUPERMERCADO BOM PRECO LTDA\nExtrato No. 004521\nTOTAL R$ : 34,40\nPix 34,40"
    });

    let output = nfscan()
        .args(["stage", "pattern"])
        .write_stdin(payload.to_string())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let emitted: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(emitted["file_name"], "inv1.png");
    assert_eq!(emitted["bucket_name"], "notas");

    let draft = emitted["important_data"].as_str().unwrap();
    assert!(draft.contains("Issuer Name: SUPERMERCADO BOM PRECO LTDA"));
    assert!(draft.contains("Invoice Number: 004521"));
    assert!(draft.contains("Total Value: 34,40"));
    assert!(draft.contains("Issue Date: <none>"));
    assert!(draft.contains("Payment Method: cash_or_pix"));
}

#[test]
fn stage_pattern_requires_important_data() {
    nfscan()
        .args(["stage", "pattern"])
        .write_stdin(r#"{"file_name": "inv1.png", "bucket_name": "notas"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("important_data"));
}

#[test]
fn stage_rejects_missing_identity() {
    nfscan()
        .args(["stage", "pattern"])
        .write_stdin(r#"{"bucket_name": "notas", "important_data": "x"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file_name"));
}

#[test]
fn stage_route_moves_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notas")).unwrap();
    fs::write(dir.path().join("notas/inv1.png"), b"png").unwrap();

    let payload_path = dir.path().join("payload.json");
    let payload = json!({
        "file_name": "inv1.png",
        "bucket_name": "notas",
        "result_json": {
            "issuer_name": null,
            "issuer_tax_id": null,
            "issuer_address": null,
            "consumer_tax_id": null,
            "issue_date": "15/01/2024",
            "invoice_number": "004521",
            "invoice_series": null,
            "total_value": "34.40",
            "payment_method": "cash_or_pix"
        }
    });
    fs::write(&payload_path, payload.to_string()).unwrap();

    nfscan()
        .arg("--root")
        .arg(dir.path())
        .args(["stage", "route", "--input"])
        .arg(&payload_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"destination_key\": \"cash/inv1.png\""));

    assert!(!dir.path().join("notas/inv1.png").exists());
    assert!(dir.path().join("notas/cash/inv1.png").exists());
}

#[test]
fn stage_route_dry_run_leaves_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notas")).unwrap();
    fs::write(dir.path().join("notas/inv1.png"), b"png").unwrap();

    let payload = json!({
        "file_name": "inv1.png",
        "bucket_name": "notas",
        "result_json": { "payment_method": null }
    });

    nfscan()
        .arg("--root")
        .arg(dir.path())
        .args(["stage", "route", "--dry-run"])
        .write_stdin(payload.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("other/inv1.png"));

    assert!(dir.path().join("notas/inv1.png").exists());
}

#[test]
fn stage_route_rejects_invalid_record() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("notas")).unwrap();
    fs::write(dir.path().join("notas/inv1.png"), b"png").unwrap();

    let payload = json!({
        "file_name": "inv1.png",
        "bucket_name": "notas",
        "result_json": { "invoice_number": "12", "total_value": "abc", "payment_method": "other" }
    });

    nfscan()
        .arg("--root")
        .arg(dir.path())
        .args(["stage", "route"])
        .write_stdin(payload.to_string())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invoice_number"));

    assert!(dir.path().join("notas/inv1.png").exists());
    assert!(!dir.path().join("notas/other/inv1.png").exists());
}

#[test]
fn process_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    nfscan()
        .arg("--root")
        .arg(dir.path())
        .args(["process", "notas", "inv1.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn config_path_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    nfscan()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"))
        .stdout(predicate::str::contains("not created"));
}
