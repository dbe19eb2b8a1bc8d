#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for the sar CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn sar() -> Command {
    Command::cargo_bin("sar").unwrap()
}

#[test]
fn test_help_command() {
    sar()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("content-addressed archives"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_version_command() {
    sar()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sar"));
}

#[test]
fn test_missing_command_prints_usage() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("pack.sar");

    sar()
        .arg(&archive)
        .assert()
        .success()
        .stderr(predicate::str::contains("No command given"))
        .stderr(predicate::str::contains("Usage"));
    assert!(!archive.exists());
}

#[test]
fn test_unknown_command_prints_usage() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("pack.sar");

    sar()
        .arg(&archive)
        .arg("frobnicate")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage"));
    assert!(!archive.exists());
}

#[test]
fn test_create_list_extract() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("a.txt"), b"hello").unwrap();
    fs::write(src.join("b.bin"), [0u8, 1, 2, 3]).unwrap();
    let archive = temp.path().join("pack.sar");

    sar()
        .arg(&archive)
        .args(["c", "--description", "two files"])
        .arg(&src)
        .assert()
        .success();
    assert!(archive.exists());

    sar()
        .arg(&archive)
        .arg("p")
        .assert()
        .success()
        .stdout(predicate::str::contains("Description: two files"))
        .stdout(predicate::str::contains("Entries:     2"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("b.bin"));

    let out = temp.path().join("out");
    sar()
        .arg(&archive)
        .arg("x")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(out.join("b.bin")).unwrap(), vec![0u8, 1, 2, 3]);
}

#[test]
fn test_add_extends_existing_archive() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first.txt");
    let second = temp.path().join("second.txt");
    fs::write(&first, b"one").unwrap();
    fs::write(&second, b"two").unwrap();
    let archive = temp.path().join("pack.sar");

    sar().arg(&archive).arg("create").arg(&first).assert().success();
    sar().arg(&archive).arg("add").arg(&second).assert().success();

    sar()
        .arg(&archive)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:     2"))
        .stdout(predicate::str::contains("first.txt"))
        .stdout(predicate::str::contains("second.txt"));
}

#[test]
fn test_extract_missing_archive_fails() {
    let temp = TempDir::new().unwrap();

    sar()
        .arg(temp.path().join("absent.sar"))
        .args(["extract"])
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open archive"));
}

#[test]
fn test_strict_from_environment() {
    let temp = TempDir::new().unwrap();
    let long = temp.path().join("n".repeat(64));
    fs::write(&long, b"x").unwrap();
    let archive = temp.path().join("pack.sar");

    sar()
        .env("SAR_STRICT", "true")
        .arg(&archive)
        .arg("c")
        .arg(&long)
        .assert()
        .failure();
    assert!(!archive.exists());

    sar().arg(&archive).arg("c").arg(&long).assert().success();
    assert!(archive.exists());
}

#[test]
fn test_config_file_sets_description() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("sar.json");
    fs::write(&config, r#"{"compression_level": 9, "description": "from config"}"#).unwrap();
    let input = temp.path().join("file.txt");
    fs::write(&input, b"data").unwrap();
    let archive = temp.path().join("pack.sar");

    sar()
        .arg("--config")
        .arg(&config)
        .arg(&archive)
        .arg("c")
        .arg(&input)
        .assert()
        .success();

    sar()
        .arg(&archive)
        .arg("p")
        .assert()
        .success()
        .stdout(predicate::str::contains("Description: from config"));
}
