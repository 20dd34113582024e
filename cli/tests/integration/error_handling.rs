//! Error handling integration tests for the bcp CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_source_not_found() {
    let dst = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("/nonexistent/path/file.txt")
        .arg(dst.path().join("file.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source does not exist"));
}

#[test]
fn test_unwritable_destination_reports_item_failure() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a.txt"), "payload").unwrap();
    // Destination path routes through a regular file
    fs::write(dst.path().join("blocker"), "i am a file").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg(src.path().join("a.txt"))
        .arg(dst.path().join("blocker/a.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed or were cancelled"))
        .stderr(predicate::str::contains("error copying"));
}

#[test]
fn test_one_bad_file_cancels_remaining_queue() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    // The bad file sorts first, so with a single worker everything queued
    // behind it is cancelled.
    fs::write(src.path().join("0_bad.txt"), "payload").unwrap();
    for i in 1..5 {
        fs::write(src.path().join(format!("{i}_ok.txt")), "fine").unwrap();
    }
    let out = dst.path().join("out");
    fs::create_dir_all(&out).unwrap();
    // Pre-create a blocking directory where the bad file's destination goes
    fs::create_dir_all(out.join("0_bad.txt/block")).unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("-j")
        .arg("1")
        .arg(src.path())
        .arg(&out)
        .assert()
        .failure()
        .stdout(predicate::str::contains("0 copied, 1 failed, 4 cancelled"))
        .stderr(predicate::str::contains("5 of 5 items failed or were cancelled"));
}

#[test]
fn test_partial_success_still_fails_overall() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("a_good.txt"), "fine").unwrap();
    fs::write(src.path().join("z_bad.txt"), "payload").unwrap();
    let out = dst.path().join("out");
    fs::create_dir_all(out.join("z_bad.txt/block")).unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("-j")
        .arg("1")
        .arg(src.path())
        .arg(&out)
        .assert()
        .failure()
        .stdout(predicate::str::contains("1 copied, 1 failed, 0 cancelled"));

    // The good file was copied even though the run failed overall
    assert_eq!(
        fs::read_to_string(out.join("a_good.txt")).unwrap(),
        "fine"
    );
}
