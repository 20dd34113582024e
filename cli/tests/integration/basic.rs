//! Basic functionality integration tests for the bcp CLI.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_basic_file_copy() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "hello world").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 copied, 0 failed, 0 cancelled"));

    assert_eq!(
        fs::read_to_string(dst.path().join("test.txt")).unwrap(),
        "hello world"
    );
}

#[test]
fn test_directory_tree_copy() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::create_dir_all(src.path().join("subdir/nested")).unwrap();
    fs::write(src.path().join("file1.txt"), "content1").unwrap();
    fs::write(src.path().join("subdir/file2.txt"), "content2").unwrap();
    fs::write(src.path().join("subdir/nested/file3.txt"), "content3").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg(src.path())
        .arg(dst.path().join("copied"))
        .assert()
        .success()
        .stdout(predicate::str::contains("3 copied"));

    assert_eq!(
        fs::read_to_string(dst.path().join("copied/file1.txt")).unwrap(),
        "content1"
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("copied/subdir/file2.txt")).unwrap(),
        "content2"
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("copied/subdir/nested/file3.txt")).unwrap(),
        "content3"
    );
}

#[test]
fn test_overwrite_existing_longer_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "new").unwrap();
    fs::write(
        dst.path().join("test.txt"),
        "old content, much longer than the replacement",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success();

    // No leftover trailing bytes from the old content
    assert_eq!(
        fs::read_to_string(dst.path().join("test.txt")).unwrap(),
        "new"
    );
}

#[test]
fn test_zero_byte_file() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("empty"), "").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg(src.path().join("empty"))
        .arg(dst.path().join("empty"))
        .assert()
        .success();

    assert_eq!(fs::metadata(dst.path().join("empty")).unwrap().len(), 0);
}

#[test]
fn test_jobs_and_buffer_size_flags() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    for i in 0..20 {
        fs::write(src.path().join(format!("f{i}.bin")), vec![i as u8; 3000]).unwrap();
    }

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("-j")
        .arg("4")
        .arg("--buffer-size")
        .arg("1024")
        .arg(src.path())
        .arg(dst.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::contains("20 copied"));

    for i in 0..20 {
        assert_eq!(
            fs::read(dst.path().join(format!("out/f{i}.bin"))).unwrap(),
            vec![i as u8; 3000]
        );
    }
}

#[test]
fn test_quiet_mode() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "content").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("--quiet")
        .arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success();
    // --quiet only disables the progress bar, not the summary

    assert!(dst.path().join("test.txt").exists());
}

#[test]
fn test_verbose_mode_prints_transitions() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();

    fs::write(src.path().join("test.txt"), "content").unwrap();

    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("--verbose")
        .arg(src.path().join("test.txt"))
        .arg(dst.path().join("test.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("[init]"))
        .stdout(predicate::str::contains("[success]"));
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bcp"))
        .stdout(predicate::str::contains("parallel"));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo_bin_cmd!("bcp");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bcp"));
}
