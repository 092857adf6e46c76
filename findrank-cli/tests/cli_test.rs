use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn create_test_files(dir: &TempDir, files: &[(&str, &str)]) -> Result<()> {
    for (name, content) in files {
        let file_path = dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(file_path, content)?;
    }
    Ok(())
}

fn findrank(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("findrank-cli")?;
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    Ok(cmd)
}

#[test]
fn test_find_groups_matches_by_file() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("file1.txt", "Hello world\nTODO: Fix this\nGoodbye\n"),
            ("file2.txt", "Another TODO here\nSome text\n"),
        ],
    )?;

    findrank(&dir)?
        .args(["find", "TODO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file1.txt"))
        .stdout(predicate::str::contains("2:1: TODO: Fix this"))
        .stdout(predicate::str::contains("1:9: Another TODO here"))
        .stdout(predicate::str::contains("Found 2 matches in 2 files"));
    Ok(())
}

#[test]
fn test_find_with_globs_and_stats() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("src/a.ts", "x"),
            ("src/a.test.ts", "x"),
            ("src/a.js", "x"),
        ],
    )?;

    findrank(&dir)?
        .args(["find", "x", "-i", "*.ts", "-x", "*.test.ts", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"))
        .stdout(predicate::str::contains("Searched 1 files, skipped 2"))
        .stdout(predicate::str::contains("Files: src/a.ts\n"));
    Ok(())
}

#[test]
fn test_find_invalid_regex_fails() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "(")])?;

    findrank(&dir)?
        .args(["find", "(", "--regex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern '('"));
    Ok(())
}

#[test]
fn test_find_json_output() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "foobar foo baz\n")])?;

    let output = findrank(&dir)?
        .args(["find", "foo", "-w", "--json"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let matches = json["matches"].as_array().expect("matches array");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["match_start"], 7);
    assert_eq!(matches[0]["file"], "a.txt");
    Ok(())
}

#[test]
fn test_open_ranks_files() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("src/open.rs", ""),
            ("src/other.rs", ""),
            ("docs/quickopen.md", ""),
        ],
    )?;

    let output = findrank(&dir)?.args(["open", "qopn"]).output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["docs/quickopen.md"]);

    findrank(&dir)?
        .args(["open", "", "--recent", "src/other.rs"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("src/other.rs\n"));
    Ok(())
}

#[test]
fn test_replace_dry_run_leaves_files() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "old value\nkeep\nold again\n")])?;

    findrank(&dir)?
        .args(["replace", "old", "new", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-old value"))
        .stdout(predicate::str::contains("+new value"))
        .stdout(predicate::str::contains("Dry run - no changes will be made"))
        .stdout(predicate::str::contains("Would replace 2 matches in 1 files"));

    assert_eq!(
        fs::read_to_string(dir.path().join("a.txt"))?,
        "old value\nkeep\nold again\n"
    );
    Ok(())
}

#[test]
fn test_replace_writes_files_and_research_is_empty() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("a.rs", "fn alpha() {}\nfn beta() {}\n"),
            ("b.rs", "fn gamma() {}\n"),
        ],
    )?;

    findrank(&dir)?
        .args(["replace", r"fn (\w+)\(\)", "fn new_$1()", "--regex"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replaced 3 matches in 2 files"));

    assert_eq!(
        fs::read_to_string(dir.path().join("a.rs"))?,
        "fn new_alpha() {}\nfn new_beta() {}\n"
    );

    findrank(&dir)?
        .args(["find", "fn alpha", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 matches in 0 files"));
    Ok(())
}

#[test]
fn test_replace_single_file() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "x\n"), ("b.txt", "x\n")])?;

    findrank(&dir)?
        .args(["replace", "x", "y", "--file", "b.txt"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("a.txt"))?, "x\n");
    assert_eq!(fs::read_to_string(dir.path().join("b.txt"))?, "y\n");
    Ok(())
}

#[test]
fn test_replace_bad_capture_reference_fails() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.txt", "v12\n")])?;

    findrank(&dir)?
        .args(["replace", r"(\d+)", "$2", "-r"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid replacement"));
    assert_eq!(fs::read_to_string(dir.path().join("a.txt"))?, "v12\n");
    Ok(())
}

#[test]
fn test_local_config_supplies_defaults() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            (".findrank.yaml", "case_sensitive: true\n"),
            ("a.txt", "Foo foo\n"),
        ],
    )?;

    findrank(&dir)?
        .args(["find", "foo", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 matches in 1 files"));
    Ok(())
}
