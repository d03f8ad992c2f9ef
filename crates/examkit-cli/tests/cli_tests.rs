//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn examkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("examkit").unwrap()
}

const SAMPLE_TEST: &str = r#"[test]
id = "reading-1"
title = "Reading Practice 1"

[[parts]]
id = "gaps"
kind = "gap-fill"
passage = "The sky was [Q1] today."

[[parts.questions]]
id = "q1"
options = [
    { key = "a", text = "blue" },
    { key = "b", text = "loud" },
]
answer = { type = "key", value = "a" }

[[parts]]
id = "order"
kind = "ordering"

[[parts.questions]]
id = "s0"
prompt = "First sentence."
is_example = true

[[parts.questions]]
id = "s1"
prompt = "Second sentence."

[[parts.questions]]
id = "s2"
prompt = "Third sentence."
"#;

const ANSWERS: &str = r#"{
  "q1": { "type": "choice", "value": "a" },
  "order": { "type": "order", "value": ["s0", "s2", "s1"] }
}"#;

fn write_fixture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("reading-1.toml");
    std::fs::write(&path, SAMPLE_TEST).unwrap();
    path
}

#[test]
fn validate_clean_test() {
    let dir = TempDir::new().unwrap();
    let test_path = write_fixture(&dir);

    examkit()
        .arg("validate")
        .arg("--test")
        .arg(&test_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading Practice 1"))
        .stdout(predicate::str::contains("All test definitions valid"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir);

    examkit()
        .arg("validate")
        .arg("--test")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading Practice 1"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"[test]
id = "broken"
title = "Broken"

[[parts]]
id = "gaps"
kind = "gap-fill"
passage = "no tokens here"

[[parts.questions]]
id = "q1"
options = [ { key = "a", text = "A" } ]
answer = { type = "key", value = "a" }
"#,
    )
    .unwrap();

    examkit()
        .arg("validate")
        .arg("--test")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    examkit()
        .arg("validate")
        .arg("--test")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_prints_breakdown() {
    let dir = TempDir::new().unwrap();
    let test_path = write_fixture(&dir);
    let answers_path = dir.path().join("answers.json");
    std::fs::write(&answers_path, ANSWERS).unwrap();

    // 1/1 gap + 0/2 ordering slots = 1/3 -> 33%.
    examkit()
        .arg("grade")
        .arg("--test")
        .arg(&test_path)
        .arg("--answers")
        .arg(&answers_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("gap-fill"))
        .stdout(predicate::str::contains("1/3"))
        .stdout(predicate::str::contains("33%"));
}

#[test]
fn grade_writes_report_and_compare_reads_it() {
    let dir = TempDir::new().unwrap();
    let test_path = write_fixture(&dir);

    let low_path = dir.path().join("low.json");
    std::fs::write(&low_path, ANSWERS).unwrap();
    let high_path = dir.path().join("high.json");
    std::fs::write(
        &high_path,
        r#"{
  "q1": { "type": "choice", "value": "a" },
  "order": { "type": "order", "value": ["s0", "s1", "s2"] }
}"#,
    )
    .unwrap();

    let baseline_report = dir.path().join("baseline.json");
    let current_report = dir.path().join("current.json");

    examkit()
        .arg("grade")
        .arg("--test")
        .arg(&test_path)
        .arg("--answers")
        .arg(&low_path)
        .arg("--output")
        .arg(&baseline_report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    examkit()
        .arg("grade")
        .arg("--test")
        .arg(&test_path)
        .arg("--answers")
        .arg(&high_path)
        .arg("--output")
        .arg(&current_report)
        .assert()
        .success();

    examkit()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_report)
        .arg("--current")
        .arg(&current_report)
        .assert()
        .success()
        .stdout(predicate::str::contains("improved order"));
}

#[test]
fn compare_fail_on_drop_sets_exit_code() {
    let dir = TempDir::new().unwrap();
    let test_path = write_fixture(&dir);

    let low_path = dir.path().join("low.json");
    std::fs::write(&low_path, ANSWERS).unwrap();
    let high_path = dir.path().join("high.json");
    std::fs::write(
        &high_path,
        r#"{
  "q1": { "type": "choice", "value": "a" },
  "order": { "type": "order", "value": ["s0", "s1", "s2"] }
}"#,
    )
    .unwrap();

    let baseline_report = dir.path().join("baseline.json");
    let current_report = dir.path().join("current.json");

    // Baseline is the strong attempt this time, so current drops.
    examkit()
        .arg("grade")
        .arg("--test")
        .arg(&test_path)
        .arg("--answers")
        .arg(&high_path)
        .arg("--output")
        .arg(&baseline_report)
        .assert()
        .success();
    examkit()
        .arg("grade")
        .arg("--test")
        .arg(&test_path)
        .arg("--answers")
        .arg(&low_path)
        .arg("--output")
        .arg(&current_report)
        .assert()
        .success();

    examkit()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_report)
        .arg("--current")
        .arg(&current_report)
        .arg("--fail-on-drop")
        .assert()
        .failure();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    examkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created examkit.toml"))
        .stdout(predicate::str::contains("Created tests/sample-test.toml"));

    assert!(dir.path().join("examkit.toml").exists());
    assert!(dir.path().join("tests/sample-test.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    examkit().current_dir(dir.path()).arg("init").assert().success();

    examkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn init_sample_validates_cleanly() {
    let dir = TempDir::new().unwrap();

    examkit().current_dir(dir.path()).arg("init").assert().success();

    examkit()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--test")
        .arg("tests/sample-test.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All test definitions valid"));
}

#[test]
fn fetch_reads_from_file_store() {
    let dir = TempDir::new().unwrap();
    let tests_dir = dir.path().join("tests");
    std::fs::create_dir_all(&tests_dir).unwrap();
    std::fs::write(tests_dir.join("reading-1.toml"), SAMPLE_TEST).unwrap();
    std::fs::write(
        dir.path().join("examkit.toml"),
        r#"default_store = "local"

[stores.local]
type = "file"
root = "."
"#,
    )
    .unwrap();

    examkit()
        .current_dir(dir.path())
        .arg("fetch")
        .arg("--test-id")
        .arg("reading-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading Practice 1"))
        .stdout(predicate::str::contains("ordering"));
}

#[test]
fn fetch_unknown_test_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("examkit.toml"),
        r#"default_store = "local"

[stores.local]
type = "file"
root = "."
"#,
    )
    .unwrap();

    examkit()
        .current_dir(dir.path())
        .arg("fetch")
        .arg("--test-id")
        .arg("ghost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
