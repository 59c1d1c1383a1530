//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lexicard() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lexicard").unwrap()
}

/// A command isolated in its own working directory and data directory.
fn in_dir(dir: &TempDir) -> Command {
    let mut cmd = lexicard();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("LEXICARD_DATA_DIR", dir.path().join("data"))
        .env("LEXICARD_SHUFFLE", "false")
        .env_remove("RUST_LOG");
    cmd
}

fn add(dir: &TempDir, category: &str, word: &str, chinese: &str) {
    in_dir(dir)
        .args(["add", category, "--word", word, "--pos", "n."])
        .args(["--chinese", chinese, "--english", &format!("a {word}")])
        .assert()
        .success();
}

#[test]
fn help_lists_subcommands() {
    lexicard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz"))
        .stdout(predicate::str::contains("import"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    in_dir(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lexicard.toml"));
    assert!(dir.path().join("lexicard.toml").exists());

    in_dir(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn first_run_seeds_library() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("custom"))
        .stdout(predicate::str::contains("wrongWords").not());
    assert!(dir.path().join("data").join("wordLibrary.json").exists());
}

#[test]
fn add_list_and_duplicate() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");

    in_dir(&dir)
        .args(["list", "pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cat"))
        .stdout(predicate::str::contains("猫"));

    in_dir(&dir)
        .args(["add", "pets", "--word", "CAT", "--pos", "n.", "--chinese", "猫", "--english", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn add_rejects_missing_fields() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .args(["add", "pets", "--word", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field"));
}

#[test]
fn update_keeps_unspecified_fields() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");

    in_dir(&dir)
        .args(["update", "pets", "cat", "--chinese", "猫咪"])
        .assert()
        .success();

    in_dir(&dir)
        .args(["list", "pets", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("猫咪"))
        .stdout(predicate::str::contains("\"english\": \"a cat\""));
}

#[test]
fn protected_categories() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .args(["delete-category", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved"));

    in_dir(&dir)
        .args(["clear-category", "default"])
        .assert()
        .failure();
}

#[test]
fn move_and_search() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");
    in_dir(&dir).args(["create-category", "zoo"]).assert().success();

    in_dir(&dir)
        .args(["move", "cat", "--from", "pets", "--to", "zoo"])
        .assert()
        .success();

    in_dir(&dir)
        .args(["search", "猫"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zoo"));
}

#[test]
fn csv_import_and_export() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("words.csv");
    std::fs::write(
        &csv,
        "word,chinese,english\n\"sum up\",\"总结，概括\",\"to summarize, briefly\"\nbroken\n",
    )
    .unwrap();

    in_dir(&dir)
        .args(["import", "words.csv", "--category", "unit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 of 2"));

    in_dir(&dir)
        .args(["export", "unit", "--format", "csv", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sum up,n.,总结，概括,\"to summarize, briefly\"",
        ));

    in_dir(&dir)
        .args(["export", "unit"])
        .assert()
        .success();
    assert!(dir.path().join("unit_words.json").exists());
}

#[test]
fn import_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), r#"{"word": "cat"}"#).unwrap();
    in_dir(&dir)
        .args(["import", "bad.json", "--category", "unit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("array"));
}

#[test]
fn export_empty_category_fails() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .args(["export", "custom"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
}

#[test]
fn quiz_session_over_stdin() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");

    in_dir(&dir)
        .args(["quiz", "--category", "pets", "--mode", "en-to-zh"])
        .write_stdin("猫\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("100%"));

    in_dir(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("en-to-zh"))
        .stdout(predicate::str::contains("100%"));
}

#[test]
fn quiz_saves_wrong_words() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");
    add(&dir, "pets", "dog", "狗");

    in_dir(&dir)
        .args(["quiz", "--category", "pets", "--mode", "zh-to-en", "--save-wrong"])
        .write_stdin("kitten\n\ndog\n\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("Added 1 word(s) to wrongWords"));

    in_dir(&dir)
        .args(["list", "wrongWords"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cat"));

    // mode and category are remembered
    in_dir(&dir)
        .arg("quiz")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("from \"pets\", mode zh-to-en"));
}

#[test]
fn quiz_uses_configured_mode_until_one_is_remembered() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("lexicard.toml"),
        "[quiz]\ndefault_mode = \"en-definition\"\n",
    )
    .unwrap();
    add(&dir, "pets", "cat", "猫");

    in_dir(&dir)
        .args(["quiz", "--category", "pets"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("mode en-definition"));

    in_dir(&dir)
        .args(["quiz", "--category", "pets", "--mode", "zh-to-en"])
        .write_stdin("q\n")
        .assert()
        .success();

    in_dir(&dir)
        .args(["quiz", "--category", "pets"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("mode zh-to-en"));
}

#[test]
fn quiz_on_empty_category_fails() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .args(["quiz", "--category", "custom"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
}

#[test]
fn backup_restore_reset() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");

    in_dir(&dir)
        .args(["backup", "--output", "backup.json"])
        .assert()
        .success();

    in_dir(&dir).args(["reset"]).assert().failure();
    in_dir(&dir).args(["reset", "--yes"]).assert().success();
    in_dir(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("pets").not());

    in_dir(&dir)
        .args(["restore", "backup.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored backup v1.0.0"));
    in_dir(&dir)
        .args(["list", "pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cat"));
}

#[test]
fn restore_rejects_invalid_backup() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.json"), r#"{"wordLibrary": {}}"#).unwrap();
    in_dir(&dir)
        .args(["restore", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing version"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    in_dir(&dir)
        .args(["--config", "nope.toml", "categories"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn stats_reports_totals() {
    let dir = TempDir::new().unwrap();
    add(&dir, "pets", "cat", "猫");
    in_dir(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("pets"))
        .stdout(predicate::str::contains("word(s)"));
}
