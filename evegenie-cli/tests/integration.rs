// evegenie-cli/tests/integration.rs
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const HEROES: &str = r#"{
    "user": {
        "name": "Turtle Man",
        "age": 71,
        "alive": true,
        "primary_artifact": "objectid:artifact",
        "attack_bonus": "1-10"
    },
    "power-up": {"name": "Star"}
}"#;

fn write_input(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write input file");
    path
}

#[test]
fn test_writes_settings_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "heroes.json", HEROES);

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("converting contents of"))
        .stdout(predicate::str::contains("settings file written to"));

    let settings = fs::read_to_string(dir.path().join("heroes.settings.py"))
        .expect("settings file should be written");
    assert!(settings.starts_with("\nuser = {\n    'schema': {\n"));
    assert!(settings.contains("'type': 'objectid'"));
    assert!(settings.contains("'min': 1,\n"));
    assert!(settings.contains("power_up = {"));
    assert!(settings.contains("        'power-up': power_up,\n"));
    assert!(settings.ends_with("    },\n}\n"));
}

#[test]
fn test_output_name_stops_at_first_dot() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "heroes.v2.json", HEROES);

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg(&input);
    cmd.assert().success();

    assert!(dir.path().join("heroes.settings.py").is_file());
    assert!(!dir.path().join("heroes.v2.settings.py").exists());
}

#[test]
fn test_missing_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg(&missing);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("file does not exist"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_stdout_mode_with_settings_flags() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "heroes.json", HEROES);

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.args(["--stdout", "--mongo-dbname", "heroes", "--mongo-host", "db"]);
    cmd.arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("'MONGO_DBNAME': 'heroes',"))
        .stdout(predicate::str::contains("'MONGO_HOST': 'db',"))
        .stdout(predicate::str::contains("converting contents of").not());

    assert!(!dir.path().join("heroes.settings.py").exists());
}

#[test]
fn test_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"))
        .stdout(predicate::str::contains(".settings.py"));
}

#[test]
fn test_debug_output_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "heroes.json", HEROES);

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.args(["--debug", "--stdout"]);
    cmd.arg(&input);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("endpoint 'user': 5 field(s)"))
        .stderr(predicate::str::contains("objectid reference to 'artifact'"));
}

#[test]
fn test_depth_limit_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "deep.json",
        r#"{"tower": {"a": {"b": {"c": {"d": 1}}}}}"#,
    );

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.args(["--max-depth", "2"]);
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Maximum nesting depth exceeded"));

    assert!(!dir.path().join("deep.settings.py").exists());
}

#[test]
fn test_invalid_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "broken.json", r#"{"hello":"world}"#);

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON input"))
        .stderr(predicate::str::contains("panicked").not());

    assert!(!dir.path().join("broken.settings.py").exists());
}

#[test]
fn test_malformed_json_variants() {
    let test_cases = vec![
        (r#"{"invalid": json}"#, "unquoted value"),
        (r#"{"incomplete":"#, "incomplete string"),
        (r#"{"trailing":,"#, "trailing comma"),
        (r#"{invalid: "json"}"#, "unquoted key"),
        (r#"{"nested": {"broken": json}}"#, "nested broken JSON"),
    ];

    for (invalid_json, description) in test_cases {
        println!("Testing: {}", description);

        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "case.json", invalid_json);

        let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
        cmd.arg(&input);
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Invalid JSON input"))
            .stderr(predicate::str::contains("panicked").not());
    }
}

#[test]
fn test_non_object_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "list.json", "[1, 2, 3]");

    let mut cmd = assert_cmd::Command::cargo_bin("evegenie-cli").unwrap();
    cmd.arg(&input);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Input is not a string or mapping"));
}
