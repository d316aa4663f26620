//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with config, data and home directories inside `home`
fn recorder(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("meeting-recorder").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Record meetings"))
        .stdout(predicate::str::contains("--storage-dir"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("meeting-recorder"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meeting-recorder"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    let assert = recorder(&home).args(["config", "--help"]).assert().success();
    for action in ["init", "set", "get", "list", "path"] {
        assert!(String::from_utf8_lossy(&assert.get_output().stdout).contains(action));
    }
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage_dir"))
        .stdout(predicate::str::contains("not set"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "set", "recording.channels", "1"])
        .assert()
        .success();
    recorder(&home)
        .args(["config", "get", "recording.channels"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();
    recorder(&home).args(["config", "init"]).assert().success();
    recorder(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "get", "api_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_out_of_range() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "set", "recording.sample_rate", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between"));
}

#[test]
fn config_set_invalid_log_level() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .args(["config", "set", "log_level", "loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid options"));
}

#[test]
fn console_lists_and_quits() {
    let home = TempDir::new().unwrap();
    let storage = home.path().join("recordings");
    recorder(&home)
        .arg("--storage-dir")
        .arg(&storage)
        .write_stdin("help\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("rename <n> <name>"))
        .stderr(predicate::str::contains("No recordings yet"))
        .stderr(predicate::str::contains("Unknown command 'bogus'"));
}

#[test]
fn console_exits_at_end_of_input() {
    let home = TempDir::new().unwrap();
    recorder(&home)
        .arg("--storage-dir")
        .arg(home.path().join("recordings"))
        .write_stdin("list\n")
        .assert()
        .success();
}
