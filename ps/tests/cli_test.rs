//! CLI tests for the `ps` binary

use assert_cmd::Command;
use predicates::prelude::*;
use profilestore::ProfileStore;
use tempfile::TempDir;

fn ps(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ps").unwrap();
    cmd.arg("--store").arg(store.path());
    cmd
}

#[test]
fn test_users_keys_and_get() {
    let temp = TempDir::new().unwrap();
    let store = ProfileStore::open(temp.path()).unwrap();
    store.put("asha", "saved_recipes", "[]").unwrap();
    store.put("asha", "profile", "{\"age\":31}").unwrap();

    ps(&temp).arg("users").assert().success().stdout(predicate::str::contains("asha"));
    ps(&temp)
        .args(["keys", "asha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("saved_recipes"));
    ps(&temp)
        .args(["get", "asha", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"age\":31"));
}

#[test]
fn test_get_missing_record_fails() {
    let temp = TempDir::new().unwrap();
    ps(&temp).args(["get", "nobody", "profile"]).assert().failure();
}

#[test]
fn test_delete() {
    let temp = TempDir::new().unwrap();
    let store = ProfileStore::open(temp.path()).unwrap();
    store.put("ravi", "profile", "{}").unwrap();

    ps(&temp)
        .args(["delete", "ravi", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted ravi/profile"));
    assert!(store.get("ravi", "profile").unwrap().is_none());
}

#[test]
fn test_store_flag_overrides_config_file() {
    let configured = TempDir::new().unwrap();
    let flagged = TempDir::new().unwrap();
    ProfileStore::open(configured.path()).unwrap().put("meera", "profile", "{}").unwrap();
    ProfileStore::open(flagged.path()).unwrap().put("ravi", "profile", "{}").unwrap();

    let config = configured.path().join("dietplanner.yml");
    std::fs::write(&config, format!("storage:\n  store-dir: {}\n", configured.path().display())).unwrap();

    let mut cmd = Command::cargo_bin("ps").unwrap();
    cmd.arg("--config").arg(&config).arg("users");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("meera"))
        .stdout(predicate::str::contains("ravi").not());

    let mut cmd = Command::cargo_bin("ps").unwrap();
    cmd.arg("--config").arg(&config).arg("--store").arg(flagged.path()).arg("users");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ravi"))
        .stdout(predicate::str::contains("meera").not());
}
