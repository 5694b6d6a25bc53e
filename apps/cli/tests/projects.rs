use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli(config_dir: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("prism-cli")?;
    cmd.arg("--config-dir").arg(config_dir);
    Ok(cmd)
}

#[test]
fn add_then_list_projects() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let demo = dir.path().join("demo");
    fs::create_dir(&demo)?;

    cli(dir.path())?
        .args(["projects", "add"])
        .arg(&demo)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0  demo  "));

    cli(dir.path())?
        .args(["projects", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("0  demo  {}", demo.display())));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(
        dir.path().join("projects.json"),
    )?)?;
    assert_eq!(raw[0]["name"], "demo");
    Ok(())
}

#[test]
fn adding_a_missing_folder_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli(dir.path())?
        .args(["projects", "add"])
        .arg(dir.path().join("nowhere"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "));
    assert!(!dir.path().join("projects.json").exists());
    Ok(())
}

/// 切換兩次語言後設定檔內容應與原本相同。 / Toggling twice restores the settings file.
#[test]
fn language_toggle_round_trip() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let settings = dir.path().join("settings.json");
    fs::write(&settings, "{\n  \"language\": \"ru\"\n}")?;

    cli(dir.path())?
        .args(["labels"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launcher.add_project\tДобавить проект"));

    cli(dir.path())?
        .args(["language", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("en  English"));
    cli(dir.path())?
        .args(["labels"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launcher.add_project\tAdd project"));

    cli(dir.path())?
        .args(["language", "toggle"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ru  Русский"));
    assert_eq!(fs::read_to_string(&settings)?, "{\n  \"language\": \"ru\"\n}");
    Ok(())
}

#[test]
fn malformed_settings_abort_startup() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("settings.json"), "{ not json")?;
    cli(dir.path())?
        .args(["language", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings"));
    Ok(())
}
