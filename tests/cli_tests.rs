//! Integration tests for the `ledger-steps` binary using `assert_cmd`.
//!
//! These tests write a configuration into a temporary directory and check
//! the reports each subcommand prints.

use anyhow::{Context, Result};
use assert_cmd::Command;
use camino::Utf8PathBuf;
use ledger_steps::config::CONFIG_ENV;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};
use test_support::{scenario_config, write_config};

fn config_in_tempdir() -> Result<(TempDir, Utf8PathBuf)> {
    let temp = tempdir().context("create temp dir for configuration")?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|path| anyhow::anyhow!("temp dir is not UTF-8: {}", path.display()))?;
    let path = write_config(&dir, &scenario_config())?;
    Ok((temp, path))
}

fn ledger_steps() -> Result<Command> {
    let mut cmd = Command::cargo_bin("ledger-steps").context("locate ledger-steps binary")?;
    cmd.env_remove(CONFIG_ENV);
    Ok(cmd)
}

#[test]
fn accounts_lists_every_slot_and_marks_the_treasury() -> Result<()> {
    let (_temp, path) = config_in_tempdir()?;
    ledger_steps()?
        .arg("--config")
        .arg(path.as_str())
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("0\t0.0.1001\t"))
        .stdout(predicate::str::contains("(treasury)"))
        .stdout(predicate::str::contains("5\t0.0.1006\t"));
    Ok(())
}

#[test]
fn fixtures_lists_plans_and_actions() -> Result<()> {
    let (_temp, path) = config_in_tempdir()?;
    ledger_steps()?
        .args(["--config", path.as_str(), "fixtures"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Publish a message to a topic guarded by a 1 of 2 threshold key",
        ))
        .stdout(predicate::str::contains("  fund slot 2 with 50 hbar"));
    Ok(())
}

#[test]
fn check_is_the_default_command() -> Result<()> {
    let (_temp, path) = config_in_tempdir()?;
    ledger_steps()?
        .args(["--config", path.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "configuration ok: 6 accounts, treasury slot 0, 1 fixture plans",
        ));
    Ok(())
}

#[test]
fn configuration_path_comes_from_the_environment() -> Result<()> {
    let (_temp, path) = config_in_tempdir()?;
    ledger_steps()?
        .env(CONFIG_ENV, path.as_str())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration ok"));
    Ok(())
}

#[test]
fn missing_configuration_fails() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    ledger_steps()?
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ledger-steps.json"));
    Ok(())
}

#[test]
fn invalid_treasury_slot_fails_check() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|path| anyhow::anyhow!("temp dir is not UTF-8: {}", path.display()))?;
    let mut config = scenario_config();
    config.treasury_slot = 9;
    let path = write_config(&dir, &config)?;
    ledger_steps()?
        .args(["--config", path.as_str(), "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slot 9 is out of range"));
    Ok(())
}
