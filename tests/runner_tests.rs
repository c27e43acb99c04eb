//! Tests for command dispatch without spawning the binary.

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use ledger_steps::cli::{Cli, Commands};
use ledger_steps::runner;
use rstest::rstest;
use tempfile::tempdir;
use test_support::env::mocked_config_env;
use test_support::{display_error_chain, ledger_config, write_config};

fn cli(config: Option<Utf8PathBuf>, command: Commands) -> Cli {
    Cli {
        config,
        verbose: false,
        command: Some(command),
    }
}

#[rstest]
#[case(Commands::Accounts, "0.0.1003")]
#[case(Commands::Fixtures, "no fixture plans configured")]
#[case(Commands::Check, "configuration ok: 4 accounts")]
fn commands_render_reports(#[case] command: Commands, #[case] fragment: &str) -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|path| anyhow::anyhow!("temp dir is not UTF-8: {}", path.display()))?;
    let path = write_config(&dir, &ledger_config(4))?;
    let env = mocked_config_env(Some(path.as_str()));
    let mut out = Vec::new();
    runner::run(&cli(None, command), &env, &mut out)?;
    let text = String::from_utf8(out).context("report is UTF-8")?;
    ensure!(text.contains(fragment), "report lacks '{fragment}': {text}");
    Ok(())
}

#[rstest]
fn explicit_path_overrides_the_environment() -> Result<()> {
    let temp = tempdir().context("create temp dir")?;
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
        .map_err(|path| anyhow::anyhow!("temp dir is not UTF-8: {}", path.display()))?;
    let path = write_config(&dir, &ledger_config(1))?;
    let env = mocked_config_env(Some("/nonexistent/ledger-steps.json"));
    let mut out = Vec::new();
    runner::run(&cli(Some(path), Commands::Check), &env, &mut out)?;
    ensure!(!out.is_empty(), "check should print a summary");
    Ok(())
}

#[rstest]
fn unreadable_configuration_reports_the_path() {
    let env = mocked_config_env(Some("/nonexistent/ledger-steps.json"));
    let mut out = Vec::new();
    let Err(err) = runner::run(&cli(None, Commands::Check), &env, &mut out) else {
        panic!("missing configuration should fail");
    };
    let chain = display_error_chain(err.as_ref());
    assert!(chain.contains("/nonexistent/ledger-steps.json"), "{chain}");
    assert!(out.is_empty());
}
