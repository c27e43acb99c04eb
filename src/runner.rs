//! CLI execution and command dispatch logic.
//!
//! This module keeps [`main`] minimal by providing a single entry point that
//! loads the configuration and renders the requested report to a writer.

use crate::cli::{Cli, Commands};
use crate::client::Client;
use crate::config::{LedgerConfig, resolve_path};
use crate::query::AccountBalanceQuery;
use anyhow::{Context, Result, ensure};
use mockable::Env;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Execute the parsed [`Cli`] command, writing its report to `out`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or validated, if
/// the simulated ledger disagrees with it, or if writing fails.
pub fn run(cli: &Cli, env: &impl Env, out: &mut impl Write) -> Result<()> {
    let path = resolve_path(cli.config.as_deref(), env);
    debug!(%path, "resolved configuration path");
    let config = LedgerConfig::load(&path)
        .with_context(|| format!("loading configuration from {path}"))?;
    match cli.command.unwrap_or(Commands::Check) {
        Commands::Accounts => list_accounts(&config, out),
        Commands::Fixtures => list_fixtures(&config, out),
        Commands::Check => check(&config, out),
    }
}

fn list_accounts(config: &LedgerConfig, out: &mut impl Write) -> Result<()> {
    let book = config.validate().context("validating accounts")?;
    for identity in book.iter() {
        let marker = if identity.slot == config.treasury_slot {
            " (treasury)"
        } else {
            ""
        };
        writeln!(
            out,
            "{}\t{}\t{}{marker}",
            identity.slot, identity.account_id, identity.public_key
        )
        .context("writing account list")?;
    }
    Ok(())
}

fn list_fixtures(config: &LedgerConfig, out: &mut impl Write) -> Result<()> {
    if config.fixtures.is_empty() {
        writeln!(out, "no fixture plans configured").context("writing fixture list")?;
        return Ok(());
    }
    for (scenario, actions) in config.fixtures.iter() {
        writeln!(out, "{scenario}").context("writing fixture list")?;
        for action in actions {
            writeln!(out, "  {action}").context("writing fixture list")?;
        }
    }
    Ok(())
}

/// Validate `config`, start a ledger for it and confirm every account is
/// funded as configured.
fn check(config: &LedgerConfig, out: &mut impl Write) -> Result<()> {
    let book = config.validate().context("validating configuration")?;
    let network = config.build_network(&book);
    let mut client = Client::for_network(Arc::new(network));
    client.set_request_timeout(config.request_timeout());
    for identity in book.iter() {
        let balance = AccountBalanceQuery::new(identity.account_id)
            .execute(&client)
            .with_context(|| format!("querying genesis balance of slot {}", identity.slot))?;
        ensure!(
            balance.hbars == config.genesis_balance(),
            "slot {} holds {} instead of {}",
            identity.slot,
            balance.hbars,
            config.genesis_balance()
        );
    }
    info!(accounts = book.len(), plans = config.fixtures.len(), "configuration checked");
    writeln!(
        out,
        "configuration ok: {} accounts, treasury slot {}, {} fixture plans",
        book.len(),
        config.treasury_slot,
        config.fixtures.len()
    )
    .context("writing check summary")?;
    Ok(())
}
