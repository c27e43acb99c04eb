//! Deterministic configurations for tests.
//!
//! Account keys are derived from the slot number, so every run sees the same
//! ids and keys without shipping key material in the repository.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ledger_steps::config::{AccountEntry, LedgerConfig};
use ledger_steps::scenario::{FixtureAction, FixturePlan, ScenarioContext};
use sha2::{Digest, Sha256};
use std::fs;

/// Accounts configured for behavioural scenarios: the treasury, a spare
/// slot and the four participants.
pub const SCENARIO_ACCOUNTS: usize = 6;

/// First account number handed out to configured accounts.
const FIRST_ACCOUNT_NUM: usize = 1001;

/// Hex ED25519 seed of `slot`.
#[must_use]
pub fn account_key_hex(slot: usize) -> String {
    let digest = Sha256::digest(format!("slot-{slot}").as_bytes());
    hex::encode(digest)
}

/// `count` accounts numbered from `0.0.1001`.
#[must_use]
pub fn account_entries(count: usize) -> Vec<AccountEntry> {
    (0..count)
        .map(|slot| AccountEntry {
            id: format!("0.0.{}", FIRST_ACCOUNT_NUM + slot),
            private_key: account_key_hex(slot),
        })
        .collect()
}

/// Configuration with `count` accounts and default ledger settings.
#[must_use]
pub fn ledger_config(count: usize) -> LedgerConfig {
    LedgerConfig {
        accounts: account_entries(count),
        genesis_balance_hbar: 1000,
        treasury_slot: 0,
        request_timeout_ms: 10_000,
        network_latency_ms: 0,
        max_transaction_fee_hbar: 2,
        fixtures: FixturePlan::new(),
    }
}

/// Configuration used by the behavioural scenarios.
///
/// The fixture plan tops up the first participant when the threshold
/// publishing scenario begins.
#[must_use]
pub fn scenario_config() -> LedgerConfig {
    let mut config = ledger_config(SCENARIO_ACCOUNTS);
    config.fixtures = FixturePlan::new().with(
        "Publish a message to a topic guarded by a 1 of 2 threshold key",
        vec![FixtureAction::FundHbar { slot: 2, hbar: 50 }],
    );
    config
}

/// Fresh scenario context over [`scenario_config`].
///
/// # Errors
///
/// Returns an error if the configuration fails validation.
pub fn scenario_context() -> Result<ScenarioContext> {
    ScenarioContext::from_config(&scenario_config()).context("building scenario context")
}

/// Write `config` as JSON into `dir`, returning the file path.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn write_config(dir: &Utf8Path, config: &LedgerConfig) -> Result<Utf8PathBuf> {
    let path = dir.join("ledger-steps.json");
    let text = serde_json::to_string_pretty(config).context("serialising configuration")?;
    fs::write(&path, text).with_context(|| format!("writing {path}"))?;
    Ok(path)
}
