//! JSON configuration for the step layer.
//!
//! The configuration lists the accounts tests may act as, in slot order, and
//! the knobs of the simulated ledger they run against. Its location is taken
//! from the command line, then `LEDGER_STEPS_CONFIG`, then
//! [`DEFAULT_CONFIG_FILE`] in the working directory.

use crate::accounts::AccountBook;
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::network::{LatencyProfile, SimulatedNetwork};
use crate::scenario::{FixtureAction, FixturePlan};
use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use mockable::Env;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "LEDGER_STEPS_CONFIG";
/// File name used when neither a flag nor the environment names one.
pub const DEFAULT_CONFIG_FILE: &str = "ledger-steps.json";

const fn default_genesis_balance() -> i64 {
    1000
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_max_transaction_fee() -> i64 {
    2
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}'")]
    #[diagnostic(
        code(ledger_steps::config::read),
        help("pass --config or set LEDGER_STEPS_CONFIG")
    )]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`LedgerConfig`].
    #[error("failed to parse configuration '{path}'")]
    #[diagnostic(code(ledger_steps::config::parse))]
    Parse {
        /// File that was parsed.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The account list is empty.
    #[error("configuration lists no accounts")]
    #[diagnostic(code(ledger_steps::config::no_accounts))]
    NoAccounts,
    /// An account entry has a malformed id or key.
    #[error("account in slot {slot} is invalid: {reason}")]
    #[diagnostic(
        code(ledger_steps::config::invalid_account),
        help("ids use shard.realm.num; keys are hex ED25519 seeds or DER")
    )]
    InvalidAccount {
        /// Offending slot.
        slot: usize,
        /// Parse failure.
        reason: String,
    },
    /// Two slots name the same account id.
    #[error("account {id} is listed in slots {first} and {second}")]
    #[diagnostic(code(ledger_steps::config::duplicate_account))]
    DuplicateAccount {
        /// Repeated id.
        id: AccountId,
        /// First slot using the id.
        first: usize,
        /// Later slot using the id.
        second: usize,
    },
    /// A slot index does not exist in the account list.
    #[error("account slot {slot} is out of range ({len} accounts configured)")]
    #[diagnostic(code(ledger_steps::config::slot_out_of_range))]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Number of configured accounts.
        len: usize,
    },
    /// A fixture plan references a slot that does not exist.
    #[error("fixture plan '{scenario}' references slot {slot} ({len} accounts configured)")]
    #[diagnostic(code(ledger_steps::config::plan_slot_out_of_range))]
    PlanSlotOutOfRange {
        /// Plan key.
        scenario: String,
        /// Requested slot.
        slot: usize,
        /// Number of configured accounts.
        len: usize,
    },
}

/// One configured account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Account id in `shard.realm.num` form.
    pub id: String,
    /// Hex ED25519 private key.
    #[serde(alias = "privateKey")]
    pub private_key: String,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Accounts in slot order.
    pub accounts: Vec<AccountEntry>,
    /// Hbar credited to every account at genesis.
    #[serde(default = "default_genesis_balance")]
    pub genesis_balance_hbar: i64,
    /// Slot acting as treasury of fixture tokens.
    #[serde(default)]
    pub treasury_slot: usize,
    /// Client request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Simulated latency of every network call.
    #[serde(default)]
    pub network_latency_ms: u64,
    /// Highest fee the client accepts per transaction.
    #[serde(default = "default_max_transaction_fee")]
    pub max_transaction_fee_hbar: i64,
    /// Fixture actions keyed by scenario.
    #[serde(default)]
    pub fixtures: FixturePlan,
}

/// Pick the configuration path.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8Path;
/// use ledger_steps::config::resolve_path;
/// use mockable::DefaultEnv;
///
/// let path = resolve_path(Some(Utf8Path::new("custom.json")), &DefaultEnv::new());
/// assert_eq!(path, "custom.json");
/// ```
#[must_use]
pub fn resolve_path(explicit: Option<&Utf8Path>, env: &impl Env) -> Utf8PathBuf {
    if let Some(path) = explicit {
        return path.to_owned();
    }
    env.raw(CONFIG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| Utf8PathBuf::from(DEFAULT_CONFIG_FILE), Utf8PathBuf::from)
}

impl LedgerConfig {
    /// Read and parse the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json(&text, path)?;
        debug!(%path, accounts = config.accounts.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse configuration text; `origin` only labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not a valid
    /// configuration.
    pub fn from_json(text: &str, origin: &Utf8Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_owned(),
            source,
        })
    }

    /// Check every account, the treasury slot and the fixture plan.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<AccountBook, ConfigError> {
        let book = AccountBook::from_entries(&self.accounts)?;
        book.resolve(self.treasury_slot)?;
        for (scenario, actions) in self.fixtures.iter() {
            for action in actions {
                if let FixtureAction::FundHbar { slot, .. } = action
                    && *slot >= book.len()
                {
                    return Err(ConfigError::PlanSlotOutOfRange {
                        scenario: scenario.clone(),
                        slot: *slot,
                        len: book.len(),
                    });
                }
            }
        }
        Ok(book)
    }

    /// Client request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Highest fee the client accepts per transaction.
    #[must_use]
    pub const fn max_transaction_fee(&self) -> Hbar {
        Hbar::new(self.max_transaction_fee_hbar)
    }

    /// Genesis balance of every account.
    #[must_use]
    pub const fn genesis_balance(&self) -> Hbar {
        Hbar::new(self.genesis_balance_hbar)
    }

    /// Build a simulated ledger funding every account in `book`.
    #[must_use]
    pub fn build_network(&self, book: &AccountBook) -> SimulatedNetwork {
        let latency = LatencyProfile::uniform(Duration::from_millis(self.network_latency_ms));
        book.iter()
            .fold(SimulatedNetwork::builder(), |builder, identity| {
                builder.account(identity.account_id, identity.public_key, self.genesis_balance())
            })
            .latency(latency)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    #[rstest]
    #[case(Ok("from-env.json".to_owned()), "from-env.json")]
    #[case(Ok("  ".to_owned()), DEFAULT_CONFIG_FILE)]
    #[case(Err(std::env::VarError::NotPresent), DEFAULT_CONFIG_FILE)]
    fn path_falls_back_to_env_then_default(
        #[case] value: Result<String, std::env::VarError>,
        #[case] expected: &str,
    ) {
        let mut env = MockEnv::new();
        env.expect_raw()
            .withf(|key| key == CONFIG_ENV)
            .returning(move |_| value.clone());
        assert_eq!(resolve_path(None, &env), expected);
    }

    #[test]
    fn explicit_path_wins() {
        let env = MockEnv::new();
        let path = resolve_path(Some(Utf8Path::new("cli.json")), &env);
        assert_eq!(path, "cli.json");
    }

    #[test]
    fn defaults_apply_to_omitted_fields() {
        let parsed = LedgerConfig::from_json(r#"{"accounts": []}"#, Utf8Path::new("inline"));
        let Ok(config) = parsed else {
            panic!("minimal configuration should parse");
        };
        assert_eq!(config.genesis_balance_hbar, 1000);
        assert_eq!(config.treasury_slot, 0);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_transaction_fee(), Hbar::new(2));
        assert!(config.fixtures.is_empty());
    }

    #[test]
    fn camel_case_private_key_is_accepted() {
        let text = r#"{"accounts": [{"id": "0.0.5", "privateKey": "ab"}]}"#;
        let parsed = LedgerConfig::from_json(text, Utf8Path::new("inline"));
        assert!(parsed.is_ok_and(|c| c.accounts.first().is_some_and(|a| a.private_key == "ab")));
    }

    #[test]
    fn empty_account_list_fails_validation() {
        let config = LedgerConfig::from_json(r#"{"accounts": []}"#, Utf8Path::new("inline"));
        let err = config.and_then(|c| c.validate().map(|_| ()));
        assert!(matches!(err, Err(ConfigError::NoAccounts)));
    }
}
