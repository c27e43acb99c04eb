//! The per-scenario context threaded through every step.

use super::{FixtureAction, FixturePlan, ScenarioName};
use crate::accounts::{AccountBook, AccountIdentity};
use crate::client::Client;
use crate::config::{ConfigError, LedgerConfig};
use crate::fixtures::{FixtureError, FixtureRegistry};
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::keys::KeyError;
use crate::network::{LedgerError, LedgerNetwork};
use crate::query::{AccountBalance, AccountBalanceQuery};
use crate::status::Status;
use crate::transaction::{Transaction, TransactionReceipt, TransferTransaction};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Failures of scenario operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Configuration or slot resolution failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The ledger rejected or failed a call.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// A step read a fixture no earlier step created.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// A key policy could not be built.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// A successful receipt lacked a field the operation needs.
    #[error("receipt for {operation} carried no {field}")]
    IncompleteReceipt {
        /// Operation that produced the receipt.
        operation: &'static str,
        /// Missing field.
        field: &'static str,
    },
    /// An account referenced by the ledger is not in the account book.
    #[error("account {0} is not in the configured account list")]
    UnmanagedAccount(AccountId),
    /// A treasury balance cannot be adjusted against itself.
    #[error("treasury holds {held} tokens and cannot be moved to {wanted}")]
    TreasuryBalance {
        /// Current balance.
        held: u64,
        /// Requested balance.
        wanted: u64,
    },
    /// A token amount does not fit the ledger's signed transfer lines.
    #[error("token amount {0} is out of range")]
    AmountOutOfRange(u64),
}

impl ScenarioError {
    /// Ledger status behind the error, if the ledger produced one.
    #[must_use]
    pub const fn ledger_status(&self) -> Option<Status> {
        match self {
            Self::Ledger(err) => err.status(),
            _ => None,
        }
    }
}

/// State shared by the steps of one scenario.
#[derive(Debug)]
pub struct ScenarioContext {
    client: Client,
    accounts: AccountBook,
    fixtures: FixtureRegistry,
    plan: FixturePlan,
    name: Option<ScenarioName>,
    treasury_slot: usize,
    default_timeout: Duration,
}

impl ScenarioContext {
    /// Validate `config` and start a fresh simulated ledger for it.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] when the configuration is invalid.
    pub fn from_config(config: &LedgerConfig) -> Result<Self, ScenarioError> {
        let accounts = config.validate()?;
        let network = config.build_network(&accounts);
        let mut client = Client::for_network(Arc::new(network));
        client.set_request_timeout(config.request_timeout());
        client.set_max_transaction_fee(config.max_transaction_fee());
        Ok(Self::new(
            client,
            accounts,
            config.fixtures.clone(),
            config.treasury_slot,
        ))
    }

    /// Assemble a context from parts; the client's current timeout becomes
    /// the default restored at each scenario start.
    #[must_use]
    pub fn new(
        client: Client,
        accounts: AccountBook,
        plan: FixturePlan,
        treasury_slot: usize,
    ) -> Self {
        let default_timeout = client.request_timeout();
        Self {
            client,
            accounts,
            fixtures: FixtureRegistry::new(),
            plan,
            name: None,
            treasury_slot,
            default_timeout,
        }
    }

    /// Start `name`: clear fixtures and the operator, restore the default
    /// timeout, then apply the matching fixture plan.
    ///
    /// # Errors
    ///
    /// Returns the first failing plan action's error.
    pub fn begin_scenario(&mut self, name: ScenarioName) -> Result<(), ScenarioError> {
        self.fixtures.reset();
        self.client.clear_operator();
        self.client.set_request_timeout(self.default_timeout);
        let actions = self.plan.actions_for(&name).to_vec();
        info!(scenario = %name, actions = actions.len(), "scenario started");
        self.name = Some(name);
        for action in actions {
            self.apply_fixture(&action)?;
        }
        Ok(())
    }

    fn apply_fixture(&mut self, action: &FixtureAction) -> Result<(), ScenarioError> {
        debug!(%action, "applying fixture");
        match *action {
            FixtureAction::FundHbar { slot, hbar } => {
                let to = self.identity(slot)?.account_id;
                let treasury = self.treasury_slot;
                let from = self.identity(treasury)?.account_id;
                self.with_operator(treasury, |ctx| {
                    let transfer = TransferTransaction::new()
                        .hbar_transfer(from, Hbar::new(-hbar))
                        .hbar_transfer(to, Hbar::new(hbar));
                    ctx.execute(transfer, &[])
                })?;
            }
            FixtureAction::RequestTimeout { ms } => {
                self.client.set_request_timeout(Duration::from_millis(ms));
            }
        }
        Ok(())
    }

    /// Name of the running scenario.
    #[must_use]
    pub const fn scenario_name(&self) -> Option<&ScenarioName> {
        self.name.as_ref()
    }

    /// Scenario client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Configured accounts.
    #[must_use]
    pub const fn accounts(&self) -> &AccountBook {
        &self.accounts
    }

    /// Fixture slots.
    #[must_use]
    pub const fn fixtures(&self) -> &FixtureRegistry {
        &self.fixtures
    }

    /// Mutable fixture slots.
    pub const fn fixtures_mut(&mut self) -> &mut FixtureRegistry {
        &mut self.fixtures
    }

    /// Slot acting as token treasury for fixtures.
    #[must_use]
    pub const fn treasury_slot(&self) -> usize {
        self.treasury_slot
    }

    /// Identity configured at `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] for unknown slots.
    pub fn identity(&self, slot: usize) -> Result<&AccountIdentity, ScenarioError> {
        Ok(self.accounts.resolve(slot)?)
    }

    /// Make `slot` the operator for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] for unknown slots.
    pub fn bind_operator(&mut self, slot: usize) -> Result<AccountId, ScenarioError> {
        let identity = self.accounts.resolve(slot)?;
        let account_id = identity.account_id;
        debug!(slot, %account_id, "binding operator");
        self.client
            .set_operator(account_id, identity.private_key.clone());
        Ok(account_id)
    }

    /// Run `f` with `slot` as operator, then restore the previous operator.
    ///
    /// # Errors
    ///
    /// Propagates errors from binding or from `f`.
    pub fn with_operator<T>(
        &mut self,
        slot: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ScenarioError>,
    ) -> Result<T, ScenarioError> {
        let previous = self.client.clear_operator();
        let result = self.bind_operator(slot).and_then(|_| f(self));
        self.client.restore_operator(previous);
        result
    }

    /// Run `f` with an elevated request timeout, then restore the previous one.
    ///
    /// # Errors
    ///
    /// Propagates errors from `f`.
    pub fn with_request_timeout<T>(
        &mut self,
        timeout: Duration,
        f: impl FnOnce(&mut Self) -> Result<T, ScenarioError>,
    ) -> Result<T, ScenarioError> {
        let previous = self.client.set_request_timeout(timeout);
        let result = f(self);
        self.client.set_request_timeout(previous);
        result
    }

    /// Hbar and token balances of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] for unknown slots or ledger failures.
    pub fn account_balance(&self, slot: usize) -> Result<AccountBalance, ScenarioError> {
        let account_id = self.identity(slot)?.account_id;
        Ok(AccountBalanceQuery::new(account_id).execute(&self.client)?)
    }

    /// Freeze `tx`, sign it with every slot in `signer_slots`, submit it and
    /// wait for a successful receipt.
    ///
    /// The receipt and record are stored in the fixture registry.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Ledger`] when submission fails or the
    /// receipt carries a failure status.
    pub fn execute(
        &mut self,
        tx: impl Transaction,
        signer_slots: &[usize],
    ) -> Result<TransactionReceipt, ScenarioError> {
        let mut frozen = tx.freeze_with(&self.client)?;
        for slot in signer_slots {
            frozen = frozen.sign(&self.identity(*slot)?.private_key);
        }
        let response = frozen.execute(&self.client)?;
        let receipt = response.get_receipt(&self.client)?;
        let record = response.get_record(&self.client)?;
        debug!(
            scenario = ?self.scenario_name(),
            transaction_id = %receipt.transaction_id,
            fee = %record.transaction_fee,
            "transaction recorded"
        );
        self.fixtures.set_receipt(receipt.clone());
        self.fixtures.set_record(record);
        Ok(receipt)
    }

    /// Ledger network behind the client.
    #[must_use]
    pub fn network(&self) -> &dyn LedgerNetwork {
        self.client.network()
    }
}
