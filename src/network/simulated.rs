//! In-process ledger implementing [`LedgerNetwork`].

use super::state::{AccountState, LedgerState};
use super::{FeeSchedule, LatencyProfile, LedgerError, LedgerNetwork};
use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::Key;
use crate::query::{AccountBalance, TokenInfo, TopicInfo, TopicMessage};
use crate::transaction::{FrozenTransaction, TransactionId, TransactionReceipt, TransactionRecord};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info};

/// A ledger held entirely in memory.
///
/// State lives behind a mutex so one network may be shared across threads.
/// Calls never sleep: the configured latency is compared with the caller's
/// timeout and an exceeding call fails before touching the state.
#[derive(Debug)]
pub struct SimulatedNetwork {
    state: Mutex<LedgerState>,
    fees: FeeSchedule,
    latency: LatencyProfile,
}

impl SimulatedNetwork {
    /// Start configuring a network.
    #[must_use]
    pub fn builder() -> SimulatedNetworkBuilder {
        SimulatedNetworkBuilder::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        self.state
            .lock()
            .map_err(|err| LedgerError::Unavailable(err.to_string()))
    }

    fn within(latency: Duration, timeout: Duration) -> Result<(), LedgerError> {
        if latency > timeout {
            Err(LedgerError::Timeout { timeout, latency })
        } else {
            Ok(())
        }
    }

    fn query(&self, timeout: Duration) -> Result<MutexGuard<'_, LedgerState>, LedgerError> {
        Self::within(self.latency.default_latency(), timeout)?;
        self.lock()
    }
}

impl LedgerNetwork for SimulatedNetwork {
    fn submit(&self, transaction: &FrozenTransaction, timeout: Duration) -> Result<(), LedgerError> {
        let kind = transaction.body().kind();
        Self::within(self.latency.for_kind(kind), timeout)?;
        let fee = self.fees.fee_for(kind);
        let record = self.lock()?.submit(transaction, fee)?;
        let receipt = &record.receipt;
        debug!(
            transaction_id = %receipt.transaction_id,
            %kind,
            status = %receipt.status,
            fee = %record.transaction_fee,
            "transaction reached consensus"
        );
        if let Some(topic_id) = receipt.topic_id {
            info!(%topic_id, "topic created");
        }
        if let Some(token_id) = receipt.token_id {
            info!(%token_id, "token created");
        }
        Ok(())
    }

    fn receipt(&self, id: &TransactionId, timeout: Duration) -> Result<TransactionReceipt, LedgerError> {
        Ok(self.query(timeout)?.record(id)?.receipt)
    }

    fn record(&self, id: &TransactionId, timeout: Duration) -> Result<TransactionRecord, LedgerError> {
        self.query(timeout)?.record(id)
    }

    fn account_balance(&self, id: &AccountId, timeout: Duration) -> Result<AccountBalance, LedgerError> {
        self.query(timeout)?.account_balance(id)
    }

    fn token_info(&self, id: &TokenId, timeout: Duration) -> Result<TokenInfo, LedgerError> {
        self.query(timeout)?.token_info(id)
    }

    fn topic_info(&self, id: &TopicId, timeout: Duration) -> Result<TopicInfo, LedgerError> {
        self.query(timeout)?.topic_info(id)
    }

    fn topic_messages(
        &self,
        id: &TopicId,
        timeout: Duration,
    ) -> Result<Vec<TopicMessage>, LedgerError> {
        self.query(timeout)?.topic_messages(id)
    }
}

/// Builder for [`SimulatedNetwork`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedNetworkBuilder {
    accounts: BTreeMap<AccountId, (Key, Hbar)>,
    latency: LatencyProfile,
}

impl SimulatedNetworkBuilder {
    /// Fund a genesis account guarded by `key`.
    ///
    /// Adding the same id twice replaces the earlier entry.
    #[must_use]
    pub fn account(mut self, id: AccountId, key: impl Into<Key>, balance: Hbar) -> Self {
        self.accounts.insert(id, (key.into(), balance));
        self
    }

    /// Replace the latency profile.
    #[must_use]
    pub fn latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Build the network.
    #[must_use]
    pub fn build(self) -> SimulatedNetwork {
        let accounts = self
            .accounts
            .into_iter()
            .map(|(id, (key, balance))| {
                let state = AccountState {
                    key,
                    balance,
                    tokens: BTreeMap::new(),
                };
                (id, state)
            })
            .collect();
        SimulatedNetwork {
            state: Mutex::new(LedgerState::new(accounts, OffsetDateTime::UNIX_EPOCH)),
            fees: FeeSchedule::default(),
            latency: self.latency,
        }
    }
}
