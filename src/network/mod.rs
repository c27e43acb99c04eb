//! The ledger network boundary.
//!
//! Steps only ever talk to a ledger through [`LedgerNetwork`]. The crate
//! ships [`SimulatedNetwork`], an in-process ledger that enforces the
//! signature, fee, supply and association rules the steps rely on.

mod error;
mod fees;
mod simulated;
mod state;

pub use error::LedgerError;
pub use fees::{FeeSchedule, LatencyProfile};
pub use simulated::{SimulatedNetwork, SimulatedNetworkBuilder};

use crate::ids::{AccountId, TokenId, TopicId};
use crate::query::{AccountBalance, TokenInfo, TopicInfo, TopicMessage};
use crate::transaction::{FrozenTransaction, TransactionId, TransactionReceipt, TransactionRecord};
use std::time::Duration;

/// Request/response contract of a ledger.
///
/// Every call receives the caller's request timeout and fails with
/// [`LedgerError::Timeout`] when the network cannot answer in time.
pub trait LedgerNetwork: Send + Sync {
    /// Submit a frozen, signed transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Precheck`] when the transaction is rejected
    /// before consensus.
    fn submit(&self, transaction: &FrozenTransaction, timeout: Duration) -> Result<(), LedgerError>;

    /// Fetch the receipt of a submitted transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTransaction`] for ids never submitted.
    fn receipt(&self, id: &TransactionId, timeout: Duration) -> Result<TransactionReceipt, LedgerError>;

    /// Fetch the record of a submitted transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTransaction`] for ids never submitted.
    fn record(&self, id: &TransactionId, timeout: Duration) -> Result<TransactionRecord, LedgerError>;

    /// Hbar and token balances of an account.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryStatus`] for unknown accounts.
    fn account_balance(&self, id: &AccountId, timeout: Duration) -> Result<AccountBalance, LedgerError>;

    /// Current state of a token.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryStatus`] for unknown tokens.
    fn token_info(&self, id: &TokenId, timeout: Duration) -> Result<TokenInfo, LedgerError>;

    /// Current state of a topic.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryStatus`] for unknown topics.
    fn topic_info(&self, id: &TopicId, timeout: Duration) -> Result<TopicInfo, LedgerError>;

    /// Messages published to a topic, in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryStatus`] for unknown topics.
    fn topic_messages(
        &self,
        id: &TopicId,
        timeout: Duration,
    ) -> Result<Vec<TopicMessage>, LedgerError>;
}
