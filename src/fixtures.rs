//! Scenario-scoped fixture slots shared between steps.
//!
//! Steps are matched independently, so anything one step creates for a
//! later one (the topic, the token, a pending transfer) is parked here.
//! Reading an empty slot is an error naming the slot rather than a panic.

use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::KeyList;
use crate::transaction::{TransactionReceipt, TransactionRecord, TransferTransaction};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Names of the fixture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureSlot {
    /// Topic created in this scenario.
    Topic,
    /// Token created in this scenario.
    Token,
    /// Threshold key built from participant keys.
    ThresholdKey,
    /// Transfer awaiting submission.
    PendingTransaction,
    /// Receipt of the last submitted transaction.
    Receipt,
    /// Record of the last submitted transaction.
    Record,
    /// Payer balance captured before the last submission.
    PayerBalance,
}

impl FixtureSlot {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Token => "token",
            Self::ThresholdKey => "threshold key",
            Self::PendingTransaction => "pending transaction",
            Self::Receipt => "receipt",
            Self::Record => "record",
            Self::PayerBalance => "payer balance",
        }
    }
}

impl fmt::Display for FixtureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reading fixture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// A step read a slot no earlier step populated.
    #[error("no {0} has been created in this scenario")]
    Missing(FixtureSlot),
}

/// A transfer built by one step and submitted by another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Transfer lines.
    pub transfer: TransferTransaction,
    /// Slots whose keys sign the transfer.
    pub signer_slots: Vec<usize>,
}

/// Payer hbar balance captured just before a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayerSnapshot {
    /// Paying account.
    pub account_id: AccountId,
    /// Balance before the submission.
    pub balance_before: Hbar,
}

/// Fixture slots of one scenario.
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
    topic: Option<TopicId>,
    token: Option<TokenId>,
    threshold_key: Option<KeyList>,
    pending: Option<PendingTransaction>,
    receipt: Option<TransactionReceipt>,
    record: Option<TransactionRecord>,
    payer_balance: Option<PayerSnapshot>,
}

fn require<T>(value: Option<T>, slot: FixtureSlot) -> Result<T, FixtureError> {
    value.ok_or(FixtureError::Missing(slot))
}

impl FixtureRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the created topic.
    pub fn set_topic(&mut self, topic_id: TopicId) {
        debug!(%topic_id, "fixture topic set");
        self.topic = Some(topic_id);
    }

    /// Created topic.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before a topic is created.
    pub fn topic(&self) -> Result<TopicId, FixtureError> {
        require(self.topic, FixtureSlot::Topic)
    }

    /// Record the created token.
    pub fn set_token(&mut self, token_id: TokenId) {
        debug!(%token_id, "fixture token set");
        self.token = Some(token_id);
    }

    /// Created token.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before a token is created.
    pub fn token(&self) -> Result<TokenId, FixtureError> {
        require(self.token, FixtureSlot::Token)
    }

    /// Store the threshold key.
    pub fn set_threshold_key(&mut self, key: KeyList) {
        self.threshold_key = Some(key);
    }

    /// Threshold key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before the key is built.
    pub fn threshold_key(&self) -> Result<&KeyList, FixtureError> {
        require(self.threshold_key.as_ref(), FixtureSlot::ThresholdKey)
    }

    /// Park a transfer for a later step.
    pub fn set_pending(&mut self, pending: PendingTransaction) {
        debug!(signers = ?pending.signer_slots, "pending transaction stored");
        self.pending = Some(pending);
    }

    /// Take the pending transfer; it can be submitted only once.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] when nothing is pending.
    pub fn take_pending(&mut self) -> Result<PendingTransaction, FixtureError> {
        require(self.pending.take(), FixtureSlot::PendingTransaction)
    }

    /// Store the last receipt.
    pub fn set_receipt(&mut self, receipt: TransactionReceipt) {
        self.receipt = Some(receipt);
    }

    /// Last receipt.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before any submission.
    pub fn receipt(&self) -> Result<&TransactionReceipt, FixtureError> {
        require(self.receipt.as_ref(), FixtureSlot::Receipt)
    }

    /// Store the last record.
    pub fn set_record(&mut self, record: TransactionRecord) {
        self.record = Some(record);
    }

    /// Last record.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before any submission.
    pub fn record(&self) -> Result<&TransactionRecord, FixtureError> {
        require(self.record.as_ref(), FixtureSlot::Record)
    }

    /// Store the payer balance snapshot.
    pub const fn set_payer_snapshot(&mut self, snapshot: PayerSnapshot) {
        self.payer_balance = Some(snapshot);
    }

    /// Payer balance snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] before any submission.
    pub fn payer_snapshot(&self) -> Result<PayerSnapshot, FixtureError> {
        require(self.payer_balance, FixtureSlot::PayerBalance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FixtureSlot::Topic)]
    #[case(FixtureSlot::Token)]
    #[case(FixtureSlot::ThresholdKey)]
    #[case(FixtureSlot::Receipt)]
    #[case(FixtureSlot::Record)]
    #[case(FixtureSlot::PayerBalance)]
    fn empty_slots_report_their_name(#[case] slot: FixtureSlot) {
        let registry = FixtureRegistry::new();
        let err = match slot {
            FixtureSlot::Topic => registry.topic().err(),
            FixtureSlot::Token => registry.token().err(),
            FixtureSlot::ThresholdKey => registry.threshold_key().err(),
            FixtureSlot::Receipt => registry.receipt().err(),
            FixtureSlot::Record => registry.record().err(),
            FixtureSlot::PayerBalance => registry.payer_snapshot().err(),
            FixtureSlot::PendingTransaction => None,
        };
        assert_eq!(err, Some(FixtureError::Missing(slot)));
        assert!(
            FixtureError::Missing(slot)
                .to_string()
                .contains(slot.as_str())
        );
    }

    #[test]
    fn pending_transaction_is_single_use() {
        let mut registry = FixtureRegistry::new();
        registry.set_pending(PendingTransaction {
            transfer: TransferTransaction::new(),
            signer_slots: vec![2],
        });
        assert!(registry.take_pending().is_ok());
        assert_eq!(
            registry.take_pending(),
            Err(FixtureError::Missing(FixtureSlot::PendingTransaction))
        );
    }

    #[test]
    fn reset_clears_every_slot() {
        let mut registry = FixtureRegistry::new();
        registry.set_topic(TopicId::from_num(1001));
        registry.set_token(TokenId::from_num(1002));
        registry.reset();
        assert!(registry.topic().is_err());
        assert!(registry.token().is_err());
    }
}
