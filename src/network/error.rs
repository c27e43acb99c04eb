//! Errors surfaced by the ledger boundary.

use crate::status::Status;
use crate::transaction::TransactionId;
use std::time::Duration;
use thiserror::Error;

/// Failures reported by the client or the ledger network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An authorised call was attempted before an operator was bound.
    #[error("client operator has not been set")]
    OperatorNotSet,
    /// The network rejected the transaction before consensus.
    #[error("transaction {transaction_id} failed precheck with status {status}")]
    Precheck {
        /// Precheck status.
        status: Status,
        /// Rejected transaction.
        transaction_id: TransactionId,
    },
    /// The transaction reached consensus with a non-success status.
    #[error("receipt for transaction {transaction_id} contained error status {status}")]
    ReceiptStatus {
        /// Receipt status.
        status: Status,
        /// Failed transaction.
        transaction_id: TransactionId,
    },
    /// A query was answered with a failure status.
    #[error("query failed with status {status}")]
    QueryStatus {
        /// Query status.
        status: Status,
    },
    /// The call's latency exceeded the client's request timeout.
    #[error("request timed out after {timeout:?} (network latency {latency:?})")]
    Timeout {
        /// Client request timeout.
        timeout: Duration,
        /// Latency of the call.
        latency: Duration,
    },
    /// A receipt or record was requested for an unknown transaction.
    #[error("transaction {0} is unknown to the network")]
    UnknownTransaction(TransactionId),
    /// The network state could not be accessed.
    #[error("ledger network is unavailable: {0}")]
    Unavailable(String),
    /// A valid-start timestamp could not be represented.
    #[error("transaction clock out of range: {0}")]
    Clock(#[from] time::error::ComponentRange),
}

impl LedgerError {
    /// Status carried by precheck, receipt or query failures.
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::Precheck { status, .. }
            | Self::ReceiptStatus { status, .. }
            | Self::QueryStatus { status } => Some(*status),
            _ => None,
        }
    }
}
