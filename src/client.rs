//! Ledger client and operator binding.
//!
//! A [`Client`] wraps a shared [`LedgerNetwork`] together with the operator
//! that pays for and authorises submitted transactions. Rebinding the
//! operator replaces the previous one outright.

use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::keys::{PrivateKey, PublicKey};
use crate::network::{LedgerError, LedgerNetwork};
use crate::transaction::TransactionId;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::debug;

/// Request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum fee the operator accepts when none is configured.
pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::new(2);

/// The identity paying for and authorising requests.
#[derive(Debug, Clone)]
pub struct Operator {
    /// Paying account.
    pub account_id: AccountId,
    /// Key signing on behalf of the account.
    pub private_key: PrivateKey,
}

impl Operator {
    /// Public half of the operator key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }
}

/// Client used to submit transactions and run queries.
pub struct Client {
    network: Arc<dyn LedgerNetwork>,
    operator: Option<Operator>,
    request_timeout: Duration,
    max_transaction_fee: Hbar,
    last_valid_start: AtomicI64,
}

impl Client {
    /// Build a client talking to `network` with default settings.
    #[must_use]
    pub fn for_network(network: Arc<dyn LedgerNetwork>) -> Self {
        Self {
            network,
            operator: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            last_valid_start: AtomicI64::new(0),
        }
    }

    /// Install `account_id` and `private_key` as the operator.
    pub fn set_operator(&mut self, account_id: AccountId, private_key: PrivateKey) {
        debug!(%account_id, "operator bound");
        self.operator = Some(Operator {
            account_id,
            private_key,
        });
    }

    /// Remove the operator, returning the previous one.
    pub const fn clear_operator(&mut self) -> Option<Operator> {
        self.operator.take()
    }

    /// Restore a previously taken operator.
    pub fn restore_operator(&mut self, operator: Option<Operator>) {
        self.operator = operator;
    }

    /// Active operator.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] when none is bound.
    pub fn operator(&self) -> Result<&Operator, LedgerError> {
        self.operator.as_ref().ok_or(LedgerError::OperatorNotSet)
    }

    /// Account id of the active operator.
    #[must_use]
    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.operator.as_ref().map(|op| op.account_id)
    }

    /// Public key of the active operator.
    #[must_use]
    pub fn operator_public_key(&self) -> Option<PublicKey> {
        self.operator.as_ref().map(Operator::public_key)
    }

    /// Current request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Replace the request timeout, returning the previous value.
    pub const fn set_request_timeout(&mut self, timeout: Duration) -> Duration {
        std::mem::replace(&mut self.request_timeout, timeout)
    }

    /// Highest fee accepted for transactions frozen by this client.
    #[must_use]
    pub const fn max_transaction_fee(&self) -> Hbar {
        self.max_transaction_fee
    }

    /// Replace the maximum transaction fee.
    pub const fn set_max_transaction_fee(&mut self, fee: Hbar) {
        self.max_transaction_fee = fee;
    }

    /// Network the client submits to.
    #[must_use]
    pub fn network(&self) -> &dyn LedgerNetwork {
        self.network.as_ref()
    }

    /// Generate a fresh transaction id paid by the operator.
    ///
    /// Valid-start times are strictly increasing per client so ids never
    /// collide, even when generated within the same nanosecond.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] when no operator is bound.
    pub fn next_transaction_id(&self) -> Result<TransactionId, LedgerError> {
        let payer = self.operator()?.account_id;
        let now = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos())
            .unwrap_or(i64::MAX);
        let bump = |last: i64| now.max(last.saturating_add(1));
        let previous = self
            .last_valid_start
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
            .unwrap_or_else(|last| last);
        let valid_start = OffsetDateTime::from_unix_timestamp_nanos(i128::from(bump(previous)))?;
        Ok(TransactionId::new(payer, valid_start))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("network", &"<ledger network>")
            .field("operator", &self.operator_account_id())
            .field("request_timeout", &self.request_timeout)
            .field("max_transaction_fee", &self.max_transaction_fee)
            .finish_non_exhaustive()
    }
}
