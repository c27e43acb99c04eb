//! Transactions and their lifecycle.
//!
//! A transaction moves through `Built → Frozen → Signed → Submitted →
//! Receipted`, and each state is a distinct type:
//!
//! - builders in [`body`] are `Built`;
//! - [`Transaction::freeze_with`] yields a [`FrozenTransaction`], which
//!   collects signatures via [`FrozenTransaction::sign`];
//! - [`FrozenTransaction::execute`] submits it and returns a
//!   [`TransactionResponse`];
//! - [`TransactionResponse::get_receipt`] and
//!   [`TransactionResponse::get_record`] wait for the outcome.

mod body;

pub use body::{
    TokenAssociateTransaction, TokenCreateTransaction, TokenMintTransaction, TokenSupplyType,
    TopicCreateTransaction, TopicMessageSubmitTransaction, TransactionBody, TransactionKind,
    TransferTransaction,
};

use crate::client::Client;
use crate::hasher::{DIGEST_LEN, TransactionHasher};
use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::{PrivateKey, PublicKey, Signature};
use crate::network::LedgerError;
use crate::status::Status;
use indexmap::IndexMap;
use std::fmt;
use time::OffsetDateTime;
use tracing::debug;

/// Unique id of a transaction: the payer and its valid-start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId {
    /// Paying account.
    pub account_id: AccountId,
    /// Start of the validity window.
    pub valid_start: OffsetDateTime,
}

impl TransactionId {
    /// Build an id for `account_id` starting at `valid_start`.
    #[must_use]
    pub const fn new(account_id: AccountId, valid_start: OffsetDateTime) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start.unix_timestamp(),
            self.valid_start.nanosecond()
        )
    }
}

/// A transaction body that can be frozen for submission.
pub trait Transaction: Into<TransactionBody> {
    /// Freeze the transaction with `client`'s operator as payer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] when no operator is bound.
    fn freeze_with(self, client: &Client) -> Result<FrozenTransaction, LedgerError> {
        let id = client.next_transaction_id()?;
        let body = self.into();
        debug!(transaction_id = %id, kind = %body.kind(), "froze transaction");
        Ok(FrozenTransaction::new(id, body, client.max_transaction_fee()))
    }
}

impl<T: Into<TransactionBody>> Transaction for T {}

/// One signature attached to a frozen transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    /// Signer's public key.
    pub public_key: PublicKey,
    /// Signature over the transaction digest.
    pub signature: Signature,
}

/// A transaction whose body can no longer change.
#[derive(Debug, Clone)]
pub struct FrozenTransaction {
    id: TransactionId,
    body: TransactionBody,
    max_transaction_fee: Hbar,
    digest: [u8; DIGEST_LEN],
    signatures: Vec<SignaturePair>,
}

impl FrozenTransaction {
    fn new(id: TransactionId, body: TransactionBody, max_transaction_fee: Hbar) -> Self {
        let digest = TransactionHasher::digest(&id, &body);
        Self {
            id,
            body,
            max_transaction_fee,
            digest,
            signatures: Vec::new(),
        }
    }

    /// Transaction id.
    #[must_use]
    pub const fn id(&self) -> &TransactionId {
        &self.id
    }

    /// Frozen body.
    #[must_use]
    pub const fn body(&self) -> &TransactionBody {
        &self.body
    }

    /// Highest fee the payer accepts.
    #[must_use]
    pub const fn max_transaction_fee(&self) -> Hbar {
        self.max_transaction_fee
    }

    /// Bytes every signer signs.
    #[must_use]
    pub const fn signing_payload(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Hex transaction hash.
    #[must_use]
    pub fn hash(&self) -> String {
        TransactionHasher::hex(&self.digest)
    }

    /// Attached signatures.
    #[must_use]
    pub fn signatures(&self) -> &[SignaturePair] {
        &self.signatures
    }

    /// Add a signature from `key`; signing twice with one key is a no-op.
    #[must_use]
    pub fn sign(mut self, key: &PrivateKey) -> Self {
        let public_key = key.public_key();
        if self.signatures.iter().all(|pair| pair.public_key != public_key) {
            let signature = key.sign(&self.digest);
            self.signatures.push(SignaturePair {
                public_key,
                signature,
            });
        }
        self
    }

    /// Submit the transaction through `client`.
    ///
    /// The operator signs automatically when it is the payer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Precheck`] when the network rejects the
    /// transaction before consensus, or [`LedgerError::Timeout`] when the
    /// call exceeds the client's request timeout.
    pub fn execute(self, client: &Client) -> Result<TransactionResponse, LedgerError> {
        let signed = match client.operator() {
            Ok(operator) if operator.account_id == self.id.account_id => {
                self.sign(&operator.private_key)
            }
            _ => self,
        };
        debug!(
            transaction_id = %signed.id,
            signers = signed.signatures.len(),
            "submitting transaction"
        );
        client
            .network()
            .submit(&signed, client.request_timeout())?;
        Ok(TransactionResponse {
            transaction_id: signed.id,
            transaction_hash: signed.hash(),
        })
    }
}

/// Acknowledgement that a transaction was accepted for consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Submitted transaction id.
    pub transaction_id: TransactionId,
    /// Hex transaction hash.
    pub transaction_hash: String,
}

impl TransactionResponse {
    /// Wait for the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReceiptStatus`] when consensus produced any
    /// status other than [`Status::Success`].
    pub fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt, LedgerError> {
        let receipt = client
            .network()
            .receipt(&self.transaction_id, client.request_timeout())?;
        receipt.validate()
    }

    /// Wait for the full record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReceiptStatus`] when consensus produced any
    /// status other than [`Status::Success`].
    pub fn get_record(&self, client: &Client) -> Result<TransactionRecord, LedgerError> {
        let record = client
            .network()
            .record(&self.transaction_id, client.request_timeout())?;
        record.receipt.clone().validate()?;
        Ok(record)
    }
}

/// Consensus outcome of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Final status.
    pub status: Status,
    /// Transaction the receipt belongs to.
    pub transaction_id: TransactionId,
    /// Topic created by the transaction.
    pub topic_id: Option<TopicId>,
    /// Token created by the transaction.
    pub token_id: Option<TokenId>,
    /// Sequence number of a published topic message.
    pub topic_sequence_number: Option<u64>,
    /// Token supply after a mint.
    pub total_supply: Option<u64>,
}

impl TransactionReceipt {
    /// Turn a non-success receipt into an error.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReceiptStatus`] unless the status is
    /// [`Status::Success`].
    pub fn validate(self) -> Result<Self, LedgerError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(LedgerError::ReceiptStatus {
                status: self.status,
                transaction_id: self.transaction_id,
            })
        }
    }
}

/// Receipt plus fee, hash, timestamp and applied transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Receipt of the transaction.
    pub receipt: TransactionReceipt,
    /// Hex transaction hash.
    pub transaction_hash: String,
    /// Consensus timestamp.
    pub consensus_timestamp: OffsetDateTime,
    /// Fee charged to the payer.
    pub transaction_fee: Hbar,
    /// Hbar deltas applied by a transfer.
    pub hbar_transfers: IndexMap<AccountId, Hbar>,
    /// Token deltas applied by a transfer, mint or creation.
    pub token_transfers: IndexMap<TokenId, IndexMap<AccountId, i64>>,
}

impl TransactionRecord {
    /// Account that paid the fee.
    #[must_use]
    pub const fn payer(&self) -> AccountId {
        self.receipt.transaction_id.account_id
    }
}
