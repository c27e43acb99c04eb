//! Transaction hashing utilities.
//!
//! [`TransactionHasher`] computes a stable SHA-256 digest over a transaction
//! id and body. The digest is the payload every signer signs and, hex
//! encoded, the transaction hash reported in records.
//!
//! # Examples
//!
//! ```
//! use ledger_steps::hasher::TransactionHasher;
//! use ledger_steps::ids::{AccountId, TokenId};
//! use ledger_steps::transaction::{TokenMintTransaction, TransactionBody, TransactionId};
//! use time::OffsetDateTime;
//!
//! let id = TransactionId::new(AccountId::from_num(2), OffsetDateTime::UNIX_EPOCH);
//! let body = TransactionBody::from(TokenMintTransaction::new(TokenId::from_num(7), 100));
//! let digest = TransactionHasher::digest(&id, &body);
//! assert_eq!(TransactionHasher::hex(&digest).len(), 64);
//! ```

use sha2::{Digest, Sha256};

use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::Key;
use crate::transaction::{
    TokenCreateTransaction, TokenSupplyType, TopicCreateTransaction, TransactionBody,
    TransactionId, TransferTransaction,
};

/// Length of a transaction digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Computes stable digests for frozen transactions.
pub struct TransactionHasher;

impl TransactionHasher {
    /// Digest `body` as submitted under `id`.
    #[must_use]
    pub fn digest(id: &TransactionId, body: &TransactionBody) -> [u8; DIGEST_LEN] {
        let mut hasher = Sha256::new();
        Self::hash_id(&mut hasher, id);
        Self::hash_body(&mut hasher, body);
        hasher.finalize().into()
    }

    /// Hex encoding of a digest.
    #[must_use]
    pub fn hex(digest: &[u8; DIGEST_LEN]) -> String {
        hex::encode(digest)
    }

    fn hash_id(hasher: &mut Sha256, id: &TransactionId) {
        Self::hash_account(hasher, id.account_id);
        Self::update_number(hasher, id.valid_start.unix_timestamp_nanos());
    }

    fn hash_body(hasher: &mut Sha256, body: &TransactionBody) {
        Self::update_with_len(hasher, body.kind().as_str().as_bytes());
        match body {
            TransactionBody::TopicCreate(tx) => Self::hash_topic_create(hasher, tx),
            TransactionBody::TopicMessageSubmit(tx) => {
                Self::hash_topic(hasher, tx.topic_id);
                Self::update_with_len(hasher, &tx.message);
            }
            TransactionBody::TokenCreate(tx) => Self::hash_token_create(hasher, tx),
            TransactionBody::TokenMint(tx) => {
                Self::hash_token(hasher, tx.token_id);
                Self::update_number(hasher, tx.amount);
            }
            TransactionBody::TokenAssociate(tx) => {
                Self::hash_account(hasher, tx.account_id);
                Self::update_number(hasher, tx.token_ids.len());
                for token in &tx.token_ids {
                    Self::hash_token(hasher, *token);
                }
            }
            TransactionBody::Transfer(tx) => Self::hash_transfer(hasher, tx),
        }
    }

    fn hash_topic_create(hasher: &mut Sha256, tx: &TopicCreateTransaction) {
        Self::update_with_len(hasher, tx.memo.as_bytes());
        Self::hash_optional_key(hasher, tx.admin_key.as_ref());
        Self::hash_optional_key(hasher, tx.submit_key.as_ref());
    }

    fn hash_token_create(hasher: &mut Sha256, tx: &TokenCreateTransaction) {
        Self::update_with_len(hasher, tx.name.as_bytes());
        Self::update_with_len(hasher, tx.symbol.as_bytes());
        Self::update_number(hasher, tx.decimals);
        Self::update_number(hasher, tx.initial_supply);
        match tx.treasury_account_id {
            Some(account) => {
                hasher.update(b"1");
                Self::hash_account(hasher, account);
            }
            None => hasher.update(b"0"),
        }
        Self::hash_optional_key(hasher, tx.admin_key.as_ref());
        Self::hash_optional_key(hasher, tx.supply_key.as_ref());
        hasher.update(match tx.supply_type {
            TokenSupplyType::Infinite => b"inf",
            TokenSupplyType::Finite => b"fin",
        });
        Self::update_number(hasher, tx.max_supply);
        Self::update_with_len(hasher, tx.memo.as_bytes());
    }

    fn hash_transfer(hasher: &mut Sha256, tx: &TransferTransaction) {
        Self::update_number(hasher, tx.hbar_transfers.len());
        for (account, amount) in &tx.hbar_transfers {
            Self::hash_account(hasher, *account);
            Self::hash_hbar(hasher, *amount);
        }
        Self::update_number(hasher, tx.token_transfers.len());
        for (token, lines) in &tx.token_transfers {
            Self::hash_token(hasher, *token);
            Self::update_number(hasher, lines.len());
            for (account, amount) in lines {
                Self::hash_account(hasher, *account);
                Self::update_number(hasher, *amount);
            }
        }
    }

    fn hash_optional_key(hasher: &mut Sha256, key: Option<&Key>) {
        match key {
            Some(k) => {
                hasher.update(b"1");
                Self::hash_key(hasher, k);
            }
            None => hasher.update(b"0"),
        }
    }

    fn hash_key(hasher: &mut Sha256, key: &Key) {
        match key {
            Key::Single(public) => {
                hasher.update(b"k");
                Self::update_with_len(hasher, public.as_bytes());
            }
            Key::List(list) => {
                hasher.update(b"l");
                Self::update_number(hasher, list.threshold().unwrap_or(0));
                Self::update_number(hasher, list.keys().len());
                for member in list.keys() {
                    Self::hash_key(hasher, member);
                }
            }
        }
    }

    fn hash_account(hasher: &mut Sha256, id: AccountId) {
        Self::update_with_len(hasher, id.to_string().as_bytes());
    }

    fn hash_topic(hasher: &mut Sha256, id: TopicId) {
        Self::update_with_len(hasher, id.to_string().as_bytes());
    }

    fn hash_token(hasher: &mut Sha256, id: TokenId) {
        Self::update_with_len(hasher, id.to_string().as_bytes());
    }

    fn hash_hbar(hasher: &mut Sha256, amount: Hbar) {
        Self::update_number(hasher, amount.to_tinybars());
    }

    fn update_number(hasher: &mut Sha256, value: impl std::fmt::Display) {
        hasher.update(format!("{value};").as_bytes());
    }

    fn update_with_len(hasher: &mut Sha256, bytes: &[u8]) {
        let len = bytes.len();
        hasher.update(format!("{len}:").as_bytes());
        hasher.update(bytes);
    }
}
