//! Transaction builders.
//!
//! Each builder is the body of one transaction kind. Builders are the
//! `Built` state: they only become submittable once frozen with a client via
//! [`Transaction::freeze_with`](super::Transaction::freeze_with).

use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::Key;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a transaction body, used for fees and latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Consensus topic creation.
    TopicCreate,
    /// Message submission to a topic.
    TopicMessageSubmit,
    /// Fungible token creation.
    TokenCreate,
    /// Minting additional token supply.
    TokenMint,
    /// Associating an account with tokens.
    TokenAssociate,
    /// Hbar and token transfers.
    Transfer,
}

impl TransactionKind {
    /// Stable snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopicCreate => "topic_create",
            Self::TopicMessageSubmit => "topic_message_submit",
            Self::TokenCreate => "token_create",
            Self::TokenMint => "token_mint",
            Self::TokenAssociate => "token_associate",
            Self::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a frozen transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    /// See [`TopicCreateTransaction`].
    TopicCreate(TopicCreateTransaction),
    /// See [`TopicMessageSubmitTransaction`].
    TopicMessageSubmit(TopicMessageSubmitTransaction),
    /// See [`TokenCreateTransaction`].
    TokenCreate(TokenCreateTransaction),
    /// See [`TokenMintTransaction`].
    TokenMint(TokenMintTransaction),
    /// See [`TokenAssociateTransaction`].
    TokenAssociate(TokenAssociateTransaction),
    /// See [`TransferTransaction`].
    Transfer(TransferTransaction),
}

impl TransactionBody {
    /// Kind of this body.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::TopicCreate(_) => TransactionKind::TopicCreate,
            Self::TopicMessageSubmit(_) => TransactionKind::TopicMessageSubmit,
            Self::TokenCreate(_) => TransactionKind::TokenCreate,
            Self::TokenMint(_) => TransactionKind::TokenMint,
            Self::TokenAssociate(_) => TransactionKind::TokenAssociate,
            Self::Transfer(_) => TransactionKind::Transfer,
        }
    }
}

/// Creates a consensus topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCreateTransaction {
    /// Topic memo.
    pub memo: String,
    /// Key allowed to update or delete the topic.
    pub admin_key: Option<Key>,
    /// Key that must sign every submitted message.
    pub submit_key: Option<Key>,
}

impl TopicCreateTransaction {
    /// Start an empty topic creation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the topic memo.
    #[must_use]
    pub fn topic_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Set the admin key.
    #[must_use]
    pub fn admin_key(mut self, key: impl Into<Key>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Set the submit key.
    #[must_use]
    pub fn submit_key(mut self, key: impl Into<Key>) -> Self {
        self.submit_key = Some(key.into());
        self
    }
}

/// Publishes a message to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessageSubmitTransaction {
    /// Target topic.
    pub topic_id: TopicId,
    /// Message payload.
    pub message: Vec<u8>,
}

impl TopicMessageSubmitTransaction {
    /// Submit `message` to `topic_id`.
    #[must_use]
    pub fn new(topic_id: TopicId, message: impl Into<Vec<u8>>) -> Self {
        Self {
            topic_id,
            message: message.into(),
        }
    }
}

/// Supply policy of a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSupplyType {
    /// Supply may grow without bound.
    #[default]
    Infinite,
    /// Supply is capped at the token's maximum supply.
    Finite,
}

/// Creates a fungible token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCreateTransaction {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Number of decimal places.
    pub decimals: u32,
    /// Supply credited to the treasury at creation.
    pub initial_supply: u64,
    /// Account receiving the initial supply.
    pub treasury_account_id: Option<AccountId>,
    /// Key allowed to update or delete the token.
    pub admin_key: Option<Key>,
    /// Key that must sign mints.
    pub supply_key: Option<Key>,
    /// Supply policy.
    pub supply_type: TokenSupplyType,
    /// Cap for finite tokens; zero for infinite ones.
    pub max_supply: u64,
    /// Token memo.
    pub memo: String,
}

impl TokenCreateTransaction {
    /// Start an empty token creation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token name.
    #[must_use]
    pub fn token_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the token symbol.
    #[must_use]
    pub fn token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Set the number of decimals.
    #[must_use]
    pub const fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Set the initial supply.
    #[must_use]
    pub const fn initial_supply(mut self, supply: u64) -> Self {
        self.initial_supply = supply;
        self
    }

    /// Set the treasury account.
    #[must_use]
    pub const fn treasury_account_id(mut self, account_id: AccountId) -> Self {
        self.treasury_account_id = Some(account_id);
        self
    }

    /// Set the admin key.
    #[must_use]
    pub fn admin_key(mut self, key: impl Into<Key>) -> Self {
        self.admin_key = Some(key.into());
        self
    }

    /// Set the supply key.
    #[must_use]
    pub fn supply_key(mut self, key: impl Into<Key>) -> Self {
        self.supply_key = Some(key.into());
        self
    }

    /// Set the supply type.
    #[must_use]
    pub const fn supply_type(mut self, supply_type: TokenSupplyType) -> Self {
        self.supply_type = supply_type;
        self
    }

    /// Set the maximum supply.
    #[must_use]
    pub const fn max_supply(mut self, max_supply: u64) -> Self {
        self.max_supply = max_supply;
        self
    }

    /// Set the token memo.
    #[must_use]
    pub fn token_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// Mints additional supply into the treasury.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMintTransaction {
    /// Token to mint.
    pub token_id: TokenId,
    /// Amount in the token's smallest unit.
    pub amount: u64,
}

impl TokenMintTransaction {
    /// Mint `amount` units of `token_id`.
    #[must_use]
    pub const fn new(token_id: TokenId, amount: u64) -> Self {
        Self { token_id, amount }
    }
}

/// Makes an account eligible to hold tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAssociateTransaction {
    /// Account being associated.
    pub account_id: AccountId,
    /// Tokens to associate.
    pub token_ids: Vec<TokenId>,
}

impl TokenAssociateTransaction {
    /// Associate `account_id` with `token_ids`.
    #[must_use]
    pub const fn new(account_id: AccountId, token_ids: Vec<TokenId>) -> Self {
        Self {
            account_id,
            token_ids,
        }
    }
}

/// Moves hbar and tokens between accounts.
///
/// Lines for the same account accumulate, so each account appears at most
/// once per currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferTransaction {
    /// Hbar deltas per account.
    pub hbar_transfers: IndexMap<AccountId, Hbar>,
    /// Token deltas per token and account.
    pub token_transfers: IndexMap<TokenId, IndexMap<AccountId, i64>>,
}

impl TransferTransaction {
    /// Start an empty transfer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an hbar delta for `account_id`.
    #[must_use]
    pub fn hbar_transfer(mut self, account_id: AccountId, amount: Hbar) -> Self {
        let entry = self.hbar_transfers.entry(account_id).or_default();
        *entry = *entry + amount;
        self
    }

    /// Add a token delta for `account_id`.
    #[must_use]
    pub fn token_transfer(mut self, token_id: TokenId, account_id: AccountId, amount: i64) -> Self {
        let entry = self
            .token_transfers
            .entry(token_id)
            .or_default()
            .entry(account_id)
            .or_default();
        *entry = entry.saturating_add(amount);
        self
    }

    /// Accounts debited by this transfer, in line order.
    #[must_use]
    pub fn debited_accounts(&self) -> Vec<AccountId> {
        let mut debited: Vec<AccountId> = Vec::new();
        let hbar = self
            .hbar_transfers
            .iter()
            .filter(|(_, amount)| amount.to_tinybars() < 0)
            .map(|(account, _)| *account);
        let tokens = self
            .token_transfers
            .values()
            .flat_map(|lines| lines.iter())
            .filter(|(_, amount)| **amount < 0)
            .map(|(account, _)| *account);
        for account in hbar.chain(tokens) {
            if !debited.contains(&account) {
                debited.push(account);
            }
        }
        debited
    }
}

macro_rules! impl_into_body {
    ($($builder:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$builder> for TransactionBody {
                fn from(builder: $builder) -> Self {
                    Self::$variant(builder)
                }
            }
        )+
    };
}

impl_into_body!(
    TopicCreateTransaction => TopicCreate,
    TopicMessageSubmitTransaction => TopicMessageSubmit,
    TokenCreateTransaction => TokenCreate,
    TokenMintTransaction => TokenMint,
    TokenAssociateTransaction => TokenAssociate,
    TransferTransaction => Transfer,
);
