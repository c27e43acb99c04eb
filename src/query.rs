//! Read-only queries against the ledger.
//!
//! Balance queries are free and need no operator. Info and message queries
//! are authorised calls and require the client's operator to be set.

use crate::client::Client;
use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::Key;
use crate::network::LedgerError;
use crate::transaction::TokenSupplyType;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Balances held by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    /// Queried account.
    pub account_id: AccountId,
    /// Hbar balance.
    pub hbars: Hbar,
    /// Balances of associated tokens.
    pub tokens: BTreeMap<TokenId, u64>,
}

impl AccountBalance {
    /// Balance of `token_id`, or `None` when the account is not associated.
    #[must_use]
    pub fn token(&self, token_id: &TokenId) -> Option<u64> {
        self.tokens.get(token_id).copied()
    }
}

/// Queries the balances of one account.
#[derive(Debug, Clone, Copy)]
pub struct AccountBalanceQuery {
    account_id: AccountId,
}

impl AccountBalanceQuery {
    /// Query the balances of `account_id`.
    #[must_use]
    pub const fn new(account_id: AccountId) -> Self {
        Self { account_id }
    }

    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::QueryStatus`] for unknown accounts.
    pub fn execute(&self, client: &Client) -> Result<AccountBalance, LedgerError> {
        client
            .network()
            .account_balance(&self.account_id, client.request_timeout())
    }
}

/// State of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Token id.
    pub token_id: TokenId,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u32,
    /// Current total supply.
    pub total_supply: u64,
    /// Supply policy.
    pub supply_type: TokenSupplyType,
    /// Supply cap for finite tokens.
    pub max_supply: u64,
    /// Treasury account.
    pub treasury_account_id: AccountId,
    /// Admin key.
    pub admin_key: Option<Key>,
    /// Supply key.
    pub supply_key: Option<Key>,
    /// Token memo.
    pub memo: String,
}

/// Queries the state of a token.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfoQuery {
    token_id: TokenId,
}

impl TokenInfoQuery {
    /// Query `token_id`.
    #[must_use]
    pub const fn new(token_id: TokenId) -> Self {
        Self { token_id }
    }

    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] without an operator and
    /// [`LedgerError::QueryStatus`] for unknown tokens.
    pub fn execute(&self, client: &Client) -> Result<TokenInfo, LedgerError> {
        client.operator()?;
        client
            .network()
            .token_info(&self.token_id, client.request_timeout())
    }
}

/// State of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicInfo {
    /// Topic id.
    pub topic_id: TopicId,
    /// Topic memo.
    pub memo: String,
    /// Admin key.
    pub admin_key: Option<Key>,
    /// Submit key.
    pub submit_key: Option<Key>,
    /// Sequence number of the latest message.
    pub sequence_number: u64,
}

/// Queries the state of a topic.
#[derive(Debug, Clone, Copy)]
pub struct TopicInfoQuery {
    topic_id: TopicId,
}

impl TopicInfoQuery {
    /// Query `topic_id`.
    #[must_use]
    pub const fn new(topic_id: TopicId) -> Self {
        Self { topic_id }
    }

    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] without an operator and
    /// [`LedgerError::QueryStatus`] for unknown topics.
    pub fn execute(&self, client: &Client) -> Result<TopicInfo, LedgerError> {
        client.operator()?;
        client
            .network()
            .topic_info(&self.topic_id, client.request_timeout())
    }
}

/// A message published to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    /// Position of the message in the topic.
    pub sequence_number: u64,
    /// Consensus timestamp.
    pub consensus_timestamp: OffsetDateTime,
    /// Raw contents.
    pub contents: Vec<u8>,
    /// Account that paid for the publication.
    pub payer: AccountId,
}

impl TopicMessage {
    /// Contents decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }
}

/// Reads messages published to a topic.
#[derive(Debug, Clone, Copy)]
pub struct TopicMessageQuery {
    topic_id: TopicId,
}

impl TopicMessageQuery {
    /// Read every message of `topic_id`.
    #[must_use]
    pub const fn new(topic_id: TopicId) -> Self {
        Self { topic_id }
    }

    /// Run the query.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::OperatorNotSet`] without an operator and
    /// [`LedgerError::QueryStatus`] for unknown topics.
    pub fn execute(&self, client: &Client) -> Result<Vec<TopicMessage>, LedgerError> {
        client.operator()?;
        client
            .network()
            .topic_messages(&self.topic_id, client.request_timeout())
    }
}
