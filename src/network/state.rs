//! Mutable ledger state and the rules applied to each transaction kind.
//!
//! Every `apply_*` function validates its whole body before mutating
//! anything, so a failed transaction only costs the payer its fee.

use crate::hbar::Hbar;
use crate::ids::{AccountId, TokenId, TopicId};
use crate::keys::{Key, PublicKey};
use crate::network::LedgerError;
use crate::query::{AccountBalance, TokenInfo, TopicInfo, TopicMessage};
use crate::status::Status;
use crate::transaction::{
    FrozenTransaction, TokenAssociateTransaction, TokenCreateTransaction, TokenMintTransaction,
    TokenSupplyType, TopicCreateTransaction, TopicMessageSubmitTransaction, TransactionBody,
    TransactionId, TransactionReceipt, TransactionRecord, TransferTransaction,
};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use time::OffsetDateTime;

/// Longest memo accepted on topics and tokens, in bytes.
pub(super) const MAX_MEMO_LEN: usize = 100;
/// Largest number of decimals a token may declare.
pub(super) const MAX_TOKEN_DECIMALS: u32 = 18;
/// Entity numbers below this are reserved for genesis accounts.
const FIRST_ENTITY_NUM: u64 = 1000;

#[derive(Debug, Clone)]
pub(super) struct AccountState {
    pub(super) key: Key,
    pub(super) balance: Hbar,
    pub(super) tokens: BTreeMap<TokenId, u64>,
}

#[derive(Debug, Clone)]
pub(super) struct TopicState {
    memo: String,
    admin_key: Option<Key>,
    submit_key: Option<Key>,
    messages: Vec<TopicMessage>,
}

#[derive(Debug, Clone)]
pub(super) struct TokenState {
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: u64,
    supply_type: TokenSupplyType,
    max_supply: u64,
    treasury: AccountId,
    admin_key: Option<Key>,
    supply_key: Option<Key>,
    memo: String,
}

/// Changes produced by a successfully applied body.
#[derive(Debug, Default)]
struct Effects {
    topic_id: Option<TopicId>,
    token_id: Option<TokenId>,
    topic_sequence_number: Option<u64>,
    total_supply: Option<u64>,
    hbar_transfers: IndexMap<AccountId, Hbar>,
    token_transfers: IndexMap<TokenId, IndexMap<AccountId, i64>>,
}

/// Complete state of the simulated ledger.
#[derive(Debug)]
pub(super) struct LedgerState {
    accounts: BTreeMap<AccountId, AccountState>,
    topics: BTreeMap<TopicId, TopicState>,
    tokens: BTreeMap<TokenId, TokenState>,
    records: HashMap<TransactionId, TransactionRecord>,
    next_entity_num: u64,
    clock: OffsetDateTime,
}

impl LedgerState {
    pub(super) fn new(accounts: BTreeMap<AccountId, AccountState>, start: OffsetDateTime) -> Self {
        let highest = accounts.keys().map(|id| id.num).max().unwrap_or(0);
        Self {
            accounts,
            topics: BTreeMap::new(),
            tokens: BTreeMap::new(),
            records: HashMap::new(),
            next_entity_num: highest.saturating_add(1).max(FIRST_ENTITY_NUM),
            clock: start,
        }
    }

    fn next_num(&mut self) -> u64 {
        let num = self.next_entity_num;
        self.next_entity_num = num.saturating_add(1);
        num
    }

    fn tick(&mut self) -> OffsetDateTime {
        self.clock = self.clock.saturating_add(time::Duration::microseconds(1));
        self.clock
    }

    /// Run prechecks, charge the fee and apply `tx`.
    ///
    /// Precheck failures leave the state untouched. Once prechecks pass the
    /// fee is charged and a record is stored whatever the body's outcome.
    pub(super) fn submit(
        &mut self,
        tx: &FrozenTransaction,
        fee: Hbar,
    ) -> Result<TransactionRecord, LedgerError> {
        let id = *tx.id();
        let precheck = |status| LedgerError::Precheck {
            status,
            transaction_id: id,
        };
        if self.records.contains_key(&id) {
            return Err(precheck(Status::DuplicateTransaction));
        }
        let signers = verified_signers(tx);
        let payer = self
            .accounts
            .get(&id.account_id)
            .ok_or_else(|| precheck(Status::PayerAccountNotFound))?;
        if !payer.key.is_satisfied_by(&signers) {
            return Err(precheck(Status::InvalidSignature));
        }
        if fee > tx.max_transaction_fee() {
            return Err(precheck(Status::InsufficientTxFee));
        }
        if payer.balance < fee {
            return Err(precheck(Status::InsufficientPayerBalance));
        }

        if let Some(payer) = self.accounts.get_mut(&id.account_id) {
            payer.balance = payer.balance - fee;
        }
        let consensus_timestamp = self.tick();
        let outcome = self
            .authorise(tx.body(), &signers)
            .and_then(|()| self.apply(tx.body(), id, consensus_timestamp));
        let (status, effects) = match outcome {
            Ok(effects) => (Status::Success, effects),
            Err(status) => (status, Effects::default()),
        };
        let record = TransactionRecord {
            receipt: TransactionReceipt {
                status,
                transaction_id: id,
                topic_id: effects.topic_id,
                token_id: effects.token_id,
                topic_sequence_number: effects.topic_sequence_number,
                total_supply: effects.total_supply,
            },
            transaction_hash: tx.hash(),
            consensus_timestamp,
            transaction_fee: fee,
            hbar_transfers: effects.hbar_transfers,
            token_transfers: effects.token_transfers,
        };
        self.records.insert(id, record.clone());
        Ok(record)
    }

    /// Check the per-kind keys a body requires beyond the payer's.
    fn authorise(&self, body: &TransactionBody, signers: &BTreeSet<PublicKey>) -> Result<(), Status> {
        let satisfied = |key: Option<&Key>| key.is_none_or(|k| k.is_satisfied_by(signers));
        let account_key = |id: &AccountId| self.accounts.get(id).map(|a| &a.key);
        let ok = match body {
            TransactionBody::TopicCreate(create) => satisfied(create.admin_key.as_ref()),
            TransactionBody::TopicMessageSubmit(submit) => {
                let topic = self.topics.get(&submit.topic_id).ok_or(Status::InvalidTopicId)?;
                satisfied(topic.submit_key.as_ref())
            }
            TransactionBody::TokenCreate(create) => {
                let treasury = create
                    .treasury_account_id
                    .and_then(|id| account_key(&id).cloned())
                    .ok_or(Status::InvalidTreasuryAccountForToken)?;
                treasury.is_satisfied_by(signers) && satisfied(create.admin_key.as_ref())
            }
            TransactionBody::TokenMint(mint) => {
                let token = self.tokens.get(&mint.token_id).ok_or(Status::InvalidTokenId)?;
                let supply_key = token.supply_key.as_ref().ok_or(Status::TokenHasNoSupplyKey)?;
                supply_key.is_satisfied_by(signers)
            }
            TransactionBody::TokenAssociate(associate) => {
                let key = account_key(&associate.account_id).ok_or(Status::InvalidAccountId)?;
                key.is_satisfied_by(signers)
            }
            TransactionBody::Transfer(transfer) => {
                let mut ok = true;
                for account in transfer.debited_accounts() {
                    let key = account_key(&account).ok_or(Status::InvalidAccountId)?;
                    ok &= key.is_satisfied_by(signers);
                }
                ok
            }
        };
        if ok { Ok(()) } else { Err(Status::InvalidSignature) }
    }

    fn apply(
        &mut self,
        body: &TransactionBody,
        id: TransactionId,
        at: OffsetDateTime,
    ) -> Result<Effects, Status> {
        match body {
            TransactionBody::TopicCreate(create) => self.apply_topic_create(create),
            TransactionBody::TopicMessageSubmit(submit) => {
                self.apply_topic_message(submit, id.account_id, at)
            }
            TransactionBody::TokenCreate(create) => self.apply_token_create(create),
            TransactionBody::TokenMint(mint) => self.apply_token_mint(mint),
            TransactionBody::TokenAssociate(associate) => self.apply_token_associate(associate),
            TransactionBody::Transfer(transfer) => self.apply_transfer(transfer),
        }
    }

    fn apply_topic_create(&mut self, create: &TopicCreateTransaction) -> Result<Effects, Status> {
        if create.memo.len() > MAX_MEMO_LEN {
            return Err(Status::MemoTooLong);
        }
        let topic_id = TopicId::from_num(self.next_num());
        self.topics.insert(
            topic_id,
            TopicState {
                memo: create.memo.clone(),
                admin_key: create.admin_key.clone(),
                submit_key: create.submit_key.clone(),
                messages: Vec::new(),
            },
        );
        Ok(Effects {
            topic_id: Some(topic_id),
            ..Effects::default()
        })
    }

    fn apply_topic_message(
        &mut self,
        submit: &TopicMessageSubmitTransaction,
        payer: AccountId,
        at: OffsetDateTime,
    ) -> Result<Effects, Status> {
        if submit.message.is_empty() {
            return Err(Status::InvalidTopicMessage);
        }
        let topic = self
            .topics
            .get_mut(&submit.topic_id)
            .ok_or(Status::InvalidTopicId)?;
        let sequence_number = u64::try_from(topic.messages.len())
            .map_or(u64::MAX, |len| len.saturating_add(1));
        topic.messages.push(TopicMessage {
            sequence_number,
            consensus_timestamp: at,
            contents: submit.message.clone(),
            payer,
        });
        Ok(Effects {
            topic_sequence_number: Some(sequence_number),
            ..Effects::default()
        })
    }

    fn apply_token_create(&mut self, create: &TokenCreateTransaction) -> Result<Effects, Status> {
        if create.name.is_empty() {
            return Err(Status::MissingTokenName);
        }
        if create.symbol.is_empty() {
            return Err(Status::MissingTokenSymbol);
        }
        if create.memo.len() > MAX_MEMO_LEN {
            return Err(Status::MemoTooLong);
        }
        if create.decimals > MAX_TOKEN_DECIMALS {
            return Err(Status::InvalidTokenDecimals);
        }
        match create.supply_type {
            TokenSupplyType::Finite if create.max_supply == 0 => {
                return Err(Status::InvalidTokenMaxSupply);
            }
            TokenSupplyType::Infinite if create.max_supply != 0 => {
                return Err(Status::InvalidTokenMaxSupply);
            }
            TokenSupplyType::Finite if create.initial_supply > create.max_supply => {
                return Err(Status::InvalidTokenInitialSupply);
            }
            _ => {}
        }
        if i64::try_from(create.initial_supply).is_err() {
            return Err(Status::InvalidTokenInitialSupply);
        }
        let treasury = create
            .treasury_account_id
            .filter(|id| self.accounts.contains_key(id))
            .ok_or(Status::InvalidTreasuryAccountForToken)?;

        let token_id = TokenId::from_num(self.next_num());
        self.tokens.insert(
            token_id,
            TokenState {
                name: create.name.clone(),
                symbol: create.symbol.clone(),
                decimals: create.decimals,
                total_supply: create.initial_supply,
                supply_type: create.supply_type,
                max_supply: create.max_supply,
                treasury,
                admin_key: create.admin_key.clone(),
                supply_key: create.supply_key.clone(),
                memo: create.memo.clone(),
            },
        );
        if let Some(account) = self.accounts.get_mut(&treasury) {
            account.tokens.insert(token_id, create.initial_supply);
        }
        let mut effects = Effects {
            token_id: Some(token_id),
            total_supply: Some(create.initial_supply),
            ..Effects::default()
        };
        if let Ok(credit) = i64::try_from(create.initial_supply)
            && credit > 0
        {
            effects
                .token_transfers
                .entry(token_id)
                .or_default()
                .insert(treasury, credit);
        }
        Ok(effects)
    }

    fn apply_token_mint(&mut self, mint: &TokenMintTransaction) -> Result<Effects, Status> {
        if mint.amount == 0 {
            return Err(Status::InvalidTokenMintAmount);
        }
        let credit = i64::try_from(mint.amount).map_err(|_| Status::InvalidTokenMintAmount)?;
        let token = self.tokens.get(&mint.token_id).ok_or(Status::InvalidTokenId)?;
        let total = token
            .total_supply
            .checked_add(mint.amount)
            .ok_or(Status::TokenMaxSupplyReached)?;
        if token.supply_type == TokenSupplyType::Finite && total > token.max_supply {
            return Err(Status::TokenMaxSupplyReached);
        }
        let treasury = token.treasury;
        let holding = self
            .accounts
            .get_mut(&treasury)
            .and_then(|account| account.tokens.get_mut(&mint.token_id))
            .ok_or(Status::TokenNotAssociatedToAccount)?;
        *holding = holding.saturating_add(mint.amount);
        if let Some(token) = self.tokens.get_mut(&mint.token_id) {
            token.total_supply = total;
        }
        let mut effects = Effects {
            total_supply: Some(total),
            ..Effects::default()
        };
        effects
            .token_transfers
            .entry(mint.token_id)
            .or_default()
            .insert(treasury, credit);
        Ok(effects)
    }

    fn apply_token_associate(
        &mut self,
        associate: &TokenAssociateTransaction,
    ) -> Result<Effects, Status> {
        let account = self
            .accounts
            .get(&associate.account_id)
            .ok_or(Status::InvalidAccountId)?;
        let mut seen = BTreeSet::new();
        for token_id in &associate.token_ids {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            if account.tokens.contains_key(token_id) || !seen.insert(*token_id) {
                return Err(Status::TokenAlreadyAssociatedToAccount);
            }
        }
        if let Some(account) = self.accounts.get_mut(&associate.account_id) {
            for token_id in seen {
                account.tokens.insert(token_id, 0);
            }
        }
        Ok(Effects::default())
    }

    fn apply_transfer(&mut self, transfer: &TransferTransaction) -> Result<Effects, Status> {
        let hbar_sum = transfer
            .hbar_transfers
            .values()
            .try_fold(Hbar::ZERO, |acc, amount| acc.checked_add(*amount));
        if hbar_sum != Some(Hbar::ZERO) {
            return Err(Status::InvalidAccountAmounts);
        }
        let mut hbar_after = BTreeMap::new();
        for (account_id, amount) in &transfer.hbar_transfers {
            let account = self.accounts.get(account_id).ok_or(Status::InvalidAccountId)?;
            let after = account
                .balance
                .checked_add(*amount)
                .filter(|after| *after >= Hbar::ZERO)
                .ok_or(Status::InsufficientAccountBalance)?;
            hbar_after.insert(*account_id, after);
        }

        let mut token_after = BTreeMap::new();
        for (token_id, lines) in &transfer.token_transfers {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            let sum = lines
                .values()
                .try_fold(0_i64, |acc, amount| acc.checked_add(*amount));
            if sum != Some(0) {
                return Err(Status::TransfersNotZeroSumForToken);
            }
            for (account_id, amount) in lines {
                let account = self.accounts.get(account_id).ok_or(Status::InvalidAccountId)?;
                let held = *account
                    .tokens
                    .get(token_id)
                    .ok_or(Status::TokenNotAssociatedToAccount)?;
                let after = if *amount < 0 {
                    held.checked_sub(amount.unsigned_abs())
                        .ok_or(Status::InsufficientTokenBalance)?
                } else {
                    held.saturating_add(amount.unsigned_abs())
                };
                token_after.insert((*account_id, *token_id), after);
            }
        }

        for (account_id, balance) in hbar_after {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.balance = balance;
            }
        }
        for ((account_id, token_id), held) in token_after {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.tokens.insert(token_id, held);
            }
        }
        Ok(Effects {
            hbar_transfers: transfer.hbar_transfers.clone(),
            token_transfers: transfer.token_transfers.clone(),
            ..Effects::default()
        })
    }

    pub(super) fn record(&self, id: &TransactionId) -> Result<TransactionRecord, LedgerError> {
        self.records
            .get(id)
            .cloned()
            .ok_or(LedgerError::UnknownTransaction(*id))
    }

    pub(super) fn account_balance(&self, id: &AccountId) -> Result<AccountBalance, LedgerError> {
        let account = self.accounts.get(id).ok_or(LedgerError::QueryStatus {
            status: Status::InvalidAccountId,
        })?;
        Ok(AccountBalance {
            account_id: *id,
            hbars: account.balance,
            tokens: account.tokens.clone(),
        })
    }

    pub(super) fn token_info(&self, id: &TokenId) -> Result<TokenInfo, LedgerError> {
        let token = self.tokens.get(id).ok_or(LedgerError::QueryStatus {
            status: Status::InvalidTokenId,
        })?;
        Ok(TokenInfo {
            token_id: *id,
            name: token.name.clone(),
            symbol: token.symbol.clone(),
            decimals: token.decimals,
            total_supply: token.total_supply,
            supply_type: token.supply_type,
            max_supply: token.max_supply,
            treasury_account_id: token.treasury,
            admin_key: token.admin_key.clone(),
            supply_key: token.supply_key.clone(),
            memo: token.memo.clone(),
        })
    }

    fn topic(&self, id: &TopicId) -> Result<&TopicState, LedgerError> {
        self.topics.get(id).ok_or(LedgerError::QueryStatus {
            status: Status::InvalidTopicId,
        })
    }

    pub(super) fn topic_info(&self, id: &TopicId) -> Result<TopicInfo, LedgerError> {
        let topic = self.topic(id)?;
        Ok(TopicInfo {
            topic_id: *id,
            memo: topic.memo.clone(),
            admin_key: topic.admin_key.clone(),
            submit_key: topic.submit_key.clone(),
            sequence_number: u64::try_from(topic.messages.len()).unwrap_or(u64::MAX),
        })
    }

    pub(super) fn topic_messages(&self, id: &TopicId) -> Result<Vec<TopicMessage>, LedgerError> {
        Ok(self.topic(id)?.messages.clone())
    }
}

/// Public keys whose signatures verify against the transaction digest.
fn verified_signers(tx: &FrozenTransaction) -> BTreeSet<PublicKey> {
    tx.signatures()
        .iter()
        .filter(|pair| pair.public_key.verify(tx.signing_payload(), &pair.signature))
        .map(|pair| pair.public_key)
        .collect()
}
