//! Token operations of the scenario context.

use super::{ScenarioContext, ScenarioError};
use crate::query::{TokenInfo, TokenInfoQuery};
use crate::transaction::{
    TokenAssociateTransaction, TokenCreateTransaction, TokenMintTransaction, TokenSupplyType,
    TransactionReceipt, TransferTransaction,
};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Supply policy of a token to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenSupply {
    /// No cap.
    #[default]
    Infinite,
    /// Capped at `max`.
    Finite {
        /// Maximum supply.
        max: u64,
    },
}

/// Description of a token a step wants created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Decimal places.
    pub decimals: u32,
    /// Supply credited to the treasury.
    pub initial_supply: u64,
    /// Slot of the treasury account.
    pub treasury_slot: usize,
    /// Supply policy.
    pub supply: TokenSupply,
    /// Slot whose key may mint, if any.
    pub supply_key_slot: Option<usize>,
    /// Slot whose key administers the token, if any.
    pub admin_key_slot: Option<usize>,
}

impl TokenSpec {
    /// Token treasured by `treasury_slot` with no supply and no keys.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, treasury_slot: usize) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: 0,
            initial_supply: 0,
            treasury_slot,
            supply: TokenSupply::Infinite,
            supply_key_slot: None,
            admin_key_slot: None,
        }
    }

    /// Set the decimals.
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

    /// Cap the supply at `max`.
    #[must_use]
    pub const fn finite(mut self, max: u64) -> Self {
        self.supply = TokenSupply::Finite { max };
        self
    }

    /// Let `slot` mint.
    #[must_use]
    pub const fn supply_key(mut self, slot: usize) -> Self {
        self.supply_key_slot = Some(slot);
        self
    }

    /// Let `slot` administer the token.
    #[must_use]
    pub const fn admin_key(mut self, slot: usize) -> Self {
        self.admin_key_slot = Some(slot);
        self
    }
}

impl ScenarioContext {
    /// Create the token described by `spec` and make it current.
    ///
    /// The treasury, supply and admin keys co-sign the creation.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Ledger`] without an operator or when the
    /// ledger rejects the token.
    pub fn create_token(&mut self, spec: &TokenSpec) -> Result<TransactionReceipt, ScenarioError> {
        let treasury = self.identity(spec.treasury_slot)?.account_id;
        let mut tx = TokenCreateTransaction::new()
            .token_name(spec.name.as_str())
            .token_symbol(spec.symbol.as_str())
            .decimals(spec.decimals)
            .initial_supply(spec.initial_supply)
            .treasury_account_id(treasury);
        if let TokenSupply::Finite { max } = spec.supply {
            tx = tx.supply_type(TokenSupplyType::Finite).max_supply(max);
        }
        let mut signers = vec![spec.treasury_slot];
        if let Some(slot) = spec.supply_key_slot {
            tx = tx.supply_key(self.identity(slot)?.public_key);
            signers.push(slot);
        }
        if let Some(slot) = spec.admin_key_slot {
            tx = tx.admin_key(self.identity(slot)?.public_key);
            signers.push(slot);
        }
        let receipt = self.execute(tx, &signers)?;
        let token_id = receipt.token_id.ok_or(ScenarioError::IncompleteReceipt {
            operation: "token create",
            field: "token id",
        })?;
        info!(%token_id, name = %spec.name, symbol = %spec.symbol, "token ready");
        self.fixtures_mut().set_token(token_id);
        Ok(receipt)
    }

    /// Mint `amount` of the current token, signed by its supply key slot.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Ledger`] when minting fails.
    pub fn mint(
        &mut self,
        amount: u64,
        supply_key_slot: usize,
    ) -> Result<TransactionReceipt, ScenarioError> {
        let token_id = self.fixtures().token()?;
        self.execute(TokenMintTransaction::new(token_id, amount), &[supply_key_slot])
    }

    /// State of the current token.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Ledger`] when the query fails.
    pub fn token_info(&self) -> Result<TokenInfo, ScenarioError> {
        let token_id = self.fixtures().token()?;
        Ok(TokenInfoQuery::new(token_id).execute(self.client())?)
    }

    /// Current token balance of `slot`, `None` when not associated.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Ledger`] when the query fails.
    pub fn token_balance(&self, slot: usize) -> Result<Option<u64>, ScenarioError> {
        let token_id = self.fixtures().token()?;
        Ok(self.account_balance(slot)?.token(&token_id))
    }

    /// Associate `slot` with the current token unless it already is.
    ///
    /// The treasury pays; `slot` signs.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Ledger`] when the association fails.
    pub fn associate(&mut self, slot: usize) -> Result<(), ScenarioError> {
        let token_id = self.fixtures().token()?;
        if self.token_balance(slot)?.is_some() {
            debug!(slot, %token_id, "already associated");
            return Ok(());
        }
        let account_id = self.identity(slot)?.account_id;
        let treasury = self.treasury_slot();
        self.with_operator(treasury, |ctx| {
            ctx.execute(
                TokenAssociateTransaction::new(account_id, vec![token_id]),
                &[slot],
            )
        })?;
        Ok(())
    }

    /// Make `slot` hold exactly `amount` of the current token.
    ///
    /// The slot is associated first, then the difference moves to or from
    /// the token's treasury. Queries run as the fixture treasury so no
    /// operator needs to be bound beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Ledger`] when a transfer fails.
    pub fn ensure_token_balance(&mut self, slot: usize, amount: u64) -> Result<(), ScenarioError> {
        let fixture_treasury = self.treasury_slot();
        let info = self.with_operator(fixture_treasury, |ctx| ctx.token_info())?;
        self.associate(slot)?;
        let held = self.token_balance(slot)?.unwrap_or(0);
        let treasury_id = info.treasury_account_id;
        let treasury_slot = self
            .accounts()
            .slot_of(&treasury_id)
            .ok_or(ScenarioError::UnmanagedAccount(treasury_id))?;
        if treasury_slot == slot {
            return if held == amount {
                Ok(())
            } else {
                Err(ScenarioError::TreasuryBalance { held, wanted: amount })
            };
        }
        let account_id = self.identity(slot)?.account_id;
        let (debited, from, to, difference) = match held.cmp(&amount) {
            Ordering::Equal => return Ok(()),
            Ordering::Less => (treasury_slot, treasury_id, account_id, amount.saturating_sub(held)),
            Ordering::Greater => (slot, account_id, treasury_id, held.saturating_sub(amount)),
        };
        let delta = i64::try_from(difference)
            .map_err(|_| ScenarioError::AmountOutOfRange(difference))?;
        let transfer = TransferTransaction::new()
            .token_transfer(info.token_id, from, -delta)
            .token_transfer(info.token_id, to, delta);
        debug!(slot, held, amount, "adjusting token balance");
        self.with_operator(debited, |ctx| ctx.execute(transfer, &[]))?;
        Ok(())
    }
}
