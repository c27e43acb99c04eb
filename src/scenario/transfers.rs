//! Multi-step token transfers.
//!
//! One step prepares a transfer and names who must sign it; a later step
//! picks the payer and submits. The transfer body is only frozen at
//! submission, once the payer is known.

use super::{ScenarioContext, ScenarioError};
use crate::fixtures::{PayerSnapshot, PendingTransaction};
use crate::hbar::Hbar;
use crate::transaction::{TransactionReceipt, TransferTransaction};
use tracing::debug;

/// One token line of a prepared transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLine {
    /// Slot credited (positive) or debited (negative).
    pub slot: usize,
    /// Signed amount in the token's smallest unit.
    pub amount: i64,
}

impl TransferLine {
    /// Debit `amount` from `slot`.
    #[must_use]
    pub const fn debit(slot: usize, amount: u64) -> Self {
        Self {
            slot,
            amount: 0_i64.saturating_sub_unsigned(amount),
        }
    }

    /// Credit `amount` to `slot`.
    #[must_use]
    pub const fn credit(slot: usize, amount: u64) -> Self {
        Self {
            slot,
            amount: 0_i64.saturating_add_unsigned(amount),
        }
    }
}

impl ScenarioContext {
    /// Build a transfer of the current token and park it until submission.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before a token exists and
    /// [`ScenarioError::Config`] for unknown slots.
    pub fn prepare_transfer(
        &mut self,
        lines: &[TransferLine],
        signer_slots: &[usize],
    ) -> Result<(), ScenarioError> {
        let token_id = self.fixtures().token()?;
        let mut transfer = TransferTransaction::new();
        for line in lines {
            let account_id = self.identity(line.slot)?.account_id;
            transfer = transfer.token_transfer(token_id, account_id, line.amount);
        }
        self.fixtures_mut().set_pending(PendingTransaction {
            transfer,
            signer_slots: signer_slots.to_vec(),
        });
        Ok(())
    }

    /// Submit the pending transfer with `payer_slot` as operator.
    ///
    /// The payer stays bound afterwards, and its balance before submission
    /// is kept for fee checks.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] when nothing is pending and
    /// [`ScenarioError::Ledger`] when the transfer fails.
    pub fn submit_pending(&mut self, payer_slot: usize) -> Result<TransactionReceipt, ScenarioError> {
        let pending = self.fixtures_mut().take_pending()?;
        let account_id = self.bind_operator(payer_slot)?;
        let balance_before = self.account_balance(payer_slot)?.hbars;
        self.fixtures_mut().set_payer_snapshot(PayerSnapshot {
            account_id,
            balance_before,
        });
        debug!(payer = %account_id, signers = ?pending.signer_slots, "submitting pending transfer");
        self.execute(pending.transfer, &pending.signer_slots)
    }

    /// Fee charged by the last submission and the payer's balance change.
    ///
    /// Returns `(fee, balance_drop)` where `balance_drop` is the snapshot
    /// minus the payer's current balance.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Fixture`] before any pending submission.
    pub fn last_fee_paid(&self, payer_slot: usize) -> Result<(Hbar, Hbar), ScenarioError> {
        let snapshot = self.fixtures().payer_snapshot()?;
        let fee = self.fixtures().record()?.transaction_fee;
        let now = self.account_balance(payer_slot)?.hbars;
        Ok((fee, snapshot.balance_before - now))
    }
}
