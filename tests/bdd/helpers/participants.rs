//! Binding and funding participants from step phrases.

use super::assertions::{assert_hbars_above, assert_hbars_at_least};
use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result};
use ledger_steps::accounts::Participant;
use ledger_steps::scenario::ScenarioContext;

/// Bind `who` as operator and check it holds more than `hbar`.
///
/// The bound account is remembered as the scenario's account.
pub fn bind_with_balance_above(world: &TestWorld, who: Participant, hbar: i64) -> Result<()> {
    let account_id = world.scenario(|ctx| {
        let account_id = ctx.bind_operator(who.slot())?;
        let balance = ctx.account_balance(who.slot())?;
        assert_hbars_above(balance.hbars, hbar, &who.to_string())?;
        Ok(account_id)
    })?;
    world.account.set(account_id);
    Ok(())
}

/// Check `who` holds at least `hbar` and exactly `tokens` of the current
/// token, moving tokens from the treasury as needed.
pub fn fund_participant(ctx: &mut ScenarioContext, who: Participant, hbar: i64, tokens: u64) -> Result<()> {
    let balance = ctx.account_balance(who.slot())?;
    assert_hbars_at_least(balance.hbars, hbar, &who.to_string())?;
    ctx.ensure_token_balance(who.slot(), tokens)
        .with_context(|| format!("giving the {who} {tokens} HTT tokens"))
}

/// Slot of the bound operator.
pub fn operator_slot(ctx: &ScenarioContext) -> Result<usize> {
    let account_id = ctx
        .client()
        .operator_account_id()
        .context("no account has been bound as operator")?;
    ctx.accounts()
        .slot_of(&account_id)
        .with_context(|| format!("operator {account_id} is not a configured account"))
}
