//! Step definitions binding participants and checking their balances.
//!
//! The topic and token feature files phrase the opening step differently;
//! each phrasing is bound once.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::helpers::participants::{bind_with_balance_above, fund_participant};
use anyhow::{Context, Result};
use ledger_steps::accounts::Participant;
use rstest_bdd_macros::given;

// ---------------------------------------------------------------------------
// Topic group
// ---------------------------------------------------------------------------

#[given("a first account with more than {hbar:i64} hbars")]
fn first_account_with_hbars(world: &TestWorld, hbar: i64) -> Result<()> {
    bind_with_balance_above(world, Participant::First, hbar)
}

#[given("A second account with more than {hbar:i64} hbars")]
fn second_account_with_hbars(world: &TestWorld, hbar: i64) -> Result<()> {
    bind_with_balance_above(world, Participant::Second, hbar)
}

// ---------------------------------------------------------------------------
// Token group
// ---------------------------------------------------------------------------

#[given("A Hedera account with more than {hbar:i64} hbar")]
fn hedera_account_with_hbar(world: &TestWorld, hbar: i64) -> Result<()> {
    bind_with_balance_above(world, Participant::First, hbar)
}

#[given("A first hedera account with more than {hbar:i64} hbar")]
fn first_hedera_account(world: &TestWorld, hbar: i64) -> Result<()> {
    bind_with_balance_above(world, Participant::First, hbar)
}

#[given("A second Hedera account")]
fn second_hedera_account(world: &TestWorld) -> Result<()> {
    world.scenario(|ctx| {
        let slot = Participant::Second.slot();
        ctx.account_balance(slot)
            .context("the second account should exist on the ledger")?;
        Ok(())
    })
}

#[given("A first hedera account with more than {hbar:i64} hbar and {tokens:u64} HTT tokens")]
fn first_hedera_account_with_tokens(world: &TestWorld, hbar: i64, tokens: u64) -> Result<()> {
    bind_with_balance_above(world, Participant::First, hbar)?;
    world.scenario(|ctx| fund_participant(ctx, Participant::First, 0, tokens))
}

#[given("A {who} Hedera account with {hbar:i64} hbar and {tokens:u64} HTT tokens")]
fn hedera_account_with_tokens(
    world: &TestWorld,
    who: Participant,
    hbar: i64,
    tokens: u64,
) -> Result<()> {
    world.scenario(|ctx| fund_participant(ctx, who, hbar, tokens))
}
