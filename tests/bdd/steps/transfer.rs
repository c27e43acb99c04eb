//! Step definitions for token balances and transfers.

use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result, ensure};
use ledger_steps::accounts::Participant;
use ledger_steps::hbar::Hbar;
use ledger_steps::scenario::TransferLine;
use ledger_steps::status::Status;
use rstest_bdd_macros::{given, then, when};

fn prepare(world: &TestWorld, lines: &[TransferLine], signers: &[Participant]) -> Result<()> {
    let signer_slots: Vec<usize> = signers.iter().copied().map(Participant::slot).collect();
    world.scenario(|ctx| {
        ctx.prepare_transfer(lines, &signer_slots)
            .context("preparing the transfer")?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("The {who} account holds {amount:u64} HTT tokens")]
fn holds_tokens(world: &TestWorld, who: Participant, amount: u64) -> Result<()> {
    world.scenario(|ctx| {
        ctx.ensure_token_balance(who.slot(), amount)
            .with_context(|| format!("giving the {who} {amount} HTT tokens"))?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("The first account creates a transaction to transfer {amount:u64} HTT tokens to the second account")]
fn first_to_second(world: &TestWorld, amount: u64) -> Result<()> {
    let (from, to) = (Participant::First, Participant::Second);
    prepare(
        world,
        &[TransferLine::debit(from.slot(), amount), TransferLine::credit(to.slot(), amount)],
        &[from],
    )
}

#[when("The second account creates a transaction to transfer {amount:u64} HTT tokens to the first account")]
fn second_to_first(world: &TestWorld, amount: u64) -> Result<()> {
    let (from, to) = (Participant::Second, Participant::First);
    prepare(
        world,
        &[TransferLine::debit(from.slot(), amount), TransferLine::credit(to.slot(), amount)],
        &[from],
    )
}

#[when(
    "A transaction is created to transfer {out:u64} HTT tokens out of the first and second account and {third:u64} HTT tokens into the third account and {fourth:u64} HTT tokens into the fourth account"
)]
fn multi_party_transfer(world: &TestWorld, out: u64, third: u64, fourth: u64) -> Result<()> {
    prepare(
        world,
        &[
            TransferLine::debit(Participant::First.slot(), out),
            TransferLine::debit(Participant::Second.slot(), out),
            TransferLine::credit(Participant::Third.slot(), third),
            TransferLine::credit(Participant::Fourth.slot(), fourth),
        ],
        &[Participant::First, Participant::Second],
    )
}

#[when("The first account submits the transaction")]
fn first_submits(world: &TestWorld) -> Result<()> {
    world.scenario(|ctx| {
        let receipt = ctx
            .submit_pending(Participant::First.slot())
            .context("submitting the pending transfer")?;
        ensure!(receipt.status == Status::Success, "transfer returned {}", receipt.status);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("The {who} account holds {amount:u64} HTT tokens")]
fn has_tokens(world: &TestWorld, who: Participant, amount: u64) -> Result<()> {
    world.scenario(|ctx| {
        let held = ctx.token_balance(who.slot())?;
        ensure!(held == Some(amount), "the {who} holds {held:?} HTT tokens, expected {amount}");
        Ok(())
    })
}

#[then("The first account has paid for the transaction fee")]
fn first_paid_fee(world: &TestWorld) -> Result<()> {
    let payer = Participant::First;
    world.scenario(|ctx| {
        let account_id = ctx.identity(payer.slot())?.account_id;
        let record_payer = ctx.fixtures().record()?.payer();
        ensure!(record_payer == account_id, "transaction was paid by {record_payer}");
        let (fee, drop) = ctx.last_fee_paid(payer.slot())?;
        ensure!(fee > Hbar::default(), "transaction charged no fee");
        ensure!(drop == fee, "payer balance dropped by {drop}, fee was {fee}");
        Ok(())
    })
}
