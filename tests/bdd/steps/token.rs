//! Step definitions for token creation, queries and minting.

use crate::bdd::fixtures::TestWorld;
use crate::bdd::helpers::assertions::assert_rejected_with;
use crate::bdd::helpers::participants::operator_slot;
use crate::bdd::types::TokenLabel;
use anyhow::{Context, Result, ensure};
use ledger_steps::query::TokenInfo;
use ledger_steps::scenario::TokenSpec;
use ledger_steps::status::Status;
use rstest_bdd_macros::{given, then, when};
use std::time::Duration;

const TOKEN_NAME: &str = "Test Token";
const TOKEN_SYMBOL: &str = "HTT";
const TOKEN_DECIMALS: u32 = 2;
/// Request timeout granted to the shared token fixture.
const FIXTURE_TIMEOUT: Duration = Duration::from_secs(30);

fn test_token(treasury_slot: usize) -> TokenSpec {
    TokenSpec::new(TOKEN_NAME, TOKEN_SYMBOL, treasury_slot)
        .decimals(TOKEN_DECIMALS)
        .supply_key(treasury_slot)
}

fn with_token_info(world: &TestWorld, check: impl FnOnce(&TokenInfo) -> Result<()>) -> Result<()> {
    world.scenario(|ctx| {
        let info = ctx.token_info().context("querying the token")?;
        check(&info)
    })
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("A token named Test Token (HTT) with {supply:u64} tokens")]
fn token_fixture(world: &TestWorld, supply: u64) -> Result<()> {
    world.scenario(|ctx| {
        let treasury = ctx.treasury_slot();
        let spec = test_token(treasury).initial_supply(supply);
        ctx.with_request_timeout(FIXTURE_TIMEOUT, |slow| {
            slow.with_operator(treasury, |as_treasury| as_treasury.create_token(&spec))
        })
        .context("creating the shared test token")?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("I create a token named Test Token (HTT)")]
fn create_mintable_token(world: &TestWorld) -> Result<()> {
    world.scenario(|ctx| {
        let slot = operator_slot(ctx)?;
        ctx.create_token(&test_token(slot))
            .context("creating a mintable token")?;
        Ok(())
    })
}

#[when("I create a fixed supply token named Test Token (HTT) with {supply:u64} tokens")]
fn create_fixed_supply_token(world: &TestWorld, supply: u64) -> Result<()> {
    world.scenario(|ctx| {
        let slot = operator_slot(ctx)?;
        let spec = test_token(slot).initial_supply(supply).finite(supply);
        ctx.create_token(&spec)
            .context("creating a fixed supply token")?;
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("The token has the name {name:string}")]
fn token_name(world: &TestWorld, name: &str) -> Result<()> {
    let expected = TokenLabel::new(name);
    with_token_info(world, |info| {
        ensure!(info.name == expected.as_str(), "token name is '{}', expected '{expected}'", info.name);
        Ok(())
    })
}

#[then("The token has the symbol {symbol:string}")]
fn token_symbol(world: &TestWorld, symbol: &str) -> Result<()> {
    let expected = TokenLabel::new(symbol);
    with_token_info(world, |info| {
        ensure!(
            info.symbol == expected.as_str(),
            "token symbol is '{}', expected '{expected}'",
            info.symbol
        );
        Ok(())
    })
}

#[then("The token has {decimals:u32} decimals")]
fn token_decimals(world: &TestWorld, decimals: u32) -> Result<()> {
    with_token_info(world, |info| {
        ensure!(info.decimals == decimals, "token has {} decimals", info.decimals);
        Ok(())
    })
}

#[then("The token is owned by the account")]
fn token_owned_by_account(world: &TestWorld) -> Result<()> {
    let account = world
        .account
        .get()
        .context("no account was bound before the token was created")?;
    with_token_info(world, |info| {
        ensure!(
            info.treasury_account_id == account,
            "token treasury is {}, expected {account}",
            info.treasury_account_id
        );
        Ok(())
    })
}

#[then("The total supply of the token is {supply:u64}")]
fn total_supply(world: &TestWorld, supply: u64) -> Result<()> {
    with_token_info(world, |info| {
        ensure!(info.total_supply == supply, "total supply is {}", info.total_supply);
        Ok(())
    })
}

#[then("An attempt to mint {amount:u64} additional tokens succeeds")]
fn mint_succeeds(world: &TestWorld, amount: u64) -> Result<()> {
    world.scenario(|ctx| {
        let before = ctx.token_info()?.total_supply;
        let slot = operator_slot(ctx)?;
        let receipt = ctx.mint(amount, slot).context("minting tokens")?;
        ensure!(receipt.status == Status::Success, "mint returned {}", receipt.status);
        let expected = before + amount;
        ensure!(
            receipt.total_supply == Some(expected),
            "supply after mint is {:?}, expected {expected}",
            receipt.total_supply
        );
        Ok(())
    })
}

#[then("An attempt to mint tokens fails")]
fn mint_fails(world: &TestWorld) -> Result<()> {
    world.scenario(|ctx| {
        let before = ctx.token_info()?.total_supply;
        let slot = operator_slot(ctx)?;
        assert_rejected_with(ctx.mint(1, slot), Status::TokenMaxSupplyReached, "minting")?;
        let after = ctx.token_info()?.total_supply;
        ensure!(after == before, "failed mint changed the supply from {before} to {after}");
        Ok(())
    })
}
