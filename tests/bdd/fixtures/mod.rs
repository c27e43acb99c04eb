//! Fixture modules for BDD scenarios.
//!
//! The `TestWorld` struct holds all state for one scenario. The scenario
//! context is not `Clone`, so it lives in a `RefCell<Option<T>>`; plain
//! values use `Slot<T>`.
//!
//! The context is created lazily by the first step that needs it. At that
//! point the scenario is started under the test thread's name, which applies
//! any fixture plan configured for it.

// The `#[fixture]` macro generates types that cannot have doc comments attached
#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use anyhow::{Context, Result};
use ledger_steps::ids::AccountId;
use ledger_steps::scenario::{ScenarioContext, ScenarioName};
use rstest::fixture;
use rstest_bdd::Slot;
use std::cell::RefCell;
use test_support::scenario_context;

/// Combined test world for all BDD scenarios.
#[derive(Default)]
pub struct TestWorld {
    /// Context shared by every step of the scenario (non-Clone).
    pub context: RefCell<Option<ScenarioContext>>,
    /// Account the opening balance step bound as operator.
    pub account: Slot<AccountId>,
}

impl TestWorld {
    /// Run `f` against the scenario context, starting the scenario first if
    /// no step has touched it yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or `f` fails.
    pub fn scenario<R>(&self, f: impl FnOnce(&mut ScenarioContext) -> Result<R>) -> Result<R> {
        if !self.context.is_some() {
            self.context.set_value(start_scenario()?);
        }
        self.context
            .with_mut(f)
            .context("scenario context should be initialised")?
    }
}

fn start_scenario() -> Result<ScenarioContext> {
    let mut context = scenario_context()?;
    let name = ScenarioName::from_current_thread()
        .unwrap_or_else(|| ScenarioName::new("unnamed scenario"));
    context
        .begin_scenario(name)
        .context("applying the scenario's fixture plan")?;
    Ok(context)
}

/// Fixture providing a fresh `TestWorld` for each scenario.
#[fixture]
pub fn world() -> TestWorld {
    TestWorld::default()
}

/// Helper trait extensions for `RefCell<Option<T>>`.
///
/// Provides ergonomic methods for working with `RefCell<Option<T>>` values
/// in BDD step definitions, enabling interior mutability without requiring `Clone`.
pub trait RefCellOptionExt<T> {
    /// Set the value inside the `RefCell`.
    fn set_value(&self, value: T);
    /// Returns `true` if the `RefCell` contains `Some`.
    fn is_some(&self) -> bool;
    /// Borrow the inner value mutably and apply a function.
    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;
}

impl<T> RefCellOptionExt<T> for RefCell<Option<T>> {
    fn set_value(&self, value: T) {
        *self.borrow_mut() = Some(value);
    }

    fn is_some(&self) -> bool {
        self.borrow().is_some()
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.borrow_mut().as_mut().map(f)
    }
}
