//! Assertion helpers for ledger outcomes in BDD steps.

use anyhow::{Result, bail, ensure};
use ledger_steps::hbar::Hbar;
use ledger_steps::network::LedgerError;
use ledger_steps::scenario::ScenarioError;
use ledger_steps::status::Status;
use test_support::display_error_chain;

/// Assert that `outcome` failed at precheck or in its receipt with
/// `expected`.
///
/// Any other error, including a query failure with the same status, fails
/// the assertion.
pub fn assert_rejected_with<T>(
    outcome: Result<T, ScenarioError>,
    expected: Status,
    action: &str,
) -> Result<()> {
    match outcome {
        Ok(_) => bail!("expected {action} to fail with {expected}, but it succeeded"),
        Err(ScenarioError::Ledger(
            LedgerError::Precheck { status, .. } | LedgerError::ReceiptStatus { status, .. },
        )) => {
            ensure!(
                status == expected,
                "expected {action} to fail with {expected}, got {status}"
            );
            Ok(())
        }
        Err(other) => bail!(
            "expected {action} to fail with {expected}, got: {}",
            display_error_chain(&other)
        ),
    }
}

/// Assert that `balance` is strictly above `threshold` whole hbars.
pub fn assert_hbars_above(balance: Hbar, threshold: i64, who: &str) -> Result<()> {
    ensure!(
        balance > Hbar::new(threshold),
        "{who} holds {balance}, expected more than {threshold} hbar"
    );
    Ok(())
}

/// Assert that `balance` is at least `floor` whole hbars.
pub fn assert_hbars_at_least(balance: Hbar, floor: i64, who: &str) -> Result<()> {
    ensure!(
        balance >= Hbar::new(floor),
        "{who} holds {balance}, expected at least {floor} hbar"
    );
    Ok(())
}
