//! Test utilities for ledger step scenarios.
//!
//! This crate provides deterministic account configurations, a prepared
//! scenario context and error formatting used by unit, integration and
//! behavioural tests.

pub mod config;
pub mod env;
pub mod error;

pub use config::{
    SCENARIO_ACCOUNTS, account_entries, ledger_config, scenario_config, scenario_context,
    write_config,
};
pub use error::display_error_chain;
