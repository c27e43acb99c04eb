//! Ledger steps core library.
//!
//! This library provides the scenario state and fixture coordination layer
//! behind behaviour-driven tests of ledger account, topic and token
//! operations. Steps share one [`scenario::ScenarioContext`] per scenario,
//! which owns the client, the configured accounts and the fixtures created
//! along the way. Requests run against an in-process simulated ledger.

pub mod accounts;
pub mod cli;
pub mod client;
pub mod config;
pub mod fixtures;
pub mod hasher;
pub mod hbar;
pub mod ids;
pub mod keys;
pub mod network;
pub mod query;
pub mod runner;
pub mod scenario;
pub mod status;
pub mod transaction;
