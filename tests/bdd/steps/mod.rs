//! Step definition modules for BDD scenarios.
//!
//! Each module contains step definitions for a specific domain. Steps are
//! registered via `#[given]`, `#[when]`, and `#[then]` attribute macros.
//!
//! ## File-wide lint suppressions
//!
//! The `rstest-bdd` macros generate wrapper code for each step function that
//! triggers several Clippy lints. The generated code cannot be annotated
//! directly, so the suppressions live here.

#![expect(
    clippy::shadow_reuse,
    reason = "rstest-bdd macros generate step wrappers that shadow parameters"
)]
#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step signatures prioritise ergonomics"
)]
#![expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd macros require Result returns for step functions"
)]

mod account;
mod token;
mod topic;
mod transfer;

// Step functions are registered via macros, so we don't need to re-export
// them explicitly. The macros generate global step registrations.
