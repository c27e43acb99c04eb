//! Shared helper functions for BDD step definitions.
//!
//! This module provides the assertions and participant plumbing used across
//! the topic, token and transfer step files.

pub mod assertions;
pub mod participants;
