//! Per-scenario coordination.
//!
//! A [`ScenarioContext`] is the one value threaded through every step of a
//! scenario. It owns the client (and so the operator binding), the parsed
//! account book and the fixture registry. Scenario-specific setup comes from
//! a [`FixturePlan`] keyed by scenario name rather than from steps that
//! inspect the title.

mod context;
mod tokens;
mod topics;
mod transfers;

pub use context::{ScenarioContext, ScenarioError};
pub use tokens::{TokenSpec, TokenSupply};
pub use topics::SubmitKeyChoice;
pub use transfers::TransferLine;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Lowercase `input` and collapse runs of other characters to `_`.
///
/// # Examples
///
/// ```rust
/// use ledger_steps::scenario::slugify;
///
/// assert_eq!(slugify("Transfer tokens between 2 accounts"), "transfer_tokens_between_2_accounts");
/// assert_eq!(slugify("  Mint -- fails!"), "mint_fails");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}

/// Name of the running scenario.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioName(String);

impl ScenarioName {
    /// Wrap a scenario title or generated test name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the name from the current test thread.
    ///
    /// Test harnesses name threads after the test path; the last `::`
    /// segment is the scenario's test function.
    #[must_use]
    pub fn from_current_thread() -> Option<Self> {
        let thread = std::thread::current();
        let name = thread.name()?;
        let last = name.rsplit("::").next().unwrap_or(name);
        (!last.is_empty() && last != "main").then(|| Self::new(last))
    }

    /// Raw name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Slug used to match fixture plans.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.0)
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A precondition applied when a scenario begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FixtureAction {
    /// Move `hbar` from the treasury slot to `slot`.
    FundHbar {
        /// Receiving slot.
        slot: usize,
        /// Whole hbars to move.
        hbar: i64,
    },
    /// Override the client request timeout for the scenario.
    RequestTimeout {
        /// Timeout in milliseconds.
        ms: u64,
    },
}

impl fmt::Display for FixtureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FundHbar { slot, hbar } => write!(f, "fund slot {slot} with {hbar} hbar"),
            Self::RequestTimeout { ms } => write!(f, "request timeout {ms} ms"),
        }
    }
}

/// Fixture actions keyed by scenario.
///
/// Keys are matched by slug: a key matches a scenario whose slug equals the
/// key's slug or ends with `_` followed by it, so a plan keyed by a
/// scenario title also matches a generated test name such as
/// `scenario_3_transfer_tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixturePlan(IndexMap<String, Vec<FixtureAction>>);

impl FixturePlan {
    /// Empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `actions` for scenarios matching `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, actions: Vec<FixtureAction>) -> Self {
        self.0.insert(key.into(), actions);
        self
    }

    /// Plans in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<FixtureAction>)> {
        self.0.iter()
    }

    /// Number of keyed plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the plan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Actions for the first key matching `name`.
    ///
    /// Later matching keys are ignored with a warning.
    #[must_use]
    pub fn actions_for(&self, name: &ScenarioName) -> &[FixtureAction] {
        let slug = name.slug();
        let mut matches = self.0.iter().filter(|(key, _)| {
            let wanted = slugify(key);
            !wanted.is_empty() && (slug == wanted || slug.ends_with(&format!("_{wanted}")))
        });
        let Some((first_key, actions)) = matches.next() else {
            return &[];
        };
        for (ignored, _) in matches {
            warn!(scenario = %name, used = %first_key, %ignored, "fixture plan key shadowed");
        }
        actions.as_slice()
    }
}
