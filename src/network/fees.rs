//! Fee schedule and latency profile of the simulated network.

use crate::hbar::Hbar;
use crate::transaction::TransactionKind;
use std::collections::BTreeMap;
use std::time::Duration;

/// Flat fee charged per transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    fees: BTreeMap<TransactionKind, Hbar>,
}

impl FeeSchedule {
    /// Fee charged for `kind`.
    #[must_use]
    pub fn fee_for(&self, kind: TransactionKind) -> Hbar {
        self.fees.get(&kind).copied().unwrap_or(Hbar::ZERO)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let fees = [
            (TransactionKind::TopicCreate, Hbar::from_tinybars(1_000_000)),
            (TransactionKind::TopicMessageSubmit, Hbar::from_tinybars(10_000)),
            (TransactionKind::TokenCreate, Hbar::new(1)),
            (TransactionKind::TokenMint, Hbar::from_tinybars(100_000)),
            (TransactionKind::TokenAssociate, Hbar::from_tinybars(5_000_000)),
            (TransactionKind::Transfer, Hbar::from_tinybars(100_000)),
        ];
        Self {
            fees: fees.into_iter().collect(),
        }
    }
}

/// Simulated response latency, per transaction kind.
///
/// Calls are never delayed; the latency is compared with the caller's
/// request timeout instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyProfile {
    default: Duration,
    per_kind: BTreeMap<TransactionKind, Duration>,
}

impl LatencyProfile {
    /// Profile with the same latency for every call.
    #[must_use]
    pub fn uniform(latency: Duration) -> Self {
        Self {
            default: latency,
            per_kind: BTreeMap::new(),
        }
    }

    /// Override the latency of submissions of `kind`.
    #[must_use]
    pub fn with_kind(mut self, kind: TransactionKind, latency: Duration) -> Self {
        self.per_kind.insert(kind, latency);
        self
    }

    /// Latency of queries, receipts and records.
    #[must_use]
    pub const fn default_latency(&self) -> Duration {
        self.default
    }

    /// Latency of a submission of `kind`.
    #[must_use]
    pub fn for_kind(&self, kind: TransactionKind) -> Duration {
        self.per_kind.get(&kind).copied().unwrap_or(self.default)
    }
}
