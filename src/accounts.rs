//! Resolution of configured account slots into signing identities.

use crate::config::{AccountEntry, ConfigError};
use crate::ids::{AccountId, IdError};
use crate::keys::{PrivateKey, PublicKey};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A configured account with its parsed key material.
#[derive(Debug, Clone)]
pub struct AccountIdentity {
    /// Position in the configured account list.
    pub slot: usize,
    /// Ledger account id.
    pub account_id: AccountId,
    /// Signing key.
    pub private_key: PrivateKey,
    /// Public half of `private_key`.
    pub public_key: PublicKey,
}

/// Every configured account, parsed eagerly.
#[derive(Debug, Clone)]
pub struct AccountBook {
    identities: Vec<AccountIdentity>,
}

impl AccountBook {
    /// Parse `entries` in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAccounts`] for an empty list,
    /// [`ConfigError::InvalidAccount`] for a malformed id or key, and
    /// [`ConfigError::DuplicateAccount`] when two slots share an id.
    pub fn from_entries(entries: &[AccountEntry]) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::NoAccounts);
        }
        let mut seen: BTreeMap<AccountId, usize> = BTreeMap::new();
        let mut identities = Vec::with_capacity(entries.len());
        for (slot, entry) in entries.iter().enumerate() {
            let invalid = |reason: String| ConfigError::InvalidAccount { slot, reason };
            let account_id: AccountId = entry
                .id
                .parse()
                .map_err(|e: IdError| invalid(e.to_string()))?;
            let private_key = PrivateKey::from_str_ed25519(&entry.private_key)
                .map_err(|e| invalid(e.to_string()))?;
            if let Some(first) = seen.insert(account_id, slot) {
                return Err(ConfigError::DuplicateAccount {
                    id: account_id,
                    first,
                    second: slot,
                });
            }
            identities.push(AccountIdentity {
                slot,
                account_id,
                public_key: private_key.public_key(),
                private_key,
            });
        }
        Ok(Self { identities })
    }

    /// Identity configured at `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SlotOutOfRange`] when no such slot exists.
    pub fn resolve(&self, slot: usize) -> Result<&AccountIdentity, ConfigError> {
        self.identities
            .get(slot)
            .ok_or(ConfigError::SlotOutOfRange {
                slot,
                len: self.identities.len(),
            })
    }

    /// Slot configured for `account_id`.
    #[must_use]
    pub fn slot_of(&self, account_id: &AccountId) -> Option<usize> {
        self.identities
            .iter()
            .position(|identity| identity.account_id == *account_id)
    }

    /// Number of configured accounts.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether no accounts are configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Identities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &AccountIdentity> {
        self.identities.iter()
    }
}

/// The participants steps refer to by ordinal.
///
/// Slots `0` and `1` are left to the treasury and other fixtures, so the
/// first participant lives in slot `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Participant {
    /// "the first account".
    First,
    /// "the second account".
    Second,
    /// "the third account".
    Third,
    /// "the fourth account".
    Fourth,
}

impl Participant {
    /// Configured slot backing this participant.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::First => 2,
            Self::Second => 3,
            Self::Third => 4,
            Self::Fourth => 5,
        }
    }

    /// Ordinal word used in step phrases.
    #[must_use]
    pub const fn ordinal(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} account", self.ordinal())
    }
}

/// Error for ordinals other than first to fourth.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown participant ordinal '{0}'")]
pub struct UnknownParticipant(pub String);

impl FromStr for Participant {
    type Err = UnknownParticipant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "second" => Ok(Self::Second),
            "third" => Ok(Self::Third),
            "fourth" => Ok(Self::Fourth),
            _ => Err(UnknownParticipant(s.to_owned())),
        }
    }
}
