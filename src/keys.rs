//! ED25519 keys and authorisation key structures.
//!
//! Private keys are parsed from the hex strings found in account
//! configuration. A [`Key`] is the authorisation policy attached to accounts,
//! topics and tokens: either a single public key or a [`KeyList`] that may
//! carry a threshold.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// ED25519 signature produced by [`PrivateKey::sign`].
pub type Signature = ed25519_dalek::Signature;

/// Raw ED25519 seed length in bytes.
pub const SEED_LEN: usize = 32;

/// PKCS#8 DER header preceding a raw ED25519 seed.
const DER_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Errors raised while parsing keys or building key lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key string was not valid hex.
    #[error("private key is not valid hex: {0}")]
    Hex(String),
    /// The decoded key had an unexpected length or DER header.
    #[error("private key must be a 32-byte seed or DER-encoded ED25519 key, got {len} bytes")]
    Length {
        /// Number of decoded bytes.
        len: usize,
    },
    /// A threshold outside `1..=members` was requested.
    #[error("threshold {threshold} is invalid for a key list of {members} keys")]
    InvalidThreshold {
        /// Requested signature count.
        threshold: u32,
        /// Number of keys in the list.
        members: usize,
    },
}

/// ED25519 private key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Parse a hex-encoded ED25519 private key.
    ///
    /// Accepts a raw 32-byte seed or the 48-byte DER form, with or without a
    /// `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Hex`] when the string is not hex and
    /// [`KeyError::Length`] when the decoded bytes are not a recognised key.
    pub fn from_str_ed25519(input: &str) -> Result<Self, KeyError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|err| KeyError::Hex(err.to_string()))?;
        let seed = match bytes.len() {
            SEED_LEN => bytes.as_slice(),
            len => bytes
                .strip_prefix(DER_PREFIX.as_slice())
                .filter(|rest| rest.len() == SEED_LEN)
                .ok_or(KeyError::Length { len })?,
        };
        let seed: [u8; SEED_LEN] = seed
            .try_into()
            .map_err(|_| KeyError::Length { len: seed.len() })?;
        Ok(Self::from_seed(&seed))
    }

    /// Build a key from a raw seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            inner: SigningKey::from_bytes(seed),
        }
    }

    /// Derive the matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Sign `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.inner.sign(message)
    }

    /// Hex encoding of the raw seed.
    #[must_use]
    pub fn to_string_raw(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// ED25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        self.inner.as_bytes()
    }

    /// Check `signature` over `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.inner.verify(message, signature).is_ok()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

/// A list of keys, optionally satisfied by a subset of signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyList {
    keys: Vec<Key>,
    threshold: Option<u32>,
}

impl KeyList {
    /// A list requiring every member to sign.
    #[must_use]
    pub const fn new(keys: Vec<Key>) -> Self {
        Self {
            keys,
            threshold: None,
        }
    }

    /// A list requiring `threshold` of its members to sign.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidThreshold`] unless
    /// `1 <= threshold <= keys.len()`.
    pub fn with_threshold(keys: Vec<Key>, threshold: u32) -> Result<Self, KeyError> {
        let fits = usize::try_from(threshold).is_ok_and(|t| t <= keys.len());
        if threshold == 0 || !fits {
            return Err(KeyError::InvalidThreshold {
                threshold,
                members: keys.len(),
            });
        }
        Ok(Self {
            keys,
            threshold: Some(threshold),
        })
    }

    /// Members of the list.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Required signature count when this is a threshold list.
    #[must_use]
    pub const fn threshold(&self) -> Option<u32> {
        self.threshold
    }

    fn required(&self) -> usize {
        self.threshold
            .and_then(|t| usize::try_from(t).ok())
            .unwrap_or(self.keys.len())
    }
}

/// Authorisation policy attached to ledger entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single ED25519 public key.
    Single(PublicKey),
    /// A (threshold) list of nested keys.
    List(KeyList),
}

impl Key {
    /// Whether signatures from `signers` satisfy this policy.
    ///
    /// An empty list is never satisfied.
    #[must_use]
    pub fn is_satisfied_by(&self, signers: &BTreeSet<PublicKey>) -> bool {
        match self {
            Self::Single(key) => signers.contains(key),
            Self::List(list) => {
                if list.keys.is_empty() {
                    return false;
                }
                let satisfied = list
                    .keys
                    .iter()
                    .filter(|key| key.is_satisfied_by(signers))
                    .count();
                satisfied >= list.required()
            }
        }
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Self::Single(key)
    }
}

impl From<KeyList> for Key {
    fn from(list: KeyList) -> Self {
        Self::List(list)
    }
}
