//! Ledger entity identifiers.
//!
//! Accounts, topics and tokens share the `shard.realm.num` notation. Each
//! kind gets its own newtype so a topic id can never be passed where a token
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing an entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input did not contain exactly three dot-separated components.
    #[error("{kind} id '{input}' must have the form shard.realm.num")]
    Shape {
        /// Entity kind being parsed.
        kind: &'static str,
        /// Raw input.
        input: String,
    },
    /// One of the components was not an unsigned integer.
    #[error("{kind} id '{input}' has a non-numeric component '{component}'")]
    Component {
        /// Entity kind being parsed.
        kind: &'static str,
        /// Raw input.
        input: String,
        /// Offending component.
        component: String,
    },
}

fn parse_components(kind: &'static str, input: &str) -> Result<(u64, u64, u64), IdError> {
    let mut parts = input.trim().split('.');
    let (Some(shard), Some(realm), Some(num), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(IdError::Shape {
            kind,
            input: input.to_owned(),
        });
    };
    let parse = |component: &str| {
        component.parse::<u64>().map_err(|_| IdError::Component {
            kind,
            input: input.to_owned(),
            component: component.to_owned(),
        })
    };
    Ok((parse(shard)?, parse(realm)?, parse(num)?))
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            /// Shard number.
            pub shard: u64,
            /// Realm number.
            pub realm: u64,
            /// Entity number within the realm.
            pub num: u64,
        }

        impl $name {
            /// Build an id in shard 0, realm 0.
            #[must_use]
            pub const fn from_num(num: u64) -> Self {
                Self {
                    shard: 0,
                    realm: 0,
                    num,
                }
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_components($kind, s)?;
                Ok(Self { shard, realm, num })
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a ledger account.
    AccountId,
    "account"
);

define_entity_id!(
    /// Identifier of a consensus topic.
    TopicId,
    "topic"
);

define_entity_id!(
    /// Identifier of a fungible token.
    TokenId,
    "token"
);
