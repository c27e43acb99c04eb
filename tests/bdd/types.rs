//! Semantic newtype wrappers for BDD step definition parameters.
//!
//! These wrappers keep the different quoted strings of the step phrases
//! apart once they leave the step functions.

use std::fmt;

/// Generates a newtype wrapper for string parameters.
///
/// Each generated type wraps a `String`, exposes `as_str()` and implements
/// `Display`.
macro_rules! define_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_newtype!(
    /// Memo attached to a topic.
    TopicMemo
);

define_newtype!(
    /// Text of a topic message.
    MessageText
);

define_newtype!(
    /// Token name or symbol as written in a step.
    TokenLabel
);
