//! Numeric identifiers for users, threads and comments
//!
//! All three are database-assigned `BIGSERIAL` keys. They share one
//! representation but are distinct types so a thread id can never be passed
//! where a comment id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error when parsing an identifier from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidFormat { kind: &'static str, value: String },

    #[error("{kind} id must be positive")]
    NotPositive { kind: &'static str },
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Parse a form or query value. Surrounding whitespace is ignored;
            /// zero and negative values are rejected.
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                let trimmed = s.trim();
                let value = trimmed.parse::<i64>().map_err(|_| IdParseError::InvalidFormat {
                    kind: $kind,
                    value: trimmed.to_string(),
                })?;
                if value <= 0 {
                    return Err(IdParseError::NotPositive { kind: $kind });
                }
                Ok(Self(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

numeric_id!(
    /// Registered (local or federated) user
    UserId,
    "user"
);
numeric_id!(
    /// Discussion thread
    ThreadId,
    "thread"
);
numeric_id!(
    /// Comment inside a thread
    CommentId,
    "comment"
);
