//! Reaction polarity: a like (+1) or a dislike (-1)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Like,
    Dislike,
}

impl Polarity {
    /// Stored and wire representation
    #[inline]
    pub const fn value(self) -> i16 {
        match self {
            Self::Like => 1,
            Self::Dislike => -1,
        }
    }

    pub fn from_value(value: i64) -> Result<Self, DomainError> {
        match value {
            1 => Ok(Self::Like),
            -1 => Ok(Self::Dislike),
            other => Err(DomainError::InvalidPolarity(other.to_string())),
        }
    }

    /// Parse the `like_type` form field. Only "1" and "-1" are accepted.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "1" => Ok(Self::Like),
            "-1" => Ok(Self::Dislike),
            other => Err(DomainError::InvalidPolarity(other.to_string())),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl TryFrom<i16> for Polarity {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_value(i64::from(value))
    }
}

impl std::str::FromStr for Polarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
