use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Upper bound on identifier length, in bytes.
pub const MAX_ID_LEN: usize = 128;

fn validate(kind: &'static str, raw: &str) -> Result<String, TypeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TypeError::Empty { kind });
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(TypeError::Whitespace {
            kind,
            value: trimmed.to_string(),
        });
    }
    if trimmed.len() > MAX_ID_LEN {
        return Err(TypeError::TooLong {
            kind,
            max: MAX_ID_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Ledger account identifier, e.g. `0.0.1001`.
///
/// Surrounding whitespace is trimmed; anything else is kept verbatim.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        validate("account id", raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ledger token identifier, e.g. `0.0.500`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenId(String);

impl TokenId {
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        validate("token id", raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reference to a submitted ledger transaction.
///
/// Produced by the ledger, never by callers, so it is not validated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRef(String);

impl TransactionRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($ty:ident) => {
        impl FromStr for $ty {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.0)
            }
        }
    };
}

string_conversions!(AccountId);
string_conversions!(TokenId);

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
