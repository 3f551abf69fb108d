use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A positive whole number of token units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(NonZeroU64);

impl Amount {
    /// Returns `None` for zero.
    pub fn new(units: u64) -> Option<Self> {
        NonZeroU64::new(units).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl FromStr for Amount {
    type Err = TypeError;

    /// Accepts decimal digits only; signs, fractions and zero are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidAmount(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| TypeError::InvalidAmount(s.to_string()))
    }
}

impl TryFrom<u64> for Amount {
    type Error = TypeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| TypeError::InvalidAmount(value.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
