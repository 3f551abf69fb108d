use std::fmt;

use serde::{Deserialize, Serialize};

/// Native currency amount, held in tinybars (10^-8 hbar).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
    pub const TINYBARS_PER_HBAR: i64 = 100_000_000;
    pub const ZERO: Self = Self(0);

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub const fn new(hbars: i64) -> Self {
        Self(hbars.saturating_mul(Self::TINYBARS_PER_HBAR))
    }

    pub const fn to_tinybars(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Hbar {
    /// `"10 ℏ"`, `"0.5 ℏ"`, `"-1.00000001 ℏ"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = Self::TINYBARS_PER_HBAR as u64;
        let whole = abs / per;
        let frac = abs % per;
        if frac == 0 {
            write!(f, "{sign}{whole} ℏ")
        } else {
            let digits = format!("{frac:08}");
            write!(f, "{sign}{whole}.{} ℏ", digits.trim_end_matches('0'))
        }
    }
}
