use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use rcpt_types::{AccountId, TokenId};

use crate::error::LedgerError;

/// Ledger entity address in `shard.realm.num` form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    pub fn to_account_id(&self) -> AccountId {
        // `s.r.n` never contains whitespace and is far below the length cap.
        AccountId::parse(&self.to_string()).unwrap_or_else(|_| unreachable!())
    }

    pub fn to_token_id(&self) -> TokenId {
        TokenId::parse(&self.to_string()).unwrap_or_else(|_| unreachable!())
    }
}

impl FromStr for EntityId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidEntityId { input: s.to_string() };
        let mut parts = s.split('.');
        let mut next = || -> Result<u64, LedgerError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let id = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl TryFrom<String> for EntityId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.to_string()
    }
}

impl TryFrom<&AccountId> for EntityId {
    type Error = LedgerError;

    fn try_from(value: &AccountId) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}

impl TryFrom<&TokenId> for EntityId {
    type Error = LedgerError;

    fn try_from(value: &TokenId) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({self})")
    }
}

/// Last valid-start handed out, in nanoseconds since the epoch.
static LAST_VALID_START: AtomicI64 = AtomicI64::new(0);

/// Identifies a transaction: paying account plus the instant it becomes valid.
///
/// Text form: `0.0.2@1700000000.000000001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId {
    pub account_id: EntityId,
    pub valid_start: DateTime<Utc>,
}

impl TransactionId {
    pub fn new(account_id: EntityId, valid_start: DateTime<Utc>) -> Self {
        Self {
            account_id,
            valid_start,
        }
    }

    /// Fresh id for `payer`. Valid-starts are strictly increasing within the
    /// process, so two ids generated back to back never collide.
    pub fn generate(payer: EntityId) -> Self {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut prev = LAST_VALID_START.load(Ordering::Relaxed);
        let nanos = loop {
            let candidate = now.max(prev + 1);
            match LAST_VALID_START.compare_exchange_weak(
                prev,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => prev = actual,
            }
        };
        Self::new(payer, Utc.timestamp_nanos(nanos))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start.timestamp(),
            self.valid_start.timestamp_subsec_nanos()
        )
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({self})")
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::Serialization(format!("invalid transaction id {s:?}"));
        let (account, start) = s.split_once('@').ok_or_else(invalid)?;
        let (secs, nanos) = start.split_once('.').ok_or_else(invalid)?;
        let secs: i64 = secs.parse().map_err(|_| invalid())?;
        let nanos: u32 = nanos.parse().map_err(|_| invalid())?;
        let valid_start = Utc.timestamp_opt(secs, nanos).single().ok_or_else(invalid)?;
        Ok(Self::new(account.parse()?, valid_start))
    }
}

impl TryFrom<String> for TransactionId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.to_string()
    }
}
