use rcpt_crypto::{SigningKey, VerifyingKey};
use rcpt_types::AccountId;

use crate::entity::EntityId;
use crate::error::LedgerError;

/// The account that pays for, and signs, every transaction the service submits.
#[derive(Debug)]
pub struct Operator {
    account_id: EntityId,
    key: SigningKey,
}

impl Operator {
    pub fn new(account_id: EntityId, key: SigningKey) -> Self {
        Self { account_id, key }
    }

    /// Build from an opaque account id; fails unless it is in `s.r.n` form.
    pub fn from_account(account: &AccountId, key: SigningKey) -> Result<Self, LedgerError> {
        Ok(Self::new(EntityId::try_from(account)?, key))
    }

    pub fn account_id(&self) -> EntityId {
        self.account_id
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}
