use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rcpt_crypto::TransactionHash;

use crate::entity::{EntityId, TransactionId};
use crate::error::{LedgerError, Status};
use crate::hbar::Hbar;
use crate::transaction::FrozenTransaction;

/// Boundary to the ledger network.
///
/// Every call may fail with a network or validation error; callers surface
/// the error message verbatim and never retry.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a signed transaction. Errors here are precheck failures: the
    /// transaction never reached consensus.
    async fn submit(&self, transaction: &FrozenTransaction)
        -> Result<TransactionResponse, LedgerError>;

    /// Fetch the receipt of a submitted transaction. A receipt whose status
    /// is not `SUCCESS` is returned as [`LedgerError::Receipt`].
    async fn receipt(&self, transaction_id: &TransactionId)
        -> Result<TransactionReceipt, LedgerError>;

    async fn account_balance(&self, query: &AccountBalanceQuery)
        -> Result<AccountBalance, LedgerError>;
}

/// Acknowledgement that a transaction passed precheck.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub transaction_hash: TransactionHash,
}

impl TransactionResponse {
    pub async fn get_receipt(
        &self,
        client: &dyn LedgerClient,
    ) -> Result<TransactionReceipt, LedgerError> {
        client.receipt(&self.transaction_id).await
    }
}

/// Consensus outcome of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_id: TransactionId,
    pub status: Status,
    /// Set for successful token creations.
    pub token_id: Option<EntityId>,
}

impl TransactionReceipt {
    /// `Ok(self)` for a successful receipt, otherwise the matching error.
    pub fn into_result(self) -> Result<Self, LedgerError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(LedgerError::Receipt {
                status: self.status,
                transaction_id: self.transaction_id,
            })
        }
    }
}

/// Query for an account's native and token balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountBalanceQuery {
    account_id: EntityId,
}

impl AccountBalanceQuery {
    pub fn new(account_id: EntityId) -> Self {
        Self { account_id }
    }

    pub fn account_id(&self) -> EntityId {
        self.account_id
    }

    pub async fn execute(&self, client: &dyn LedgerClient) -> Result<AccountBalance, LedgerError> {
        client.account_balance(self).await
    }
}

/// Balances held by one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: EntityId,
    pub hbars: Hbar,
    /// Every associated token, including zero balances.
    pub tokens: BTreeMap<EntityId, u64>,
}

impl AccountBalance {
    /// Token balances keyed and valued as strings, for transport.
    pub fn token_strings(&self) -> BTreeMap<String, String> {
        self.tokens
            .iter()
            .map(|(id, amount)| (id.to_string(), amount.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx_id() -> TransactionId {
        TransactionId::new(EntityId::new(0, 0, 2), Utc.timestamp_opt(1, 0).unwrap())
    }

    #[test]
    fn successful_receipt_passes_through() {
        let receipt = TransactionReceipt {
            transaction_id: tx_id(),
            status: Status::Success,
            token_id: Some(EntityId::new(0, 0, 500)),
        };
        assert_eq!(receipt.clone().into_result().unwrap(), receipt);
    }

    #[test]
    fn failed_receipt_becomes_error() {
        let receipt = TransactionReceipt {
            transaction_id: tx_id(),
            status: Status::InsufficientTokenBalance,
            token_id: None,
        };
        let err = receipt.into_result().unwrap_err();
        assert_eq!(err.status(), Some(Status::InsufficientTokenBalance));
    }

    #[test]
    fn token_strings_normalizes_for_transport() {
        let mut tokens = BTreeMap::new();
        tokens.insert(EntityId::new(0, 0, 500), 1);
        tokens.insert(EntityId::new(0, 0, 501), 0);
        let balance = AccountBalance {
            account_id: EntityId::new(0, 0, 1001),
            hbars: Hbar::new(5),
            tokens,
        };
        let strings = balance.token_strings();
        assert_eq!(strings.get("0.0.500").map(String::as_str), Some("1"));
        assert_eq!(strings.get("0.0.501").map(String::as_str), Some("0"));
    }
}
