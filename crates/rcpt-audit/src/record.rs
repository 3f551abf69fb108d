use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rcpt_types::{AccountId, Amount, TokenId, TransactionRef};

/// Kind of operation an audit record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    MintReceipt,
    TransferReceipt,
    AssociateToken,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MintReceipt => "MINT_RECEIPT",
            Self::TransferReceipt => "TRANSFER_RECEIPT",
            Self::AssociateToken => "ASSOCIATE_TOKEN",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-specific part of a record.
///
/// Serialized inline with the record, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    #[serde(rename_all = "camelCase")]
    MintReceipt {
        action_type: String,
        token_id: TokenId,
        recipient: AccountId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TransferReceipt {
        token_id: TokenId,
        from_account: AccountId,
        to_account: AccountId,
        amount: Amount,
    },
    #[serde(rename_all = "camelCase")]
    AssociateToken {
        token_id: TokenId,
        account_id: AccountId,
    },
}

impl AuditOperation {
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::MintReceipt { .. } => OperationType::MintReceipt,
            Self::TransferReceipt { .. } => OperationType::TransferReceipt,
            Self::AssociateToken { .. } => OperationType::AssociateToken,
        }
    }

    /// The token every operation refers to.
    pub fn token_id(&self) -> &TokenId {
        match self {
            Self::MintReceipt { token_id, .. }
            | Self::TransferReceipt { token_id, .. }
            | Self::AssociateToken { token_id, .. } => token_id,
        }
    }
}

/// Outcome recorded for an operation. Only successes are journaled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
}

/// One immutable journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub operation: AuditOperation,
    pub transaction_id: TransactionRef,
    pub status: AuditStatus,
}

impl AuditRecord {
    pub fn operation_type(&self) -> OperationType {
        self.operation.operation_type()
    }
}
