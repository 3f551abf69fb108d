use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::TransactionId;

/// Ledger response codes.
///
/// Text forms follow the network's upper-snake-case names, since callers
/// see them verbatim in error details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    InvalidTransactionBody,
    InvalidSignature,
    PayerAccountNotFound,
    DuplicateTransaction,
    InvalidAccountId,
    InvalidTokenId,
    InvalidTreasuryAccountForToken,
    InvalidTokenSymbol,
    MissingTokenName,
    TokenNotAssociatedToAccount,
    TokenAlreadyAssociatedToAccount,
    TokenIdRepeatedInTokenList,
    EmptyTokenTransferBody,
    TransfersNotZeroSumForToken,
    AccountRepeatedInAccountAmounts,
    InsufficientTokenBalance,
    ReceiptNotFound,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::PayerAccountNotFound => "PAYER_ACCOUNT_NOT_FOUND",
            Self::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::InvalidTreasuryAccountForToken => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
            Self::InvalidTokenSymbol => "INVALID_TOKEN_SYMBOL",
            Self::MissingTokenName => "MISSING_TOKEN_NAME",
            Self::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Self::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Self::TokenIdRepeatedInTokenList => "TOKEN_ID_REPEATED_IN_TOKEN_LIST",
            Self::EmptyTokenTransferBody => "EMPTY_TOKEN_TRANSFER_BODY",
            Self::TransfersNotZeroSumForToken => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
            Self::AccountRepeatedInAccountAmounts => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
            Self::InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
            Self::ReceiptNotFound => "RECEIPT_NOT_FOUND",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid entity id {input:?}: expected <shard>.<realm>.<num>")]
    InvalidEntityId { input: String },

    #[error("transaction {transaction_id} failed precheck with status {status}")]
    Precheck {
        status: Status,
        transaction_id: TransactionId,
    },

    #[error("receipt for transaction {transaction_id} contained error status {status}")]
    Receipt {
        status: Status,
        transaction_id: TransactionId,
    },

    #[error("account balance query for {account} failed with status {status}")]
    Query { status: Status, account: String },

    #[error("receipt for transaction {0} is missing a token id")]
    MissingTokenId(TransactionId),

    #[error("transaction builder error: {0}")]
    Builder(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("network error: {0}")]
    Network(String),
}

impl LedgerError {
    /// The ledger status carried by this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Precheck { status, .. }
            | Self::Receipt { status, .. }
            | Self::Query { status, .. } => Some(*status),
            _ => None,
        }
    }
}
