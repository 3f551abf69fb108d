//! Receipt operations behind the HTTP handlers.
//!
//! Each operation validates its input first, then talks to the ledger, and
//! only appends to the audit log once the ledger call has succeeded. A
//! validation failure never reaches the ledger; an operation failure never
//! reaches the log.

use std::str::FromStr;

use chrono::Utc;
use serde_json::Value;

use rcpt_api::{
    AssociateTokenRequest, BalanceResponse, HealthResponse, LogsResponse, MintReceiptRequest,
    MintReceiptResponse, OperationResponse, TransferReceiptRequest,
};
use rcpt_audit::AuditOperation;
use rcpt_ledger::{
    AccountBalanceQuery, EntityId, LedgerError, TokenAssociateTransaction, TokenCreateTransaction,
    TokenSupplyType, TransferTransaction,
};
use rcpt_types::{AccountId, Amount, TokenId, TransactionRef, TypeError};

use crate::error::ApiError;
use crate::state::AppState;

pub const MINT_FAILED: &str = "Failed to mint receipt";
pub const TRANSFER_FAILED: &str = "Failed to transfer receipt";
pub const ASSOCIATE_FAILED: &str = "Failed to associate token";
pub const BALANCE_FAILED: &str = "Failed to fetch balance";

impl AppState {
    /// Create a single-unit token standing for one receipt.
    pub async fn mint_receipt(
        &self,
        request: MintReceiptRequest,
    ) -> Result<MintReceiptResponse, ApiError> {
        require(&[
            ("recipientId", is_present(&request.recipient_id)),
            ("actionType", is_present(&request.action_type)),
        ])?;
        let recipient: AccountId = parse_field("recipientId", request.recipient_id)?;
        let action_type = request.action_type.unwrap_or_default().trim().to_string();
        let metadata = request.metadata.and_then(metadata_text);

        let operator = self.operator.as_ref();
        let ledger = self.ledger.as_ref();
        let (transaction_id, token) = async {
            let transaction = TokenCreateTransaction::new()
                .token_name(format!("Receipt-{action_type}"))
                .token_symbol(format!("RCP-{}", Utc::now().timestamp_millis()))
                .decimals(0)
                .initial_supply(1)
                .treasury_account_id(operator.account_id())
                .supply_type(TokenSupplyType::Infinite)
                .freeze_with(operator)?
                .sign_with_operator(operator);
            let response = transaction.execute(ledger).await?;
            let receipt = response.get_receipt(ledger).await?;
            let token = receipt
                .token_id
                .ok_or(LedgerError::MissingTokenId(receipt.transaction_id))?;
            Ok::<_, LedgerError>((response.transaction_id, token))
        }
        .await
        .map_err(|e| ApiError::operation(MINT_FAILED, e))?;

        let token_id = token.to_token_id();
        let record = self.audit.append(
            AuditOperation::MintReceipt {
                action_type,
                token_id: token_id.clone(),
                recipient,
                metadata,
            },
            TransactionRef::new(transaction_id.to_string()),
        );
        tracing::info!(tx = %transaction_id, token = %token_id, "receipt minted");

        Ok(MintReceiptResponse {
            success: true,
            message: "Receipt token created successfully".into(),
            token_id,
            transaction: record,
        })
    }

    /// Move `amount` units of a receipt token from the operator to an account.
    pub async fn transfer_receipt(
        &self,
        request: TransferReceiptRequest,
    ) -> Result<OperationResponse, ApiError> {
        require(&[
            ("tokenId", is_present(&request.token_id)),
            ("toAccountId", is_present(&request.to_account_id)),
            ("amount", request.amount.as_ref().is_some_and(amount_present)),
        ])?;
        let token_id: TokenId = parse_field("tokenId", request.token_id)?;
        let to_account: AccountId = parse_field("toAccountId", request.to_account_id)?;
        let amount = parse_amount(request.amount.as_ref())?;
        let units = i64::try_from(amount.get()).map_err(|_| {
            ApiError::validation("Invalid amount", format!("amount {amount} is too large"))
        })?;

        let operator = self.operator.as_ref();
        let ledger = self.ledger.as_ref();
        let transaction_id = async {
            let token = EntityId::try_from(&token_id)?;
            let to = EntityId::try_from(&to_account)?;
            let transaction = TransferTransaction::new()
                .add_token_transfer(token, operator.account_id(), -units)
                .add_token_transfer(token, to, units)
                .freeze_with(operator)?
                .sign_with_operator(operator);
            let response = transaction.execute(ledger).await?;
            response.get_receipt(ledger).await?;
            Ok::<_, LedgerError>(response.transaction_id)
        }
        .await
        .map_err(|e| ApiError::operation(TRANSFER_FAILED, e))?;

        let record = self.audit.append(
            AuditOperation::TransferReceipt {
                token_id,
                from_account: operator.account_id().to_account_id(),
                to_account,
                amount,
            },
            TransactionRef::new(transaction_id.to_string()),
        );
        tracing::info!(tx = %transaction_id, amount = %amount, "receipt transferred");

        Ok(OperationResponse {
            success: true,
            message: "Receipt transferred successfully".into(),
            transaction: record,
        })
    }

    /// Associate a token with an account, signed by the operator key.
    pub async fn associate_token(
        &self,
        request: AssociateTokenRequest,
    ) -> Result<OperationResponse, ApiError> {
        require(&[
            ("tokenId", is_present(&request.token_id)),
            ("accountId", is_present(&request.account_id)),
        ])?;
        let token_id: TokenId = parse_field("tokenId", request.token_id)?;
        let account_id: AccountId = parse_field("accountId", request.account_id)?;

        let operator = self.operator.as_ref();
        let ledger = self.ledger.as_ref();
        let transaction_id = async {
            let transaction = TokenAssociateTransaction::new()
                .account_id(EntityId::try_from(&account_id)?)
                .token_ids([EntityId::try_from(&token_id)?])
                .freeze_with(operator)?
                .sign_with_operator(operator);
            let response = transaction.execute(ledger).await?;
            response.get_receipt(ledger).await?;
            Ok::<_, LedgerError>(response.transaction_id)
        }
        .await
        .map_err(|e| ApiError::operation(ASSOCIATE_FAILED, e))?;

        let record = self.audit.append(
            AuditOperation::AssociateToken {
                token_id,
                account_id,
            },
            TransactionRef::new(transaction_id.to_string()),
        );
        tracing::info!(tx = %transaction_id, "token associated");

        Ok(OperationResponse {
            success: true,
            message: "Token associated successfully".into(),
            transaction: record,
        })
    }

    /// Native and token balances of one account. Read-only.
    pub async fn balance(&self, account_id: &str) -> Result<BalanceResponse, ApiError> {
        let balance = async {
            let account = EntityId::from_str(account_id.trim())?;
            let balance = AccountBalanceQuery::new(account)
                .execute(self.ledger.as_ref())
                .await?;
            Ok::<_, LedgerError>(balance)
        }
        .await
        .map_err(|e| ApiError::operation(BALANCE_FAILED, e))?;

        Ok(BalanceResponse {
            success: true,
            account_id: account_id.to_string(),
            hbar_balance: balance.hbars.to_string(),
            tokens: balance.token_strings(),
        })
    }

    pub fn logs(&self) -> LogsResponse {
        let snapshot = self.audit.snapshot();
        LogsResponse {
            success: true,
            count: snapshot.len(),
            logs: snapshot.records,
        }
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::ok(self.operator_id())
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn amount_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Reject the request if any required field is absent or blank.
///
/// The error names every required field, the details name the missing ones.
fn require(fields: &[(&str, bool)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let all: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    Err(ApiError::validation(
        format!("Missing required fields: {}", all.join(", ")),
        format!("missing: {}", missing.join(", ")),
    ))
}

fn parse_field<T>(name: &str, raw: Option<String>) -> Result<T, ApiError>
where
    T: FromStr<Err = TypeError>,
{
    raw.unwrap_or_default()
        .parse()
        .map_err(|e: TypeError| ApiError::validation(format!("Invalid {name}"), e.to_string()))
}

fn parse_amount(value: Option<&Value>) -> Result<Amount, ApiError> {
    let parsed = match value {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(units) => Amount::try_from(units),
            None => Err(TypeError::InvalidAmount(n.to_string())),
        },
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(TypeError::InvalidAmount(other.to_string())),
        None => Err(TypeError::InvalidAmount(String::new())),
    };
    parsed.map_err(|e| ApiError::validation("Invalid amount", e.to_string()))
}

/// Strings are kept verbatim; any other JSON value is stored as compact text.
fn metadata_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn require_lists_all_fields_and_details_the_missing() {
        let err = require(&[("tokenId", true), ("accountId", false)]).unwrap_err();
        assert_eq!(
            err,
            ApiError::Validation {
                message: "Missing required fields: tokenId, accountId".into(),
                details: Some("missing: accountId".into()),
            }
        );
        assert!(require(&[("tokenId", true)]).is_ok());
    }

    #[test]
    fn blank_strings_are_not_present() {
        assert!(!is_present(&Some("  ".into())));
        assert!(!is_present(&None));
        assert!(is_present(&Some("0.0.1001".into())));
    }

    #[test]
    fn amount_accepts_positive_numbers_and_digit_strings() {
        assert_eq!(parse_amount(Some(&json!(3))).unwrap().get(), 3);
        assert_eq!(parse_amount(Some(&json!("12"))).unwrap().get(), 12);
    }

    #[test]
    fn amount_rejects_zero_negative_and_fractional() {
        for bad in [json!(0), json!(-1), json!(1.5), json!("-2"), json!("1e3"), json!(true)] {
            assert!(parse_amount(Some(&bad)).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn metadata_is_kept_as_text() {
        assert_eq!(
            metadata_text(json!("{\"item\":\"widget\"}")).as_deref(),
            Some("{\"item\":\"widget\"}")
        );
        assert_eq!(
            metadata_text(json!({"item": "widget"})).as_deref(),
            Some("{\"item\":\"widget\"}")
        );
        assert_eq!(metadata_text(Value::Null), None);
    }
}
