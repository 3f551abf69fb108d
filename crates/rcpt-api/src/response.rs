use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rcpt_audit::AuditRecord;
use rcpt_types::TokenId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceiptResponse {
    pub success: bool,
    pub message: String,
    pub token_id: TokenId,
    pub transaction: AuditRecord,
}

/// Success body for transfer and association.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub success: bool,
    pub message: String,
    pub transaction: AuditRecord,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub success: bool,
    pub account_id: String,
    /// Native balance in display form, e.g. `"100 ℏ"`.
    pub hbar_balance: String,
    /// Token id → balance, both as strings.
    pub tokens: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    pub success: bool,
    pub logs: Vec<AuditRecord>,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub operator_id: String,
}

impl HealthResponse {
    pub fn ok(operator_id: impl Into<String>) -> Self {
        Self {
            status: "OK".into(),
            message: "Receipt token service is running".into(),
            operator_id: operator_id.into(),
        }
    }
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::ok("0.0.2");
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["status"], "OK");
        assert_eq!(json["operatorId"], "0.0.2");
    }

    #[test]
    fn empty_logs_shape() {
        let body = LogsResponse {
            success: true,
            logs: Vec::new(),
            count: 0,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"success": true, "logs": [], "count": 0})
        );
    }

    #[test]
    fn error_body_omits_missing_details() {
        let body = ErrorBody {
            error: "Missing required fields: tokenId".into(),
            details: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn balance_uses_camel_case() {
        let body = BalanceResponse {
            success: true,
            account_id: "0.0.1001".into(),
            hbar_balance: "0 ℏ".into(),
            tokens: BTreeMap::new(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["accountId"], "0.0.1001");
        assert_eq!(json["hbarBalance"], "0 ℏ");
    }
}
