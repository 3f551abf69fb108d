use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/mint-receipt`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceiptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Free-form; any JSON value is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Body of `POST /api/transfer-receipt`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceiptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    /// A JSON number or a decimal string; browser forms send the latter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
}

/// Body of `POST /api/associate-token`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociateTokenRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: MintReceiptRequest = serde_json::from_str(r#"{"actionType":"Buy"}"#).unwrap();
        assert!(req.recipient_id.is_none());
        assert_eq!(req.action_type.as_deref(), Some("Buy"));
        assert!(req.metadata.is_none());
    }

    #[test]
    fn null_is_treated_as_missing() {
        let req: AssociateTokenRequest =
            serde_json::from_str(r#"{"tokenId":null,"accountId":"0.0.1001"}"#).unwrap();
        assert!(req.token_id.is_none());
    }

    #[test]
    fn amount_accepts_numbers_and_strings() {
        let n: TransferReceiptRequest = serde_json::from_str(r#"{"amount":1}"#).unwrap();
        let s: TransferReceiptRequest = serde_json::from_str(r#"{"amount":"1"}"#).unwrap();
        assert!(n.amount.unwrap().is_u64());
        assert!(s.amount.unwrap().is_string());
    }

    #[test]
    fn serializes_camel_case_and_skips_absent() {
        let req = TransferReceiptRequest {
            token_id: Some("0.0.500".into()),
            to_account_id: Some("0.0.1002".into()),
            amount: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["toAccountId"], "0.0.1002");
        assert!(json.get("amount").is_none());
    }
}
