//! End-to-end tests of the HTTP surface against the sandbox ledger.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use rcpt_audit::OperationType;
use rcpt_crypto::SigningKey;
use rcpt_ledger::{
    AccountBalance, AccountBalanceQuery, EntityId, FrozenTransaction, Hbar, LedgerClient,
    LedgerError, Operator, SandboxLedger, TransactionBody, TransactionId, TransactionReceipt,
    TransactionResponse,
};
use rcpt_server::{build_router, AppState};

const OPERATOR: EntityId = EntityId::new(0, 0, 2);
const ALICE: &str = "0.0.1001";
const BOB: &str = "0.0.1002";

fn operator_key() -> SigningKey {
    SigningKey::from_bytes([11; 32])
}

/// Sandbox with the operator and two extra accounts, all keyed with the
/// operator key.
fn sandbox() -> SandboxLedger {
    let ledger = SandboxLedger::new();
    let public = operator_key().verifying_key();
    ledger
        .create_account_with_id(OPERATOR, public.clone(), Hbar::new(1_000))
        .unwrap();
    for account in [ALICE, BOB] {
        ledger
            .create_account_with_id(account.parse().unwrap(), public.clone(), Hbar::ZERO)
            .unwrap();
    }
    ledger
}

fn state_with(ledger: Arc<dyn LedgerClient>) -> Arc<AppState> {
    Arc::new(AppState::new(ledger, Operator::new(OPERATOR, operator_key())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn log_count(app: &Router) -> u64 {
    let (_, body) = send(app, "GET", "/api/logs", None).await;
    body["count"].as_u64().unwrap()
}

async fn mint(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/mint-receipt",
        Some(json!({"recipientId": ALICE, "actionType": "Buy"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["tokenId"].as_str().unwrap().to_string()
}

/// Counts every call that reaches the ledger.
struct CountingLedger {
    inner: SandboxLedger,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LedgerClient for CountingLedger {
    async fn submit(
        &self,
        transaction: &FrozenTransaction,
    ) -> Result<TransactionResponse, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.submit(transaction).await
    }

    async fn receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.receipt(transaction_id).await
    }

    async fn account_balance(
        &self,
        query: &AccountBalanceQuery,
    ) -> Result<AccountBalance, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.account_balance(query).await
    }
}

/// Holds back associations for one account before passing them on.
struct SlowAssociations {
    inner: SandboxLedger,
    slow_account: EntityId,
}

#[async_trait]
impl LedgerClient for SlowAssociations {
    async fn submit(
        &self,
        transaction: &FrozenTransaction,
    ) -> Result<TransactionResponse, LedgerError> {
        if let TransactionBody::TokenAssociate(body) = transaction.body()?.body {
            if body.account_id == self.slow_account {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
        }
        self.inner.submit(transaction).await
    }

    async fn receipt(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<TransactionReceipt, LedgerError> {
        self.inner.receipt(transaction_id).await
    }

    async fn account_balance(
        &self,
        query: &AccountBalanceQuery,
    ) -> Result<AccountBalance, LedgerError> {
        self.inner.account_balance(query).await
    }
}

#[tokio::test]
async fn logs_start_empty() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let (status, body) = send(&app, "GET", "/api/logs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "logs": [], "count": 0}));
}

#[tokio::test]
async fn health_reports_operator() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Receipt token service is running");
    assert_eq!(body["operatorId"], "0.0.2");
}

#[tokio::test]
async fn mint_records_receipt_with_metadata() {
    let state = state_with(Arc::new(sandbox()));
    let app = build_router(state.clone());

    let (status, body) = send(
        &app,
        "POST",
        "/api/mint-receipt",
        Some(json!({
            "recipientId": ALICE,
            "actionType": "Buy",
            "metadata": "{\"item\":\"widget\"}",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Receipt token created successfully");
    let tx = &body["transaction"];
    assert_eq!(tx["type"], "MINT_RECEIPT");
    assert_eq!(tx["actionType"], "Buy");
    assert_eq!(tx["recipient"], ALICE);
    assert_eq!(tx["metadata"], "{\"item\":\"widget\"}");
    assert_eq!(tx["status"], "SUCCESS");
    assert!(tx["transactionId"].as_str().unwrap().starts_with("0.0.2@"));
    assert_eq!(log_count(&app).await, 1);

    let latest = state.audit.latest(OperationType::MintReceipt).unwrap();
    assert_eq!(body["tokenId"], latest.operation.token_id().as_str());
    assert_eq!(tx["tokenId"], body["tokenId"]);
}

#[tokio::test]
async fn missing_fields_never_reach_the_ledger() {
    let calls = Arc::new(AtomicUsize::new(0));
    let ledger = CountingLedger {
        inner: sandbox(),
        calls: calls.clone(),
    };
    let app = build_router(state_with(Arc::new(ledger)));

    let (status, body) = send(
        &app,
        "POST",
        "/api/mint-receipt",
        Some(json!({"actionType": "Buy"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: recipientId, actionType");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": "0.0.1003", "toAccountId": ALICE, "amount": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": "0.0.1003", "toAccountId": ALICE})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: tokenId, toAccountId, amount");
    assert_eq!(body["details"], "missing: amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"toAccountId": ALICE, "amount": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: tokenId, toAccountId, amount");
    assert_eq!(body["details"], "missing: tokenId");

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": "0.0.1003", "toAccountId": ALICE, "amount": u64::MAX})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/associate-token",
        Some(json!({"tokenId": "  ", "accountId": ALICE})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields: tokenId, accountId");
    assert_eq!(body["details"], "missing: tokenId");

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(log_count(&app).await, 0);
}

#[tokio::test]
async fn transfer_to_unassociated_account_fails_without_logging() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let token = mint(&app).await;
    assert_eq!(log_count(&app).await, 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": token, "toAccountId": BOB, "amount": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to transfer receipt");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("TOKEN_NOT_ASSOCIATED_TO_ACCOUNT"));
    assert_eq!(log_count(&app).await, 1);
}

#[tokio::test]
async fn transfer_back_to_operator_fails_without_logging() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let token = mint(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": token, "toAccountId": "0.0.2", "amount": 1000})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to transfer receipt");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS"));
    assert_eq!(log_count(&app).await, 1);

    let (_, body) = send(&app, "GET", "/api/balance/0.0.2", None).await;
    assert_eq!(body["tokens"][token.as_str()], "1");
}

#[tokio::test]
async fn mint_associate_transfer_and_balance() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let token = mint(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/associate-token",
        Some(json!({"tokenId": token, "accountId": ALICE})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Token associated successfully");
    assert_eq!(body["transaction"]["type"], "ASSOCIATE_TOKEN");
    assert_eq!(body["transaction"]["accountId"], ALICE);

    let (status, body) = send(
        &app,
        "POST",
        "/api/transfer-receipt",
        Some(json!({"tokenId": token, "toAccountId": ALICE, "amount": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Receipt transferred successfully");
    let tx = &body["transaction"];
    assert_eq!(tx["type"], "TRANSFER_RECEIPT");
    assert_eq!(tx["fromAccount"], "0.0.2");
    assert_eq!(tx["toAccount"], ALICE);
    assert_eq!(tx["amount"], 1);
    assert_eq!(log_count(&app).await, 3);

    let (status, body) = send(&app, "GET", &format!("/api/balance/{ALICE}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["accountId"], ALICE);
    assert_eq!(body["hbarBalance"], "0 ℏ");
    assert_eq!(body["tokens"][token.as_str()], "1");

    let (_, body) = send(&app, "GET", "/api/balance/0.0.2", None).await;
    assert_eq!(body["hbarBalance"], "1000 ℏ");
    assert_eq!(body["tokens"][token.as_str()], "0");

    // Reads leave the log alone.
    assert_eq!(log_count(&app).await, 3);
}

#[tokio::test]
async fn associating_twice_is_an_operation_failure() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let token = mint(&app).await;
    let request = json!({"tokenId": token, "accountId": ALICE});

    let (status, _) = send(&app, "POST", "/api/associate-token", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/api/associate-token", Some(request)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to associate token");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT"));
    assert_eq!(log_count(&app).await, 2);
}

#[tokio::test]
async fn balance_of_unknown_account_fails() {
    let app = build_router(state_with(Arc::new(sandbox())));

    let (status, body) = send(&app, "GET", "/api/balance/0.0.999999", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch balance");
    assert!(body["details"].as_str().unwrap().contains("INVALID_ACCOUNT_ID"));

    let (status, body) = send(&app, "GET", "/api/balance/alice", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch balance");
}

#[tokio::test]
async fn unparseable_ledger_ids_are_operation_failures() {
    let app = build_router(state_with(Arc::new(sandbox())));
    let (status, body) = send(
        &app,
        "POST",
        "/api/associate-token",
        Some(json!({"tokenId": "receipt-1", "accountId": ALICE})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to associate token");
    assert_eq!(log_count(&app).await, 0);
}

#[tokio::test]
async fn log_order_follows_completion_order() {
    let ledger = SlowAssociations {
        inner: sandbox(),
        slow_account: ALICE.parse().unwrap(),
    };
    let app = build_router(state_with(Arc::new(ledger)));
    let token = mint(&app).await;

    let slow = send(
        &app,
        "POST",
        "/api/associate-token",
        Some(json!({"tokenId": token, "accountId": ALICE})),
    );
    let fast = send(
        &app,
        "POST",
        "/api/associate-token",
        Some(json!({"tokenId": token, "accountId": BOB})),
    );
    let ((slow_status, _), (fast_status, _)) = tokio::join!(slow, fast);
    assert_eq!(slow_status, StatusCode::OK);
    assert_eq!(fast_status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/logs", None).await;
    let accounts: Vec<&str> = body["logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|log| log["accountId"].as_str())
        .collect();
    assert_eq!(accounts, vec![BOB, ALICE]);
    assert_eq!(body["count"], 3);
}
