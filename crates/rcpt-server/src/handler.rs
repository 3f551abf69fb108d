use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Json};

use rcpt_api::{
    AssociateTokenRequest, BalanceResponse, HealthResponse, LogsResponse, MintReceiptRequest,
    MintReceiptResponse, OperationResponse, TransferReceiptRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/mint-receipt`
pub async fn mint_receipt_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MintReceiptRequest>, JsonRejection>,
) -> Result<Json<MintReceiptResponse>, ApiError> {
    let Json(request) = body?;
    state.mint_receipt(request).await.map(Json)
}

/// `POST /api/transfer-receipt`
pub async fn transfer_receipt_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TransferReceiptRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Json(request) = body?;
    state.transfer_receipt(request).await.map(Json)
}

/// `POST /api/associate-token`
pub async fn associate_token_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AssociateTokenRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Json(request) = body?;
    state.associate_token(request).await.map(Json)
}

/// `GET /api/balance/:account_id`
pub async fn balance_handler(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    state.balance(&account_id).await.map(Json)
}

/// `GET /api/logs`
pub async fn logs_handler(State(state): State<Arc<AppState>>) -> Json<LogsResponse> {
    Json(state.logs())
}

/// `GET /api/health`
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.health())
}

/// `GET /`
pub async fn ui_handler() -> Html<&'static str> {
    Html(crate::ui::INDEX_HTML)
}
