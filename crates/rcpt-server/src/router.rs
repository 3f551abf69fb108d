use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rcpt_api::endpoints;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with every receipt endpoint and the web UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(endpoints::MINT_RECEIPT, post(handler::mint_receipt_handler))
        .route(endpoints::TRANSFER_RECEIPT, post(handler::transfer_receipt_handler))
        .route(endpoints::ASSOCIATE_TOKEN, post(handler::associate_token_handler))
        .route(endpoints::BALANCE, get(handler::balance_handler))
        .route(endpoints::LOGS, get(handler::logs_handler))
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::UI, get(handler::ui_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
