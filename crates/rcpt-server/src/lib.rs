//! HTTP server for the receipt token service.
//!
//! Hosts the mint, transfer, associate, balance, log and health endpoints
//! over a [`LedgerClient`](rcpt_ledger::LedgerClient), journals every
//! successful ledger operation in an [`AuditLog`](rcpt_audit::AuditLog), and
//! serves a small web UI at `/`.

pub mod config;
pub mod error;
pub mod handler;
pub mod operations;
pub mod router;
pub mod server;
pub mod state;
pub mod ui;

pub use config::{FileConfig, SandboxConfig, ServerConfig};
pub use error::{ApiError, ServerError, ServerResult};
pub use router::build_router;
pub use server::ReceiptServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use rcpt_crypto::SigningKey;
    use rcpt_ledger::{EntityId, Hbar, Operator, SandboxLedger};
    use tower::util::ServiceExt;

    fn app() -> axum::Router {
        let key = SigningKey::from_bytes([3; 32]);
        let ledger = SandboxLedger::new();
        ledger
            .create_account_with_id(EntityId::new(0, 0, 2), key.verifying_key(), Hbar::new(100))
            .unwrap();
        let operator = Operator::new(EntityId::new(0, 0, 2), key);
        build_router(Arc::new(AppState::new(Arc::new(ledger), operator)))
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ui_is_served_at_root() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/associate-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/logs")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
