use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use tokio::net::TcpListener;

use rcpt_ledger::{EntityId, Hbar, SandboxLedger};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Receipt token HTTP server.
pub struct ReceiptServer {
    bind_addr: SocketAddr,
    state: Arc<AppState>,
}

impl ReceiptServer {
    pub fn new(bind_addr: SocketAddr, state: AppState) -> Self {
        Self {
            bind_addr,
            state: Arc::new(state),
        }
    }

    /// Server backed by an in-process sandbox ledger.
    ///
    /// The operator account is seeded with the configured balance. Extra
    /// accounts share the operator key, so the operator can sign their
    /// token associations.
    pub fn sandbox(config: ServerConfig) -> ServerResult<Self> {
        let ledger = SandboxLedger::new();
        let operator = config.operator;
        ledger.create_account_with_id(
            operator.account_id(),
            operator.public_key(),
            Hbar::new(config.sandbox.operator_balance_hbar),
        )?;
        for raw in &config.sandbox.accounts {
            let id = EntityId::from_str(raw.trim())
                .map_err(|e| ServerError::Config(format!("sandbox account: {e}")))?;
            if !ledger.create_account_with_id(id, operator.public_key(), Hbar::ZERO)? {
                tracing::warn!(account = %id, "sandbox account already exists, skipping");
            }
        }
        tracing::info!(
            operator = %operator.account_id(),
            accounts = config.sandbox.accounts.len(),
            "sandbox ledger seeded"
        );

        let state = AppState::new(Arc::new(ledger), operator);
        Ok(Self::new(config.bind_addr, state))
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve until ctrl-c or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.bind_addr.to_string(),
                source,
            })?;
        tracing::info!(
            addr = %self.bind_addr,
            operator = %self.state.operator_id(),
            "receipt server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!(records = self.state.audit.len(), "receipt server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
