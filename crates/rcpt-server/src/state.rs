use std::sync::Arc;

use rcpt_audit::AuditLog;
use rcpt_ledger::{LedgerClient, Operator};

/// Shared application state, handed to every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerClient>,
    pub operator: Arc<Operator>,
    pub audit: Arc<AuditLog>,
}

impl AppState {
    /// State with a fresh, empty audit log.
    pub fn new(ledger: Arc<dyn LedgerClient>, operator: Operator) -> Self {
        Self {
            ledger,
            operator: Arc::new(operator),
            audit: Arc::new(AuditLog::new()),
        }
    }

    pub fn operator_id(&self) -> String {
        self.operator.account_id().to_string()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("operator", &self.operator.account_id())
            .field("audit_records", &self.audit.len())
            .finish_non_exhaustive()
    }
}
