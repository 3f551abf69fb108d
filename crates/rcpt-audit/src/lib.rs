//! Audit journal for the receipt token service.
//!
//! Every successful ledger operation leaves exactly one [`AuditRecord`] in
//! the [`AuditLog`]. The log is append-only and lives for the lifetime of the
//! process; failures never reach it.

pub mod log;
pub mod record;

pub use log::{AuditLog, AuditSnapshot};
pub use record::{AuditOperation, AuditRecord, AuditStatus, OperationType};
