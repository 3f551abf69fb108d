use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use serde::Serialize;

use rcpt_types::TransactionRef;

use crate::record::{AuditOperation, AuditRecord, AuditStatus, OperationType};

/// Append-only journal of successful operations.
///
/// Insertion order is chronological order. Records are never mutated or
/// removed, and the log does not survive the process.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

/// Point-in-time copy of the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditSnapshot {
    pub records: Vec<AuditRecord>,
}

impl AuditSnapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp and append a record, returning a copy of what was stored.
    ///
    /// The timestamp is taken under the write lock, so timestamps never run
    /// backwards along the log.
    pub fn append(&self, operation: AuditOperation, transaction_id: TransactionRef) -> AuditRecord {
        // A record is pushed whole or not at all, so a poisoned lock still
        // guards a consistent vector.
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let record = AuditRecord {
            timestamp: Utc::now(),
            operation,
            transaction_id,
            status: AuditStatus::Success,
        };
        records.push(record.clone());
        tracing::debug!(
            kind = %record.operation_type(),
            tx = %record.transaction_id,
            len = records.len(),
            "audit record appended"
        );
        record
    }

    pub fn snapshot(&self) -> AuditSnapshot {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        AuditSnapshot {
            records: records.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent record of the given kind.
    pub fn latest(&self, kind: OperationType) -> Option<AuditRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .rev()
            .find(|r| r.operation_type() == kind)
            .cloned()
    }
}
