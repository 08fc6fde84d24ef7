//! Aggregation audit log for post-hoc analysis.
//!
//! Records who contributed to each round and which variables were averaged.

use serde::{Deserialize, Serialize};

/// Metadata for a single aggregation round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundAuditEntry {
    /// Round number reported by the host, if any.
    pub round: Option<u64>,
    /// Number of contributions averaged.
    pub n_contributions: usize,
    /// Variable names in result order.
    pub variables: Vec<String>,
    /// Contributing clients in acceptance order.
    pub clients: Vec<String>,
}

/// Append-only audit log of aggregation rounds.
///
/// Entries are never evicted; long-running coordinators should drain the log
/// periodically with [`MeanAggregator::take_audit_log`](crate::MeanAggregator::take_audit_log).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<RoundAuditEntry>,
}

impl AuditLog {
    /// Create a new, empty audit log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry to the log.
    pub fn push(&mut self, entry: RoundAuditEntry) {
        self.entries.push(entry);
    }

    /// Get all entries.
    pub fn entries(&self) -> &[RoundAuditEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&RoundAuditEntry> {
        self.entries.last()
    }

    /// Number of recorded rounds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the audit log to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
