//! Append-only audit log of admin-initiated mutations, bounded for local use.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::now_rfc3339;

/// The log keeps only the most recent entries; oldest are dropped.
const MAX_ENTRIES: usize = 200;

/// An immutable record of one admin action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub timestamp: String,
    pub actor_id: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Input for [`AuditLog::append`]; the timestamp is stamped by the log.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub actor_id: String,
    pub action: String,
    pub target_id: Option<String>,
    pub message: Option<String>,
}

impl NewAuditEntry {
    #[must_use]
    pub fn new(actor_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            action: action.into(),
            target_id: None,
            message: None,
        }
    }

    #[must_use]
    pub fn target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Most-recent-first bounded list of [`AuditEntry`] values.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the current time, prepend, truncate to the bound, and return
    /// the stored entry.
    pub fn append(&mut self, entry: NewAuditEntry) -> AuditEntry {
        let stored = AuditEntry {
            timestamp: now_rfc3339(),
            actor_id: entry.actor_id,
            action: entry.action,
            target_id: entry.target_id,
            message: entry.message,
        };
        self.entries.insert(0, stored.clone());
        self.entries.truncate(MAX_ENTRIES);
        stored
    }

    /// Snapshot copy, most-recent-first.
    #[must_use]
    pub fn list(&self) -> Vec<AuditEntry> {
        self.entries.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
