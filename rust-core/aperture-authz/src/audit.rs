// SPDX-License-Identifier: PMPL-1.0-or-later
//! Access decision audit trail.
//!
//! Guarded session operations and role assignments append an [`AuditEntry`]
//! here. The log is a bounded ring buffer shared by clone: every session
//! handed the same [`AuditLog`] writes into the same buffer.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aperture_model::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Allowed,
    Denied,
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDecision::Allowed => write!(f, "ALLOWED"),
            AccessDecision::Denied => write!(f, "DENIED"),
        }
    }
}

impl From<bool> for AccessDecision {
    fn from(granted: bool) -> Self {
        if granted {
            AccessDecision::Allowed
        } else {
            AccessDecision::Denied
        }
    }
}

/// A single entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    /// `None` when no actor was bound.
    pub actor_id: Option<String>,
    pub role: Option<Role>,
    /// What was asked for: a canonical permission, a page id, or a
    /// `role:<name>` assignment.
    pub subject: String,
    pub decision: AccessDecision,
    pub reason: Option<String>,
}

impl AuditEntry {
    pub fn new(
        actor_id: Option<&str>,
        role: Option<Role>,
        subject: impl Into<String>,
        decision: AccessDecision,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            actor_id: actor_id.map(str::to_string),
            role,
            subject: subject.into(),
            decision,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Thread-safe, bounded audit log.
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: Arc<Mutex<VecDeque<AuditEntry>>>,
    max_entries: usize,
}

impl AuditLog {
    /// Create a new audit log retaining at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries.min(4096)))),
            max_entries,
        }
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned buffer is still consistent.
    fn lock(&self) -> MutexGuard<'_, VecDeque<AuditEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a decision, dropping the oldest entry when full.
    pub fn record(&self, entry: AuditEntry) {
        if self.max_entries == 0 {
            return;
        }
        let mut entries = self.lock();
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of all retained entries, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Retained entries with the given decision.
    pub fn filter(&self, decision: AccessDecision) -> Vec<AuditEntry> {
        self.lock()
            .iter()
            .filter(|e| e.decision == decision)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(10_000)
    }
}
