//! # Status Reporting
//!
//! User-facing diagnostics. The engine never reports on its own: callers
//! hand a failed computation or the advisories of a successful one to a
//! [`StatusReporter`], usually through
//! [`LossEngine::compute_and_report`](crate::losses::LossEngine::compute_and_report).
//!
//! ```rust
//! use loss_core::bridge::SegmentKey;
//! use loss_core::errors::{LossComputationError, LossError};
//! use loss_core::status::{StatusItem, StatusLog, StatusReporter};
//!
//! let log = StatusLog::new();
//! let failure = LossError::library_failure("boom");
//! let error = LossComputationError::new(SegmentKey::new(0, 0, 0), failure);
//! log.report(StatusItem::from_error(&error));
//! assert_eq!(log.items()[0].reason_code, "LOSS_UNKNOWN_ERROR");
//! ```

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bridge::SegmentKey;
use crate::errors::{LossComputationError, Severity};

/// A non-fatal note attached to a successful computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub severity: Severity,
    pub reason_code: String,
    pub message: String,
}

impl Advisory {
    /// Reason code recorded when the hybrid Fcgp policy falls back to iteration
    pub const FCGP_ITERATIVE_FALLBACK: &'static str = "LOSS_FCGP_ITERATIVE_FALLBACK";

    pub fn new(
        severity: Severity,
        reason_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Advisory {
            severity,
            reason_code: reason_code.into(),
            message: message.into(),
        }
    }
}

/// One entry in the status center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusItem {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub segment: SegmentKey,
    pub severity: Severity,
    pub reason_code: String,
    pub message: String,
}

impl StatusItem {
    pub fn new(
        segment: SegmentKey,
        severity: Severity,
        reason_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StatusItem {
            id: Uuid::new_v4(),
            created: Utc::now(),
            segment,
            severity,
            reason_code: reason_code.into(),
            message: message.into(),
        }
    }

    /// Status item describing an abandoned computation
    pub fn from_error(error: &LossComputationError) -> Self {
        StatusItem::new(error.segment, error.severity, error.reason_code(), error.to_string())
    }

    pub fn from_advisory(segment: SegmentKey, advisory: &Advisory) -> Self {
        StatusItem::new(
            segment,
            advisory.severity,
            advisory.reason_code.clone(),
            advisory.message.clone(),
        )
    }
}

/// Receives categorized diagnostics
pub trait StatusReporter {
    fn report(&self, item: StatusItem);
}

/// In-memory status center
#[derive(Debug, Default)]
pub struct StatusLog {
    items: Mutex<Vec<StatusItem>>,
}

impl StatusLog {
    pub fn new() -> Self {
        StatusLog::default()
    }

    /// Snapshot of the reported items, oldest first
    pub fn items(&self) -> Vec<StatusItem> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest severity reported so far
    pub fn worst_severity(&self) -> Option<Severity> {
        self.items().iter().map(|item| item.severity).max()
    }
}

impl StatusReporter for StatusLog {
    fn report(&self, item: StatusItem) {
        match self.items.lock() {
            Ok(mut items) => items.push(item),
            Err(poisoned) => poisoned.into_inner().push(item),
        }
    }
}
