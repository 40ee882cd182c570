//! Metrics collection for relationship toggles

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every request that goes through the engine
#[derive(Debug, Default)]
pub struct ToggleMetrics {
    added: AtomicU64,
    removed: AtomicU64,
    unchanged: AtomicU64,
    counter_adjustments: AtomicU64,
    compensations: AtomicU64,
    inconsistencies: AtomicU64,
}

/// Point-in-time copy of [`ToggleMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Memberships added
    pub added: u64,
    /// Memberships removed
    pub removed: u64,
    /// Toggles that found the set already in the requested state
    pub unchanged: u64,
    /// Counter increments and decrements applied
    pub counter_adjustments: u64,
    /// Partial toggles rolled back
    pub compensations: u64,
    /// Partial toggles that could not be rolled back
    pub inconsistencies: u64,
}

impl ToggleMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_added(&self) {
        self.added.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removed(&self) {
        self.removed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_counter_adjustment(&self) {
        self.counter_adjustments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_compensation(&self) {
        self.compensations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_inconsistency(&self) {
        self.inconsistencies.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            added: self.added.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            counter_adjustments: self.counter_adjustments.load(Ordering::Relaxed),
            compensations: self.compensations.load(Ordering::Relaxed),
            inconsistencies: self.inconsistencies.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        for counter in [
            &self.added,
            &self.removed,
            &self.unchanged,
            &self.counter_adjustments,
            &self.compensations,
            &self.inconsistencies,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let s = self.snapshot();
        let mut lines = vec![
            "Toggle Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Added: {}", s.added),
            format!("Removed: {}", s.removed),
            format!("Unchanged: {}", s.unchanged),
            format!("Counter adjustments: {}", s.counter_adjustments),
        ];

        if s.compensations > 0 || s.inconsistencies > 0 {
            lines.push(String::new());
            lines.push(format!("Compensations: {}", s.compensations));
            lines.push(format!("Inconsistencies: {}", s.inconsistencies));
        }

        lines.join("\n")
    }
}
