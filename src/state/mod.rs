//! Process-wide relay counters.
//!
//! Counters are atomics because the streaming pump increments the byte count
//! from the transfer hot path; [`AppState::snapshot`] produces the
//! serializable view served by the stats API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared mutable application state. One instance per process, read-only
/// configuration aside.
pub struct AppState {
    started_at: DateTime<Utc>,
    partial_responses: AtomicU64,
    redirects: AtomicU64,
    errors: AtomicU64,
    stream_failures: AtomicU64,
    bytes_relayed: AtomicU64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            partial_responses: AtomicU64::new(0),
            redirects: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            stream_failures: AtomicU64::new(0),
            bytes_relayed: AtomicU64::new(0),
        }
    }

    /// A partial-content response was composed and handed to the client.
    pub fn record_partial(&self) {
        self.partial_responses.fetch_add(1, Ordering::Relaxed);
    }

    /// A request degraded to a direct redirect.
    pub fn record_redirect(&self) {
        self.redirects.fetch_add(1, Ordering::Relaxed);
    }

    /// A request ended in an error response.
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// An already-started body transfer was truncated.
    pub fn record_stream_failure(&self) {
        self.stream_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Bytes moved from upstream to a client.
    pub fn record_relayed_bytes(&self, n: u64) {
        self.bytes_relayed.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayStats {
        RelayStats {
            started_at: self.started_at,
            partial_responses: self.partial_responses.load(Ordering::Relaxed),
            redirects: self.redirects.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            stream_failures: self.stream_failures.load(Ordering::Relaxed),
            bytes_relayed: self.bytes_relayed.load(Ordering::Relaxed),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the relay counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayStats {
    pub started_at: DateTime<Utc>,
    pub partial_responses: u64,
    pub redirects: u64,
    pub errors: u64,
    pub stream_failures: u64,
    pub bytes_relayed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counts() {
        let state = AppState::new();
        state.record_partial();
        state.record_partial();
        state.record_redirect();
        state.record_error();
        state.record_stream_failure();
        state.record_relayed_bytes(4096);
        state.record_relayed_bytes(1024);

        let stats = state.snapshot();
        assert_eq!(stats.partial_responses, 2);
        assert_eq!(stats.redirects, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.stream_failures, 1);
        assert_eq!(stats.bytes_relayed, 5120);
    }

    #[test]
    fn stats_serialize_round_trip() {
        let stats = AppState::new().snapshot();
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: RelayStats = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.partial_responses, 0);
        assert_eq!(parsed.started_at, stats.started_at);
    }
}
