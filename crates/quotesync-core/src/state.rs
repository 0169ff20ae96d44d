//! Shared sync status types published to presentation layers.

use crate::sync::SyncReport;

/// Phase of the sync engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Synced,
    Error,
}

impl SyncState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Error => "error",
        }
    }
}

/// Latest observable sync status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncStatus {
    pub state: SyncState,
    /// Timestamp (unix ms) of the most recent completed cycle
    pub last_sync_at: Option<i64>,
    /// Counters of the most recent completed cycle
    pub last_report: Option<SyncReport>,
    /// Message of the most recent failed fetch
    pub last_error: Option<String>,
}
