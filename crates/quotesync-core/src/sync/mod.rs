//! Optimistic merge of the local quote store against a remote batch.
//!
//! A cycle pulls one batch, merges it into the store by canonical key, then
//! pushes every dirty local quote. Remote content always wins over a clean
//! local duplicate; it yields to a dirty local quote only in manual conflict
//! mode, where the pair is parked in the [`ConflictQueue`].

mod conflicts;
pub mod scheduler;

pub use conflicts::ConflictQueue;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::config::SyncSettings;
use crate::models::{Conflict, Quote, RemoteId};
use crate::remote::{RemoteAdapter, RemoteQuote};
use crate::state::{SyncState, SyncStatus};
use crate::store::QuoteStore;
use crate::util::now_millis;

/// Counters for one completed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added_from_server: usize,
    pub uploaded_to_server: usize,
    pub auto_resolved: usize,
    pub upload_failures: usize,
    pub pending_conflicts: usize,
}

/// Result of the merge step alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added_from_server: usize,
    pub auto_resolved: usize,
    pub conflicts_detected: usize,
}

/// How a sync trigger ended. Reconciliation never raises to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Fetch, merge and uploads ran
    Completed(SyncReport),
    /// Another cycle was in flight; the trigger was dropped
    Skipped,
    /// Fetch failed; the store was not touched
    Failed(String),
}

impl SyncOutcome {
    #[must_use]
    pub const fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Skipped | Self::Failed(_) => None,
        }
    }

    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Completed(report) => format!(
                "Sync completed: {} added from server, {} uploaded, {} auto-resolved, {} pending conflicts{}",
                report.added_from_server,
                report.uploaded_to_server,
                report.auto_resolved,
                report.pending_conflicts,
                if report.upload_failures > 0 {
                    format!(", {} uploads to retry", report.upload_failures)
                } else {
                    String::new()
                }
            ),
            Self::Skipped => "Sync skipped: a cycle is already running".to_string(),
            Self::Failed(message) => format!("Sync failed: {message}"),
        }
    }
}

/// Merge a fetched batch into the store.
///
/// Per remote record, matched by canonical key:
/// - no local match: inserted as a clean remote quote
/// - identical raw text and category: nothing to do
/// - clean local: overwritten by the remote copy
/// - dirty local: queued as a conflict in manual mode, overwritten otherwise
pub fn reconcile(
    store: &mut QuoteStore,
    conflicts: &mut ConflictQueue,
    batch: Vec<RemoteQuote>,
    manual_conflict_mode: bool,
) -> MergeReport {
    let mut report = MergeReport::default();
    let mut local_by_key = HashMap::new();
    for (index, quote) in store.all().iter().enumerate() {
        local_by_key.entry(quote.canonical_key()).or_insert(index);
    }

    for remote in batch {
        let incoming = remote.into_quote();
        if incoming.validate().is_err() {
            tracing::debug!("Ignoring malformed remote record");
            continue;
        }
        let key = incoming.canonical_key();

        let Some(&index) = local_by_key.get(&key) else {
            if store.add(incoming).is_ok() {
                local_by_key.insert(key, store.len() - 1);
                report.added_from_server += 1;
            }
            continue;
        };

        let local = &store.all()[index];
        if local.same_content(&incoming) {
            continue;
        }

        if local.dirty && manual_conflict_mode {
            tracing::debug!(key = %key, "Queueing conflict for manual review");
            let conflict = Conflict {
                key,
                local: local.clone(),
                remote: incoming,
            };
            if conflicts.enqueue(conflict) {
                report.conflicts_detected += 1;
            }
            continue;
        }

        tracing::debug!(key = %key, dirty = local.dirty, "Remote copy wins");
        store.replace_at(&key, incoming);
        report.auto_resolved += 1;
    }

    report
}

/// Runs sync cycles one at a time and publishes their status.
#[derive(Debug)]
pub struct SyncEngine {
    manual_conflict_mode: AtomicBool,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
}

impl SyncEngine {
    pub fn new(manual_conflict_mode: bool) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        Self {
            manual_conflict_mode: AtomicBool::new(manual_conflict_mode),
            in_flight: AtomicBool::new(false),
            status,
        }
    }

    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self::new(settings.manual_conflict_mode)
    }

    pub fn manual_conflict_mode(&self) -> bool {
        self.manual_conflict_mode.load(Ordering::SeqCst)
    }

    pub fn set_manual_conflict_mode(&self, enabled: bool) {
        self.manual_conflict_mode.store(enabled, Ordering::SeqCst);
    }

    /// Whether a cycle currently holds the single-flight slot.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Receive status updates as cycles start and finish.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Snapshot of the latest status.
    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }

    /// Claim the single-flight slot, `None` when a cycle is already running.
    ///
    /// The slot is released when the returned guard is dropped.
    pub fn try_begin(&self) -> Option<CycleGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| CycleGuard { engine: self })
    }

    /// Run one cycle against `store`, or skip if one is already running.
    pub async fn run_cycle<R: RemoteAdapter>(
        &self,
        store: &mut QuoteStore,
        conflicts: &mut ConflictQueue,
        remote: &R,
    ) -> SyncOutcome {
        let Some(guard) = self.try_begin() else {
            tracing::debug!("Sync trigger dropped: cycle already in flight");
            return SyncOutcome::Skipped;
        };
        guard.run(store, conflicts, remote).await
    }

    fn publish(&self, update: impl FnOnce(&mut SyncStatus)) {
        self.status.send_modify(update);
    }
}

/// Exclusive right to run one cycle.
#[derive(Debug)]
pub struct CycleGuard<'a> {
    engine: &'a SyncEngine,
}

/// Local state after the merge phase: counters plus the quotes to push.
#[derive(Debug, Clone, Default)]
pub struct MergedBatch {
    pub report: MergeReport,
    pub uploads: Vec<Quote>,
}

/// Result of pushing a set of snapshots to the remote.
#[derive(Debug, Clone, Default)]
pub struct UploadResults {
    pub confirmed: Vec<(Quote, RemoteId)>,
    pub failures: usize,
}

impl CycleGuard<'_> {
    /// Fetch, merge and upload, consuming the guard.
    ///
    /// Callers that share the store with other tasks should drive the phases
    /// themselves so no lock is held across [`fetch`](Self::fetch) or
    /// [`upload`](Self::upload).
    pub async fn run<R: RemoteAdapter>(
        self,
        store: &mut QuoteStore,
        conflicts: &mut ConflictQueue,
        remote: &R,
    ) -> SyncOutcome {
        let batch = match self.fetch(remote).await {
            Ok(batch) => batch,
            Err(outcome) => return outcome,
        };
        let merged = self.merge(store, conflicts, batch);
        let uploads = self.upload(remote, &merged.uploads).await;
        self.finish(store, conflicts, merged.report, uploads)
    }

    /// Pull one batch. On failure the error status is published and the
    /// returned outcome ends the cycle.
    pub async fn fetch<R: RemoteAdapter>(
        &self,
        remote: &R,
    ) -> std::result::Result<Vec<RemoteQuote>, SyncOutcome> {
        let engine = self.engine;
        engine.publish(|status| status.state = SyncState::Syncing);

        remote.fetch_batch().await.map_err(|error| {
            tracing::warn!("Sync fetch failed, store left untouched: {error}");
            let message = error.to_string();
            engine.publish(|status| {
                status.state = SyncState::Error;
                status.last_error = Some(message.clone());
            });
            SyncOutcome::Failed(message)
        })
    }

    /// Reconcile `batch` and snapshot the dirty local quotes that are free
    /// to upload. Quotes with a pending conflict are held back.
    pub fn merge(
        &self,
        store: &mut QuoteStore,
        conflicts: &mut ConflictQueue,
        batch: Vec<RemoteQuote>,
    ) -> MergedBatch {
        let report = reconcile(store, conflicts, batch, self.engine.manual_conflict_mode());
        let uploads = store
            .dirty_local()
            .into_iter()
            .filter(|quote| !conflicts.contains_key(&quote.canonical_key()))
            .collect();
        MergedBatch { report, uploads }
    }

    /// Push each snapshot. A failed upload is logged and counted; the rest
    /// still go out.
    pub async fn upload<R: RemoteAdapter>(&self, remote: &R, uploads: &[Quote]) -> UploadResults {
        let mut results = UploadResults::default();
        for quote in uploads {
            match remote.upload(quote).await {
                Ok(remote_id) => results.confirmed.push((quote.clone(), remote_id)),
                Err(error) => {
                    tracing::warn!(
                        key = %quote.canonical_key(),
                        "Upload failed, will retry next cycle: {error}"
                    );
                    results.failures += 1;
                }
            }
        }
        results
    }

    /// Apply confirmed uploads, publish the report and release the slot.
    ///
    /// A confirmation only lands if the stored quote still matches the
    /// uploaded snapshot; one edited in the meantime stays dirty.
    pub fn finish(
        self,
        store: &mut QuoteStore,
        conflicts: &ConflictQueue,
        merge: MergeReport,
        uploads: UploadResults,
    ) -> SyncOutcome {
        let mut uploaded = 0;
        for (snapshot, remote_id) in uploads.confirmed {
            if store.confirm_upload(&snapshot, remote_id) {
                uploaded += 1;
            } else {
                tracing::debug!(
                    key = %snapshot.canonical_key(),
                    "Uploaded quote changed locally, left dirty"
                );
            }
        }

        let report = SyncReport {
            added_from_server: merge.added_from_server,
            uploaded_to_server: uploaded,
            auto_resolved: merge.auto_resolved,
            upload_failures: uploads.failures,
            pending_conflicts: conflicts.len(),
        };

        tracing::info!(
            added = report.added_from_server,
            uploaded = report.uploaded_to_server,
            auto_resolved = report.auto_resolved,
            upload_failures = report.upload_failures,
            pending_conflicts = report.pending_conflicts,
            "Sync cycle completed"
        );

        self.engine.publish(|status| {
            status.state = SyncState::Synced;
            status.last_sync_at = Some(now_millis());
            status.last_report = Some(report);
            status.last_error = None;
        });

        SyncOutcome::Completed(report)
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.engine.in_flight.store(false, Ordering::SeqCst);
    }
}
