//! Timer-driven sync cycles.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::remote::RemoteAdapter;
use crate::services::QuoteBook;

use super::SyncOutcome;

/// Totals over a periodic run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodicSummary {
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Trigger a sync cycle every `interval` until `shutdown` resolves.
///
/// The first tick fires immediately. A tick that finds a cycle in flight is
/// dropped, and a failing cycle never stops the loop.
pub async fn run_periodic<R, F>(
    book: &QuoteBook,
    remote: &R,
    interval: Duration,
    shutdown: F,
    mut on_outcome: impl FnMut(&SyncOutcome),
) -> PeriodicSummary
where
    R: RemoteAdapter,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut summary = PeriodicSummary::default();
    tracing::info!("Periodic sync started (every {}s)", interval.as_secs());

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                let outcome = book.sync_once(remote).await;
                match &outcome {
                    SyncOutcome::Completed(_) => summary.completed += 1,
                    SyncOutcome::Skipped => summary.skipped += 1,
                    SyncOutcome::Failed(_) => summary.failed += 1,
                }
                on_outcome(&outcome);
            }
        }
    }

    tracing::info!(
        completed = summary.completed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Periodic sync stopped"
    );
    summary
}
