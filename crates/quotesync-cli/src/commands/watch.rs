use std::time::Duration;

use chrono::Utc;
use quotesync_core::remote::HttpRemote;
use quotesync_core::sync::scheduler::run_periodic;
use quotesync_core::{QuoteBook, SyncSettings};

use crate::commands::common::{format_conflict_lines, format_sync_timestamp};
use crate::error::CliError;

pub async fn run_watch(
    interval_secs: Option<u64>,
    manual: bool,
    settings: &SyncSettings,
    book: &QuoteBook,
) -> Result<(), CliError> {
    let interval = resolve_interval(interval_secs, settings)?;
    if manual {
        book.set_manual_conflict_mode(true);
    }

    let remote = HttpRemote::new(settings)?;
    let mode = if book.manual_conflict_mode() {
        "manual review"
    } else {
        "remote wins"
    };
    println!(
        "Syncing with {} every {}s, conflicts: {mode} (Ctrl+C to stop)",
        remote.endpoint(),
        interval.as_secs()
    );

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    let summary = run_periodic(book, &remote, interval, shutdown, |outcome| {
        let now = format_sync_timestamp(Utc::now().timestamp_millis());
        println!("{now}  {}", outcome.summary());
    })
    .await;

    println!(
        "Stopped after {} completed, {} skipped, {} failed cycles",
        summary.completed, summary.skipped, summary.failed
    );

    let conflicts = book.pending_conflicts().await;
    if !conflicts.is_empty() {
        println!("Unresolved conflicts (re-detected on the next sync):");
        for line in format_conflict_lines(&conflicts) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn resolve_interval(
    interval_secs: Option<u64>,
    settings: &SyncSettings,
) -> Result<Duration, CliError> {
    match interval_secs {
        Some(0) => Err(CliError::Config(
            "--interval must be at least 1 second".to_string(),
        )),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(settings.interval()),
    }
}
