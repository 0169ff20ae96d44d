use std::io::{self, BufRead, IsTerminal, Write};

use quotesync_core::remote::{HttpRemote, OfflineRemote, RemoteAdapter};
use quotesync_core::{Conflict, QuoteBook, Resolution, SyncOutcome, SyncSettings};

use crate::commands::common::{format_conflict_lines, format_sync_timestamp, quote_preview};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Resolve(Resolution),
    Skip,
}

pub async fn run_sync(
    manual: bool,
    offline: bool,
    settings: &SyncSettings,
    book: &QuoteBook,
) -> Result<(), CliError> {
    if manual {
        book.set_manual_conflict_mode(true);
    }

    let outcome = if offline {
        tracing::info!("Offline sync: local quotes stay pending upload");
        sync_with(book, &OfflineRemote::new()).await
    } else {
        let remote = HttpRemote::new(settings)?;
        tracing::info!("Syncing with {}", remote.endpoint());
        sync_with(book, &remote).await
    };

    println!("{}", outcome.summary());
    if let SyncOutcome::Failed(message) = outcome {
        return Err(CliError::SyncFailed(message));
    }
    if let Some(synced_at) = book.sync_status().last_sync_at {
        tracing::debug!("Last successful sync at {}", format_sync_timestamp(synced_at));
    }

    let conflicts = book.pending_conflicts().await;
    if conflicts.is_empty() {
        return Ok(());
    }

    if io::stdin().is_terminal() {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        resolve_interactively(book, &mut reader, &mut writer).await?;
    } else {
        println!("Conflicts awaiting review:");
        for line in format_conflict_lines(&conflicts) {
            println!("{line}");
        }
        println!("Run `quotes sync --manual` in a terminal to resolve them.");
    }
    Ok(())
}

async fn sync_with<R: RemoteAdapter>(book: &QuoteBook, remote: &R) -> SyncOutcome {
    book.sync_once(remote).await
}

/// Walk the pending conflicts, asking for a decision on each.
///
/// Skipped conflicts stay queued; returns how many were resolved.
pub async fn resolve_interactively(
    book: &QuoteBook,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<usize, CliError> {
    let mut skipped = 0usize;
    let mut resolved = 0usize;

    loop {
        let conflicts = book.pending_conflicts().await;
        let Some(conflict) = conflicts.get(skipped) else {
            break;
        };

        match prompt_resolution(conflict, reader, writer)? {
            Some(PromptAnswer::Resolve(resolution)) => {
                let kept = book.resolve_conflict(skipped, resolution).await?;
                writeln!(writer, "Kept \"{}\"", quote_preview(&kept.text, 60))?;
                resolved += 1;
            }
            Some(PromptAnswer::Skip) => skipped += 1,
            None => break,
        }
    }

    Ok(resolved)
}

/// Ask about one conflict until a valid answer is read. `None` on end of input.
pub fn prompt_resolution(
    conflict: &Conflict,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> Result<Option<PromptAnswer>, CliError> {
    writeln!(writer, "Conflict:")?;
    writeln!(
        writer,
        "  local:  \"{}\" [{}]",
        conflict.local.text, conflict.local.category
    )?;
    writeln!(
        writer,
        "  remote: \"{}\" [{}]",
        conflict.remote.text, conflict.remote.category
    )?;

    loop {
        write!(writer, "Keep [l]ocal, [r]emote or [s]kip? ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if let Some(answer) = parse_prompt_answer(&line) {
            return Ok(Some(answer));
        }
        writeln!(writer, "Please answer l, r or s.")?;
    }
}

pub fn parse_prompt_answer(input: &str) -> Option<PromptAnswer> {
    match input.trim().to_ascii_lowercase().as_str() {
        "l" => Some(PromptAnswer::Resolve(Resolution::KeepLocal)),
        "r" => Some(PromptAnswer::Resolve(Resolution::KeepRemote)),
        "s" | "skip" => Some(PromptAnswer::Skip),
        other => other.parse::<Resolution>().ok().map(PromptAnswer::Resolve),
    }
}
