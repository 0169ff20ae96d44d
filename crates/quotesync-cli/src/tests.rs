use std::io::Cursor;
use std::time::Duration;

use pretty_assertions::assert_eq;
use quotesync_core::models::seed_quotes;
use clap_complete::Shell;
use quotesync_core::remote::{MemoryRemote, RemoteQuote};
use quotesync_core::{QuoteBook, Resolution, SyncSettings};

use crate::commands::common::{
    format_conflict_lines, format_quote_lines, format_relative_time, format_sync_timestamp,
    normalize_category, normalize_text, open_book, quote_preview, read_import_source,
    resolve_data_dir,
};
use crate::commands::completions::{install_completions, render_completions};
use crate::commands::config::{merge_config_init, ConfigInitArgs};
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::sync::{parse_prompt_answer, resolve_interactively, run_sync, PromptAnswer};
use crate::commands::watch::resolve_interval;
use crate::error::CliError;

async fn book_with_conflict() -> QuoteBook {
    let book = QuoteBook::in_memory(true);
    book.add_quote("Hello", "Life").await.unwrap();
    let remote = MemoryRemote::with_batch(vec![RemoteQuote::new("hello", "life")]);
    book.sync_once(&remote).await;
    assert_eq!(book.pending_conflicts().await.len(), 1);
    book
}

#[test]
fn normalize_text_trims_and_rejects_empty() {
    assert_eq!(normalize_text("  hello  "), Some("hello".to_string()));
    assert_eq!(normalize_text(" \n\t "), None);
}

#[test]
fn normalize_category_rejects_blank() {
    assert!(matches!(
        normalize_category("   "),
        Err(CliError::EmptyCategory)
    ));
    assert_eq!(normalize_category(" Life ").unwrap(), "Life");
}

#[test]
fn quote_preview_truncates_with_ellipsis() {
    let preview = quote_preview("This is a very long sentence that should be shortened", 20);
    assert_eq!(preview, "This is a very lo...");
}

#[test]
fn format_relative_time_units() {
    let now = 10_000_000;
    assert_eq!(format_relative_time(now - 30_000, now), "just now");
    assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
    assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    assert_eq!(format_relative_time(0, now), "-");
}

#[test]
fn format_sync_timestamp_returns_utc_label() {
    assert_eq!(format_sync_timestamp(0), "1970-01-01 00:00:00 UTC");
}

#[test]
fn format_quote_lines_mark_unsynced_quotes() {
    let mut quotes = seed_quotes();
    quotes.push(quotesync_core::Quote::new_local("Mine", "Life").unwrap());

    let lines = format_quote_lines(&quotes);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("  "));
    assert!(lines[3].starts_with("* Mine"));
    assert!(lines[3].ends_with("[Life]"));
}

#[test]
fn parse_prompt_answer_accepts_shortcuts_and_names() {
    assert_eq!(
        parse_prompt_answer("l\n"),
        Some(PromptAnswer::Resolve(Resolution::KeepLocal))
    );
    assert_eq!(
        parse_prompt_answer(" Remote "),
        Some(PromptAnswer::Resolve(Resolution::KeepRemote))
    );
    assert_eq!(parse_prompt_answer("S"), Some(PromptAnswer::Skip));
    assert_eq!(parse_prompt_answer("both"), None);
}

#[tokio::test(flavor = "current_thread")]
async fn interactive_resolution_reprompts_then_applies_choice() {
    let book = book_with_conflict().await;
    let mut input = Cursor::new("maybe\nr\n");
    let mut output = Vec::new();

    let resolved = resolve_interactively(&book, &mut input, &mut output)
        .await
        .unwrap();

    assert_eq!(resolved, 1);
    assert!(book.pending_conflicts().await.is_empty());
    assert!(book.quotes().await.iter().any(|quote| quote.text == "hello"));

    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("Please answer l, r or s."));
    assert!(transcript.contains("Kept \"hello\""));
}

#[tokio::test(flavor = "current_thread")]
async fn interactive_resolution_skip_keeps_conflict_queued() {
    let book = book_with_conflict().await;
    let mut input = Cursor::new("s\n");
    let mut output = Vec::new();

    let resolved = resolve_interactively(&book, &mut input, &mut output)
        .await
        .unwrap();

    assert_eq!(resolved, 0);
    let conflicts = book.pending_conflicts().await;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(format_conflict_lines(&conflicts).len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn interactive_resolution_stops_at_end_of_input() {
    let book = book_with_conflict().await;
    let mut input = Cursor::new("");
    let mut output = Vec::new();

    let resolved = resolve_interactively(&book, &mut input, &mut output)
        .await
        .unwrap();
    assert_eq!(resolved, 0);
    assert_eq!(book.pending_conflicts().await.len(), 1);
}

#[test]
fn merge_config_init_overlays_explicit_values() {
    let merged = merge_config_init(
        SyncSettings::default(),
        ConfigInitArgs {
            endpoint: Some(" https://quotes.example.com/api/ ".to_string()),
            interval_secs: Some(90),
            manual_conflicts: Some(true),
            ..ConfigInitArgs::default()
        },
    )
    .unwrap();

    assert_eq!(merged.endpoint, "https://quotes.example.com/api");
    assert_eq!(merged.interval_secs, 90);
    assert!(merged.manual_conflict_mode);
    assert_eq!(merged.fetch_limit, SyncSettings::default().fetch_limit);
}

#[test]
fn merge_config_init_rejects_invalid_values() {
    let result = merge_config_init(
        SyncSettings::default(),
        ConfigInitArgs {
            endpoint: Some("quotes.example.com".to_string()),
            ..ConfigInitArgs::default()
        },
    );
    assert!(matches!(result, Err(CliError::Config(_))));

    let result = merge_config_init(
        SyncSettings::default(),
        ConfigInitArgs {
            interval_secs: Some(0),
            ..ConfigInitArgs::default()
        },
    );
    assert!(matches!(result, Err(CliError::Config(_))));
}

#[test]
fn resolve_interval_prefers_flag_over_settings() {
    let settings = SyncSettings::default();
    assert_eq!(
        resolve_interval(Some(5), &settings).unwrap(),
        Duration::from_secs(5)
    );
    assert_eq!(resolve_interval(None, &settings).unwrap(), settings.interval());
    assert!(resolve_interval(Some(0), &settings).is_err());
}

#[test]
fn resolve_data_dir_prefers_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = resolve_data_dir(Some(dir.path().to_path_buf())).unwrap();
    assert_eq!(resolved, dir.path());
}

#[test]
fn completions_reference_binary_name() {
    let script = String::from_utf8(render_completions(Shell::Bash)).unwrap();
    assert!(script.contains("quotes"));
}

#[test]
fn completions_install_under_shell_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("completions");

    let zsh = install_completions(Shell::Zsh, &target).unwrap();
    assert_eq!(zsh, target.join("_quotes"));
    let fish = install_completions(Shell::Fish, &target).unwrap();
    assert_eq!(fish, target.join("quotes.fish"));

    let script = std::fs::read_to_string(&zsh).unwrap();
    assert!(script.contains("#compdef quotes"));
}

#[tokio::test(flavor = "current_thread")]
async fn offline_sync_leaves_added_quote_pending() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SyncSettings::default();
    let book = open_book(dir.path(), &settings).unwrap();
    book.add_quote("Written on a plane", "Travel").await.unwrap();

    run_sync(false, true, &settings, &book).await.unwrap();

    assert_eq!(book.pending_upload_count().await, 1);
    let reopened = open_book(dir.path(), &settings).unwrap();
    let quote = reopened
        .quotes()
        .await
        .into_iter()
        .find(|quote| quote.text == "Written on a plane")
        .unwrap();
    assert!(quote.dirty);
    assert_eq!(quote.remote_id, None);
}

#[test]
fn read_import_source_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "  \n").unwrap();
    assert!(matches!(
        read_import_source(&path),
        Err(CliError::EmptyImport)
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn export_then_import_into_fresh_data_dir() {
    let source_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();
    let export_path = source_dir.path().join("quotes.json");
    let settings = SyncSettings::default();

    let source = open_book(source_dir.path(), &settings).unwrap();
    source.add_quote("Exported", "Travel").await.unwrap();
    run_export(Some(&export_path), &source).await.unwrap();

    let target = open_book(target_dir.path(), &settings).unwrap();
    run_import(&export_path, &target).await.unwrap();

    let quotes = target.quotes().await;
    assert_eq!(quotes.len(), seed_quotes().len() + 1);
    assert!(quotes
        .iter()
        .any(|quote| quote.text == "Exported" && quote.dirty));

    let reopened = open_book(target_dir.path(), &settings).unwrap();
    assert_eq!(reopened.quotes().await, quotes);
}
