use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use chrono::Utc;
use quotesync_core::storage::JsonFileStore;
use quotesync_core::{Conflict, Quote, QuoteBook, SyncSettings};
use serde::Serialize;

use crate::error::CliError;

const APP_DIR_NAME: &str = "quotesync";
const CONFIG_FILE_NAME: &str = "config.json";
const DATA_DIR_ENV: &str = "QUOTESYNC_DATA_DIR";

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub text: String,
    pub category: String,
    pub origin: &'static str,
    pub dirty: bool,
    pub remote_id: Option<String>,
    pub updated_at: i64,
    pub relative_time: String,
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_data_dir.or_else(|| env::var_os(DATA_DIR_ENV).map(PathBuf::from)) {
        return Ok(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(CliError::MissingDirectory("data"))
}

pub fn resolve_config_path(cli_config: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = cli_config {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(CliError::MissingDirectory("config"))
}

/// Settings from the config file with environment overrides applied.
pub fn load_settings(config_path: &Path) -> Result<SyncSettings, CliError> {
    let mut settings = SyncSettings::load_from_path(config_path)?;
    settings.apply_env_overrides()?;
    Ok(settings)
}

pub fn open_book(data_dir: &Path, settings: &SyncSettings) -> Result<QuoteBook, CliError> {
    let store = JsonFileStore::open_in_dir(data_dir)?;
    tracing::debug!("Opened quote state at {}", store.path().display());
    Ok(QuoteBook::open(store, settings))
}

pub fn format_quote_lines(quotes: &[Quote]) -> Vec<String> {
    quotes
        .iter()
        .map(|quote| {
            let marker = if quote.dirty { "*" } else { " " };
            let preview = quote_preview(&quote.text, 60);
            format!("{marker} {preview:<60}  [{}]", quote.category)
        })
        .collect()
}

pub fn quote_to_list_item(quote: &Quote) -> QuoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    QuoteListItem {
        text: quote.text.clone(),
        category: quote.category.clone(),
        origin: quote.origin.as_str(),
        dirty: quote.dirty,
        remote_id: quote.remote_id.as_ref().map(ToString::to_string),
        updated_at: quote.updated_at,
        relative_time: format_relative_time(quote.updated_at, now_ms),
    }
}

pub fn format_quote(quote: &Quote) -> String {
    format!("\"{}\"\n  - {}", quote.text, quote.category)
}

pub fn format_conflict_lines(conflicts: &[Conflict]) -> Vec<String> {
    conflicts
        .iter()
        .enumerate()
        .map(|(index, conflict)| {
            format!(
                "[{index}] local=\"{}\" ({})  remote=\"{}\" ({})",
                quote_preview(&conflict.local.text, 40),
                conflict.local.category,
                quote_preview(&conflict.remote.text, 40),
                conflict.remote.category
            )
        })
        .collect()
}

pub fn quote_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_sync_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;

    if timestamp_ms <= 0 {
        "-".to_string()
    } else if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else {
        format!("{}d ago", diff / day)
    }
}

pub fn resolve_quote_text(text_parts: &[String]) -> Result<String, CliError> {
    if let Some(text) = normalize_text(&text_parts.join(" ")) {
        return Ok(text);
    }

    if let Some(text) = read_piped_stdin()? {
        return Ok(text);
    }

    Err(CliError::EmptyText)
}

pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_category(category: &str) -> Result<String, CliError> {
    normalize_text(category).ok_or(CliError::EmptyCategory)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_text(&buffer))
}

/// Read an import payload from a file, or from stdin when `path` is `-`.
pub fn read_import_source(path: &Path) -> Result<String, CliError> {
    let raw = if path == Path::new("-") {
        read_piped_stdin()?.unwrap_or_default()
    } else {
        std::fs::read_to_string(path)?
    };

    normalize_text(&raw).ok_or(CliError::EmptyImport)
}
