use quotesync_core::{CategoryFilter, QuoteBook};

use crate::commands::common::{format_quote_lines, quote_to_list_item, QuoteListItem};
use crate::error::CliError;

pub async fn run_list(
    category: Option<&str>,
    as_json: bool,
    book: &QuoteBook,
) -> Result<(), CliError> {
    let quotes = match category {
        Some(category) => book.quotes_in(&CategoryFilter::from(category)).await,
        None => book.filtered_quotes().await,
    };

    if as_json {
        let json_items = quotes
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if quotes.is_empty() {
        println!("No quotes in this category.");
        return Ok(());
    }

    for line in format_quote_lines(&quotes) {
        println!("{line}");
    }

    let pending = book.pending_upload_count().await;
    if pending > 0 {
        println!("* {pending} local quotes not yet uploaded");
    }
    Ok(())
}
