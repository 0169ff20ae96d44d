use quotesync_core::QuoteBook;

use crate::commands::common::{normalize_category, resolve_quote_text};
use crate::error::CliError;

pub async fn run_add(text_parts: &[String], category: &str, book: &QuoteBook) -> Result<(), CliError> {
    let text = resolve_quote_text(text_parts)?;
    let category = normalize_category(category)?;

    let quote = book.add_quote(&text, &category).await?;
    println!("Added quote to [{}]", quote.category);
    Ok(())
}
