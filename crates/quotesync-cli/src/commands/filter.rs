use quotesync_core::{CategoryFilter, QuoteBook};

use crate::commands::common::normalize_category;
use crate::error::CliError;

pub async fn run_filter(category: &str, book: &QuoteBook) -> Result<(), CliError> {
    let filter = CategoryFilter::from(normalize_category(category)?.as_str());

    if let CategoryFilter::Category(name) = &filter {
        if !book.categories().await.contains(name) {
            println!("Note: no quotes in [{name}] yet");
        }
    }

    book.set_selected_category(filter.clone()).await?;
    println!("Filter set to {filter}");
    Ok(())
}
