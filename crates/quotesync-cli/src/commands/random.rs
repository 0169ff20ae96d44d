use quotesync_core::{CategoryFilter, QuoteBook};

use crate::commands::common::format_quote;
use crate::error::CliError;

pub async fn run_random(category: Option<&str>, book: &QuoteBook) -> Result<(), CliError> {
    let quote = match category {
        Some(category) => {
            book.show_random_quote_in(&CategoryFilter::from(category))
                .await
        }
        None => book.show_random_quote().await,
    };

    match quote {
        Some(quote) => println!("{}", format_quote(&quote)),
        None => println!("No quotes in this category."),
    }
    Ok(())
}
