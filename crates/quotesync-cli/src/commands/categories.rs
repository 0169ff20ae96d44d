use quotesync_core::{CategoryFilter, QuoteBook};

use crate::error::CliError;

pub async fn run_categories(book: &QuoteBook) -> Result<(), CliError> {
    let selected = book.selected_category().await;

    let all_marker = if selected == CategoryFilter::All { "*" } else { " " };
    println!("{all_marker} {}", CategoryFilter::All);
    for category in book.categories().await {
        let marker = if selected.as_str() == category { "*" } else { " " };
        println!("{marker} {category}");
    }
    Ok(())
}
