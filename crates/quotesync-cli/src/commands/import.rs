use std::path::Path;

use quotesync_core::QuoteBook;

use crate::commands::common::read_import_source;
use crate::error::CliError;

pub async fn run_import(path: &Path, book: &QuoteBook) -> Result<(), CliError> {
    let raw = read_import_source(path)?;
    let summary = book.import_json(&raw).await?;

    println!(
        "Imported {} quotes ({} duplicates skipped)",
        summary.added, summary.skipped_duplicates
    );
    Ok(())
}
