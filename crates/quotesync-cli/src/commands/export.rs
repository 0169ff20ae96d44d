use std::path::Path;

use quotesync_core::QuoteBook;

use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, book: &QuoteBook) -> Result<(), CliError> {
    let rendered = book.export_json().await?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
