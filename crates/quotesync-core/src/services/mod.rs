//! Shared services used by clients.

mod quote_book;

pub use quote_book::QuoteBook;
