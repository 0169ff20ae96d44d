//! Data models for quotesync

mod conflict;
mod quote;

pub use conflict::{Conflict, Resolution};
pub use quote::{seed_quotes, Origin, Quote, RemoteId};
