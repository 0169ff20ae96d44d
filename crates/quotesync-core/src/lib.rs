//! quotesync-core - Core library for quotesync
//!
//! This crate contains the quote models, the canonical-key record store,
//! persistence, the remote feed adapters, and the reconciliation engine
//! used by the quotesync interfaces.

pub mod canonical;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod remote;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;
pub mod util;

pub use canonical::canonical_key;
pub use config::SyncSettings;
pub use error::{Error, Result};
pub use models::{Conflict, Origin, Quote, RemoteId, Resolution};
pub use services::QuoteBook;
pub use store::{CategoryFilter, QuoteStore};
pub use sync::{SyncEngine, SyncOutcome, SyncReport};
