//! Remote feed contract and adapters.
//!
//! The reconciler only talks to a [`RemoteAdapter`]: one call to pull a
//! batch and one call per quote to push it. Any JSON backend with that shape
//! is interchangeable.

mod http;
mod memory;
mod offline;

pub use http::HttpRemote;
pub use memory::MemoryRemote;
pub use offline::OfflineRemote;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Quote, RemoteId};

/// A record as delivered by the remote feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteQuote {
    /// Remote identifier, when the feed supplies one
    pub id: Option<RemoteId>,
    /// Quote text
    pub text: String,
    /// Category label
    pub category: String,
}

impl RemoteQuote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            category: category.into(),
        }
    }

    /// Clean remote-origin quote for the store.
    #[must_use]
    pub fn into_quote(self) -> Quote {
        Quote::from_remote(self.text, self.category, self.id)
    }
}

/// Source of remote quotes and sink for local ones
#[allow(async_fn_in_trait)]
pub trait RemoteAdapter {
    /// Pull the current remote batch. Failure aborts the sync cycle.
    async fn fetch_batch(&self) -> Result<Vec<RemoteQuote>>;

    /// Push one local quote, returning the id the remote assigned.
    async fn upload(&self, quote: &Quote) -> Result<RemoteId>;
}
