//! Remote adapter for running a cycle without network access.

use crate::error::{Error, Result};
use crate::models::{Quote, RemoteId};

use super::{RemoteAdapter, RemoteQuote};

/// Serves an empty batch and refuses every upload.
///
/// Local quotes keep their dirty flag and no remote id, so the next online
/// cycle still pushes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

impl OfflineRemote {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RemoteAdapter for OfflineRemote {
    async fn fetch_batch(&self) -> Result<Vec<RemoteQuote>> {
        Ok(Vec::new())
    }

    async fn upload(&self, quote: &Quote) -> Result<RemoteId> {
        Err(Error::Network(format!(
            "offline: upload of '{}' deferred",
            quote.text
        )))
    }
}
