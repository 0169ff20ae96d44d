//! In-process remote feed.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Quote, RemoteId};

use super::{RemoteAdapter, RemoteQuote};

#[derive(Debug, Default)]
struct MemoryRemoteState {
    batch: Vec<RemoteQuote>,
    uploaded: Vec<(RemoteId, Quote)>,
    fail_fetch: bool,
    failing_uploads: HashSet<String>,
    fetch_calls: usize,
}

/// Remote adapter backed by process memory.
///
/// Serves a fixed batch, records uploads, and can be told to fail fetches
/// or the upload of specific quote texts.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<MemoryRemoteState>,
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote serving the given batch.
    #[must_use]
    pub fn with_batch(batch: Vec<RemoteQuote>) -> Self {
        let remote = Self::new();
        remote.set_batch(batch);
        remote
    }

    /// Replace the batch returned by the next fetch
    pub fn set_batch(&self, batch: Vec<RemoteQuote>) {
        self.lock().batch = batch;
    }

    /// Make every fetch fail (or succeed again)
    pub fn set_fail_fetch(&self, fail: bool) {
        self.lock().fail_fetch = fail;
    }

    /// Make uploads of quotes with this exact text fail
    pub fn fail_upload_of(&self, text: impl Into<String>) {
        self.lock().failing_uploads.insert(text.into());
    }

    /// Let previously failing uploads succeed
    pub fn clear_upload_failures(&self) {
        self.lock().failing_uploads.clear();
    }

    /// Quotes accepted so far, with their assigned ids
    pub fn uploaded(&self) -> Vec<(RemoteId, Quote)> {
        self.lock().uploaded.clone()
    }

    /// Number of fetches attempted
    pub fn fetch_calls(&self) -> usize {
        self.lock().fetch_calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryRemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RemoteAdapter for MemoryRemote {
    async fn fetch_batch(&self) -> Result<Vec<RemoteQuote>> {
        let mut state = self.lock();
        state.fetch_calls += 1;
        if state.fail_fetch {
            return Err(Error::Network("remote feed unavailable".to_string()));
        }
        Ok(state.batch.clone())
    }

    async fn upload(&self, quote: &Quote) -> Result<RemoteId> {
        let mut state = self.lock();
        if state.failing_uploads.contains(&quote.text) {
            return Err(Error::Network(format!(
                "upload rejected for '{}'",
                quote.text
            )));
        }

        let id = RemoteId::new(Uuid::now_v7().to_string());
        state.uploaded.push((id.clone(), quote.clone()));
        Ok(id)
    }
}
