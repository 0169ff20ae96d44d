//! Shared quote service wrapper used by clients.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::config::SyncSettings;
use crate::error::Result;
use crate::export::{import_into, render_json_export, ImportSummary};
use crate::models::{seed_quotes, Conflict, Quote, Resolution};
use crate::remote::RemoteAdapter;
use crate::state::SyncStatus;
use crate::storage::{KeyValueStore, MemoryStore, QuoteRepository};
use crate::store::{CategoryFilter, QuoteStore};
use crate::sync::{ConflictQueue, SyncEngine, SyncOutcome};

struct QuoteBookInner {
    store: QuoteStore,
    conflicts: ConflictQueue,
    selected: CategoryFilter,
    repository: QuoteRepository<Box<dyn KeyValueStore>>,
    session: QuoteRepository<MemoryStore>,
}

impl QuoteBookInner {
    fn persist_quotes(&mut self) {
        if let Err(error) = self.repository.save_quotes(self.store.all()) {
            tracing::warn!("Failed to persist quotes: {error}");
        }
    }
}

/// Thread-safe facade over the store, persistence and sync engine.
///
/// Every mutation rewrites the persisted snapshot. Sync cycles go through
/// the engine's single-flight slot, so overlapping triggers are dropped.
#[derive(Clone)]
pub struct QuoteBook {
    inner: Arc<Mutex<QuoteBookInner>>,
    engine: Arc<SyncEngine>,
}

impl QuoteBook {
    /// Open a book over a durable key-value store.
    ///
    /// Missing or unreadable quote snapshots fall back to the seed quotes.
    pub fn open(store: impl KeyValueStore + 'static, settings: &SyncSettings) -> Self {
        let mut repository = QuoteRepository::new(Box::new(store) as Box<dyn KeyValueStore>);

        let (quotes, seeded) = match repository.load_quotes() {
            Ok(Some(quotes)) => (quotes, false),
            Ok(None) => {
                tracing::info!("No saved quotes found, seeding defaults");
                (seed_quotes(), true)
            }
            Err(error) => {
                tracing::warn!("Saved quotes unreadable, seeding defaults: {error}");
                (seed_quotes(), true)
            }
        };
        if seeded {
            if let Err(error) = repository.save_quotes(&quotes) {
                tracing::warn!("Failed to persist seed quotes: {error}");
            }
        }

        let selected = repository.load_selected_category().unwrap_or_else(|error| {
            tracing::warn!("Failed to read selected category: {error}");
            CategoryFilter::All
        });

        Self {
            inner: Arc::new(Mutex::new(QuoteBookInner {
                store: QuoteStore::from_snapshot(quotes),
                conflicts: ConflictQueue::new(),
                selected,
                repository,
                session: QuoteRepository::new(MemoryStore::new()),
            })),
            engine: Arc::new(SyncEngine::from_settings(settings)),
        }
    }

    /// Open a volatile book (primarily for tests).
    pub fn in_memory(manual_conflict_mode: bool) -> Self {
        let settings = SyncSettings {
            manual_conflict_mode,
            ..SyncSettings::default()
        };
        Self::open(MemoryStore::new(), &settings)
    }

    /// Add a quote entered by the user.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let mut inner = self.inner.lock().await;
        let quote = inner.store.add_local(text, category)?;
        inner.persist_quotes();
        Ok(quote)
    }

    /// All quotes in insertion order.
    pub async fn quotes(&self) -> Vec<Quote> {
        self.inner.lock().await.store.all().to_vec()
    }

    /// Quotes passing an explicit filter.
    pub async fn quotes_in(&self, filter: &CategoryFilter) -> Vec<Quote> {
        let inner = self.inner.lock().await;
        inner.store.filtered_by(filter).into_iter().cloned().collect()
    }

    /// Quotes passing the selected filter.
    pub async fn filtered_quotes(&self) -> Vec<Quote> {
        let inner = self.inner.lock().await;
        inner
            .store
            .filtered_by(&inner.selected)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn categories(&self) -> Vec<String> {
        self.inner.lock().await.store.categories()
    }

    pub async fn selected_category(&self) -> CategoryFilter {
        self.inner.lock().await.selected.clone()
    }

    /// Change and persist the selected filter.
    pub async fn set_selected_category(&self, filter: CategoryFilter) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.repository.save_selected_category(&filter)?;
        inner.selected = filter;
        Ok(())
    }

    /// Pick a random quote under the selected filter and remember it for
    /// the session.
    pub async fn show_random_quote(&self) -> Option<Quote> {
        let filter = self.selected_category().await;
        self.show_random_quote_in(&filter).await
    }

    /// Pick a random quote under an explicit filter, leaving the selected
    /// filter unchanged.
    pub async fn show_random_quote_in(&self, filter: &CategoryFilter) -> Option<Quote> {
        let mut inner = self.inner.lock().await;
        let quote = {
            let mut rng = rand::thread_rng();
            inner.store.random_quote(filter, &mut rng).cloned()
        }?;
        if let Err(error) = inner.session.save_last_quote(&quote) {
            tracing::warn!("Failed to remember last quote: {error}");
        }
        Some(quote)
    }

    /// Quote last shown in this session.
    pub async fn last_shown_quote(&self) -> Option<Quote> {
        let inner = self.inner.lock().await;
        inner.session.load_last_quote().ok().flatten()
    }

    /// Render the full list as pretty JSON.
    pub async fn export_json(&self) -> Result<String> {
        let inner = self.inner.lock().await;
        Ok(render_json_export(inner.store.all())?)
    }

    /// Merge an import payload; a malformed payload changes nothing.
    pub async fn import_json(&self, raw: &str) -> Result<ImportSummary> {
        let mut inner = self.inner.lock().await;
        let summary = import_into(&mut inner.store, raw)?;
        if summary.added > 0 {
            inner.persist_quotes();
        }
        Ok(summary)
    }

    /// Run one sync cycle, or skip if one is already in flight.
    ///
    /// The state lock is only held while merging and applying results, so
    /// reads and edits proceed while the remote is being contacted.
    pub async fn sync_once<R: RemoteAdapter>(&self, remote: &R) -> SyncOutcome {
        let Some(guard) = self.engine.try_begin() else {
            tracing::debug!("Sync trigger dropped: cycle already in flight");
            return SyncOutcome::Skipped;
        };

        let batch = match guard.fetch(remote).await {
            Ok(batch) => batch,
            Err(outcome) => return outcome,
        };

        let merged = {
            let mut locked = self.inner.lock().await;
            let inner = &mut *locked;
            let merged = guard.merge(&mut inner.store, &mut inner.conflicts, batch);
            inner.persist_quotes();
            merged
        };

        let uploads = guard.upload(remote, &merged.uploads).await;

        let mut locked = self.inner.lock().await;
        let inner = &mut *locked;
        let outcome = guard.finish(&mut inner.store, &inner.conflicts, merged.report, uploads);
        inner.persist_quotes();
        outcome
    }

    /// Conflicts awaiting a manual decision, in detection order.
    pub async fn pending_conflicts(&self) -> Vec<Conflict> {
        self.inner.lock().await.conflicts.list().to_vec()
    }

    /// Apply a manual decision to the conflict at `index`.
    pub async fn resolve_conflict(&self, index: usize, resolution: Resolution) -> Result<Quote> {
        let mut locked = self.inner.lock().await;
        let inner = &mut *locked;
        let resolved = inner
            .conflicts
            .resolve(index, resolution, &mut inner.store)?;
        inner.persist_quotes();
        Ok(resolved)
    }

    /// Number of local quotes waiting for upload.
    pub async fn pending_upload_count(&self) -> usize {
        self.inner.lock().await.store.dirty_local().len()
    }

    pub fn manual_conflict_mode(&self) -> bool {
        self.engine.manual_conflict_mode()
    }

    pub fn set_manual_conflict_mode(&self, enabled: bool) {
        self.engine.set_manual_conflict_mode(enabled);
    }

    /// Receive sync status updates.
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.engine.subscribe()
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.engine.status()
    }
}
