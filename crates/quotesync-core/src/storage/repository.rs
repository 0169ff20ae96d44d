//! Mapping of application state onto key-value entries.

use crate::error::{Error, Result};
use crate::models::Quote;
use crate::store::CategoryFilter;

use super::KeyValueStore;

/// Full quote snapshot, rewritten on every mutation.
pub const QUOTES_KEY: &str = "quotes";
/// Last chosen category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Last displayed quote; lives in the session store.
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// Typed access to persisted quotes and view state
pub struct QuoteRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> QuoteRepository<S> {
    /// Create a repository over the given store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the persisted quote snapshot.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet, and
    /// [`Error::Parse`] when the stored value is not a JSON array of quotes.
    /// Falling back to seed data is the caller's decision.
    pub fn load_quotes(&self) -> Result<Option<Vec<Quote>>> {
        let Some(raw) = self.store.get(QUOTES_KEY)? else {
            return Ok(None);
        };

        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|error| Error::Parse(format!("stored quotes are not JSON: {error}")))?;
        if !value.is_array() {
            return Err(Error::Parse("stored quotes are not a JSON array".to_string()));
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|error| Error::Parse(format!("stored quotes are malformed: {error}")))
    }

    /// Persist the full quote snapshot
    pub fn save_quotes(&mut self, quotes: &[Quote]) -> Result<()> {
        let serialized = serde_json::to_string(quotes)?;
        self.store.set(QUOTES_KEY, &serialized)
    }

    /// Load the last chosen filter, `All` when never set
    pub fn load_selected_category(&self) -> Result<CategoryFilter> {
        Ok(self
            .store
            .get(SELECTED_CATEGORY_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    /// Persist the chosen filter
    pub fn save_selected_category(&mut self, filter: &CategoryFilter) -> Result<()> {
        self.store.set(SELECTED_CATEGORY_KEY, filter.as_str())
    }

    /// Load the last displayed quote. Unreadable values are treated as absent.
    pub fn load_last_quote(&self) -> Result<Option<Quote>> {
        Ok(self
            .store
            .get(LAST_QUOTE_KEY)?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    /// Remember the last displayed quote
    pub fn save_last_quote(&mut self, quote: &Quote) -> Result<()> {
        let serialized = serde_json::to_string(quote)?;
        self.store.set(LAST_QUOTE_KEY, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_quotes_absent_is_none() {
        let repo = QuoteRepository::new(MemoryStore::new());
        assert!(repo.load_quotes().unwrap().is_none());
    }

    #[test]
    fn quotes_roundtrip() {
        let mut repo = QuoteRepository::new(MemoryStore::new());
        let quotes = vec![Quote::new_local("Hi", "A").unwrap()];
        repo.save_quotes(&quotes).unwrap();
        assert_eq!(repo.load_quotes().unwrap(), Some(quotes));
    }

    #[test]
    fn load_quotes_rejects_non_array() {
        let mut store = MemoryStore::new();
        store.set(QUOTES_KEY, r#"{"text":"x"}"#).unwrap();
        let repo = QuoteRepository::new(store);
        assert!(matches!(repo.load_quotes(), Err(Error::Parse(_))));
    }

    #[test]
    fn load_quotes_rejects_garbage() {
        let mut store = MemoryStore::new();
        store.set(QUOTES_KEY, "{{{").unwrap();
        let repo = QuoteRepository::new(store);
        assert!(matches!(repo.load_quotes(), Err(Error::Parse(_))));
    }

    #[test]
    fn selected_category_roundtrip() {
        let mut repo = QuoteRepository::new(MemoryStore::new());
        assert_eq!(repo.load_selected_category().unwrap(), CategoryFilter::All);

        let filter = CategoryFilter::Category("Life".to_string());
        repo.save_selected_category(&filter).unwrap();
        assert_eq!(repo.load_selected_category().unwrap(), filter);
    }

    #[test]
    fn last_quote_ignores_unreadable_value() {
        let mut store = MemoryStore::new();
        store.set(LAST_QUOTE_KEY, "oops").unwrap();
        let repo = QuoteRepository::new(store);
        assert!(repo.load_last_quote().unwrap().is_none());
    }
}
