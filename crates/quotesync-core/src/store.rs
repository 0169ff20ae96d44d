//! Canonical in-memory quote list.
//!
//! The store is the only place quotes are mutated. It is built explicitly
//! from a persisted snapshot and handed by reference to the reconciler and
//! the conflict queue.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Result;
use crate::models::{Origin, Quote, RemoteId};

/// Value of the category filter meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Category filter applied to read views
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every quote
    #[default]
    All,
    /// Quotes whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    /// Whether the quote passes this filter.
    #[must_use]
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => quote.category == *category,
        }
    }

    /// The persisted string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(category) => category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(trimmed.to_string())
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered collection of quotes keyed by canonical identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { quotes: Vec::new() }
    }

    /// Create a store from a persisted snapshot, keeping its order.
    #[must_use]
    pub const fn from_snapshot(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Append a well-formed quote.
    pub fn add(&mut self, quote: Quote) -> Result<()> {
        quote.validate()?;
        self.quotes.push(quote);
        Ok(())
    }

    /// Validate and append a new dirty local quote.
    pub fn add_local(&mut self, text: &str, category: &str) -> Result<Quote> {
        let quote = Quote::new_local(text, category)?;
        self.quotes.push(quote.clone());
        Ok(quote)
    }

    /// Insert every quote whose canonical key is not present yet.
    ///
    /// Duplicates within `incoming` are collapsed to their first occurrence
    /// and malformed quotes are skipped. Returns the number inserted.
    pub fn merge_insert(&mut self, incoming: impl IntoIterator<Item = Quote>) -> usize {
        let mut known = self
            .quotes
            .iter()
            .map(Quote::canonical_key)
            .collect::<HashSet<_>>();
        let mut inserted = 0;

        for quote in incoming {
            if quote.validate().is_err() {
                tracing::debug!("Skipping malformed quote during merge");
                continue;
            }
            if known.insert(quote.canonical_key()) {
                self.quotes.push(quote);
                inserted += 1;
            }
        }

        inserted
    }

    /// First quote with the given canonical key.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<&Quote> {
        self.position(key).map(|index| &self.quotes[index])
    }

    /// Overwrite the quote with the given key in place.
    ///
    /// Returns `false` without changes when no quote has that key.
    pub fn replace_at(&mut self, key: &str, quote: Quote) -> bool {
        match self.position(key) {
            Some(index) => {
                self.quotes[index] = quote;
                true
            }
            None => false,
        }
    }

    /// Mutate the quote with the given key in place.
    pub fn update_at(&mut self, key: &str, update: impl FnOnce(&mut Quote)) -> bool {
        match self.position(key) {
            Some(index) => {
                update(&mut self.quotes[index]);
                true
            }
            None => false,
        }
    }

    /// All quotes in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Quotes passing the category filter.
    #[must_use]
    pub fn filtered_by(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes
            .iter()
            .filter(|quote| filter.matches(quote))
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.quotes
            .iter()
            .filter(|quote| seen.insert(quote.category.as_str()))
            .map(|quote| quote.category.clone())
            .collect()
    }

    /// Uniformly random quote among those passing the filter.
    pub fn random_quote<R: Rng + ?Sized>(
        &self,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Option<&Quote> {
        let candidates = self.filtered_by(filter);
        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }

    /// Snapshots of local quotes awaiting upload.
    #[must_use]
    pub fn dirty_local(&self) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|quote| quote.dirty && quote.origin == Origin::Local)
            .cloned()
            .collect()
    }

    /// Record a confirmed upload of `uploaded`.
    ///
    /// Applies only while the stored quote with the same canonical key is
    /// still a dirty local record with identical content; anything edited or
    /// overwritten since the snapshot was taken stays as it is.
    pub fn confirm_upload(&mut self, uploaded: &Quote, remote_id: RemoteId) -> bool {
        let Some(index) = self.position(&uploaded.canonical_key()) else {
            return false;
        };

        let quote = &mut self.quotes[index];
        if !quote.dirty || quote.origin != Origin::Local || !quote.same_content(uploaded) {
            return false;
        }
        quote.mark_uploaded(remote_id);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Consume the store, returning the quotes for persistence.
    #[must_use]
    pub fn into_snapshot(self) -> Vec<Quote> {
        self.quotes
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.quotes
            .iter()
            .position(|quote| quote.canonical_key() == key)
    }
}
