//! Key-value persistence for quotes and view state.

mod file;
mod memory;
mod repository;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use repository::{QuoteRepository, LAST_QUOTE_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY};

use crate::error::Result;

/// Opaque string key-value store.
///
/// Implementations decide durability; callers only rely on a `set` being
/// visible to the next `get` on the same store.
pub trait KeyValueStore: Send {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; absent keys are not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
