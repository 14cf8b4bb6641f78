//! Multi-valued key/value stores for URI parameters and headers.
//!
//! [`KeyValueStore`] is the store held by a [`Uri`](crate::Uri). It is either
//! [`Empty`](KeyValueStore::Empty), an eagerly decoded [`KeyValuePairs`], or a
//! [`LazyStore`] that decodes on first access. All three answer reads the
//! same way: an empty eager store and an empty lazy store are both empty.

use std::sync::Arc;

mod lazy;
mod pairs;

pub use lazy::*;
pub use pairs::*;

use crate::error::EscapeError;

/// The parameters or headers of a URI.
#[derive(Debug, Clone, Default)]
pub enum KeyValueStore {
    /// No pairs. Decoding into it is a no-op.
    #[default]
    Empty,
    /// Pairs decoded when the URI was parsed.
    Eager(KeyValuePairs),
    /// Pairs decoded on first access. Clones share the decoded result.
    Lazy(Arc<LazyStore>),
}

impl KeyValueStore {
    /// Decodes `raw` into an eager store.
    pub fn eager(raw: &str, separator: char) -> Result<Self, EscapeError> {
        let mut pairs = KeyValuePairs::new();
        pairs.decode(raw, separator)?;

        Ok(Self::Eager(pairs))
    }

    /// Validates `raw` and wraps it in a lazy store.
    pub fn lazy(raw: &str, separator: char) -> Result<Self, EscapeError> {
        Ok(Self::Lazy(Arc::new(LazyStore::decode(raw, separator)?)))
    }

    /// Decodes `raw` into this store.
    ///
    /// An eager store appends the decoded pairs, a lazy store is replaced by
    /// one holding `raw`, and the empty store ignores the input.
    pub fn decode(&mut self, raw: &str, separator: char) -> Result<(), EscapeError> {
        match self {
            KeyValueStore::Empty => Ok(()),
            KeyValueStore::Eager(pairs) => pairs.decode(raw, separator),
            KeyValueStore::Lazy(lazy) => {
                *lazy = Arc::new(LazyStore::decode(raw, separator)?);
                Ok(())
            }
        }
    }

    /// Returns the decoded pairs, decoding a lazy store if needed.
    pub fn pairs(&self) -> Option<&KeyValuePairs> {
        match self {
            KeyValueStore::Empty => None,
            KeyValueStore::Eager(pairs) => Some(pairs),
            KeyValueStore::Lazy(lazy) => Some(lazy.pairs()),
        }
    }

    /// Returns the first value for `key`, or an empty string if absent.
    pub fn get(&self, key: &str) -> &str {
        self.pairs().map_or("", |pairs| pairs.get(key))
    }

    /// Returns every value for `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.pairs().map(|pairs| pairs.get_all(key)).unwrap_or_default()
    }

    /// Returns `true` if `key` is present, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs().is_some_and(|pairs| pairs.contains_key(key))
    }

    /// Returns an iterator over the keys and their values, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.pairs().into_iter().flat_map(|pairs| pairs.iter())
    }

    /// Encodes the pairs joined by `&`.
    pub fn encode(&self) -> String {
        self.encode_with(DEFAULT_SEPARATOR)
    }

    /// Encodes the pairs joined by `separator`.
    pub fn encode_with(&self, separator: char) -> String {
        self.pairs()
            .map(|pairs| pairs.encode_with(separator))
            .unwrap_or_default()
    }

    /// Returns the number of distinct keys.
    pub fn count(&self) -> usize {
        self.pairs().map_or(0, KeyValuePairs::count)
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        match self {
            KeyValueStore::Empty => true,
            KeyValueStore::Eager(pairs) => pairs.is_empty(),
            KeyValueStore::Lazy(lazy) => lazy.is_empty(),
        }
    }
}

impl PartialEq for KeyValueStore {
    fn eq(&self, other: &Self) -> bool {
        match (self.pairs(), other.pairs()) {
            (Some(a), Some(b)) => a == b,
            (Some(pairs), None) | (None, Some(pairs)) => pairs.is_empty(),
            (None, None) => true,
        }
    }
}

impl Eq for KeyValueStore {}

impl From<KeyValuePairs> for KeyValueStore {
    fn from(pairs: KeyValuePairs) -> Self {
        Self::Eager(pairs)
    }
}

impl From<LazyStore> for KeyValueStore {
    fn from(lazy: LazyStore) -> Self {
        Self::Lazy(Arc::new(lazy))
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for KeyValueStore {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        Self::Eager(pairs.into())
    }
}
