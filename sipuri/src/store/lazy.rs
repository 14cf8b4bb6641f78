use std::sync::OnceLock;

use super::pairs::{KeyValuePairs, split_pairs};
use crate::error::EscapeError;
use crate::escape::check_unescape;

/// A key/value store that defers decoding until it is first read.
///
/// Construction only validates the percent encoding of the raw text, so
/// malformed input fails as early as with [`KeyValuePairs::decode`]. The
/// pairs are decoded at most once, on first access, and then reused. The
/// memoization is thread safe: concurrent readers all observe the same
/// decoded pairs.
#[derive(Debug, Clone)]
pub struct LazyStore {
    raw: String,
    separator: char,
    decoded: OnceLock<KeyValuePairs>,
}

impl LazyStore {
    /// Validates `raw` and keeps it for decoding on first access.
    pub fn decode(raw: &str, separator: char) -> Result<Self, EscapeError> {
        for (key, value) in split_pairs(raw, separator) {
            check_unescape(key)?;
            check_unescape(value)?;
        }

        Ok(Self {
            raw: raw.to_owned(),
            separator,
            decoded: OnceLock::new(),
        })
    }

    /// Returns the undecoded text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the separator between pairs.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns `true` once the pairs have been materialized.
    pub fn is_decoded(&self) -> bool {
        self.decoded.get().is_some()
    }

    /// Returns the decoded pairs, decoding them on the first call.
    pub fn pairs(&self) -> &KeyValuePairs {
        self.decoded.get_or_init(|| {
            let mut pairs = KeyValuePairs::new();
            // Validated in `decode`, a failure here leaves the pairs empty.
            if let Err(err) = pairs.decode(&self.raw, self.separator) {
                log::warn!("Lazy store failed to decode {:?}: {}", self.raw, err);
            }
            log::trace!("Lazy store decoded [{} keys] ({:p})", pairs.count(), self);
            pairs
        })
    }

    /// Returns the first value for `key`, or an empty string if absent.
    pub fn get(&self, key: &str) -> &str {
        self.pairs().get(key)
    }

    /// Encodes the pairs joined by `&`.
    pub fn encode(&self) -> String {
        self.pairs().encode()
    }

    /// Returns the number of distinct keys.
    pub fn count(&self) -> usize {
        self.pairs().count()
    }

    /// Returns `true` if there are no keys.
    ///
    /// Answered from the raw text when it is empty, otherwise decodes.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() || self.pairs().is_empty()
    }
}

impl PartialEq for LazyStore {
    fn eq(&self, other: &Self) -> bool {
        self.pairs() == other.pairs()
    }
}

impl Eq for LazyStore {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_decoding_is_deferred() {
        let store = LazyStore::decode("user=phone;lr", ';').unwrap();
        assert!(!store.is_decoded());

        assert_eq!(store.get("user"), "phone");
        assert!(store.is_decoded());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_malformed_input_fails_eagerly() {
        let err = LazyStore::decode("a=1;%xx=2", ';').unwrap_err();
        assert_eq!(err.fragment(), "%xx");

        let err = LazyStore::decode("a=%FF", ';').unwrap_err();
        assert_eq!(err.fragment(), "%FF");
    }

    #[test]
    fn test_empty_raw_is_empty_without_decoding() {
        let store = LazyStore::decode("", ';').unwrap();

        assert!(store.is_empty());
        assert!(!store.is_decoded());
    }

    #[test]
    fn test_only_separators_is_empty() {
        let store = LazyStore::decode(";;", ';').unwrap();

        assert!(store.is_empty());
        assert_eq!(store.encode(), "");
    }

    #[test]
    fn test_concurrent_readers_share_decoded_pairs() {
        let store = Arc::new(LazyStore::decode("priority=urgent&subject=project%20x", '&').unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.pairs() as *const KeyValuePairs as usize)
            })
            .collect();

        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.get("subject"), "project x");
    }
}
