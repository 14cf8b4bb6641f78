use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use itertools::Itertools;

use crate::error::EscapeError;
use crate::escape::{Encoding, escape, unescape};

/// Separator used by [`KeyValuePairs::encode`].
pub const DEFAULT_SEPARATOR: char = '&';

/// Splits `raw` on `separator` and each pair on its first `=`.
///
/// Empty pairs are skipped and a pair without `=` has an empty value.
pub(crate) fn split_pairs(raw: &str, separator: char) -> impl Iterator<Item = (&str, &str)> {
    raw.split(separator)
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

/// An eagerly decoded, multi-valued mapping of names to values.
///
/// Used for both URI parameters and URI headers. Names are kept sorted so
/// that [`encode`](Self::encode) is deterministic.
///
/// # Examples
///
/// ```
/// use sipuri::store::KeyValuePairs;
///
/// let mut pairs = KeyValuePairs::from([("transport", "tcp")]);
/// pairs.add("lr", "");
///
/// assert_eq!(pairs.get("transport"), "tcp");
/// assert_eq!(pairs.encode_with(';'), "lr=;transport=tcp");
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct KeyValuePairs(BTreeMap<String, Vec<String>>);

impl KeyValuePairs {
    /// Creates an empty `KeyValuePairs`.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Decodes `raw` into the pairs, splitting pairs on `separator`.
    ///
    /// Keys and values are unescaped independently. Decoded values are
    /// appended to any already present. On error nothing is added.
    pub fn decode(&mut self, raw: &str, separator: char) -> Result<(), EscapeError> {
        let mut decoded = Vec::new();
        for (key, value) in split_pairs(raw, separator) {
            decoded.push((unescape(key)?.into_owned(), unescape(value)?.into_owned()));
        }

        for (key, value) in decoded {
            self.add(key, value);
        }

        Ok(())
    }

    /// Returns the first value for `key`, or an empty string if absent.
    pub fn get(&self, key: &str) -> &str {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map_or("", String::as_str)
    }

    /// Returns every value for `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `key` is present, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Appends `value` to the values of `key`.
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces the values of `key` with `value`.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        match self.0.entry(key.into()) {
            Entry::Vacant(entry) => {
                entry.insert(vec![value.into()]);
            }
            Entry::Occupied(mut entry) => {
                let values = entry.get_mut();
                values.clear();
                values.push(value.into());
            }
        }
    }

    /// Removes `key`, returning its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    /// Returns the number of distinct keys.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys and their values, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Encodes the pairs joined by `&`.
    pub fn encode(&self) -> String {
        self.encode_with(DEFAULT_SEPARATOR)
    }

    /// Encodes the pairs as `key=value`, sorted by key, joined by `separator`.
    ///
    /// A key is repeated once for each of its values. Keys and values are
    /// escaped as query components, so a space becomes `%20`.
    pub fn encode_with(&self, separator: char) -> String {
        let mut buf = [0; 4];
        let separator = separator.encode_utf8(&mut buf);

        self.0
            .iter()
            .flat_map(|(key, values)| {
                let key = escape(key, Encoding::QueryComponent);
                values
                    .iter()
                    .map(move |value| format!("{}={}", key, escape(value, Encoding::QueryComponent)))
            })
            .join(separator)
    }
}

impl<K, V> FromIterator<(K, V)> for KeyValuePairs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut pairs = Self::new();
        for (key, value) in iter {
            pairs.add(key, value);
        }
        pairs
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for KeyValuePairs {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> KeyValuePairs {
        let mut pairs = KeyValuePairs::new();
        pairs.add("dog", "bark!");
        pairs.add("dog", "woof@");
        pairs.add("cat", "meow");
        pairs.add("parrot", "(hellow)");
        pairs.add("mouse", "ee  ee\u{394}");
        pairs
    }

    #[test]
    fn test_encode_sorted_and_repeated() {
        assert_eq!(
            animals().encode(),
            "cat=meow&dog=bark%21&dog=woof%40&mouse=ee%20%20ee%CE%94&parrot=%28hellow%29"
        );
    }

    #[test]
    fn test_encode_with_separator() {
        let pairs = KeyValuePairs::from([("user", "phone"), ("transport", "tcp")]);
        assert_eq!(pairs.encode_with(';'), "transport=tcp;user=phone");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(KeyValuePairs::new().encode(), "");
    }

    #[test]
    fn test_decode() {
        let mut pairs = KeyValuePairs::new();
        pairs
            .decode("priority=urgent&subject=project%20x&lr", '&')
            .unwrap();

        assert_eq!(pairs.count(), 3);
        assert_eq!(pairs.get("priority"), "urgent");
        assert_eq!(pairs.get("subject"), "project x");
        assert!(pairs.contains_key("lr"));
        assert_eq!(pairs.get_all("lr"), [String::new()]);
        assert_eq!(pairs.get("missing"), "");
    }

    #[test]
    fn test_decode_splits_on_first_equals() {
        let mut pairs = KeyValuePairs::new();
        pairs.decode("a=b=c", ';').unwrap();

        assert_eq!(pairs.get("a"), "b=c");
    }

    #[test]
    fn test_decode_skips_empty_pairs() {
        let mut pairs = KeyValuePairs::new();
        pairs.decode(";;a=1;;", ';').unwrap();

        assert_eq!(pairs.count(), 1);
    }

    #[test]
    fn test_decode_failure_leaves_pairs_untouched() {
        let mut pairs = KeyValuePairs::from([("keep", "me")]);
        let err = pairs.decode("a=1;b=%zz", ';').unwrap_err();

        assert_eq!(err.fragment(), "%zz");
        assert_eq!(pairs, KeyValuePairs::from([("keep", "me")]));
    }

    #[test]
    fn test_set_and_remove() {
        let mut pairs = animals();
        pairs.set("dog", "growl");
        assert_eq!(pairs.get_all("dog"), ["growl".to_string()]);

        assert_eq!(pairs.remove("cat"), Some(vec!["meow".to_string()]));
        assert!(!pairs.contains_key("cat"));
        assert_eq!(pairs.count(), 3);
    }
}
