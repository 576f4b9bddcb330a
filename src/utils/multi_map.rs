// src/utils/multi_map.rs
//! Ordered multi-valued index.
//!
//! Every key maps to a non-empty list of values kept in insertion order, so
//! two papers that collide on a title or a volume_author key are both kept.
//! Keys iterate in ascending order, which is what the matcher relies on for
//! deterministic output.

use std::borrow::Borrow;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiMap<K: Ord, V> {
    entries: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> MultiMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the list stored under `key`.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// All values stored under `key`, in insertion order. Never returns an empty slice.
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key).map(|values| values.as_slice())
    }

    /// The first value inserted under `key`.
    pub fn first<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key).and_then(|values| values.first())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn has_multiple_values<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries
            .get(key)
            .is_some_and(|values| values.len() > 1)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// `(key, values)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn value_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_insert_is_not_multiple() {
        let mut map = MultiMap::new();
        map.insert("k".to_string(), 1);

        assert_eq!(map.get("k"), Some(&[1][..]));
        assert!(!map.has_multiple_values("k"));
        assert_eq!(map.first("k"), Some(&1));
    }

    #[test]
    fn test_collisions_are_kept_in_insertion_order() {
        let mut map = MultiMap::new();
        map.insert("k".to_string(), "second-title");
        map.insert("k".to_string(), "first-title");
        map.insert("other".to_string(), "x");

        assert!(map.has_multiple_values("k"));
        assert_eq!(map.get("k"), Some(&["second-title", "first-title"][..]));
        assert_eq!(map.key_count(), 2);
        assert_eq!(map.value_count(), 3);
    }

    #[test]
    fn test_missing_key() {
        let map: MultiMap<String, u8> = MultiMap::new();
        assert!(map.get("nope").is_none());
        assert!(!map.has_multiple_values("nope"));
        assert!(!map.contains_key("nope"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_keys_are_ascending() {
        let mut map = MultiMap::new();
        for key in ["j93-d_5_；b", "j93-d_10_；a", "j93-d_5_；a"] {
            map.insert(key.to_string(), ());
        }
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["j93-d_10_；a", "j93-d_5_；a", "j93-d_5_；b"]);
    }
}
