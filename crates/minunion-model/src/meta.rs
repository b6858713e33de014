// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::collections::{BTreeMap, btree_map};

/// Additive scalar totals that accompany a weighted set collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaCounters {
    counters: BTreeMap<String, i64>,
}

impl MetaCounters {
    /// Number of events that were analyzed; the denominator of coverage.
    pub const VALID_QUERIES: &'static str = "VALID_QUERIES";
    /// Number of events requiring no element at all.
    pub const EMPTY_GRAPH_PATTERN: &'static str = "EMPTY_GRAPH_PATTERN";

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<i64> {
        self.counters.get(key).copied()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.counters.contains_key(key)
    }

    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: i64) -> Option<i64> {
        self.counters.insert(key.into(), value)
    }

    /// Adds `value` to the counter, creating it at zero if missing. Sums
    /// saturate at the `i64` bounds.
    #[inline]
    pub fn add(&mut self, key: impl Into<String>, value: i64) {
        let counter = self.counters.entry(key.into()).or_insert(0);
        *counter = counter.saturating_add(value);
    }

    pub fn merge(&mut self, other: &MetaCounters) {
        for (k, v) in &other.counters {
            self.add(k.clone(), *v);
        }
    }

    #[inline]
    pub fn merged(mut self, other: &MetaCounters) -> Self {
        self.merge(other);
        self
    }

    #[inline]
    pub fn valid_queries(&self) -> Option<i64> {
        self.get(Self::VALID_QUERIES)
    }

    #[inline]
    pub fn empty_graph_pattern(&self) -> Option<i64> {
        self.get(Self::EMPTY_GRAPH_PATTERN)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, String, i64> {
        self.counters.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for MetaCounters {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut meta = MetaCounters::new();
        for (k, v) in iter {
            meta.add(k, v);
        }
        meta
    }
}

impl<'a> IntoIterator for &'a MetaCounters {
    type Item = (&'a String, &'a i64);
    type IntoIter = btree_map::Iter<'a, String, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_merge_sums_per_key() {
        let a: MetaCounters = [("VALID_QUERIES", 10), ("X", 1)].into_iter().collect();
        let b: MetaCounters = [("VALID_QUERIES", 5), ("Y", 2)].into_iter().collect();
        let m = a.merged(&b);
        assert_eq!(m.valid_queries(), Some(15));
        assert_eq!(m.get("X"), Some(1));
        assert_eq!(m.get("Y"), Some(2));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_meta_from_iter_sums_duplicates() {
        let m: MetaCounters = [("A", 1), ("A", 2)].into_iter().collect();
        assert_eq!(m.get("A"), Some(3));
    }

    #[test]
    fn test_meta_reserved_keys() {
        let mut m = MetaCounters::new();
        assert_eq!(m.empty_graph_pattern(), None);
        m.insert(MetaCounters::EMPTY_GRAPH_PATTERN, 4);
        assert!(m.contains("EMPTY_GRAPH_PATTERN"));
        assert_eq!(m.empty_graph_pattern(), Some(4));
    }

    #[test]
    fn test_add_saturates() {
        let mut m = MetaCounters::new();
        m.add("K", i64::MAX);
        m.add("K", 5);
        assert_eq!(m.get("K"), Some(i64::MAX));
    }
}
