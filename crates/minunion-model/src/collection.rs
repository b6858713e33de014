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

use crate::{
    err::{EmptyMergeError, NegativeWeightError, WeightOverflowError},
    set::WeightedSet,
    stats::CollectionStats,
};
use minunion_core::{Element, WeightVariable, weight::Weight};
use num_traits::Zero;
use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap, HashSet},
    hash::BuildHasher,
};

/// A table of weighted sets with pairwise distinct element sets.
///
/// Inserting a set that is already present adds its weight to the existing
/// row. Sets without any element are not stored as rows; their weight is
/// accumulated separately and reported by [`empty_weight`](Self::empty_weight).
///
/// Rows keep the order in which their element set was first seen until the
/// collection is explicitly re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSetCollection<E: Element, W: WeightVariable = i64> {
    rows: Vec<WeightedSet<E, W>>,
    index: HashMap<BTreeSet<E>, usize>,
    total_weight: Weight<W>,
    empty_weight: Weight<W>,
}

impl<E: Element, W: WeightVariable> Default for WeightedSetCollection<E, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element, W: WeightVariable> WeightedSetCollection<E, W> {
    #[inline]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            total_weight: Weight::zero(),
            empty_weight: Weight::zero(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            total_weight: Weight::zero(),
            empty_weight: Weight::zero(),
        }
    }

    /// Builds a collection from raw `(elements, weight)` pairs.
    pub fn try_from_pairs<I, S>(pairs: I) -> Result<Self, NegativeWeightError<W>>
    where
        I: IntoIterator<Item = (S, W)>,
        S: IntoIterator<Item = E>,
    {
        let mut collection = Self::new();
        for (elements, weight) in pairs {
            collection.insert(WeightedSet::new(elements, Weight::new(weight))?);
        }
        Ok(collection)
    }

    /// Panics if a summed weight overflows. See [`try_insert`](Self::try_insert).
    pub fn insert(&mut self, set: WeightedSet<E, W>) {
        self.try_insert(set)
            .expect("overflow in WeightedSetCollection::insert");
    }

    /// Inserts `set` unless a summed weight would overflow, in which case
    /// the collection is left unchanged.
    pub fn try_insert(&mut self, set: WeightedSet<E, W>) -> Result<(), WeightOverflowError> {
        let weight = set.weight();
        if set.is_empty() {
            return self.try_add_empty_weight(weight);
        }
        // Row weights are non-negative, so no row exceeds the total.
        let total_weight = self
            .total_weight
            .checked_add(weight)
            .ok_or(WeightOverflowError)?;
        match self.index.get(set.elements()) {
            Some(&idx) => self.rows[idx].add_weight(weight),
            None => {
                self.index.insert(set.elements().clone(), self.rows.len());
                self.rows.push(set);
            }
        }
        self.total_weight = total_weight;
        Ok(())
    }

    #[inline]
    pub fn add_empty_weight(&mut self, weight: Weight<W>) {
        self.try_add_empty_weight(weight)
            .expect("overflow in WeightedSetCollection::add_empty_weight");
    }

    pub fn try_add_empty_weight(&mut self, weight: Weight<W>) -> Result<(), WeightOverflowError> {
        self.empty_weight = self
            .empty_weight
            .checked_add(weight)
            .ok_or(WeightOverflowError)?;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[WeightedSet<E, W>] {
        &self.rows
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, WeightedSet<E, W>> {
        self.rows.iter()
    }

    #[inline]
    pub fn get(&self, elements: &BTreeSet<E>) -> Option<&WeightedSet<E, W>> {
        self.index.get(elements).map(|&idx| &self.rows[idx])
    }

    /// Sum of all row weights. Weight of element-free events is not included.
    #[inline]
    pub fn total_weight(&self) -> Weight<W> {
        self.total_weight
    }

    #[inline]
    pub fn empty_weight(&self) -> Weight<W> {
        self.empty_weight
    }

    pub fn distinct_elements(&self) -> BTreeSet<&E> {
        self.rows.iter().flat_map(|r| r.elements().iter()).collect()
    }

    /// Weight of all rows whose elements are contained in `provisioned`.
    pub fn covered_weight_by<S: BuildHasher>(&self, provisioned: &HashSet<E, S>) -> Weight<W> {
        self.rows
            .iter()
            .filter(|r| r.is_covered_by(provisioned))
            .map(WeightedSet::weight)
            .sum()
    }

    /// Adds all rows of `other` to `self`, summing the weights of identical
    /// element sets.
    pub fn merge(&mut self, other: WeightedSetCollection<E, W>) {
        self.try_merge(other)
            .expect("overflow in WeightedSetCollection::merge");
    }

    /// Like [`merge`](Self::merge), but stops at the first overflowing sum.
    /// Rows merged before that point stay merged.
    pub fn try_merge(&mut self, other: WeightedSetCollection<E, W>) -> Result<(), WeightOverflowError> {
        self.try_add_empty_weight(other.empty_weight)?;
        self.rows.reserve(other.rows.len());
        for row in other.rows {
            self.try_insert(row)?;
        }
        Ok(())
    }

    #[inline]
    pub fn merged(mut self, other: WeightedSetCollection<E, W>) -> Self {
        self.merge(other);
        self
    }

    /// Folds all collections into one. Fails if there is nothing to merge.
    pub fn merge_all<I>(collections: I) -> Result<Self, EmptyMergeError>
    where
        I: IntoIterator<Item = WeightedSetCollection<E, W>>,
    {
        let mut iter = collections.into_iter();
        let first = iter.next().ok_or(EmptyMergeError)?;
        Ok(iter.fold(first, |acc, c| acc.merged(c)))
    }

    /// Stable sort, heaviest row first.
    pub fn sort_by_weight_desc(&mut self) {
        self.rows.sort_by_key(|r| Reverse(r.weight()));
        self.reindex();
    }

    /// Keeps only the `limit` heaviest rows.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.sort_by_weight_desc();
        if self.rows.len() > limit {
            self.rows.truncate(limit);
            self.total_weight = self.rows.iter().map(WeightedSet::weight).sum();
            self.reindex();
        }
        self
    }

    #[inline]
    pub fn stats(&self) -> CollectionStats<W> {
        CollectionStats::from_collection(self)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, row) in self.rows.iter().enumerate() {
            self.index.insert(row.elements().clone(), i);
        }
    }
}

impl<E: Element, W: WeightVariable> Extend<WeightedSet<E, W>> for WeightedSetCollection<E, W> {
    fn extend<I: IntoIterator<Item = WeightedSet<E, W>>>(&mut self, iter: I) {
        for set in iter {
            self.insert(set);
        }
    }
}

impl<E: Element, W: WeightVariable> FromIterator<WeightedSet<E, W>>
    for WeightedSetCollection<E, W>
{
    fn from_iter<I: IntoIterator<Item = WeightedSet<E, W>>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<'a, E: Element, W: WeightVariable> IntoIterator for &'a WeightedSetCollection<E, W> {
    type Item = &'a WeightedSet<E, W>;
    type IntoIter = std::slice::Iter<'a, WeightedSet<E, W>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
