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

use crate::err::NegativeWeightError;
use minunion_core::{Element, WeightVariable, weight::Weight};
use std::{
    collections::{BTreeSet, HashSet},
    fmt::Display,
    hash::BuildHasher,
};

/// The total weight of all events whose required elements equal `elements`
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightedSet<E: Element, W: WeightVariable = i64> {
    elements: BTreeSet<E>,
    weight: Weight<W>,
}

impl<E: Element, W: WeightVariable> WeightedSet<E, W> {
    pub fn new<I>(elements: I, weight: Weight<W>) -> Result<Self, NegativeWeightError<W>>
    where
        I: IntoIterator<Item = E>,
    {
        if weight.is_negative() {
            return Err(NegativeWeightError::new(weight));
        }
        Ok(Self {
            elements: elements.into_iter().collect(),
            weight,
        })
    }

    #[inline]
    pub fn elements(&self) -> &BTreeSet<E> {
        &self.elements
    }

    #[inline]
    pub fn weight(&self) -> Weight<W> {
        self.weight
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Events requiring no elements at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True if every element of this set is in `provisioned`.
    #[inline]
    pub fn is_covered_by<S: BuildHasher>(&self, provisioned: &HashSet<E, S>) -> bool {
        self.elements.iter().all(|e| provisioned.contains(e))
    }

    #[inline]
    pub fn into_parts(self) -> (BTreeSet<E>, Weight<W>) {
        (self.elements, self.weight)
    }

    #[inline]
    pub(crate) fn add_weight(&mut self, weight: Weight<W>) {
        self.weight += weight;
    }
}

impl<E: Element + Display, W: WeightVariable> Display for WeightedSet<E, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "}}: {}", self.weight.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_set_dedups_elements() {
        let ws = WeightedSet::new(["b", "a", "b"], Weight::new(10_i64)).unwrap();
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.elements().iter().copied().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(ws.weight(), Weight::new(10));
    }

    #[test]
    fn test_weighted_set_rejects_negative_weight() {
        let err = WeightedSet::new(["a"], Weight::new(-1_i64)).unwrap_err();
        assert_eq!(err.weight(), Weight::new(-1));
    }

    #[test]
    fn test_weighted_set_zero_weight_is_valid() {
        assert!(WeightedSet::new(["a"], Weight::new(0_i64)).is_ok());
    }

    #[test]
    fn test_weighted_set_is_covered_by() {
        let ws = WeightedSet::new(["a", "b"], Weight::new(1_i64)).unwrap();
        let provisioned: HashSet<&str> = ["a", "b", "c"].into_iter().collect();
        assert!(ws.is_covered_by(&provisioned));
        let partial: HashSet<&str> = ["a"].into_iter().collect();
        assert!(!ws.is_covered_by(&partial));

        let empty = WeightedSet::new(Vec::<&str>::new(), Weight::new(1_i64)).unwrap();
        assert!(empty.is_empty());
        assert!(empty.is_covered_by(&HashSet::new()));
    }

    #[test]
    fn test_weighted_set_display() {
        let ws = WeightedSet::new(["y", "x"], Weight::new(7_i64)).unwrap();
        assert_eq!(ws.to_string(), "{x, y}: 7");
    }
}
