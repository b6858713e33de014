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

use minunion_core::{Element, WeightVariable, weight::Weight};
use num_traits::Zero;
use std::collections::HashSet;

/// The outcome of one minimum-union solve.
///
/// `selected_elements` holds every element in the order it was selected.
/// Elements selected in the same iteration appear sorted by their `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionResult<E: Element, W: WeightVariable = i64> {
    selected_elements: Vec<E>,
    covered_weight: Weight<W>,
    threshold: Weight<W>,
}

impl<E: Element, W: WeightVariable> UnionResult<E, W> {
    #[inline]
    pub fn new(selected_elements: Vec<E>, covered_weight: Weight<W>, threshold: Weight<W>) -> Self {
        Self {
            selected_elements,
            covered_weight,
            threshold,
        }
    }

    #[inline]
    pub fn empty(threshold: Weight<W>) -> Self {
        Self::new(Vec::new(), Weight::zero(), threshold)
    }

    #[inline]
    pub fn selected_elements(&self) -> &[E] {
        &self.selected_elements
    }

    #[inline]
    pub fn covered_weight(&self) -> Weight<W> {
        self.covered_weight
    }

    #[inline]
    pub fn threshold(&self) -> Weight<W> {
        self.threshold
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selected_elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selected_elements.is_empty()
    }

    /// Whether the covered weight reached the threshold.
    #[inline]
    pub fn reached_threshold(&self) -> bool {
        self.covered_weight >= self.threshold
    }

    /// `covered_weight / total`, `None` for a zero total.
    #[inline]
    pub fn coverage_of(&self, total: Weight<W>) -> Option<f64> {
        self.covered_weight.fraction_of(total)
    }

    #[inline]
    pub fn selected_set(&self) -> HashSet<&E> {
        self.selected_elements.iter().collect()
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<E>, Weight<W>, Weight<W>) {
        (self.selected_elements, self.covered_weight, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_result_accessors() {
        let r = UnionResult::new(vec!["a", "b"], Weight::new(30_i64), Weight::new(25));
        assert_eq!(r.len(), 2);
        assert!(r.reached_threshold());
        assert_eq!(r.coverage_of(Weight::new(60)), Some(0.5));
        assert!(r.selected_set().contains(&"b"));
    }

    #[test]
    fn test_union_result_empty() {
        let r = UnionResult::<&str, i64>::empty(Weight::new(10));
        assert!(r.is_empty());
        assert_eq!(r.covered_weight(), Weight::new(0));
        assert!(!r.reached_threshold());
        assert_eq!(r.coverage_of(Weight::new(0)), None);
    }
}
