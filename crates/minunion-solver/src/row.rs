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

use minunion_core::{WeightVariable, weight::Weight};

/// One live row of the working collection: the elements not yet selected
/// and the weight the row contributes once they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingRow<W: WeightVariable> {
    origin: usize,
    remaining: Vec<u32>,
    signature: u64,
    weight: Weight<W>,
}

#[inline]
fn signature_of(ids: &[u32]) -> u64 {
    ids.iter().fold(0u64, |acc, &id| acc | (1u64 << (id % 64)))
}

impl<W: WeightVariable> WorkingRow<W> {
    /// `remaining` must be sorted ascending and free of duplicates.
    #[inline]
    pub fn new(origin: usize, remaining: Vec<u32>, weight: Weight<W>) -> Self {
        debug_assert!(remaining.windows(2).all(|w| w[0] < w[1]));
        let signature = signature_of(&remaining);
        Self {
            origin,
            remaining,
            signature,
            weight,
        }
    }

    /// Index of the row in the collection it was built from.
    #[inline]
    pub fn origin(&self) -> usize {
        self.origin
    }

    #[inline]
    pub fn remaining(&self) -> &[u32] {
        &self.remaining
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    #[inline]
    pub fn weight(&self) -> Weight<W> {
        self.weight
    }

    /// Whether every remaining element of `self` is also remaining in `other`.
    pub fn is_subset_of(&self, other: &WorkingRow<W>) -> bool {
        if self.remaining.len() > other.remaining.len() {
            return false;
        }
        if self.signature & !other.signature != 0 {
            return false;
        }
        let mut theirs = other.remaining.iter();
        'outer: for id in &self.remaining {
            for candidate in theirs.by_ref() {
                match candidate.cmp(id) {
                    std::cmp::Ordering::Less => continue,
                    std::cmp::Ordering::Equal => continue 'outer,
                    std::cmp::Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    /// Drops every id of `selected` (sorted ascending) from the row and
    /// returns whether nothing remains.
    pub fn remove_all(&mut self, selected: &[u32]) -> bool {
        if self.signature & signature_of(selected) == 0 {
            return self.remaining.is_empty();
        }
        let mut j = 0;
        self.remaining.retain(|id| {
            while j < selected.len() && selected[j] < *id {
                j += 1;
            }
            !(j < selected.len() && selected[j] == *id)
        });
        self.signature = signature_of(&self.remaining);
        self.remaining.is_empty()
    }
}
