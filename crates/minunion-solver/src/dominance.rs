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

use crate::row::WorkingRow;
use minunion_core::{WeightVariable, weight::Weight};
use num_traits::Zero;
use std::cmp::Ordering;

/// Dominance weight per remaining element of a row.
///
/// Compared exactly by cross multiplication. Falls back to `f64` only when
/// the products leave `i128`.
#[derive(Debug, Clone, Copy)]
pub struct Density<W: WeightVariable> {
    dominance: Weight<W>,
    size: usize,
}

impl<W: WeightVariable> Density<W> {
    #[inline]
    pub fn new(dominance: Weight<W>, size: usize) -> Self {
        debug_assert!(size > 0);
        Self { dominance, size }
    }

    #[inline]
    pub fn dominance(&self) -> Weight<W> {
        self.dominance
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.dominance.to_f64().unwrap_or(f64::NAN) / self.size as f64
    }

    fn cross_cmp(&self, other: &Self) -> Option<Ordering> {
        let lhs = self.dominance.to_i128()?.checked_mul(other.size as i128)?;
        let rhs = other.dominance.to_i128()?.checked_mul(self.size as i128)?;
        Some(lhs.cmp(&rhs))
    }
}

impl<W: WeightVariable> PartialEq for Density<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: WeightVariable> Eq for Density<W> {}

impl<W: WeightVariable> PartialOrd for Density<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: WeightVariable> Ord for Density<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cross_cmp(other)
            .unwrap_or_else(|| self.as_f64().total_cmp(&other.as_f64()))
    }
}

/// Dominance of every live row, computed against the current working rows.
///
/// The dominance of a row `r` is the total weight of all live rows whose
/// remaining elements are contained in those of `r`, `r` included. Selecting
/// `r` satisfies exactly those rows.
#[derive(Debug, Clone)]
pub struct DominanceIndex<W: WeightVariable> {
    densities: Vec<Density<W>>,
}

impl<W: WeightVariable> DominanceIndex<W> {
    pub fn compute(rows: &[WorkingRow<W>]) -> Self {
        let densities = rows
            .iter()
            .map(|candidate| {
                let dominance = rows
                    .iter()
                    .filter(|other| other.is_subset_of(candidate))
                    .map(WorkingRow::weight)
                    .fold(Weight::zero(), |acc, w| acc + w);
                Density::new(dominance, candidate.len())
            })
            .collect();
        Self { densities }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.densities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    #[inline]
    pub fn density(&self, index: usize) -> &Density<W> {
        &self.densities[index]
    }

    #[inline]
    pub fn dominance(&self, index: usize) -> Weight<W> {
        self.densities[index].dominance
    }

    /// Row with the highest density. Ties prefer fewer remaining elements,
    /// then the earlier row.
    pub fn densest(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, d) in self.densities.iter().enumerate() {
            let better = match best {
                None => true,
                Some(b) => {
                    let current = &self.densities[b];
                    match d.cmp(current) {
                        Ordering::Greater => true,
                        Ordering::Equal => d.size < current.size,
                        Ordering::Less => false,
                    }
                }
            };
            if better {
                best = Some(i);
            }
        }
        best
    }

    /// Cheapest row whose dominance alone closes `gap`. Ties prefer the
    /// higher density, then the earlier row.
    pub fn cheapest_closing(&self, gap: Weight<W>) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, d) in self.densities.iter().enumerate() {
            if d.dominance < gap {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => {
                    let current = &self.densities[b];
                    match d.size.cmp(&current.size) {
                        Ordering::Less => true,
                        Ordering::Equal => d > current,
                        Ordering::Greater => false,
                    }
                }
            };
            if better {
                best = Some(i);
            }
        }
        best
    }
}
