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

use crate::collection::WeightedSetCollection;
use minunion_core::{Element, WeightVariable, weight::Weight};

/// Summary figures of a collection, mostly for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionStats<W: WeightVariable> {
    /// Number of distinct non-empty element sets.
    rows: usize,
    distinct_elements: usize,
    total_weight: Weight<W>,
    /// Weight of events requiring no elements.
    empty_weight: Weight<W>,
    p50_row_weight: f64,
    p90_row_weight: f64,
    p50_set_size: f64,
    p90_set_size: f64,
    max_set_size: usize,
}

impl<W: WeightVariable> CollectionStats<W> {
    pub fn from_collection<E: Element>(collection: &WeightedSetCollection<E, W>) -> Self {
        let weights: Vec<f64> = collection
            .iter()
            .filter_map(|r| r.weight().to_f64())
            .collect();
        let sizes: Vec<f64> = collection.iter().map(|r| r.len() as f64).collect();

        Self {
            rows: collection.len(),
            distinct_elements: collection.distinct_elements().len(),
            total_weight: collection.total_weight(),
            empty_weight: collection.empty_weight(),
            p50_row_weight: quantile::percentile(&weights, 0.5),
            p90_row_weight: quantile::percentile(&weights, 0.9),
            p50_set_size: quantile::percentile(&sizes, 0.5),
            p90_set_size: quantile::percentile(&sizes, 0.9),
            max_set_size: collection.iter().map(|r| r.len()).max().unwrap_or(0),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn distinct_elements(&self) -> usize {
        self.distinct_elements
    }

    #[inline]
    pub fn total_weight(&self) -> Weight<W> {
        self.total_weight
    }

    #[inline]
    pub fn empty_weight(&self) -> Weight<W> {
        self.empty_weight
    }

    #[inline]
    pub fn p50_row_weight(&self) -> f64 {
        self.p50_row_weight
    }

    #[inline]
    pub fn p90_row_weight(&self) -> f64 {
        self.p90_row_weight
    }

    #[inline]
    pub fn p50_set_size(&self) -> f64 {
        self.p50_set_size
    }

    #[inline]
    pub fn p90_set_size(&self) -> f64 {
        self.p90_set_size
    }

    #[inline]
    pub fn max_set_size(&self) -> usize {
        self.max_set_size
    }
}

mod quantile {
    use statrs::statistics::{Data, OrderStatistics};

    #[inline]
    pub fn percentile(data: &[f64], p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        let vals: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if vals.is_empty() {
            return 0.0;
        }
        let mut d = Data::new(vals);
        d.quantile(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_of_small_collection() {
        let c = WeightedSetCollection::<&str, i64>::try_from_pairs([
            (vec!["a"], 10),
            (vec!["a", "b"], 20),
            (vec!["b", "c", "d"], 30),
            (vec![], 5),
        ])
        .unwrap();
        let s = c.stats();
        assert_eq!(s.rows(), 3);
        assert_eq!(s.distinct_elements(), 4);
        assert_eq!(s.total_weight(), Weight::new(60));
        assert_eq!(s.empty_weight(), Weight::new(5));
        assert_eq!(s.max_set_size(), 3);
        assert!((s.p50_row_weight() - 20.0).abs() < 1e-9);
        assert!((s.p50_set_size() - 2.0).abs() < 1e-9);
        assert!(s.p90_row_weight() >= s.p50_row_weight());
    }

    #[test]
    fn test_stats_of_empty_collection() {
        let c = WeightedSetCollection::<&str, i64>::new();
        let s = c.stats();
        assert_eq!(s.rows(), 0);
        assert_eq!(s.max_set_size(), 0);
        assert_eq!(s.p90_set_size(), 0.0);
    }
}
