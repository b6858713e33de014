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

mod config;
mod err;

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use err::GeneratorConfigBuildError;

use crate::{collection::WeightedSetCollection, set::WeightedSet};
use minunion_core::weight::Weight;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Zipf};
use std::collections::BTreeSet;

/// Produces synthetic weighted set collections shaped like query logs.
pub struct WorkloadGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    element_rank: Zipf<f64>,
    row_weight: Zipf<f64>,
    /// `popularity[rank]` is the element id currently holding that rank.
    popularity: Vec<usize>,
    name_width: usize,
}

impl From<GeneratorConfig> for WorkloadGenerator {
    fn from(config: GeneratorConfig) -> Self {
        Self::new(config)
    }
}

impl WorkloadGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        // The builder guarantees n >= 1 and s >= 0, the only failure cases.
        let element_rank = Zipf::new(config.element_count as f64, config.element_exponent)
            .expect("valid element Zipf parameters");
        let row_weight = Zipf::new(config.max_weight as f64, config.weight_exponent)
            .expect("valid weight Zipf parameters");
        let name_width = config.element_count.to_string().len();
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            popularity: (0..config.element_count).collect(),
            element_rank,
            row_weight,
            name_width,
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Element names are zero padded so that their string order equals
    /// their numeric order.
    #[inline]
    fn element_name(&self, id: usize) -> String {
        format!("e{:0width$}", id, width = self.name_width)
    }

    fn sample_element(&mut self) -> usize {
        let rank = self.element_rank.sample(&mut self.rng) as usize;
        let rank = rank.clamp(1, self.config.element_count) - 1;
        self.popularity[rank]
    }

    fn sample_set(&mut self) -> BTreeSet<usize> {
        let size = self
            .rng
            .random_range(self.config.min_set_size..=self.config.max_set_size);
        let mut set = BTreeSet::new();
        // Popular elements collide often; cap the attempts so heavy skew
        // cannot stall generation.
        let mut attempts = 0;
        while set.len() < size && attempts < size * 16 {
            set.insert(self.sample_element());
            attempts += 1;
        }
        set
    }

    fn sample_weight(&mut self) -> i64 {
        let w = self.row_weight.sample(&mut self.rng) as i64;
        w.clamp(1, self.config.max_weight)
    }

    /// Generates one collection. Repeated sets are merged, so the result may
    /// hold fewer rows than `row_count`.
    pub fn generate(&mut self) -> WeightedSetCollection<String, i64> {
        let mut collection = WeightedSetCollection::with_capacity(self.config.row_count);
        for _ in 0..self.config.row_count {
            let ids = self.sample_set();
            let weight = self.sample_weight();
            let elements = ids.into_iter().map(|id| self.element_name(id));
            let set = WeightedSet::new(elements.collect::<Vec<_>>(), Weight::new(weight))
                .expect("sampled weights are positive");
            collection.insert(set);
        }
        collection
    }

    /// Reshuffles a `drift` fraction of the element popularity ranks.
    fn apply_drift(&mut self) {
        let n = self.popularity.len();
        let swaps = (self.config.drift * n as f64).round() as usize;
        for _ in 0..swaps {
            let a = self.rng.random_range(0..n);
            let b = self.rng.random_range(0..n);
            self.popularity.swap(a, b);
        }
    }

    /// Generates `periods` consecutive collections whose element popularity
    /// drifts from one period to the next.
    pub fn generate_periods(&mut self, periods: usize) -> Vec<WeightedSetCollection<String, i64>> {
        let mut out = Vec::with_capacity(periods);
        for i in 0..periods {
            if i > 0 {
                self.apply_drift();
            }
            out.push(self.generate());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> GeneratorConfig {
        GeneratorConfigBuilder::new()
            .element_count(50)
            .row_count(300)
            .set_size_range(1, 3)
            .max_weight(500)
            .seed(seed)
            .build()
            .expect("valid config")
    }

    #[test]
    fn test_generator_is_deterministic_for_seed() {
        let a = WorkloadGenerator::new(small_config(7)).generate();
        let b = WorkloadGenerator::new(small_config(7)).generate();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_respects_config_bounds() {
        let cfg = small_config(11);
        let c = WorkloadGenerator::new(cfg.clone()).generate();
        assert!(!c.is_empty());
        assert!(c.len() <= cfg.row_count());
        assert_eq!(c.empty_weight(), Weight::new(0));
        for row in &c {
            assert!(row.len() >= 1 && row.len() <= cfg.max_set_size());
            assert!(row.weight() >= Weight::new(1));
            for e in row.elements() {
                assert!(e.starts_with('e') && e.len() == 3, "{e}");
            }
        }
    }

    #[test]
    fn test_generate_periods_yields_requested_count() {
        let mut generator = WorkloadGenerator::new(small_config(3));
        let periods = generator.generate_periods(4);
        assert_eq!(periods.len(), 4);
        assert!(periods.iter().all(|p| !p.is_empty()));
    }
}
