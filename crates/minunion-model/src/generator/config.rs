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

use super::err::GeneratorConfigBuildError;
use rand::Rng;
use std::fmt::Display;

/// Shape of a synthetic workload.
///
/// Element popularity and row weight both follow Zipf laws, which is what
/// query logs tend to look like: a handful of identifiers appear in almost
/// every combination and a handful of combinations carry most of the weight.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub(crate) element_count: usize,
    pub(crate) row_count: usize,
    pub(crate) min_set_size: usize,
    pub(crate) max_set_size: usize,
    pub(crate) element_exponent: f64,
    pub(crate) weight_exponent: f64,
    pub(crate) max_weight: i64,
    /// Fraction of element ranks reshuffled between two periods.
    pub(crate) drift: f64,
    pub(crate) seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            element_count: 200,
            row_count: 1_000,
            min_set_size: 1,
            max_set_size: 4,
            element_exponent: 1.1,
            weight_exponent: 1.5,
            max_weight: 10_000,
            drift: 0.05,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn min_set_size(&self) -> usize {
        self.min_set_size
    }

    #[inline]
    pub fn max_set_size(&self) -> usize {
        self.max_set_size
    }

    #[inline]
    pub fn element_exponent(&self) -> f64 {
        self.element_exponent
    }

    #[inline]
    pub fn weight_exponent(&self) -> f64 {
        self.weight_exponent
    }

    #[inline]
    pub fn max_weight(&self) -> i64 {
        self.max_weight
    }

    #[inline]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Display for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeneratorConfig(elements={}, rows={}, set_size=[{}, {}], element_s={}, weight_s={}, max_weight={}, drift={}, seed={})",
            self.element_count,
            self.row_count,
            self.min_set_size,
            self.max_set_size,
            self.element_exponent,
            self.weight_exponent,
            self.max_weight,
            self.drift,
            self.seed
        )
    }
}

/// Builder for `GeneratorConfig`.
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        let seed = rand::rng().random();
        Self {
            config: GeneratorConfig {
                seed,
                ..GeneratorConfig::default()
            },
        }
    }
}

impl GeneratorConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn element_count(mut self, v: usize) -> Self {
        self.config.element_count = v;
        self
    }

    #[inline]
    pub fn row_count(mut self, v: usize) -> Self {
        self.config.row_count = v;
        self
    }

    #[inline]
    pub fn set_size_range(mut self, min: usize, max: usize) -> Self {
        self.config.min_set_size = min;
        self.config.max_set_size = max;
        self
    }

    #[inline]
    pub fn element_exponent(mut self, v: f64) -> Self {
        self.config.element_exponent = v;
        self
    }

    #[inline]
    pub fn weight_exponent(mut self, v: f64) -> Self {
        self.config.weight_exponent = v;
        self
    }

    #[inline]
    pub fn max_weight(mut self, v: i64) -> Self {
        self.config.max_weight = v;
        self
    }

    #[inline]
    pub fn drift(mut self, v: f64) -> Self {
        self.config.drift = v;
        self
    }

    #[inline]
    pub fn random_seed(mut self) -> Self {
        self.config.seed = rand::rng().random();
        self
    }

    #[inline]
    pub fn seed(mut self, v: u64) -> Self {
        self.config.seed = v;
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, GeneratorConfigBuildError> {
        use GeneratorConfigBuildError::*;
        let c = self.config;
        if c.element_count == 0 {
            return Err(ZeroElements);
        }
        if c.row_count == 0 {
            return Err(ZeroRows);
        }
        if c.min_set_size == 0 || c.min_set_size > c.max_set_size {
            return Err(InvalidSetSizeRange {
                min: c.min_set_size,
                max: c.max_set_size,
            });
        }
        if c.max_set_size > c.element_count {
            return Err(SetSizeExceedsUniverse {
                max: c.max_set_size,
                elements: c.element_count,
            });
        }
        for s in [c.element_exponent, c.weight_exponent] {
            if !s.is_finite() || s < 0.0 {
                return Err(InvalidExponent(s));
            }
        }
        if c.max_weight <= 0 {
            return Err(InvalidMaxWeight(c.max_weight));
        }
        if !(0.0..=1.0).contains(&c.drift) {
            return Err(InvalidDrift(c.drift));
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_are_valid() {
        assert!(GeneratorConfigBuilder::new().build().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_ranges() {
        assert_eq!(
            GeneratorConfigBuilder::new()
                .set_size_range(3, 2)
                .build()
                .unwrap_err(),
            GeneratorConfigBuildError::InvalidSetSizeRange { min: 3, max: 2 }
        );
        assert_eq!(
            GeneratorConfigBuilder::new()
                .element_count(3)
                .set_size_range(1, 4)
                .build()
                .unwrap_err(),
            GeneratorConfigBuildError::SetSizeExceedsUniverse {
                max: 4,
                elements: 3
            }
        );
        assert!(matches!(
            GeneratorConfigBuilder::new()
                .element_exponent(-1.0)
                .build()
                .unwrap_err(),
            GeneratorConfigBuildError::InvalidExponent(_)
        ));
        assert!(matches!(
            GeneratorConfigBuilder::new().drift(1.5).build().unwrap_err(),
            GeneratorConfigBuildError::InvalidDrift(_)
        ));
        assert_eq!(
            GeneratorConfigBuilder::new().row_count(0).build().unwrap_err(),
            GeneratorConfigBuildError::ZeroRows
        );
    }
}
